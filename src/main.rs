use anyhow::Result;
use clap::Parser;
use docmap::cli::{Cli, Commands};
use docmap::commands::map::MapConfig;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Map {
            path,
            format,
            output,
            config,
            ground_truth,
            fuzzy_threshold,
            artifact,
        } => docmap::commands::map::run(MapConfig {
            root: path,
            config_path: config,
            format: format.into(),
            output,
            ground_truth,
            fuzzy_threshold,
            artifact,
        }),
        Commands::Init { force } => docmap::commands::init::init_config(force),
    }
}
