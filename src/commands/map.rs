//! The `map` command: scan, build, analyze, write, report.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use crate::analysis::coverage::CoverageAnalyzer;
use crate::config::DocmapConfig;
use crate::errors::DocmapError;
use crate::io::output::{self, build_document, create_writer, RunReport};
use crate::mapping::MappingBuilder;

pub struct MapConfig {
    pub root: PathBuf,
    pub config_path: Option<PathBuf>,
    pub format: output::OutputFormat,
    pub output: Option<PathBuf>,
    pub ground_truth: Option<PathBuf>,
    pub fuzzy_threshold: Option<f64>,
    pub artifact: Option<PathBuf>,
}

pub fn run(map_config: MapConfig) -> Result<()> {
    let mut config = DocmapConfig::load(map_config.config_path.as_deref(), &map_config.root)?;

    if let Some(path) = map_config.ground_truth {
        config.ground_truth = Some(path);
    }
    if let Some(threshold) = map_config.fuzzy_threshold {
        config.matching.fuzzy_threshold = threshold;
    }
    if let Some(artifact) = map_config.artifact {
        config.output.artifact = artifact;
    }
    config
        .validate()
        .map_err(|message| anyhow::anyhow!("Invalid configuration: {message}"))?;

    let builder = MappingBuilder::new(&config, &map_config.root);
    let mapping = builder.build();
    let coverage = CoverageAnalyzer::analyze(&mapping);

    let report = RunReport {
        mapping: &mapping,
        coverage: &coverage,
        root: &map_config.root,
    };

    // The artifact write is the one operation whose failure is fatal; every
    // scan problem has already been absorbed into the diagnostics.
    let artifact_path = config.artifact_path(&map_config.root);
    let document = build_document(&report);
    let json = serde_json::to_string_pretty(&document)
        .context("Failed to serialize the mapping artifact")?;
    if let Some(parent) = artifact_path.parent() {
        crate::io::ensure_dir(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(&artifact_path, &json).map_err(|source| DocmapError::ArtifactWrite {
        path: artifact_path.clone(),
        source,
    })?;
    log::info!("wrote mapping artifact to {}", artifact_path.display());

    let destination: Box<dyn Write> = match &map_config.output {
        Some(path) => Box::new(
            File::create(path)
                .with_context(|| format!("Failed to create report file {}", path.display()))?,
        ),
        None => Box::new(std::io::stdout()),
    };
    let mut writer = create_writer(map_config.format, destination);
    writer.write_report(&report)?;

    Ok(())
}
