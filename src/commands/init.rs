use crate::io;
use anyhow::Result;
use std::path::PathBuf;

pub fn init_config(force: bool) -> Result<()> {
    let config_path = PathBuf::from("docmap.toml");

    if config_path.exists() && !force {
        anyhow::bail!("Configuration file already exists. Use --force to overwrite.");
    }

    let default_config = r#"# Docmap Configuration

# JSON document mapping version -> method names extracted from dispatcher code.
ground_truth = "api_methods.json"

# Collaboration-tool collection exports (presence flag only).
collections_dir = "collections"

# Alias versions merge into their primary after the build.
[aliases]
"v2-dev" = "v2"

[matching]
# A fuzzy candidate's normalized similarity must strictly exceed this.
fuzzy_threshold = 0.7

[output]
artifact = "unified_method_mapping.json"

[[versions]]
name = "v1"
docs_dir = "docs/v1"
spec_dir = "openapi/paths/v1"
examples_dir = "requests/v1"

[[versions]]
name = "v2"
docs_dir = "docs/v2"
spec_dir = "openapi/paths/v2"
examples_dir = "requests/v2"

[[versions]]
name = "v2-dev"
docs_dir = "docs/v2-dev"
spec_dir = "openapi/paths/v2"
examples_dir = "requests/v2"
"#;

    io::write_file(&config_path, default_config)?;
    println!("Created docmap.toml configuration file");

    Ok(())
}
