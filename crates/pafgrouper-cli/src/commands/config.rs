use anyhow::{Context, Result};
use pafgrouper_core::PafScorerConfig;

/// Print a minimal example skeleton config as TOML to stdout.
pub fn run() -> Result<()> {
    let config = PafScorerConfig::new(
        vec!["head".into(), "neck".into(), "tail".into()],
        vec![("head".into(), "neck".into()), ("neck".into(), "tail".into())],
        1,
    )
    .expect("example skeleton is valid");
    let toml_str = toml::to_string_pretty(&config).context("serializing example skeleton")?;
    print!("{toml_str}");
    Ok(())
}
