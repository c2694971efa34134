use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use pafgrouper_core::{PafGroupError, PafScorerConfig};

#[derive(Args)]
pub struct InfoArgs {
    /// Skeleton configuration (TOML).
    pub skeleton: PathBuf,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let toml_str = std::fs::read_to_string(&args.skeleton)
        .map_err(PafGroupError::from)
        .with_context(|| format!("reading skeleton config {}", args.skeleton.display()))?;
    let mut config: PafScorerConfig = toml::from_str(&toml_str).context("parsing skeleton config")?;
    config.validate()?;

    println!("Nodes:        {}", config.n_nodes());
    println!("Edges:        {}", config.n_edges());
    println!("Stride:       {}", config.pafs_stride);
    println!("Max edge len: {}", config.max_edge_length);
    println!("Min edge scr: {}", config.min_edge_score);
    println!("Sample pts:   {}", config.n_points);
    println!("Min instance peaks: {}", config.min_instance_peaks);
    println!();
    for (ind, name) in config.part_names.iter().enumerate() {
        println!("  [{ind}] {name}");
    }
    println!();
    for (src, dst) in &config.edges {
        println!("  {src} -> {dst}");
    }

    Ok(())
}
