use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use pafgrouper_core::{FlatPeaks, PafGroupError, PafScorerConfig};

use crate::scene;

#[derive(Args)]
pub struct GroupArgs {
    /// Skeleton configuration (TOML): part_names, edges, pafs_stride, ...
    pub skeleton: PathBuf,
    /// Scene file (JSON): peaks, peak_scores, channels, pafs.
    pub scene: PathBuf,
}

pub fn run(args: &GroupArgs) -> Result<()> {
    let skeleton_toml = std::fs::read_to_string(&args.skeleton)
        .map_err(PafGroupError::from)
        .with_context(|| format!("reading skeleton config {}", args.skeleton.display()))?;
    let mut config: PafScorerConfig =
        toml::from_str(&skeleton_toml).context("parsing skeleton config")?;
    config.validate()?;

    let scene = scene::load(&args.scene)?;
    let flat = FlatPeaks {
        coords: scene.coords.view(),
        scores: scene.scores.view(),
        channels: &scene.channels,
    };

    let result = pafgrouper_core::group(scene.pafs_hw_2e, scene.pafs_hw_e_2, flat, &config)?;

    let m = result.coords.shape()[0];
    println!("instances: {m}");
    for i in 0..m {
        print!("  instance {i} (score {:.4}):", result.instance_scores[i]);
        for c in 0..config.n_nodes() {
            let x = result.coords[[i, c, 0]];
            let y = result.coords[[i, c, 1]];
            if x.is_nan() {
                print!(" {}=--", config.part_names[c]);
            } else {
                print!(" {}=({x:.1},{y:.1})", config.part_names[c]);
            }
        }
        println!();
    }

    Ok(())
}
