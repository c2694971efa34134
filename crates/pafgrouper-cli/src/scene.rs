//! JSON scene loading: one frame's peaks and PAF tensor, the host-pipeline
//! boundary of spec §6.

use std::path::Path;

use ndarray::{Array1, Array2, Array3, Array4};
use pafgrouper_core::{PafGroupError, Result};
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(rename_all = "snake_case")]
enum PafLayout {
    /// `[H, W, 2*E]`, edge-major interleaved x/y.
    Hw2e,
    /// `[H, W, E, 2]`.
    HwE2,
}

#[derive(Deserialize)]
struct SceneFile {
    pafs_layout: PafLayout,
    /// Nested row-major array, shape depending on `pafs_layout`.
    pafs: serde_json::Value,
    /// `[P][2]` image-pixel (x, y) coordinates.
    peaks: Vec<[f32; 2]>,
    /// `[P]` detection scores.
    peak_scores: Vec<f32>,
    /// `[P]` channel indices in `[0, N)`.
    channels: Vec<usize>,
}

/// A loaded frame: flat peak arrays plus the PAF tensor in whichever
/// layout the scene file declared.
pub struct Scene {
    pub pafs_hw_2e: Option<Array3<f32>>,
    pub pafs_hw_e_2: Option<Array4<f32>>,
    pub coords: Array2<f32>,
    pub scores: Array1<f32>,
    pub channels: Vec<usize>,
}

pub fn load(path: &Path) -> Result<Scene> {
    let raw = std::fs::read_to_string(path)?;
    let scene: SceneFile = serde_json::from_str(&raw)?;

    let p = scene.peaks.len();
    let coords = Array2::from_shape_vec((p, 2), scene.peaks.into_iter().flatten().collect())
        .map_err(|e| PafGroupError::Shape(format!("peaks array is not rectangular: {e}")))?;
    let scores = Array1::from_vec(scene.peak_scores);

    let (pafs_hw_2e, pafs_hw_e_2) = match scene.pafs_layout {
        PafLayout::Hw2e => (Some(decode_3d(scene.pafs)?), None),
        PafLayout::HwE2 => (None, Some(decode_4d(scene.pafs)?)),
    };

    Ok(Scene { pafs_hw_2e, pafs_hw_e_2, coords, scores, channels: scene.channels })
}

fn decode_3d(value: serde_json::Value) -> Result<Array3<f32>> {
    let nested: Vec<Vec<Vec<f32>>> = serde_json::from_value(value)?;
    let h = nested.len();
    let w = nested.first().map_or(0, |row| row.len());
    let c = nested.first().and_then(|row| row.first()).map_or(0, |px| px.len());
    let flat: Vec<f32> = nested.into_iter().flatten().flatten().collect();
    Array3::from_shape_vec((h, w, c), flat)
        .map_err(|e| PafGroupError::Shape(format!("pafs array is not rectangular: {e}")))
}

fn decode_4d(value: serde_json::Value) -> Result<Array4<f32>> {
    let nested: Vec<Vec<Vec<Vec<f32>>>> = serde_json::from_value(value)?;
    let h = nested.len();
    let w = nested.first().map_or(0, |row| row.len());
    let e = nested.first().and_then(|row| row.first()).map_or(0, |px| px.len());
    let flat: Vec<f32> = nested.into_iter().flatten().flatten().flatten().collect();
    Array4::from_shape_vec((h, w, e, 2), flat)
        .map_err(|e| PafGroupError::Shape(format!("pafs array is not rectangular: {e}")))
}
