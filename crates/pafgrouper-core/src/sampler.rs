//! Vector-field sampler (spec §4.1).

use ndarray::ArrayView3;

use crate::types::Peak;

/// Sample a PAF plane along the straight line between two peaks.
///
/// Generates `n_points` equally spaced coordinates linearly interpolating
/// from `src` to `dst` inclusive in image space, rescales into PAF grid
/// units by `stride`, rounds half-away-from-zero, clips to the plane's
/// bounds, and gathers the 2-vector at each location.
///
/// Round-then-clip (not clip-then-round) matters at the image boundary —
/// `f32::round` already rounds ties away from zero, so this is a direct
/// translation of spec §4.1's procedure.
pub fn sample_edge_line(
    paf: ArrayView3<f32>,
    src: &Peak,
    dst: &Peak,
    stride: u32,
    n_points: usize,
) -> Vec<[f32; 2]> {
    let (h, w, _) = paf.dim();
    let max_row = (h - 1) as f32;
    let max_col = (w - 1) as f32;
    let stride = stride as f32;

    let mut samples = Vec::with_capacity(n_points);
    for k in 0..n_points {
        let t = if n_points == 1 {
            0.0
        } else {
            k as f32 / (n_points - 1) as f32
        };
        let x = src.x + t * (dst.x - src.x);
        let y = src.y + t * (dst.y - src.y);

        let col = (x / stride).round().clamp(0.0, max_col) as usize;
        let row = (y / stride).round().clamp(0.0, max_row) as usize;

        samples.push([paf[[row, col, 0]], paf[[row, col, 1]]]);
    }
    samples
}
