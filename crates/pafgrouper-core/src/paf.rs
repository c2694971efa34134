//! Part Affinity Field tensor access (spec §3, §9 "PAF tensor layout").

use ndarray::{Array3, Array4, ArrayView3, Axis};

use crate::error::{PafGroupError, Result};

/// A part affinity field stack for one frame, normalized internally to
/// `[H, W, E, 2]` regardless of which layout the caller supplied.
pub struct PafField {
    data: Array4<f32>,
}

impl PafField {
    /// Build from the `[H, W, 2*E]` layout, where channels are edge-major
    /// interleaved x/y pairs: `data[.., .., 2*e]` is the x component of
    /// edge `e`, `data[.., .., 2*e+1]` its y component.
    pub fn from_hw_2e(data: Array3<f32>, n_edges: usize) -> Result<Self> {
        let (h, w, c) = data.dim();
        if c != 2 * n_edges {
            return Err(PafGroupError::Shape(format!(
                "PAF last dimension {c} does not match 2 * n_edges ({})",
                2 * n_edges
            )));
        }
        let reshaped =
            Array4::from_shape_fn((h, w, n_edges, 2), |(r, col, e, k)| data[[r, col, 2 * e + k]]);
        Ok(Self { data: reshaped })
    }

    /// Build directly from the already-unflattened `[H, W, E, 2]` layout.
    pub fn from_hw_e_2(data: Array4<f32>, n_edges: usize) -> Result<Self> {
        let (_, _, e, c) = data.dim();
        if e != n_edges || c != 2 {
            return Err(PafGroupError::Shape(format!(
                "expected PAF shape [H, W, {n_edges}, 2], got [.., .., {e}, {c}]"
            )));
        }
        Ok(Self { data })
    }

    /// `(height, width, n_edges)`.
    pub fn dims(&self) -> (usize, usize, usize) {
        let (h, w, e, _) = self.data.dim();
        (h, w, e)
    }

    /// The `[H, W, 2]` vector-field plane for one edge, without copying.
    pub fn edge_plane(&self, edge_ind: usize) -> ArrayView3<f32> {
        self.data.index_axis(Axis(2), edge_ind)
    }
}
