//! Dense rectangular linear sum assignment (spec §4.3, §9: "a standalone
//! Hungarian / Jonker-Volgenant implementation is required; do not assume
//! square matrices").
//!
//! Implements the classic O(n^2 * m) shortest-augmenting-path Hungarian
//! algorithm with row/column potentials, generalized to rectangular
//! matrices by always running the inner solve with the smaller dimension
//! as "rows" and transposing the result back. Unlike the sparse LAPMOD
//! formulation (which embeds a rectangular problem into a padded square
//! one to exploit sparsity), PAF score matrices here are small and dense
//! by construction, so the inner solve works directly on the rectangular
//! matrix without any padding trick.

use ndarray::Array2;

/// Solve the rectangular linear sum assignment problem on `cost`, an
/// `n_rows x n_cols` matrix.
///
/// Returns `min(n_rows, n_cols)` pairs `(row, col)` forming a globally
/// minimal-cost matching: every row is matched if `n_rows <= n_cols`,
/// every column is matched otherwise. Deterministic for identical input
/// (no randomized tie-breaking), satisfying spec §4.3's stability
/// requirement.
pub fn solve_rectangular(cost: &Array2<f32>) -> Vec<(usize, usize)> {
    let (n_rows, n_cols) = cost.dim();
    if n_rows == 0 || n_cols == 0 {
        return Vec::new();
    }
    if n_rows <= n_cols {
        solve_n_le_m(cost, n_rows, n_cols)
    } else {
        let cost_t = cost.t().to_owned();
        solve_n_le_m(&cost_t, n_cols, n_rows)
            .into_iter()
            .map(|(r, c)| (c, r))
            .collect()
    }
}

/// Solve assuming `n <= m` (n rows, m columns), matching every row.
/// 1-indexed internally; row/column 0 are unused sentinels, following the
/// textbook presentation of the algorithm.
fn solve_n_le_m(cost: &Array2<f32>, n: usize, m: usize) -> Vec<(usize, usize)> {
    let inf = f32::INFINITY;
    let mut u = vec![0.0f32; n + 1];
    let mut v = vec![0.0f32; m + 1];
    let mut p = vec![0usize; m + 1]; // p[j] = row matched to column j (0 = unmatched)
    let mut way = vec![0usize; m + 1];

    let a = |i: usize, j: usize| cost[[i - 1, j - 1]];

    for i in 1..=n {
        p[0] = i;
        let mut j0 = 0usize;
        let mut minv = vec![inf; m + 1];
        let mut used = vec![false; m + 1];
        loop {
            used[j0] = true;
            let i0 = p[j0];
            let mut delta = inf;
            let mut j1 = 0usize;
            for j in 1..=m {
                if !used[j] {
                    let cur = a(i0, j) - u[i0] - v[j];
                    if cur < minv[j] {
                        minv[j] = cur;
                        way[j] = j0;
                    }
                    if minv[j] < delta {
                        delta = minv[j];
                        j1 = j;
                    }
                }
            }
            for j in 0..=m {
                if used[j] {
                    u[p[j]] += delta;
                    v[j] -= delta;
                } else {
                    minv[j] -= delta;
                }
            }
            j0 = j1;
            if p[j0] == 0 {
                break;
            }
        }
        loop {
            let j1 = way[j0];
            p[j0] = p[j1];
            j0 = j1;
            if j0 == 0 {
                break;
            }
        }
    }

    let mut result: Vec<(usize, usize)> = (1..=m)
        .filter(|&j| p[j] != 0)
        .map(|j| (p[j] - 1, j - 1))
        .collect();
    result.sort_unstable_by_key(|&(r, _)| r);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_identity_like_matrix() {
        let cost = Array2::from_shape_vec((3, 3), vec![1.0, 2.0, 3.0, 4.0, 1.0, 6.0, 7.0, 8.0, 1.0])
            .unwrap();
        let mut matching = solve_rectangular(&cost);
        matching.sort_unstable();
        assert_eq!(matching, vec![(0, 0), (1, 1), (2, 2)]);
    }

    #[test]
    fn more_rows_than_columns() {
        // 3 sources, 2 destinations: every destination gets matched, one
        // source is left out.
        let cost = Array2::from_shape_vec(
            (3, 2),
            vec![
                1.0, 10.0, //
                10.0, 1.0, //
                0.5, 0.5, //
            ],
        )
        .unwrap();
        let mut matching = solve_rectangular(&cost);
        matching.sort_unstable();
        assert_eq!(matching.len(), 2);
        // Optimal: row0-col0 (1.0) + row1-col1 (1.0) = 2.0, beats any
        // alternative that uses row2.
        assert_eq!(matching, vec![(0, 0), (1, 1)]);
    }

    #[test]
    fn more_columns_than_rows() {
        let cost = Array2::from_shape_vec(
            (2, 3),
            vec![
                1.0, 10.0, 0.5, //
                10.0, 1.0, 0.5, //
            ],
        )
        .unwrap();
        let mut matching = solve_rectangular(&cost);
        matching.sort_unstable();
        assert_eq!(matching.len(), 2);
        assert_eq!(matching, vec![(0, 0), (1, 1)]);
    }

    #[test]
    fn empty_matrix_produces_no_matches() {
        let cost = Array2::<f32>::zeros((0, 3));
        assert!(solve_rectangular(&cost).is_empty());
        let cost = Array2::<f32>::zeros((3, 0));
        assert!(solve_rectangular(&cost).is_empty());
    }

    #[test]
    fn crossed_candidates_disambiguated_globally() {
        // Mirrors spec §8 S3: the greedy row-max choice would pick
        // (0,0)+(1,1) by local maxima, but here the global optimum under
        // minimization is still (0,0)+(1,1) since it strictly dominates
        // the crossed alternative.
        let cost = Array2::from_shape_vec((2, 2), vec![-0.95, -0.90, -0.80, -0.95]).unwrap();
        let mut matching = solve_rectangular(&cost);
        matching.sort_unstable();
        assert_eq!(matching, vec![(0, 0), (1, 1)]);
    }
}
