//! Dense symmetric distance matrix.
//!
//! The annealer only needs O(1) pairwise lookups and the node count. How the
//! distances are obtained (Euclidean, geodesic, parsed from a file) is the
//! caller's business: build the matrix from a closure or from square rows.

use crate::error::{AnnealError, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Symmetric pairwise distances between `n` nodes, stored row-major.
///
/// The main diagonal is always zero.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DistanceMatrix {
    n: usize,
    data: Vec<f64>,
}

impl DistanceMatrix {
    /// Builds a matrix by evaluating `distance(i, j)` for every `i < j` and
    /// mirroring the result below the diagonal.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_tsp_anneal::DistanceMatrix;
    ///
    /// let points: [(f64, f64); 3] = [(0.0, 0.0), (3.0, 0.0), (3.0, 4.0)];
    /// let m = DistanceMatrix::from_fn(points.len(), |i, j| {
    ///     let (dx, dy) = (points[i].0 - points[j].0, points[i].1 - points[j].1);
    ///     (dx * dx + dy * dy).sqrt()
    /// });
    /// assert_eq!(m.at(0, 2), 5.0);
    /// assert_eq!(m.at(2, 0), 5.0);
    /// ```
    pub fn from_fn<F>(n: usize, distance: F) -> Self
    where
        F: Fn(usize, usize) -> f64,
    {
        let mut data = vec![0.0; n * n];
        for i in 0..n {
            for j in (i + 1)..n {
                let d = distance(i, j);
                data[i * n + j] = d;
                data[j * n + i] = d;
            }
        }
        Self { n, data }
    }

    /// Builds a matrix from square rows.
    ///
    /// Rejects ragged input, non-finite or negative entries, a non-zero
    /// diagonal and asymmetric pairs.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let n = rows.len();
        let mut data = Vec::with_capacity(n * n);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != n {
                return Err(AnnealError::Config(format!(
                    "row {i} has {} entries, expected {n}",
                    row.len()
                )));
            }
            for (j, &d) in row.iter().enumerate() {
                if !d.is_finite() || d < 0.0 {
                    return Err(AnnealError::Config(format!(
                        "distance ({i}, {j}) must be finite and non-negative, got {d}"
                    )));
                }
                if i == j && d != 0.0 {
                    return Err(AnnealError::Config(format!(
                        "diagonal entry ({i}, {i}) must be zero, got {d}"
                    )));
                }
            }
            data.extend_from_slice(row);
        }
        for i in 0..n {
            for j in (i + 1)..n {
                if data[i * n + j] != data[j * n + i] {
                    return Err(AnnealError::Config(format!(
                        "matrix is not symmetric at ({i}, {j})"
                    )));
                }
            }
        }
        Ok(Self { n, data })
    }

    /// Number of nodes.
    #[inline]
    pub fn size(&self) -> usize {
        self.n
    }

    /// Distance between nodes `i` and `j`.
    #[inline]
    pub fn at(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.n + j]
    }

    /// Closest other node to `i`, ties broken by lowest index.
    ///
    /// Returns `None` for a single-node matrix.
    pub fn closest_node(&self, i: usize) -> Option<usize> {
        (0..self.n)
            .filter(|&j| j != i)
            .min_by(|&a, &b| self.at(i, a).total_cmp(&self.at(i, b)))
    }

    /// Length of the closed cycle visiting `tour` in order.
    ///
    /// Includes the closing edge from the last node back to the first.
    pub fn tour_cost(&self, tour: &[usize]) -> f64 {
        match (tour.first(), tour.last()) {
            (Some(&first), Some(&last)) => {
                let open: f64 = tour.windows(2).map(|w| self.at(w[0], w[1])).sum();
                open + self.at(last, first)
            }
            _ => 0.0,
        }
    }
}
