//! Point distance strategies shared by matching and speed estimation.

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::tracker::rect::Point;

/// Distance metric between two pixel positions.
///
/// One metric is chosen per pipeline and used by every component of it, so
/// association and speed never disagree on what "distance" means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMetric {
    /// Straight-line (L2) distance.
    #[default]
    Euclidean,
    /// Sum of absolute axis differences (L1).
    Taxicab,
}

impl DistanceMetric {
    pub fn distance(&self, a: &Point, b: &Point) -> f64 {
        let d = a.displacement_to(b);
        match self {
            Self::Euclidean => d.norm(),
            Self::Taxicab => d.lp_norm(1),
        }
    }

    /// Pairwise distance matrix of shape (M, N), where M is the length of
    /// `rows` and N is the length of `cols`.
    pub fn distance_matrix(&self, rows: &[Point], cols: &[Point]) -> Array2<f64> {
        let mut dists = Array2::zeros((rows.len(), cols.len()));
        for (i, a) in rows.iter().enumerate() {
            for (j, b) in cols.iter().enumerate() {
                dists[[i, j]] = self.distance(a, b);
            }
        }
        dists
    }
}
