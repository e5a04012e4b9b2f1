//! Matching utilities for multi-object tracking.

use ndarray::Array2;

use crate::tracker::rect::Rect;

/// Detection input for the trackers.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    /// Detector class id
    pub class_id: i32,
    /// Detection confidence score in (0, 1]
    pub confidence: f64,
    /// Bounding box in TLWH format
    pub bbox: Rect,
}

impl Detection {
    pub fn new(class_id: i32, confidence: f64, bbox: Rect) -> Self {
        Self {
            class_id,
            confidence,
            bbox,
        }
    }

    pub fn from_tlbr(class_id: i32, confidence: f64, x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self::new(class_id, confidence, Rect::from_tlbr(x1, y1, x2, y2))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentResult {
    /// Committed (row, col) pairs in the order they were accepted.
    pub matches: Vec<(usize, usize)>,
    pub unmatched_rows: Vec<usize>,
    pub unmatched_cols: Vec<usize>,
}

/// Greedy row-priority assignment over a cost matrix.
///
/// Every row proposes its cheapest column (the first one on ties). Rows are
/// then visited by ascending proposal cost, with a stable sort so equal costs
/// keep row order, and a proposal is accepted only if neither its row nor its
/// column has been taken. A row whose preferred column was taken stays
/// unmatched even if another free column exists.
pub fn greedy_assignment(cost_matrix: &Array2<f64>) -> AssignmentResult {
    let (num_rows, num_cols) = cost_matrix.dim();

    if num_rows == 0 || num_cols == 0 {
        return AssignmentResult {
            matches: vec![],
            unmatched_rows: (0..num_rows).collect(),
            unmatched_cols: (0..num_cols).collect(),
        };
    }

    let proposals: Vec<(usize, f64)> = cost_matrix
        .rows()
        .into_iter()
        .map(|row| {
            row.iter()
                .copied()
                .enumerate()
                .fold((0, f64::INFINITY), |best, (j, cost)| {
                    if cost < best.1 { (j, cost) } else { best }
                })
        })
        .collect();

    let mut order: Vec<usize> = (0..num_rows).collect();
    order.sort_by(|&a, &b| proposals[a].1.total_cmp(&proposals[b].1));

    let mut used_rows = vec![false; num_rows];
    let mut used_cols = vec![false; num_cols];
    let mut matches = Vec::new();

    for row in order {
        let col = proposals[row].0;
        if used_rows[row] || used_cols[col] {
            continue;
        }
        used_rows[row] = true;
        used_cols[col] = true;
        matches.push((row, col));
    }

    let unmatched_rows = used_rows
        .iter()
        .enumerate()
        .filter_map(|(i, &used)| if used { None } else { Some(i) })
        .collect();
    let unmatched_cols = used_cols
        .iter()
        .enumerate()
        .filter_map(|(j, &used)| if used { None } else { Some(j) })
        .collect();

    AssignmentResult {
        matches,
        unmatched_rows,
        unmatched_cols,
    }
}
