//! External collaborator interfaces: feature detection, point tracking, and
//! rigid-transform fitting.
//!
//! The correspondence math itself lives behind these traits (an OpenCV
//! binding, a pure-Rust tracker, or a scripted test double); the core only
//! depends on the shapes defined here. Point sets follow the
//! `n_points x 2` row-per-point convention.

use nalgebra::{DMatrix, Matrix2x3};
use serde::{Deserialize, Serialize};

use crate::frame::GrayFrame;

/// Parameters for feature detection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureParams {
    /// Maximum number of corners to detect per frame.
    pub max_points: usize,
    /// Minimum accepted corner quality, relative to the strongest corner.
    pub quality_threshold: f64,
    /// Minimum Euclidean distance between detected corners, in pixels.
    pub min_distance: f64,
}

impl Default for FeatureParams {
    fn default() -> Self {
        Self {
            max_points: 150,
            quality_threshold: 0.01,
            min_distance: 30.0,
        }
    }
}

/// Per-point output of one tracking call.
#[derive(Debug, Clone)]
pub struct TrackedPoints {
    /// Tracked point locations in the current frame (n_points x 2).
    pub points: DMatrix<f64>,
    /// Per-point success flags; unset means the flow was not found.
    pub status: Vec<bool>,
    /// Per-point error estimates; undefined where the flag is unset.
    pub errors: Vec<f64>,
}

impl TrackedPoints {
    /// Filter correspondences down to the successfully tracked subset.
    ///
    /// # Arguments
    /// * `prev` - The point set that was handed to the tracker (n_points x 2)
    ///
    /// # Returns
    /// `(prev_matched, cur_matched)` with one row per point whose status
    /// flag is set, in the original order.
    pub fn matched(&self, prev: &DMatrix<f64>) -> (DMatrix<f64>, DMatrix<f64>) {
        let mut prev_rows: Vec<f64> = Vec::new();
        let mut cur_rows: Vec<f64> = Vec::new();

        for (i, &ok) in self.status.iter().enumerate() {
            if ok {
                prev_rows.extend_from_slice(&[prev[(i, 0)], prev[(i, 1)]]);
                cur_rows.extend_from_slice(&[self.points[(i, 0)], self.points[(i, 1)]]);
            }
        }

        let n = prev_rows.len() / 2;
        (
            DMatrix::from_row_slice(n, 2, &prev_rows),
            DMatrix::from_row_slice(n, 2, &cur_rows),
        )
    }
}

/// Corner/feature detector (e.g. Shi-Tomasi "good features to track").
pub trait FeatureDetector: Send + Sync {
    /// Detect up to `params.max_points` trackable points in a frame.
    fn detect(&self, gray: &GrayFrame, params: &FeatureParams) -> DMatrix<f64>;
}

/// Sparse optical-flow point tracker (e.g. pyramidal Lucas-Kanade).
pub trait PointTracker: Send + Sync {
    /// Track `points` from the previous frame into the current one.
    fn track(
        &self,
        prev_gray: &GrayFrame,
        cur_gray: &GrayFrame,
        points: &DMatrix<f64>,
    ) -> TrackedPoints;
}

/// Least-squares fitter for a rigid (rotation + translation) 2D transform.
pub trait RigidTransformFitter: Send + Sync {
    /// Fit a rigid transform mapping `prev_pts` onto `cur_pts`.
    ///
    /// Returns `None` when the correspondence set is degenerate (too few or
    /// collinear points); the estimator falls back to the last successful
    /// transform in that case.
    fn fit(&self, prev_pts: &DMatrix<f64>, cur_pts: &DMatrix<f64>) -> Option<Matrix2x3<f64>>;
}
