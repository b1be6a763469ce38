//! # videostab - Video Stabilization Library
//!
//! Stabilizes handheld/jerky video by estimating inter-frame camera motion,
//! smoothing the motion trajectory over a temporal window, and computing a
//! corrective transform per frame that cancels high-frequency jitter while
//! preserving intentional pan/tilt.
//!
//! ## How it works
//!
//! - Per frame pair, a rigid (rotation + translation) transform is fitted
//!   from tracked feature points; pairs whose tracking degrades too far are
//!   skipped with an adaptive recovery baseline
//! - Relative motion samples are integrated into a cumulative trajectory
//! - The trajectory is low-pass filtered with a centered moving average
//! - Each frame gets a corrective transform steering it onto the smoothed
//!   trajectory
//!
//! The algorithm is fundamentally two-pass: the smoothing window looks both
//! backward and forward in time, so pass 1 must consume the entire stream
//! before pass 2 can render the first corrected frame.
//!
//! Feature detection, point tracking, rigid fitting, frame decoding, and
//! warp rasterization are external collaborators behind traits; the core is
//! a deterministic, single-threaded transform over an ordered sequence.
//!
//! ## Example
//!
//! ```rust,ignore
//! use videostab_rs::{Stabilizer, StabilizerConfig};
//!
//! let stabilizer = Stabilizer::new(
//!     StabilizerConfig::default(),
//!     my_detector,   // impl FeatureDetector
//!     my_tracker,    // impl PointTracker
//!     my_fitter,     // impl RigidTransformFitter
//! )?;
//!
//! let (frames, report) = stabilizer.run(&mut source, &mut compositor)?;
//! println!("accepted {} pairs, skipped {}", report.accepted, report.skipped);
//! ```

pub mod correction;
pub mod estimator;
pub mod features;
pub mod frame;
pub mod motion;
pub mod pipeline;
pub mod trajectory;

// Re-exports for convenience
pub use correction::{compute_corrections, StabilizationPlan};
pub use estimator::{recompute_baseline, EstimationState, MotionEstimator, StepOutcome};
pub use features::{
    FeatureDetector, FeatureParams, PointTracker, RigidTransformFitter, TrackedPoints,
};
pub use frame::{vertical_border, Frame, FrameCompositor, FrameSource, GrayFrame};
pub use motion::{correction_matrix, decompose_rigid, MotionSample, TrajectoryPoint};
pub use pipeline::{StabilizationReport, Stabilizer, StabilizerConfig};
pub use trajectory::{cumulative_trajectory, smooth_trajectory};

// Error types
pub use crate::error::{Error, Result};

mod error {
    use thiserror::Error;

    /// Errors that can occur in the stabilization pipeline.
    ///
    /// Skips, degraded tracking, and mid-stream fit fallbacks are part of
    /// normal adaptive behavior and are absorbed internally; only the
    /// conditions below surface to the caller.
    #[derive(Error, Debug)]
    pub enum Error {
        #[error("Invalid configuration: {0}")]
        InvalidConfig(String),

        #[error("Frame source yielded no frames")]
        EmptyStream,

        #[error("Rigid fit failed with no fallback available: {0}")]
        InitialFitFailure(String),

        #[error("IO error: {0}")]
        IoError(#[from] std::io::Error),
    }

    /// Result type for stabilization operations.
    pub type Result<T> = std::result::Result<T, Error>;
}
