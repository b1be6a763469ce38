//! Motion estimation adapter: acceptance policy, skip handling, and
//! adaptive-baseline recovery.
//!
//! Wraps the external detector/tracker/fitter collaborators and turns raw
//! frame pairs into accepted [`MotionSample`]s. A pair whose tracking
//! degrades too far is skipped: the previous-frame reference is kept so the
//! next comparison is again against the last well-matched frame, and after a
//! sustained skip run the acceptance baseline is recomputed so the pipeline
//! does not skip forever after a jerk or occlusion episode.

use nalgebra::Matrix2x3;
use tracing::{debug, info};

use crate::features::{FeatureDetector, FeatureParams, PointTracker, RigidTransformFitter};
use crate::frame::GrayFrame;
use crate::motion::{decompose_rigid, MotionSample};
use crate::{Error, Result};

/// Feature-loss tolerance: a pair is accepted if no more than this many
/// detected points failed to track, or if the matched count clears the
/// adaptive baseline by the same margin.
const MATCH_TOLERANCE: usize = 20;

/// Acceptance baseline before any adaptation has happened.
const INITIAL_BASELINE: usize = 50;

/// Recompute the acceptance baseline after a sustained skip episode.
///
/// The new baseline is the integer mean of the last matched and original
/// point counts, re-centering the sensitivity threshold on what the scene
/// currently supports.
pub fn recompute_baseline(matched_count: usize, original_count: usize) -> usize {
    (matched_count + original_count) / 2
}

/// Process-lifetime counters owned by the estimator.
///
/// Reset only at construction; read out for observability after a run.
#[derive(Debug, Clone)]
pub struct EstimationState {
    /// Total frame pairs examined.
    pub frames_seen: u64,
    /// Accepted (non-skipped) pairs; bounds the rendering pass.
    pub accepted: usize,
    /// Total skipped pairs across the whole run.
    pub skipped: u64,
    /// Skips since the last accepted pair or baseline reset.
    pub consecutive_skips: u32,
    /// Adaptive minimum matched-point count.
    pub baseline: usize,
    /// Most recent successful rigid fit, reused when a fit degenerates.
    pub last_transform: Option<Matrix2x3<f64>>,
}

impl Default for EstimationState {
    fn default() -> Self {
        Self {
            frames_seen: 0,
            accepted: 0,
            skipped: 0,
            consecutive_skips: 0,
            baseline: INITIAL_BASELINE,
            last_transform: None,
        }
    }
}

/// Outcome of examining one frame pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Motion was accepted and the previous-frame reference advanced.
    Accepted(MotionSample),
    /// Tracking degraded; the pair was dropped and the reference kept.
    Skipped,
}

/// Estimates per-frame-pair rigid camera motion with outlier and dropout
/// handling.
///
/// Construction fixes the previous-frame reference to the stream's first
/// frame; each [`step`](MotionEstimator::step) examines the next frame
/// against that reference and either emits a motion sample (advancing the
/// reference) or skips the pair (keeping it).
pub struct MotionEstimator<'a, D, T, F> {
    detector: &'a D,
    tracker: &'a T,
    fitter: &'a F,
    params: FeatureParams,
    skip_reset_threshold: u32,
    prev_gray: GrayFrame,
    state: EstimationState,
    samples: Vec<MotionSample>,
}

impl<'a, D, T, F> MotionEstimator<'a, D, T, F>
where
    D: FeatureDetector,
    T: PointTracker,
    F: RigidTransformFitter,
{
    /// Create an estimator anchored on the stream's first grayscale frame.
    pub fn new(
        detector: &'a D,
        tracker: &'a T,
        fitter: &'a F,
        params: FeatureParams,
        skip_reset_threshold: u32,
        first_gray: GrayFrame,
    ) -> Self {
        Self {
            detector,
            tracker,
            fitter,
            params,
            skip_reset_threshold,
            prev_gray: first_gray,
            state: EstimationState::default(),
            samples: Vec::new(),
        }
    }

    /// Examine the next frame against the held previous-frame reference.
    ///
    /// # Errors
    /// [`Error::InitialFitFailure`] if the rigid fit degenerates on the very
    /// first accepted pair, before any fallback transform exists. Later fit
    /// failures are absorbed by reusing the last successful transform.
    pub fn step(&mut self, cur_gray: &GrayFrame) -> Result<StepOutcome> {
        self.state.frames_seen += 1;

        let prev_pts = self.detector.detect(&self.prev_gray, &self.params);
        let original = prev_pts.nrows();

        let tracked = self.tracker.track(&self.prev_gray, cur_gray, &prev_pts);
        let (prev_matched, cur_matched) = tracked.matched(&prev_pts);
        let matched = prev_matched.nrows();

        let accepted = matched + MATCH_TOLERANCE >= original
            || matched + MATCH_TOLERANCE >= self.state.baseline;

        if !accepted {
            self.state.skipped += 1;
            self.state.consecutive_skips += 1;
            debug!(
                matched,
                original,
                baseline = self.state.baseline,
                "frame pair skipped"
            );

            if self.state.consecutive_skips > self.skip_reset_threshold {
                self.state.baseline = recompute_baseline(matched, original);
                self.state.consecutive_skips = 0;
                info!(
                    baseline = self.state.baseline,
                    "acceptance baseline recomputed after sustained skip run"
                );
            }

            return Ok(StepOutcome::Skipped);
        }

        let transform = match self.fitter.fit(&prev_matched, &cur_matched) {
            Some(t) => t,
            None => self.state.last_transform.ok_or_else(|| {
                Error::InitialFitFailure(format!(
                    "rigid fit degenerated on the first frame pair ({matched} correspondences)"
                ))
            })?,
        };
        self.state.last_transform = Some(transform);

        let sample = decompose_rigid(&transform);
        self.samples.push(sample);
        self.state.accepted += 1;
        self.state.consecutive_skips = 0;
        self.prev_gray = cur_gray.clone();

        debug!(
            matched,
            frame = self.state.frames_seen,
            dx = sample.dx,
            dy = sample.dy,
            "frame pair accepted"
        );

        Ok(StepOutcome::Accepted(sample))
    }

    /// Counters accumulated so far.
    pub fn state(&self) -> &EstimationState {
        &self.state
    }

    /// Accepted samples so far, in temporal order.
    pub fn samples(&self) -> &[MotionSample] {
        &self.samples
    }

    /// Consume the estimator, yielding the accepted samples and final state.
    pub fn finish(self) -> (Vec<MotionSample>, EstimationState) {
        (self.samples, self.state)
    }
}
