//! Two-pass stabilization pipeline.
//!
//! Pass 1 streams the whole input through the motion estimator; the smoothing
//! window looks both backward and forward in time, so no corrected frame can
//! be emitted until the full trajectory is known. Pass 2 rewinds the source
//! and re-renders exactly the accepted frames with their corrective
//! transforms. The pipeline is strictly sequential; the complete trajectory
//! is held in memory for the duration of a run.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::correction::StabilizationPlan;
use crate::estimator::{EstimationState, MotionEstimator};
use crate::features::{FeatureDetector, FeatureParams, PointTracker, RigidTransformFitter};
use crate::frame::{Frame, FrameCompositor, FrameSource};
use crate::motion::MotionSample;
use crate::{Error, Result};

/// Pipeline configuration. Defaults mirror the reference constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StabilizerConfig {
    /// Smoothing half-window; smaller values react faster to sudden jerks
    /// at the cost of smoothing less jitter.
    pub frame_radius: usize,
    /// Horizontal border crop in pixels applied by the compositor; the
    /// vertical margin is scaled by the frame aspect ratio.
    pub edge_removal: u32,
    /// Maximum corners detected per frame.
    pub max_feature_points: usize,
    /// Minimum accepted corner quality, relative to the strongest corner.
    pub feature_quality_threshold: f64,
    /// Minimum distance between detected corners, in pixels.
    pub min_feature_distance: f64,
    /// Consecutive skips before the acceptance baseline is recomputed.
    pub skip_reset_threshold: u32,
}

impl Default for StabilizerConfig {
    fn default() -> Self {
        Self {
            frame_radius: 7,
            edge_removal: 35,
            max_feature_points: 150,
            feature_quality_threshold: 0.01,
            min_feature_distance: 30.0,
            skip_reset_threshold: 30,
        }
    }
}

impl StabilizerConfig {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        if self.frame_radius == 0 {
            return Err(Error::InvalidConfig(
                "frame_radius must be nonzero".to_string(),
            ));
        }
        if self.max_feature_points == 0 {
            return Err(Error::InvalidConfig(
                "max_feature_points must be nonzero".to_string(),
            ));
        }
        if !(self.feature_quality_threshold > 0.0 && self.feature_quality_threshold <= 1.0) {
            return Err(Error::InvalidConfig(format!(
                "feature_quality_threshold must be in (0, 1], got {}",
                self.feature_quality_threshold
            )));
        }
        Ok(())
    }

    fn feature_params(&self) -> FeatureParams {
        FeatureParams {
            max_points: self.max_feature_points,
            quality_threshold: self.feature_quality_threshold,
            min_distance: self.min_feature_distance,
        }
    }
}

/// Summary of one stabilization run.
#[derive(Debug, Clone)]
pub struct StabilizationReport {
    /// Frames pulled from the source in pass 1 (including the anchor frame).
    pub frames_read: u64,
    /// Accepted frame pairs.
    pub accepted: usize,
    /// Skipped frame pairs.
    pub skipped: u64,
    /// Frames re-rendered in pass 2.
    pub rendered: usize,
    /// The full trajectory pass output.
    pub plan: StabilizationPlan,
}

/// Two-pass video stabilizer.
///
/// Owns the external estimation collaborators and the configuration; each
/// [`run`](Stabilizer::run) drives one source/compositor pair through both
/// passes.
pub struct Stabilizer<D, T, F> {
    config: StabilizerConfig,
    detector: D,
    tracker: T,
    fitter: F,
}

impl<D, T, F> Stabilizer<D, T, F>
where
    D: FeatureDetector,
    T: PointTracker,
    F: RigidTransformFitter,
{
    /// Create a stabilizer.
    ///
    /// # Errors
    /// [`Error::InvalidConfig`] for out-of-range configuration values.
    pub fn new(config: StabilizerConfig, detector: D, tracker: T, fitter: F) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            detector,
            tracker,
            fitter,
        })
    }

    /// The configuration this stabilizer was built with.
    pub fn config(&self) -> &StabilizerConfig {
        &self.config
    }

    /// Consume the stabilizer, returning the configuration and the external
    /// collaborators it was built from.
    pub fn into_parts(self) -> (StabilizerConfig, D, T, F) {
        (self.config, self.detector, self.tracker, self.fitter)
    }

    /// Pass 1: consume the source and estimate motion for every frame pair.
    ///
    /// A source that yields no frames at all is a fatal
    /// [`Error::EmptyStream`]; a single-frame stream yields an empty sample
    /// sequence (nothing to stabilize).
    pub fn estimate<S: FrameSource>(
        &self,
        source: &mut S,
    ) -> Result<(Vec<MotionSample>, EstimationState, u64)> {
        let first = source.next_frame()?.ok_or(Error::EmptyStream)?;
        let mut frames_read = 1u64;

        let mut estimator = MotionEstimator::new(
            &self.detector,
            &self.tracker,
            &self.fitter,
            self.config.feature_params(),
            self.config.skip_reset_threshold,
            first.gray,
        );

        while let Some(frame) = source.next_frame()? {
            frames_read += 1;
            estimator.step(&frame.gray)?;
        }

        let (samples, state) = estimator.finish();
        info!(
            frames = frames_read,
            accepted = state.accepted,
            skipped = state.skipped,
            "motion estimation pass complete"
        );
        Ok((samples, state, frames_read))
    }

    /// Pass 2: rewind the source and re-render the accepted frames.
    ///
    /// Only the first `plan.len()` frames are rendered; trailing skipped
    /// frames have no corrective transform. A source that runs dry early is
    /// a clean stop, not an error.
    pub fn render<S, C>(
        &self,
        source: &mut S,
        plan: &StabilizationPlan,
        compositor: &mut C,
    ) -> Result<Vec<Frame>>
    where
        S: FrameSource,
        C: FrameCompositor,
    {
        source.rewind()?;

        let mut rendered = Vec::with_capacity(plan.len());
        for correction in &plan.corrections {
            let Some(frame) = source.next_frame()? else {
                break;
            };
            rendered.push(compositor.apply(&frame, correction)?);
        }
        Ok(rendered)
    }

    /// Run both passes and return the stabilized frames with a run summary.
    pub fn run<S, C>(
        &self,
        source: &mut S,
        compositor: &mut C,
    ) -> Result<(Vec<Frame>, StabilizationReport)>
    where
        S: FrameSource,
        C: FrameCompositor,
    {
        let (samples, state, frames_read) = self.estimate(source)?;
        let plan = StabilizationPlan::from_samples(samples, self.config.frame_radius);

        let frames = self.render(source, &plan, compositor)?;
        info!(rendered = frames.len(), "rendering pass complete");

        let report = StabilizationReport {
            frames_read,
            accepted: state.accepted,
            skipped: state.skipped,
            rendered: frames.len(),
            plan,
        };
        Ok((frames, report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_reference_constants() {
        let config = StabilizerConfig::default();

        assert_eq!(config.frame_radius, 7);
        assert_eq!(config.edge_removal, 35);
        assert_eq!(config.max_feature_points, 150);
        assert_eq!(config.feature_quality_threshold, 0.01);
        assert_eq!(config.min_feature_distance, 30.0);
        assert_eq!(config.skip_reset_threshold, 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_rejects_zero_radius() {
        let config = StabilizerConfig {
            frame_radius: 0,
            ..Default::default()
        };

        assert!(matches!(
            config.validate(),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_config_rejects_bad_quality_threshold() {
        for bad in [0.0, -0.5, 1.5] {
            let config = StabilizerConfig {
                feature_quality_threshold: bad,
                ..Default::default()
            };
            assert!(config.validate().is_err(), "quality {} should fail", bad);
        }
    }
}
