//! Corrective transform synthesis.
//!
//! Turns a smoothed trajectory back into per-frame relative transforms: each
//! frame's original motion is steered toward the low-frequency trajectory so
//! that composing the corrections frame by frame reproduces the smoothed
//! path instead of the raw noisy one.

use crate::motion::{MotionSample, TrajectoryPoint};
use crate::trajectory::{cumulative_trajectory, smooth_trajectory};

/// Compute per-frame corrective transforms.
///
/// For each index `i` the running cumulative sum is recomputed in lockstep
/// with the sample traversal and the correction is
/// `samples[i] + (smoothed[i] - cumulative[i])` fieldwise. Integrating the
/// result reproduces `smoothed` exactly.
///
/// Both slices must have the same length (one smoothed entry per accepted
/// sample).
pub fn compute_corrections(
    samples: &[MotionSample],
    smoothed: &[TrajectoryPoint],
) -> Vec<MotionSample> {
    debug_assert_eq!(samples.len(), smoothed.len());

    let mut x = 0i64;
    let mut y = 0i64;
    let mut a = 0i64;

    samples
        .iter()
        .zip(smoothed)
        .map(|(s, sm)| {
            x += s.dx;
            y += s.dy;
            a += s.da;
            MotionSample::new(s.dx + (sm.x - x), s.dy + (sm.y - y), s.da + (sm.a - a))
        })
        .collect()
}

/// Fully materialized output of the trajectory pass.
///
/// Holds every intermediate sequence so pass 2 is a pure function of the
/// accepted motion samples, testable without any frame source. All four
/// sequences have the same length: the number of accepted frame pairs.
#[derive(Debug, Clone, Default)]
pub struct StabilizationPlan {
    /// Accepted per-pair motion samples from pass 1.
    pub samples: Vec<MotionSample>,
    /// Raw cumulative trajectory.
    pub cumulative: Vec<TrajectoryPoint>,
    /// Low-pass filtered trajectory.
    pub smoothed: Vec<TrajectoryPoint>,
    /// Per-frame corrective transforms for the rendering pass.
    pub corrections: Vec<MotionSample>,
}

impl StabilizationPlan {
    /// Derive the complete plan from accepted motion samples.
    ///
    /// # Arguments
    /// * `samples` - Accepted motion samples, in temporal order
    /// * `radius` - Smoothing half-window (see [`smooth_trajectory`])
    pub fn from_samples(samples: Vec<MotionSample>, radius: usize) -> Self {
        let cumulative = cumulative_trajectory(&samples);
        let smoothed = smooth_trajectory(&cumulative, radius);
        let corrections = compute_corrections(&samples, &smoothed);

        Self {
            samples,
            cumulative,
            smoothed,
            corrections,
        }
    }

    /// Number of frames the rendering pass will re-render.
    pub fn len(&self) -> usize {
        self.corrections.len()
    }

    /// True when no frame pair was accepted (zero- or one-frame input).
    pub fn is_empty(&self) -> bool {
        self.corrections.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jittery_samples() -> Vec<MotionSample> {
        // Steady rightward pan with alternating vertical jitter and an
        // occasional rotation blip.
        (0..50)
            .map(|i| {
                let jitter = if i % 2 == 0 { 4 } else { -4 };
                let blip = if i % 9 == 0 { 1 } else { 0 };
                MotionSample::new(3, jitter, blip)
            })
            .collect()
    }

    #[test]
    fn test_correction_identity() {
        // Integrating the corrections must land exactly on the smoothed
        // trajectory, for arbitrary input.
        let plan = StabilizationPlan::from_samples(jittery_samples(), 7);

        let reintegrated = cumulative_trajectory(&plan.corrections);
        assert_eq!(reintegrated, plan.smoothed);
    }

    #[test]
    fn test_constant_motion_needs_no_interior_correction() {
        // Uniform motion has no jitter: wherever the smoothing window is
        // full, the smoothed trajectory equals the cumulative one and the
        // correction degenerates to the original sample. Boundary entries
        // see partial windows and are pulled inward.
        let samples = vec![MotionSample::new(2, 0, 0); 21];
        let plan = StabilizationPlan::from_samples(samples.clone(), 7);

        for i in 7..=13 {
            assert_eq!(plan.smoothed[i], plan.cumulative[i]);
            assert_eq!(plan.corrections[i], samples[i]);
        }

        // The identity still holds globally, boundaries included
        assert_eq!(cumulative_trajectory(&plan.corrections), plan.smoothed);
    }

    #[test]
    fn test_plan_sequences_share_length() {
        let plan = StabilizationPlan::from_samples(jittery_samples(), 7);

        assert_eq!(plan.samples.len(), 50);
        assert_eq!(plan.cumulative.len(), 50);
        assert_eq!(plan.smoothed.len(), 50);
        assert_eq!(plan.corrections.len(), 50);
    }

    #[test]
    fn test_empty_plan() {
        let plan = StabilizationPlan::from_samples(Vec::new(), 7);

        assert!(plan.is_empty());
        assert_eq!(plan.len(), 0);
    }

    #[test]
    fn test_corrections_cancel_jitter_interior() {
        // The +-4 vertical jitter makes the raw cumulative y oscillate
        // between 0 and 4 every frame. Away from the boundaries the
        // smoothed y settles between the two and stays nearly constant.
        let plan = StabilizationPlan::from_samples(jittery_samples(), 7);

        for i in 10..40 {
            assert!(
                (1..=2).contains(&plan.smoothed[i].y),
                "smoothed y at {} should sit between the oscillation, got {}",
                i,
                plan.smoothed[i].y
            );
            let step = (plan.smoothed[i].y - plan.smoothed[i - 1].y).abs();
            assert!(step <= 1, "residual jitter of {} at {}", step, i);
        }
    }
}
