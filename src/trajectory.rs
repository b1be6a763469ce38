//! Trajectory integration and smoothing.
//!
//! Pass 2 of the pipeline starts here: the noisy per-pair motion samples are
//! folded into a cumulative absolute trajectory, then low-pass filtered with
//! a centered fixed-radius moving average. The high-frequency residual
//! between the two is the jitter the correction stage cancels.

use crate::motion::{MotionSample, TrajectoryPoint};

/// Integrate relative motion samples into a cumulative absolute trajectory.
///
/// Entry `i` of the result is the fieldwise sum of `samples[0..=i]`. Empty
/// input yields empty output; there are no error conditions.
pub fn cumulative_trajectory(samples: &[MotionSample]) -> Vec<TrajectoryPoint> {
    let mut x = 0i64;
    let mut y = 0i64;
    let mut a = 0i64;

    samples
        .iter()
        .map(|s| {
            x += s.dx;
            y += s.dy;
            a += s.da;
            TrajectoryPoint::new(x, y, a)
        })
        .collect()
}

/// Smooth a trajectory with a centered fixed-radius box filter.
///
/// Entry `i` of the result averages the input over `[i - radius, i + radius]`
/// clipped to the valid index range. The divisor is the actual number of
/// in-range entries, so boundary windows are true partial averages rather
/// than zero-padded ones. Each field is averaged independently with integer
/// division (truncating toward zero).
///
/// # Arguments
/// * `trajectory` - Cumulative trajectory to smooth
/// * `radius` - Half-window size; the full window spans `2 * radius + 1` entries
pub fn smooth_trajectory(trajectory: &[TrajectoryPoint], radius: usize) -> Vec<TrajectoryPoint> {
    let n = trajectory.len() as i64;
    let r = radius as i64;

    (0..n)
        .map(|i| {
            let lo = (i - r).max(0);
            let hi = (i + r).min(n - 1);

            let mut sum_x = 0i64;
            let mut sum_y = 0i64;
            let mut sum_a = 0i64;
            let mut count = 0i64;

            for j in lo..=hi {
                let p = trajectory[j as usize];
                sum_x += p.x;
                sum_y += p.y;
                sum_a += p.a;
                count += 1;
            }

            TrajectoryPoint::new(sum_x / count, sum_y / count, sum_a / count)
        })
        .collect()
}
