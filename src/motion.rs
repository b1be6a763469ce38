//! Motion sample and trajectory point types, plus rigid-transform
//! decomposition and corrective-matrix construction.

use nalgebra::Matrix2x3;

/// Relative camera motion estimated between two adjacent frames.
///
/// `dx`/`dy` are translation in pixels, `da` is rotation in radians. All
/// three are truncated to integers at decomposition time; sub-pixel and
/// sub-radian motion is discarded so that every later stage (integration,
/// smoothing, correction) runs on the same integer arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MotionSample {
    /// Horizontal translation in pixels.
    pub dx: i64,
    /// Vertical translation in pixels.
    pub dy: i64,
    /// Rotation in radians, truncated toward zero.
    pub da: i64,
}

impl MotionSample {
    /// Create a new motion sample.
    pub fn new(dx: i64, dy: i64, da: i64) -> Self {
        Self { dx, dy, da }
    }
}

/// One entry of a cumulative or smoothed camera trajectory.
///
/// Entry `i` of a cumulative trajectory is the fieldwise running sum of
/// motion samples `0..=i`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TrajectoryPoint {
    /// Accumulated horizontal translation.
    pub x: i64,
    /// Accumulated vertical translation.
    pub y: i64,
    /// Accumulated rotation.
    pub a: i64,
}

impl TrajectoryPoint {
    /// Create a new trajectory point.
    pub fn new(x: i64, y: i64, a: i64) -> Self {
        Self { x, y, a }
    }
}

/// Decompose a rigid 2x3 transform into a [`MotionSample`].
///
/// The translation comes straight from the third column; the rotation angle
/// is recovered as `atan2(sin, cos)` from the rotation block. Each field is
/// truncated to an integer.
pub fn decompose_rigid(t: &Matrix2x3<f64>) -> MotionSample {
    MotionSample {
        dx: t[(0, 2)] as i64,
        dy: t[(1, 2)] as i64,
        da: t[(1, 0)].atan2(t[(0, 0)]) as i64,
    }
}

/// Build the affine warp matrix realizing a corrective motion sample:
///
/// ```text
/// | cos(da)  -sin(da)  dx |
/// | sin(da)   cos(da)  dy |
/// ```
///
/// This is the matrix a compositor hands to its warp routine for one frame.
pub fn correction_matrix(s: &MotionSample) -> Matrix2x3<f64> {
    let da = s.da as f64;
    Matrix2x3::new(
        da.cos(),
        -da.sin(),
        s.dx as f64,
        da.sin(),
        da.cos(),
        s.dy as f64,
    )
}
