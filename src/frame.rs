//! Frame types and the source/compositor interfaces.

use nalgebra::DMatrix;

use crate::motion::MotionSample;
use crate::Result;

/// Grayscale image plane (rows x cols, intensities 0-255).
pub type GrayFrame = DMatrix<u8>;

/// A decoded video frame.
///
/// The color plane is opaque to the core: it is carried through untouched
/// and handed to the compositor in the rendering pass. Only the derived
/// grayscale plane is consumed by motion estimation.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Packed color pixel data, layout defined by the source/compositor pair.
    pub color: Vec<u8>,
    /// Grayscale plane used for feature detection and tracking.
    pub gray: GrayFrame,
}

impl Frame {
    /// Create a frame from its color data and grayscale plane.
    pub fn new(color: Vec<u8>, gray: GrayFrame) -> Self {
        Self { color, gray }
    }

    /// Frame height in pixels.
    pub fn rows(&self) -> usize {
        self.gray.nrows()
    }

    /// Frame width in pixels.
    pub fn cols(&self) -> usize {
        self.gray.ncols()
    }
}

/// Sequential pull source of decoded frames.
///
/// End of stream is signalled by `Ok(None)`, not by an error. The pipeline
/// is two-pass, so sources must support rewinding to the first frame.
pub trait FrameSource {
    /// Pull the next decoded frame, or `None` when the stream is exhausted.
    fn next_frame(&mut self) -> Result<Option<Frame>>;

    /// Rewind to the first frame for the rendering pass.
    fn rewind(&mut self) -> Result<()>;
}

/// Applies a corrective transform to a raw frame.
///
/// Implementations own the warp, border crop, and rescale back to original
/// dimensions ([`crate::motion::correction_matrix`] and [`vertical_border`]
/// supply the warp matrix and crop margin).
pub trait FrameCompositor {
    /// Produce the stabilized output frame for one input frame.
    fn apply(&mut self, frame: &Frame, correction: &MotionSample) -> Result<Frame>;
}

/// Vertical border-crop margin scaled by the frame aspect ratio.
///
/// A horizontal margin of `edge_removal` pixels corresponds to
/// `edge_removal * rows / cols` pixels vertically, keeping the crop
/// proportional for wide formats.
pub fn vertical_border(edge_removal: u32, rows: usize, cols: usize) -> u32 {
    (edge_removal as usize * rows / cols) as u32
}
