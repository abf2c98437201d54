//! Cover-fit scaling of a source image into a frame.

use crate::error::{LayoutError, Parameter};
use crate::frame::FrameSize;
use crate::print::PixelSize;

/// Scaled image dimensions. Not rounded; the renderer places the image
/// with sub-pixel precision and the frame clips the overflow.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct FittedSize {
    pub width: f64,
    pub height: f64,
}

impl FittedSize {
    /// Both sides multiplied by `zoom`.
    pub fn zoomed(self, zoom: f64) -> Self {
        Self {
            width: self.width * zoom,
            height: self.height * zoom,
        }
    }
}

/// Scale `image` to cover `frame`, preserving aspect ratio.
///
/// One side matches the frame exactly; the other overflows it. The image
/// is never letterboxed.
///
/// ```
/// use posterframe::{FrameSize, PixelSize, cover_fit};
///
/// // 2:1 image into a square frame: height matches, width overflows.
/// let fitted = cover_fit(PixelSize::new(2000, 1000), FrameSize::new(500.0, 500.0)).unwrap();
/// assert_eq!((fitted.width, fitted.height), (1000.0, 500.0));
/// ```
pub fn cover_fit(image: PixelSize, frame: FrameSize) -> Result<FittedSize, LayoutError> {
    if image.is_empty() {
        return Err(LayoutError::InvalidParameter(Parameter::ImageSize));
    }
    if !(frame.w > 0.0 && frame.h > 0.0) || !frame.w.is_finite() || !frame.h.is_finite() {
        return Err(LayoutError::InvalidParameter(Parameter::FrameSize));
    }

    let image_aspect = image.w as f64 / image.h as f64;
    let frame_aspect = frame.w / frame.h;

    if image_aspect > frame_aspect {
        // Relatively wider: match height, overflow horizontally.
        Ok(FittedSize {
            width: frame.h * image_aspect,
            height: frame.h,
        })
    } else {
        // Relatively taller (or equal): match width, overflow vertically.
        Ok(FittedSize {
            width: frame.w,
            height: frame.w / image_aspect,
        })
    }
}
