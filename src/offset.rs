//! Pan offsets and the range that keeps the frame covered.
//!
//! An offset translates the fitted image up/left relative to the frame
//! origin, so both components are `<= 0`. The lower bound per axis is how
//! far the image can move before its far edge reaches the frame's far edge.

use crate::error::{LayoutError, Parameter};
use crate::fit::FittedSize;
use crate::frame::FrameSize;

/// Image translation relative to the frame origin.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Offset {
    pub w: f64,
    pub h: f64,
}

impl Offset {
    /// No translation.
    pub const ZERO: Self = Self { w: 0.0, h: 0.0 };

    pub const fn new(w: f64, h: f64) -> Self {
        Self { w, h }
    }

    /// This offset moved by a pointer delta scaled by `speed`.
    pub fn moved_by(self, dx: f64, dy: f64, speed: f64) -> Self {
        Self {
            w: self.w + dx * speed,
            h: self.h + dy * speed,
        }
    }
}

/// Legal offset range for one image, frame and zoom.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct OffsetBounds {
    /// Most negative legal offset per axis. Always `<= 0`.
    pub min: Offset,
}

impl OffsetBounds {
    /// Bounds for a cover-fitted image shown at `zoom` inside `frame`.
    pub fn new(fitted: FittedSize, frame: FrameSize, zoom: f64) -> Result<Self, LayoutError> {
        if !(zoom > 0.0) || !zoom.is_finite() {
            return Err(LayoutError::InvalidParameter(Parameter::Zoom));
        }
        let shown = fitted.zoomed(zoom);
        // Rounding can leave a cover-fitted side a hair short of the frame;
        // the range then collapses to zero rather than going positive.
        Ok(Self {
            min: Offset {
                w: (frame.w - shown.width).min(0.0),
                h: (frame.h - shown.height).min(0.0),
            },
        })
    }

    /// Bounds that only admit the zero offset.
    pub const fn pinned() -> Self {
        Self { min: Offset::ZERO }
    }

    /// Clamp each axis of `prospective` into `[min, 0]`.
    ///
    /// Non-finite components clamp to zero.
    pub fn clamp(&self, prospective: Offset) -> Offset {
        Offset {
            w: clamp_axis(prospective.w, self.min.w),
            h: clamp_axis(prospective.h, self.min.h),
        }
    }

    /// Whether `offset` already lies in range.
    pub fn contains(&self, offset: Offset) -> bool {
        (self.min.w..=0.0).contains(&offset.w) && (self.min.h..=0.0).contains(&offset.h)
    }
}

fn clamp_axis(value: f64, min: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.max(min).min(0.0)
}

/// Apply a drag: scale the pointer delta, add it to `current`, clamp.
pub fn drag(current: Offset, dx: f64, dy: f64, speed: f64, bounds: &OffsetBounds) -> Offset {
    bounds.clamp(current.moved_by(dx, dy, speed))
}
