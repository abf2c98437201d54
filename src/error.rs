//! Error types for layout computation.
//!
//! Export failures live in [`crate::export`]; everything here is raised
//! synchronously by the geometry functions.

use thiserror::Error;

/// Which input was rejected by [`LayoutError::InvalidParameter`].
#[non_exhaustive]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Parameter {
    /// Pixel density was zero, negative, or not a number.
    Density,
    /// Physical print size had zero area or a negative side.
    PrintSize,
    /// Source image had a zero width or height.
    ImageSize,
    /// Target frame had a non-positive width or height.
    FrameSize,
    /// Zoom factor was not a finite positive number.
    Zoom,
    /// A length was negative or not finite.
    Length,
}

impl core::fmt::Display for Parameter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Self::Density => "pixel density",
            Self::PrintSize => "print size",
            Self::ImageSize => "image size",
            Self::FrameSize => "frame size",
            Self::Zoom => "zoom",
            Self::Length => "length",
        })
    }
}

/// Input the editor state still needs before a scene can be planned.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MissingInput {
    /// No print size has been chosen.
    PrintSize,
    /// No image has been loaded.
    Image,
}

impl core::fmt::Display for MissingInput {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Self::PrintSize => "print size",
            Self::Image => "image",
        })
    }
}

/// Layout computation error.
#[derive(Copy, Clone, Debug, PartialEq, Error)]
pub enum LayoutError {
    /// An input was out of its valid domain.
    #[error("invalid {0}")]
    InvalidParameter(Parameter),
    /// Margins and text bands leave no room for the image frame.
    ///
    /// Not fatal: the layout is still computed, but it must not be rendered.
    #[error("degenerate layout: frame would be {frame_width}×{frame_height}")]
    DegenerateLayout { frame_width: f64, frame_height: f64 },
    /// The editor state is missing an input required for a scene.
    #[error("no {0} selected")]
    Incomplete(MissingInput),
}
