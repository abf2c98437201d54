//! Poster layout: print sizing, margin-bounded frames, cover-fit panning,
//! and rasterized export.
//!
//! The geometry core is pure and `no_std` compatible. Owned editor state
//! needs `alloc`; SVG serialization and the export pipeline need `std`.
//!
//! ```text
//!   PhysicalSize ──► PixelSize ──► FrameLayout ──► cover_fit ──► OffsetBounds
//!     (print)        (canvas)       (frame)          (fit)          (offset)
//!                                       │                               │
//!                                       └────────────► ScenePlan ◄──────┘
//!                                                          │
//!                                                svg ──► export ──► PNG
//! ```
//!
//! # Modules
//!
//! - [`units`] — Metric/imperial lengths and the canonical (inch) unit
//! - [`print`] — Print size catalog and diagonal-method pixel resolution
//! - [`margin`] — Margin presets and their pixel form at a density
//! - [`frame`] — Frame rectangle and text anchors inside the canvas
//! - [`fit`] — Cover-fit scaling
//! - [`offset`] — Pan offsets and their clamp range
//! - [`plan`] — Scene planning and the editor state object
//! - `svg` — Scene serialization (feature `svg`)
//! - `export` — Font embedding, rasterization and download (feature `export`)
//!
//! # Example
//!
//! ```
//! use posterframe::{ImageAsset, LengthValue, PhysicalSize, PixelSize, Poster, Unit};
//!
//! let mut poster = Poster::default();
//! poster.set_print_size(Some(PhysicalSize::uniform(20.0, 30.0, Unit::Imperial))).unwrap();
//! poster.set_margin(LengthValue::inches(1.0)).unwrap();
//! poster.set_image(Some(ImageAsset::new("city.jpg", PixelSize::new(4000, 3000))));
//!
//! let plan = poster.scene_plan().unwrap();
//! assert_eq!(plan.canvas, PixelSize::new(6000, 9000));
//! assert_eq!((plan.frame.x, plan.frame.width), (300.0, 5400.0));
//! // Cover-fit: the image is at least as large as the frame on both axes.
//! assert!(plan.image.width >= plan.frame.width && plan.image.height >= plan.frame.height);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod config;
pub mod error;
pub mod fit;
pub mod frame;
pub mod margin;
pub mod offset;
pub mod orientation;
pub mod plan;
pub mod print;
pub mod units;

#[cfg(feature = "svg")]
pub mod svg;

#[cfg(feature = "export")]
pub mod export;

pub use config::LayoutConfig;
pub use error::{LayoutError, MissingInput, Parameter};
pub use fit::{FittedSize, cover_fit};
pub use frame::{FrameLayout, FrameSize, Rect, TextAlign, TextAnchor};
pub use margin::{Margin, MarginPixels, MarginPreset, margin_pixels};
pub use offset::{Offset, OffsetBounds, drag};
pub use orientation::Orientation;
pub use plan::ScenePlan;
#[cfg(feature = "alloc")]
pub use plan::{ImageAsset, Poster};
pub use print::{PRINT_SIZES, PhysicalSize, PixelSize, resolve_pixel_size, size_options};
pub use units::{INCHES_PER_CM, LengthValue, Unit, cm_to_inches, inches_to_cm};
