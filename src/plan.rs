//! Scene planning and the editor state that drives it.
//!
//! [`ScenePlan`] is the frame-relative coordinate set handed to a renderer.
//! [`Poster`] owns every "current" value (print size, density, margin,
//! image, zoom, offset) and re-derives dependents whenever one changes, so
//! a stale pixel size or out-of-range offset can never be observed.

#[cfg(all(feature = "alloc", not(feature = "std")))]
use alloc::{format, string::String};

use crate::error::LayoutError;
use crate::fit::cover_fit;
use crate::frame::{FrameLayout, Rect, TextAnchor};
use crate::offset::{Offset, OffsetBounds};
use crate::print::PixelSize;
#[cfg(feature = "alloc")]
use crate::{
    config::LayoutConfig,
    error::{MissingInput, Parameter},
    margin::{Margin, MarginPreset},
    orientation::Orientation,
    print::PhysicalSize,
    units::{LengthValue, Unit},
};

/// Everything a renderer needs to draw one poster.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ScenePlan {
    pub canvas: PixelSize,
    /// Clip region for the image.
    pub frame: Rect,
    /// Where the (zoomed, cover-fitted) image is drawn. Overflows `frame`.
    pub image: Rect,
    /// Offset the image was placed with, after clamping.
    pub offset: Offset,
    pub title: TextAnchor,
    pub subtitle: TextAnchor,
    pub date: TextAnchor,
}

impl ScenePlan {
    /// Place an image of `image` natural size into `layout`.
    ///
    /// Fails with [`LayoutError::DegenerateLayout`] when the frame has no
    /// area. `offset` is clamped into range before use.
    pub fn compute(
        layout: &FrameLayout,
        image: PixelSize,
        offset: Offset,
        zoom: f64,
    ) -> Result<Self, LayoutError> {
        let layout = layout.renderable()?;
        let frame = layout.frame;
        let fitted = cover_fit(image, frame.size())?;
        let offset = OffsetBounds::new(fitted, frame.size(), zoom)?.clamp(offset);
        let shown = fitted.zoomed(zoom);

        Ok(Self {
            canvas: layout.canvas,
            frame,
            image: Rect::new(
                frame.x + offset.w,
                frame.y + offset.h,
                shown.width,
                shown.height,
            ),
            offset,
            title: layout.title,
            subtitle: layout.subtitle,
            date: layout.date,
        })
    }
}

/// A source image: an href the renderer can resolve plus its natural size.
///
/// Decoding is the caller's job; only the size takes part in layout.
#[cfg(feature = "alloc")]
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ImageAsset {
    pub href: String,
    pub natural: PixelSize,
}

#[cfg(feature = "alloc")]
impl ImageAsset {
    pub fn new(href: impl Into<String>, natural: PixelSize) -> Self {
        Self {
            href: href.into(),
            natural,
        }
    }

    /// Wrap encoded image bytes as a `data:` URI so the scene is
    /// self-contained.
    #[cfg(feature = "svg")]
    pub fn from_encoded(mime: &str, bytes: &[u8], natural: PixelSize) -> Self {
        use base64::Engine;
        let data = base64::engine::general_purpose::STANDARD.encode(bytes);
        Self::new(format!("data:{mime};base64,{data}"), natural)
    }
}

/// Editor state for one poster.
///
/// Setters re-run every computation downstream of what they change:
///
/// ```text
///   ppi ──┬──► margin pixels ──┐
///         └──► pixel size ◄────┼── print size ◄── units / orientation
///                              ▼
///   image, zoom ─────────► offset (re-clamped)
/// ```
///
/// ```
/// use posterframe::{ImageAsset, Offset, PhysicalSize, PixelSize, Poster, Unit};
///
/// let mut poster = Poster::default();
/// poster.set_print_size(Some(PhysicalSize::uniform(50.0, 70.0, Unit::Metric))).unwrap();
/// poster.set_image(Some(ImageAsset::new("photo.jpg", PixelSize::new(6000, 4000))));
/// poster.drag(-100.0, -100.0);
///
/// // Landscape photo in a portrait frame only pans horizontally.
/// assert_eq!(poster.offset(), Offset::new(-700.0, 0.0));
/// assert_eq!(poster.pixel_size(), Some(PixelSize::new(5906, 8268)));
/// ```
#[cfg(feature = "alloc")]
#[derive(Clone, Debug, PartialEq)]
pub struct Poster {
    config: LayoutConfig,
    units: Unit,
    orientation: Orientation,
    ppi: f64,
    print_size: Option<PhysicalSize>,
    pixel_size: Option<PixelSize>,
    margin: Margin,
    image: Option<ImageAsset>,
    title: String,
    subtitle: String,
    date: String,
    offset: Offset,
    zoom: f64,
}

#[cfg(feature = "alloc")]
impl Default for Poster {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}

#[cfg(feature = "alloc")]
impl Poster {
    /// A fresh editor with `config`'s defaults and no print size or image.
    pub fn new(config: LayoutConfig) -> Self {
        let margin = Margin::preset(config.default_margin, config.default_unit, config.default_ppi);
        Self {
            units: config.default_unit,
            orientation: Orientation::Portrait,
            ppi: config.default_ppi,
            print_size: None,
            pixel_size: None,
            margin,
            image: None,
            title: String::new(),
            subtitle: String::new(),
            date: String::new(),
            offset: Offset::ZERO,
            zoom: config.default_zoom,
            config,
        }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn units(&self) -> Unit {
        self.units
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn ppi(&self) -> f64 {
        self.ppi
    }

    pub fn print_size(&self) -> Option<PhysicalSize> {
        self.print_size
    }

    /// Canvas size derived from the print size and density.
    pub fn pixel_size(&self) -> Option<PixelSize> {
        self.pixel_size
    }

    pub fn margin(&self) -> &Margin {
        &self.margin
    }

    /// The margin preset currently selected, or `None` for a custom margin.
    pub fn margin_preset(&self) -> Option<MarginPreset> {
        MarginPreset::matching(self.margin.physical())
    }

    pub fn image(&self) -> Option<&ImageAsset> {
        self.image.as_ref()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn subtitle(&self) -> &str {
        &self.subtitle
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn offset(&self) -> Offset {
        self.offset
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Choose a print size (or clear it). An invalid size leaves the state
    /// untouched.
    pub fn set_print_size(&mut self, size: Option<PhysicalSize>) -> Result<(), LayoutError> {
        self.pixel_size = size.map(|s| s.to_pixels(self.ppi)).transpose()?;
        self.print_size = size;
        log::debug!("print size {:?} -> canvas {:?}", self.print_size, self.pixel_size);
        self.reclamp();
        Ok(())
    }

    /// Change pixel density. Margin pixels and the canvas follow.
    pub fn set_ppi(&mut self, ppi: f64) -> Result<(), LayoutError> {
        if !(ppi > 0.0) || !ppi.is_finite() {
            return Err(LayoutError::InvalidParameter(Parameter::Density));
        }
        let pixel_size = self.print_size.map(|s| s.to_pixels(ppi)).transpose()?;
        self.ppi = ppi;
        self.pixel_size = pixel_size;
        self.margin.set_density(ppi);
        log::debug!("ppi {ppi} -> canvas {:?}, margin {:?}", self.pixel_size, self.margin.pixels());
        self.reclamp();
        Ok(())
    }

    /// Switch orientation. The print size list changes, so the current
    /// selection is cleared.
    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.orientation = orientation;
        self.clear_print_size();
    }

    /// Switch units. Resets the margin to the default preset in the new
    /// unit and clears the print size.
    pub fn set_units(&mut self, units: Unit) {
        self.units = units;
        self.margin = Margin::preset(self.config.default_margin, units, self.ppi);
        self.clear_print_size();
    }

    /// Set a custom margin length.
    pub fn set_margin(&mut self, length: LengthValue) -> Result<(), LayoutError> {
        let length = LengthValue::try_new(length.value, length.unit)?;
        self.margin.set_physical(length);
        log::debug!("margin {length} -> {:?}", self.margin.pixels());
        self.reclamp();
        Ok(())
    }

    /// Select a margin preset in the current unit.
    pub fn set_margin_preset(&mut self, preset: MarginPreset) {
        self.margin.set_physical(preset.length(self.units));
        self.reclamp();
    }

    /// Replace (or remove) the image.
    pub fn set_image(&mut self, image: Option<ImageAsset>) {
        self.image = image;
        self.reclamp();
    }

    pub fn set_title(&mut self, text: impl Into<String>) {
        self.title = text.into();
    }

    pub fn set_subtitle(&mut self, text: impl Into<String>) {
        self.subtitle = text.into();
    }

    pub fn set_date(&mut self, text: impl Into<String>) {
        self.date = text.into();
    }

    /// Set zoom, floored at the configured minimum.
    pub fn set_zoom(&mut self, zoom: f64) -> Result<(), LayoutError> {
        if !zoom.is_finite() {
            return Err(LayoutError::InvalidParameter(Parameter::Zoom));
        }
        self.zoom = zoom.max(self.config.min_zoom);
        self.reclamp();
        Ok(())
    }

    /// Apply a mouse wheel delta. Positive deltas (scrolling down) zoom out.
    pub fn scroll_zoom(&mut self, delta: f64) -> Result<(), LayoutError> {
        self.set_zoom(self.zoom - delta * self.config.zoom_step)
    }

    /// Move the image by a pointer delta. Returns the clamped offset.
    pub fn drag(&mut self, dx: f64, dy: f64) -> Offset {
        let prospective = self.offset.moved_by(dx, dy, self.config.movement_speed);
        self.set_offset(prospective)
    }

    /// Set the offset directly. Returns the clamped value actually stored.
    pub fn set_offset(&mut self, prospective: Offset) -> Offset {
        self.offset = self.offset_bounds().clamp(prospective);
        self.offset
    }

    /// Frame and text geometry for the current canvas, if one is chosen.
    pub fn frame_layout(&self) -> Option<FrameLayout> {
        self.pixel_size
            .map(|canvas| FrameLayout::compute(canvas, self.margin.pixels(), self.ppi, &self.config))
    }

    /// Legal offset range right now. Only the zero offset is legal when
    /// there is no image, no canvas, or no room for a frame.
    pub fn offset_bounds(&self) -> OffsetBounds {
        let (Some(image), Some(layout)) = (&self.image, self.frame_layout()) else {
            return OffsetBounds::pinned();
        };
        if layout.is_degenerate() {
            return OffsetBounds::pinned();
        }
        let frame = layout.frame.size();
        cover_fit(image.natural, frame)
            .and_then(|fitted| OffsetBounds::new(fitted, frame, self.zoom))
            .unwrap_or(OffsetBounds::pinned())
    }

    /// Geometry for the renderer.
    pub fn scene_plan(&self) -> Result<ScenePlan, LayoutError> {
        let layout = self
            .frame_layout()
            .ok_or(LayoutError::Incomplete(MissingInput::PrintSize))?;
        let image = self
            .image
            .as_ref()
            .ok_or(LayoutError::Incomplete(MissingInput::Image))?;
        ScenePlan::compute(&layout, image.natural, self.offset, self.zoom)
    }

    /// Download name for an export of this poster.
    pub fn export_filename(&self) -> String {
        format!("EXPORT_{}_{}.png", self.title, self.subtitle)
    }

    fn clear_print_size(&mut self) {
        self.print_size = None;
        self.pixel_size = None;
        self.reclamp();
    }

    fn reclamp(&mut self) {
        let before = self.offset;
        self.offset = self.offset_bounds().clamp(before);
        if self.offset != before {
            log::debug!("offset re-clamped {before:?} -> {:?}", self.offset);
        }
    }
}
