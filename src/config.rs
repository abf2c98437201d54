//! Tunable proportions and defaults.

use crate::margin::{MarginPreset, margin_pixels};
use crate::units::Unit;

/// Layout proportions and editor defaults.
///
/// All proportions are relative to the canvas, so a layout computed at
/// 72 ppi and one at 600 ppi look identical once scaled.
///
/// ```
/// use posterframe::LayoutConfig;
///
/// let config = LayoutConfig::default()
///     .font_size_multiplier(0.06)
///     .movement_speed(4.0);
/// assert_eq!(config.min_zoom, 1.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutConfig {
    /// Title font size as a fraction of the canvas's major side.
    pub font_size_multiplier: f64,
    /// Title size divided by subtitle (and date) size.
    pub subtitle_ratio: f64,
    /// Gap between text elements as a fraction of the major side.
    pub text_padding_ratio: f64,
    /// Multiplier applied to pointer deltas while dragging the image.
    pub movement_speed: f64,
    /// Lowest allowed zoom.
    pub min_zoom: f64,
    /// Zoom for a fresh editor.
    pub default_zoom: f64,
    /// Zoom change per unit of wheel delta.
    pub zoom_step: f64,
    /// Pixel density for a fresh editor.
    pub default_ppi: f64,
    /// Unit for a fresh editor.
    pub default_unit: Unit,
    /// Margin for a fresh editor; its metric value also bounds how close
    /// text may sit to the canvas edge.
    pub default_margin: MarginPreset,
    /// Font family used for all text.
    pub font_family: &'static str,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            font_size_multiplier: 0.05,
            subtitle_ratio: 2.5,
            text_padding_ratio: 0.02,
            movement_speed: 7.0,
            min_zoom: 1.0,
            default_zoom: 1.0,
            zoom_step: 0.001,
            default_ppi: 300.0,
            default_unit: Unit::Metric,
            default_margin: MarginPreset::Medium,
            font_family: "Helvetica Neue",
        }
    }
}

impl LayoutConfig {
    pub fn font_size_multiplier(mut self, value: f64) -> Self {
        self.font_size_multiplier = value;
        self
    }

    pub fn subtitle_ratio(mut self, value: f64) -> Self {
        self.subtitle_ratio = value;
        self
    }

    pub fn text_padding_ratio(mut self, value: f64) -> Self {
        self.text_padding_ratio = value;
        self
    }

    pub fn movement_speed(mut self, value: f64) -> Self {
        self.movement_speed = value;
        self
    }

    /// Set the zoom floor. The default zoom is raised to match if needed.
    pub fn min_zoom(mut self, value: f64) -> Self {
        self.min_zoom = value;
        self.default_zoom = self.default_zoom.max(value);
        self
    }

    pub fn zoom_step(mut self, value: f64) -> Self {
        self.zoom_step = value;
        self
    }

    pub fn default_ppi(mut self, value: f64) -> Self {
        self.default_ppi = value;
        self
    }

    pub fn default_unit(mut self, unit: Unit) -> Self {
        self.default_unit = unit;
        self
    }

    pub fn default_margin(mut self, preset: MarginPreset) -> Self {
        self.default_margin = preset;
        self
    }

    pub fn font_family(mut self, family: &'static str) -> Self {
        self.font_family = family;
        self
    }

    /// Closest text may sit to the left/right canvas edge, in pixels.
    pub fn minimum_text_padding(&self, ppi: f64) -> f64 {
        margin_pixels(self.default_margin.length(Unit::Metric), ppi).w
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimum_text_padding_uses_metric_default() {
        let config = LayoutConfig::default();
        assert_eq!(config.minimum_text_padding(300.0), 236.0);
        let none = config.default_margin(MarginPreset::None);
        assert_eq!(none.minimum_text_padding(300.0), 0.0);
    }

    #[test]
    fn min_zoom_lifts_default() {
        let config = LayoutConfig::default().min_zoom(1.5);
        assert_eq!(config.default_zoom, 1.5);
    }
}
