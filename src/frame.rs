//! Frame layout: the image region inside the margins and the text bands
//! beneath it.
//!
//! ```text
//!   ┌──────────────────────────┐  ─┬─
//!   │  margin                  │   │ margin.h
//!   │   ┌──────────────────┐   │  ─┴─
//!   │   │                  │   │
//!   │   │      frame       │   │
//!   │   │                  │   │
//!   │   └──────────────────┘   │
//!   │   TITLE                  │  ← title baseline
//!   │   subtitle         date  │  ← subtitle/date baseline
//!   └──────────────────────────┘
//! ```
//!
//! Everything scales with the canvas's major side, so the composition is
//! resolution-independent. There is no bottom margin: the two
//! text bands and four padding gaps take its place.

use crate::config::LayoutConfig;
use crate::error::LayoutError;
use crate::margin::MarginPixels;
use crate::print::PixelSize;

/// Axis-aligned rectangle in canvas pixels. Width and height may be
/// negative in a degenerate layout.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Whether both sides are strictly positive.
    pub fn has_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    /// Width and height as a [`FrameSize`].
    pub fn size(&self) -> FrameSize {
        FrameSize::new(self.width, self.height)
    }
}

/// Frame dimensions in pixels. Fractional, since the text bands are.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct FrameSize {
    pub w: f64,
    pub h: f64,
}

impl FrameSize {
    pub const fn new(w: f64, h: f64) -> Self {
        Self { w, h }
    }
}

impl From<PixelSize> for FrameSize {
    fn from(s: PixelSize) -> Self {
        Self::new(s.w as f64, s.h as f64)
    }
}

/// Horizontal alignment of a text anchor.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TextAlign {
    /// `x` is the left edge of the text.
    Start,
    /// `x` is the right edge of the text.
    End,
}

/// Where one line of text is drawn.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TextAnchor {
    pub x: f64,
    /// Baseline.
    pub y: f64,
    pub font_size: f64,
    pub align: TextAlign,
}

/// Computed frame and text geometry for one canvas.
///
/// Cheap and pure; recompute it whenever the canvas, margin or density
/// changes instead of caching it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FrameLayout {
    pub canvas: PixelSize,
    /// Image frame. Its origin is the top-left margin.
    pub frame: Rect,
    /// Gap between text elements.
    pub text_padding: f64,
    pub title: TextAnchor,
    pub subtitle: TextAnchor,
    /// Right-aligned on the subtitle baseline.
    pub date: TextAnchor,
}

impl FrameLayout {
    /// Lay out a canvas with the given margin.
    ///
    /// `ppi` only feeds the minimum text inset
    /// ([`LayoutConfig::minimum_text_padding`]); all other sizes derive
    /// from the canvas.
    pub fn compute(
        canvas: PixelSize,
        margin: MarginPixels,
        ppi: f64,
        config: &LayoutConfig,
    ) -> Self {
        let major = canvas.major() as f64;
        let title_size = config.font_size_multiplier * major;
        let subtitle_size = title_size / config.subtitle_ratio;
        let padding = config.text_padding_ratio * major;

        let frame = Rect {
            x: margin.w,
            y: margin.h,
            width: canvas.w as f64 - 2.0 * margin.w,
            height: canvas.h as f64
                - margin.h
                - subtitle_size
                - title_size
                - 4.0 * padding,
        };

        let title_y = margin.h + frame.height + padding + title_size;
        let subtitle_y = title_y + padding + subtitle_size;

        let left_x = config.minimum_text_padding(ppi).max(margin.w);
        let right_x = canvas.w as f64 - left_x;

        Self {
            canvas,
            frame,
            text_padding: padding,
            title: TextAnchor {
                x: left_x,
                y: title_y,
                font_size: title_size,
                align: TextAlign::Start,
            },
            subtitle: TextAnchor {
                x: left_x,
                y: subtitle_y,
                font_size: subtitle_size,
                align: TextAlign::Start,
            },
            date: TextAnchor {
                x: right_x,
                y: subtitle_y,
                font_size: subtitle_size,
                align: TextAlign::End,
            },
        }
    }

    /// Whether margins and text bands leave no room for the image.
    pub fn is_degenerate(&self) -> bool {
        !self.frame.has_area()
    }

    /// This layout, or [`LayoutError::DegenerateLayout`] if it must not be
    /// rendered.
    pub fn renderable(self) -> Result<Self, LayoutError> {
        if self.is_degenerate() {
            log::warn!(
                "degenerate layout on {}×{} canvas: frame {}×{}",
                self.canvas.w,
                self.canvas.h,
                self.frame.width,
                self.frame.height
            );
            return Err(LayoutError::DegenerateLayout {
                frame_width: self.frame.width,
                frame_height: self.frame.height,
            });
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn margin(px: f64) -> MarginPixels {
        MarginPixels { w: px, h: px }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn portrait_poster() {
        let config = LayoutConfig::default();
        let layout = FrameLayout::compute(PixelSize::new(5906, 8268), margin(236.0), 300.0, &config);

        // major axis = 8268
        assert!(close(layout.title.font_size, 413.4));
        assert!(close(layout.subtitle.font_size, 165.36));
        assert!(close(layout.text_padding, 165.36));

        assert!(close(layout.frame.x, 236.0));
        assert!(close(layout.frame.y, 236.0));
        assert!(close(layout.frame.width, 5906.0 - 472.0));
        let expected_h = 8268.0 - 236.0 - 165.36 - 413.4 - 4.0 * 165.36;
        assert!(close(layout.frame.height, expected_h));

        let title_y = 236.0 + expected_h + 165.36 + 413.4;
        assert!(close(layout.title.y, title_y));
        assert!(close(layout.subtitle.y, title_y + 165.36 + 165.36));
        assert_eq!(layout.date.y, layout.subtitle.y);
        assert_eq!(layout.date.align, TextAlign::End);
        assert_eq!(layout.title.align, TextAlign::Start);
    }

    #[test]
    fn bottom_band_fits_canvas() {
        // Subtitle baseline sits exactly 2·padding above the canvas bottom.
        let config = LayoutConfig::default();
        let layout = FrameLayout::compute(PixelSize::new(3000, 2000), margin(100.0), 300.0, &config);
        assert!(close(layout.subtitle.y + 2.0 * layout.text_padding, 2000.0));
    }

    #[test]
    fn text_never_hugs_edge() {
        let config = LayoutConfig::default();
        let layout = FrameLayout::compute(PixelSize::new(5906, 8268), margin(0.0), 300.0, &config);
        assert!(close(layout.title.x, 236.0));
        assert!(close(layout.date.x, 5906.0 - 236.0));
        // Frame itself does follow the zero margin.
        assert!(close(layout.frame.width, 5906.0));
    }

    #[test]
    fn wide_margin_moves_text() {
        let config = LayoutConfig::default();
        let layout = FrameLayout::compute(PixelSize::new(5906, 8268), margin(900.0), 300.0, &config);
        assert!(close(layout.title.x, 900.0));
        assert!(close(layout.subtitle.x, 900.0));
        assert!(close(layout.date.x, 5006.0));
    }

    #[test]
    fn margin_shrinks_frame_monotonically() {
        let config = LayoutConfig::default();
        let canvas = PixelSize::new(4000, 6000);
        let mut prev = FrameLayout::compute(canvas, margin(0.0), 300.0, &config);
        for m in (10..2000).step_by(37) {
            let next = FrameLayout::compute(canvas, margin(m as f64), 300.0, &config);
            assert!(next.frame.width < prev.frame.width);
            assert!(next.frame.height < prev.frame.height);
            prev = next;
        }
    }

    #[test]
    fn fonts_scale_linearly_with_major_axis() {
        let config = LayoutConfig::default();
        let base = FrameLayout::compute(PixelSize::new(1000, 1400), margin(0.0), 300.0, &config);
        for k in [2u32, 3, 5, 10] {
            let scaled =
                FrameLayout::compute(PixelSize::new(1000 * k, 1400 * k), margin(0.0), 300.0, &config);
            assert!(close(scaled.title.font_size, base.title.font_size * k as f64));
            assert!(close(scaled.subtitle.font_size, base.subtitle.font_size * k as f64));
        }
        // Landscape uses width as the major axis.
        let wide = FrameLayout::compute(PixelSize::new(1400, 1000), margin(0.0), 300.0, &config);
        assert!(close(wide.title.font_size, base.title.font_size));
    }

    #[test]
    fn degenerate_is_flagged_not_fatal() {
        let config = LayoutConfig::default();
        let layout = FrameLayout::compute(PixelSize::new(500, 700), margin(300.0), 300.0, &config);
        assert!(layout.is_degenerate());
        assert!(layout.frame.width < 0.0);
        assert!(matches!(
            layout.renderable(),
            Err(LayoutError::DegenerateLayout { .. })
        ));

        let ok = FrameLayout::compute(PixelSize::new(5000, 7000), margin(300.0), 300.0, &config);
        assert!(ok.renderable().is_ok());
    }
}
