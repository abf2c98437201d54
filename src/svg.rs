//! SVG serialization of a planned poster.
//!
//! The document is sized in canvas pixels (`width`, `height` and `viewBox`
//! all agree), so rasterizing it 1:1 yields the print-resolution image.
//!
//! # Example
//!
//! ```
//! use posterframe::{ImageAsset, PhysicalSize, PixelSize, Poster, Unit};
//! use posterframe::svg::{Scene, render_scene_svg};
//!
//! let mut poster = Poster::default();
//! poster.set_print_size(Some(PhysicalSize::uniform(11.0, 17.0, Unit::Imperial))).unwrap();
//! poster.set_image(Some(ImageAsset::new("photo.png", PixelSize::new(800, 600))));
//! poster.set_title("Kyoto");
//!
//! let svg = render_scene_svg(&Scene::from_poster(&poster).unwrap());
//! assert!(svg.contains(r#"viewBox="0 0 3300 5100""#));
//! assert!(svg.contains(">KYOTO</text>"));
//! ```

use core::fmt::Write;

use crate::error::LayoutError;
use crate::frame::{TextAlign, TextAnchor};
use crate::plan::{Poster, ScenePlan};

/// Id of the clip path bounding the image to the frame.
const CLIP_ID: &str = "image-mask";
/// Canvas background.
const BACKGROUND: &str = "white";
/// Text fill.
const INK: &str = "black";

/// A fully planned poster plus the content drawn into it.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene<'a> {
    pub plan: ScenePlan,
    pub image_href: &'a str,
    pub title: &'a str,
    pub subtitle: &'a str,
    /// Omitted from the output when empty.
    pub date: &'a str,
    pub font_family: &'a str,
}

impl<'a> Scene<'a> {
    /// The scene for the poster's current state.
    pub fn from_poster(poster: &'a Poster) -> Result<Self, LayoutError> {
        let plan = poster.scene_plan()?;
        // scene_plan() already failed if there is no image.
        let image_href = poster.image().map_or("", |i| i.href.as_str());
        Ok(Self {
            plan,
            image_href,
            title: poster.title(),
            subtitle: poster.subtitle(),
            date: poster.date(),
            font_family: poster.config().font_family,
        })
    }
}

/// Render a complete SVG document for `scene`.
pub fn render_scene_svg(scene: &Scene<'_>) -> String {
    let plan = &scene.plan;
    let (w, h) = (plan.canvas.w, plan.canvas.h);
    let mut svg = String::with_capacity(1024 + scene.image_href.len());

    // Writing into a String cannot fail.
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
    );

    let frame = plan.frame;
    let _ = writeln!(
        svg,
        r#"<defs><clipPath id="{CLIP_ID}"><rect x="{}" y="{}" width="{}" height="{}"/></clipPath></defs>"#,
        num(frame.x),
        num(frame.y),
        num(frame.width),
        num(frame.height)
    );

    let _ = writeln!(
        svg,
        r#"<rect x="0" y="0" width="{w}" height="{h}" fill="{BACKGROUND}"/>"#
    );

    let image = plan.image;
    let _ = writeln!(
        svg,
        r#"<image id="image" x="{}" y="{}" width="{}" height="{}" preserveAspectRatio="none" clip-path="url(#{CLIP_ID})" xlink:href="{}"/>"#,
        num(image.x),
        num(image.y),
        num(image.width),
        num(image.height),
        escape_xml(scene.image_href)
    );

    push_text(&mut svg, "title", &plan.title, "bold", scene.font_family, scene.title);
    push_text(
        &mut svg,
        "subtitle",
        &plan.subtitle,
        "normal",
        scene.font_family,
        scene.subtitle,
    );
    if !scene.date.is_empty() {
        push_text(&mut svg, "date", &plan.date, "normal", scene.font_family, scene.date);
    }

    svg.push_str("</svg>\n");
    svg
}

fn push_text(
    svg: &mut String,
    id: &str,
    anchor: &TextAnchor,
    weight: &str,
    family: &str,
    content: &str,
) {
    let text_anchor = match anchor.align {
        TextAlign::Start => "start",
        TextAlign::End => "end",
    };
    let _ = writeln!(
        svg,
        r#"<text id="{id}" x="{}" y="{}" font-size="{}" font-family="'{}', sans-serif" font-weight="{weight}" text-anchor="{text_anchor}" fill="{INK}">{}</text>"#,
        num(anchor.x),
        num(anchor.y),
        num(anchor.font_size),
        escape_xml(family),
        escape_xml(&content.to_uppercase())
    );
}

/// Format a coordinate with at most three decimals and no trailing zeros.
fn num(v: f64) -> String {
    let s = format!("{v:.3}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".into() } else { s.into() }
}

/// Escape special characters for XML text and attribute content.
pub(crate) fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Rect;
    use crate::offset::Offset;
    use crate::print::PixelSize;

    fn anchor(x: f64, y: f64, align: TextAlign) -> TextAnchor {
        TextAnchor {
            x,
            y,
            font_size: 40.0,
            align,
        }
    }

    fn scene<'a>(date: &'a str, title: &'a str) -> Scene<'a> {
        Scene {
            plan: ScenePlan {
                canvas: PixelSize::new(1000, 1400),
                frame: Rect::new(50.0, 50.0, 900.0, 1100.0),
                image: Rect::new(-10.5, 50.0, 1466.667, 1100.0),
                offset: Offset::new(-60.5, 0.0),
                title: anchor(50.0, 1250.0, TextAlign::Start),
                subtitle: anchor(50.0, 1320.0, TextAlign::Start),
                date: anchor(950.0, 1320.0, TextAlign::End),
            },
            image_href: "data:image/png;base64,AAAA",
            title,
            subtitle: "sub",
            date,
            font_family: "Helvetica Neue",
        }
    }

    #[test]
    fn document_shape() {
        let svg = render_scene_svg(&scene("2024", "Title"));
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>\n"));
        assert!(svg.contains(r#"width="1000" height="1400" viewBox="0 0 1000 1400""#));
        assert!(svg.contains(r#"<clipPath id="image-mask"><rect x="50" y="50" width="900" height="1100"/>"#));
        assert!(svg.contains(r#"x="-10.5" y="50" width="1466.667" height="1100""#));
        assert!(svg.contains(r#"clip-path="url(#image-mask)""#));
        assert!(svg.contains(">TITLE</text>"));
        assert!(svg.contains(">SUB</text>"));
        assert!(svg.contains(r#"text-anchor="end" fill="black">2024</text>"#));
    }

    #[test]
    fn empty_date_is_omitted() {
        let svg = render_scene_svg(&scene("", "Title"));
        assert!(!svg.contains(r#"id="date""#));
        assert!(svg.contains(r#"id="subtitle""#));
    }

    #[test]
    fn text_is_escaped() {
        let svg = render_scene_svg(&scene("", "a<b & \"c\""));
        assert!(svg.contains(">A&lt;B &amp; &quot;C&quot;</text>"));
    }

    #[test]
    fn numbers_are_trimmed() {
        assert_eq!(num(12.0), "12");
        assert_eq!(num(0.5), "0.5");
        assert_eq!(num(-0.0001), "0");
        assert_eq!(num(1466.6666667), "1466.667");
    }
}
