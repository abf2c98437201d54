//! Rasterizing export of a planned scene.
//!
//! ```text
//!   Idle ─► Serializing ─► Rasterizing ─► Done
//!               │               │
//!               └───────┬───────┘
//!                       ▼
//!                Failed(stage)
//! ```
//!
//! 1. Serialize the scene to SVG and re-parse it so a style block can be
//!    spliced into the document.
//! 2. Inline every [`FontAsset`] as an `@font-face` rule.
//! 3. Register the final document under a temporary object URL.
//! 4. Rasterize it onto a white canvas of the declared pixel size, then
//!    revoke the URL.
//! 5. Encode PNG and hand it to the [`ExportTarget`].
//!
//! The rasterizer sees nothing outside the document: fonts come only from
//! the embedded rules and external image references are refused. Nothing
//! reaches the target unless every earlier step succeeded.
//!
//! # Example
//!
//! ```
//! use posterframe::export::{ExportPipeline, MemoryTarget};
//!
//! let pipeline = ExportPipeline::new(Vec::new());
//! let target = MemoryTarget::new();
//! let markup = r#"<svg xmlns="http://www.w3.org/2000/svg" width="4" height="3" viewBox="0 0 4 3"><rect width="2" height="3" fill="red"/></svg>"#;
//! pipeline.export_markup(markup, "EXPORT_A_B.png", &target).unwrap();
//!
//! let saved = target.downloads();
//! assert_eq!(saved[0].filename, "EXPORT_A_B.png");
//! assert!(saved[0].data.starts_with(b"\x89PNG"));
//! assert_eq!(pipeline.object_urls().live(), 0);
//! ```

pub mod blob;
pub mod fonts;
pub mod target;

use std::ops::Range;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::{fmt, io};

use resvg::tiny_skia::{Color, Pixmap, Transform};
use resvg::usvg::{self, fontdb};
use thiserror::Error;

use crate::svg::{Scene, render_scene_svg};

pub use blob::{ObjectUrl, ObjectUrlStore};
pub use fonts::{
    FontAsset, FontFormat, FontSource, FontStyle, FontWeight, embed_font_rules,
    embedded_font_data,
};
pub use target::{DirectoryTarget, Download, ExportTarget, MemoryTarget};

const SVG_MIME: &str = "image/svg+xml;charset=utf-8";

/// Step of the export that was running.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ExportStage {
    Serializing,
    EmbeddingFonts,
    Rasterizing,
    Encoding,
    Downloading,
}

impl fmt::Display for ExportStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Serializing => "serializing",
            Self::EmbeddingFonts => "embedding fonts",
            Self::Rasterizing => "rasterizing",
            Self::Encoding => "encoding",
            Self::Downloading => "downloading",
        })
    }
}

/// Observable pipeline state.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ExportState {
    #[default]
    Idle,
    Serializing,
    Rasterizing,
    Done,
    Failed(ExportStage),
}

/// An export that did not produce a download.
#[derive(Debug, Error)]
#[error("export failed while {stage}: {kind}")]
pub struct ExportError {
    pub stage: ExportStage,
    #[source]
    pub kind: ExportFailure,
}

/// Why an export stage failed.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ExportFailure {
    #[error("malformed markup: {0}")]
    Markup(#[from] roxmltree::Error),
    #[error("root element is <{0}>, not <svg>")]
    NotSvgRoot(String),
    #[error("document has no usable viewBox")]
    MissingViewBox,
    #[error("font {family:?} is not a TrueType, OpenType or WOFF file")]
    UnrecognizedFont { family: String },
    #[error("object URL {0} is not live")]
    UnknownObjectUrl(String),
    #[error("document is not UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("rasterizer rejected document: {0}")]
    Svg(#[from] usvg::Error),
    #[error("image could not be decoded")]
    ImageDecode,
    #[error("cannot allocate a {width}×{height} canvas")]
    CanvasUnavailable { width: u32, height: u32 },
    #[error("PNG encoding failed: {0}")]
    Encode(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("another export is already running")]
    Busy,
}

trait AtStage<T> {
    fn at(self, stage: ExportStage) -> Result<T, ExportError>;
}

impl<T, E: Into<ExportFailure>> AtStage<T> for Result<T, E> {
    fn at(self, stage: ExportStage) -> Result<T, ExportError> {
        self.map_err(|e| ExportError {
            stage,
            kind: e.into(),
        })
    }
}

type Observer = Box<dyn Fn(ExportState) + Send + Sync>;

/// Turns scenes into downloaded PNG files.
///
/// The pipeline itself is not re-entrancy guarded; see [`ExportTrigger`].
pub struct ExportPipeline {
    fonts: Vec<FontAsset>,
    urls: ObjectUrlStore,
    state: Mutex<ExportState>,
    observer: Option<Observer>,
}

impl fmt::Debug for ExportPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExportPipeline")
            .field("fonts", &self.fonts)
            .field("urls", &self.urls)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl ExportPipeline {
    /// A pipeline embedding `fonts` into every export.
    pub fn new(fonts: Vec<FontAsset>) -> Self {
        Self {
            fonts,
            urls: ObjectUrlStore::new(),
            state: Mutex::new(ExportState::Idle),
            observer: None,
        }
    }

    /// Call `f` on every state transition.
    pub fn on_transition(mut self, f: impl Fn(ExportState) + Send + Sync + 'static) -> Self {
        self.observer = Some(Box::new(f));
        self
    }

    pub fn fonts(&self) -> &[FontAsset] {
        &self.fonts
    }

    /// Temporary URLs created by this pipeline.
    pub fn object_urls(&self) -> &ObjectUrlStore {
        &self.urls
    }

    /// State after the most recent transition.
    pub fn state(&self) -> ExportState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Export `scene` as `filename`.
    pub fn export(
        &self,
        scene: &Scene<'_>,
        filename: &str,
        target: &dyn ExportTarget,
    ) -> Result<(), ExportError> {
        self.transition(ExportState::Serializing);
        let markup = render_scene_svg(scene);
        self.finish(&markup, filename, target)
    }

    /// Export already-serialized SVG markup as `filename`.
    pub fn export_markup(
        &self,
        markup: &str,
        filename: &str,
        target: &dyn ExportTarget,
    ) -> Result<(), ExportError> {
        self.transition(ExportState::Serializing);
        self.finish(markup, filename, target)
    }

    /// Run an export on a worker thread.
    pub fn spawn<T>(
        self: &Arc<Self>,
        markup: String,
        filename: String,
        target: T,
    ) -> io::Result<JoinHandle<Result<(), ExportError>>>
    where
        T: ExportTarget + 'static,
    {
        let pipeline = Arc::clone(self);
        thread::Builder::new()
            .name("posterframe-export".into())
            .spawn(move || pipeline.export_markup(&markup, &filename, &target))
    }

    fn finish(
        &self,
        markup: &str,
        filename: &str,
        target: &dyn ExportTarget,
    ) -> Result<(), ExportError> {
        log::info!("exporting {filename} ({} bytes of markup)", markup.len());
        match self.run(markup, filename, target) {
            Ok(()) => {
                self.transition(ExportState::Done);
                Ok(())
            }
            Err(e) => {
                log::warn!("{e}");
                self.transition(ExportState::Failed(e.stage));
                Err(e)
            }
        }
    }

    fn run(&self, markup: &str, filename: &str, target: &dyn ExportTarget) -> Result<(), ExportError> {
        let document = Document::inspect(markup).at(ExportStage::Serializing)?;
        let css = embed_font_rules(&self.fonts).at(ExportStage::EmbeddingFonts)?;
        let styled = document.with_style(markup, &css);
        log::debug!(
            "embedded {} font rule(s); document is {} bytes",
            css.lines().count(),
            styled.len()
        );

        self.transition(ExportState::Rasterizing);
        let url = self.urls.create(styled.into_bytes(), SVG_MIME);
        let pixmap = self.rasterize(&url, &document).at(ExportStage::Rasterizing)?;
        url.revoke();

        let png = pixmap
            .encode_png()
            .map_err(|e| ExportFailure::Encode(e.to_string()))
            .at(ExportStage::Encoding)?;
        target.save(filename, &png).at(ExportStage::Downloading)?;
        log::info!(
            "exported {filename}: {}×{} px, {} bytes",
            pixmap.width(),
            pixmap.height(),
            png.len()
        );
        Ok(())
    }

    fn rasterize(&self, url: &ObjectUrl<'_>, document: &Document) -> Result<Pixmap, ExportFailure> {
        let bytes = self
            .urls
            .resolve(url.as_str())
            .ok_or_else(|| ExportFailure::UnknownObjectUrl(url.as_str().to_owned()))?;
        let svg = std::str::from_utf8(&bytes)?;

        let (width, height) = document.pixel_size();
        let mut pixmap =
            Pixmap::new(width, height).ok_or(ExportFailure::CanvasUnavailable { width, height })?;

        let mut options = usvg::Options::default();
        options.fontdb = Arc::new(font_database(svg)?);
        options.image_href_resolver = usvg::ImageHrefResolver {
            resolve_data: usvg::ImageHrefResolver::default_data_resolver(),
            resolve_string: Box::new(refuse_external),
        };
        let tree = usvg::Tree::from_str(svg, &options)?;
        if document.has_image && !contains_image(tree.root()) {
            return Err(ExportFailure::ImageDecode);
        }

        pixmap.fill(Color::WHITE);
        let size = tree.size();
        let transform = Transform::from_scale(
            width as f32 / size.width(),
            height as f32 / size.height(),
        );
        resvg::render(&tree, transform, &mut pixmap.as_mut());
        Ok(pixmap)
    }

    fn transition(&self, state: ExportState) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = state;
        log::debug!("export state -> {state:?}");
        if let Some(observer) = &self.observer {
            observer(state);
        }
    }
}

/// Fonts from the document's own `<style>` blocks. The first face found
/// also serves as the `sans-serif` fallback.
fn font_database(svg: &str) -> Result<fontdb::Database, ExportFailure> {
    let doc = roxmltree::Document::parse(svg)?;
    let mut db = fontdb::Database::new();
    for style in doc.descendants().filter(|n| n.has_tag_name("style")) {
        let css: String = style
            .children()
            .filter_map(|n| n.text())
            .collect();
        for font in embedded_font_data(&css) {
            db.load_font_data(font);
        }
    }
    let fallback = db
        .faces()
        .next()
        .and_then(|face| face.families.first())
        .map(|(name, _)| name.clone());
    if let Some(name) = fallback {
        db.set_sans_serif_family(name);
    }
    log::debug!("rasterizer font database holds {} face(s)", db.len());
    Ok(db)
}

fn refuse_external(href: &str, _: &usvg::Options) -> Option<usvg::ImageKind> {
    log::warn!("refusing external image reference {href:?}");
    None
}

fn contains_image(group: &usvg::Group) -> bool {
    group.children().iter().any(|node| match node {
        usvg::Node::Image(_) => true,
        usvg::Node::Group(g) => contains_image(g),
        _ => false,
    })
}

/// What the re-parse learned about the serialized scene.
#[derive(Clone, Debug, PartialEq)]
struct Document {
    view_box: (f64, f64),
    has_image: bool,
    /// Byte range the root element occupies.
    root: Range<usize>,
    /// Tag name of the root as written, prefix included.
    root_tag: String,
}

impl Document {
    fn inspect(markup: &str) -> Result<Self, ExportFailure> {
        let doc = roxmltree::Document::parse(markup)?;
        let root = doc.root_element();
        if root.tag_name().name() != "svg" {
            return Err(ExportFailure::NotSvgRoot(root.tag_name().name().to_owned()));
        }
        let view_box = root
            .attribute("viewBox")
            .and_then(parse_view_box)
            .ok_or(ExportFailure::MissingViewBox)?;
        let has_image = root.descendants().any(|n| n.has_tag_name("image"));

        let range = root.range();
        let root_tag = markup[range.start + 1..range.end]
            .split(|c: char| c.is_whitespace() || c == '/' || c == '>')
            .next()
            .unwrap_or("svg")
            .to_owned();
        Ok(Self {
            view_box,
            has_image,
            root: range,
            root_tag,
        })
    }

    /// Canvas size in whole pixels.
    fn pixel_size(&self) -> (u32, u32) {
        let side = |v: f64| {
            let v = v.round();
            if v >= 1.0 && v <= u32::MAX as f64 { v as u32 } else { 0 }
        };
        (side(self.view_box.0), side(self.view_box.1))
    }

    /// `markup` with `css` appended to the root as a `<defs><style>` block.
    fn with_style(&self, markup: &str, css: &str) -> String {
        let block = format!(
            "<defs><style type=\"text/css\"><![CDATA[\n{}\n]]></style></defs>\n",
            css.replace("]]>", "]]]]><![CDATA[>")
        );
        let element = &markup[self.root.clone()];
        let mut out = String::with_capacity(markup.len() + block.len() + 16);
        match element.rfind("</") {
            Some(close) if !element.ends_with("/>") => {
                let at = self.root.start + close;
                out.push_str(&markup[..at]);
                out.push_str(&block);
                out.push_str(&markup[at..]);
            }
            _ => {
                // Self-closing root: open it up.
                let at = self.root.end - 2;
                out.push_str(&markup[..at]);
                out.push('>');
                out.push_str(&block);
                out.push_str("</");
                out.push_str(&self.root_tag);
                out.push('>');
                out.push_str(&markup[self.root.end..]);
            }
        }
        out
    }
}

fn parse_view_box(value: &str) -> Option<(f64, f64)> {
    let mut parts = value
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(str::parse::<f64>);
    let (_x, _y, w, h) = (
        parts.next()?.ok()?,
        parts.next()?.ok()?,
        parts.next()?.ok()?,
        parts.next()?.ok()?,
    );
    (parts.next().is_none() && w.is_finite() && h.is_finite()).then_some((w, h))
}

/// Busy flag for the code that starts exports.
///
/// ```
/// use posterframe::export::ExportTrigger;
///
/// let trigger = ExportTrigger::new();
/// let guard = trigger.try_begin().unwrap();
/// assert!(trigger.try_begin().is_err());
/// drop(guard);
/// assert!(!trigger.is_busy());
/// ```
#[derive(Clone, Debug, Default)]
pub struct ExportTrigger {
    busy: Arc<AtomicBool>,
}

impl ExportTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark an export as running. Fails with [`ExportFailure::Busy`] if
    /// one already is.
    pub fn try_begin(&self) -> Result<BusyGuard, ExportFailure> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ExportFailure::Busy)?;
        Ok(BusyGuard {
            busy: Arc::clone(&self.busy),
        })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Clears the busy flag when dropped.
#[derive(Debug)]
#[must_use = "the export is only marked busy while the guard is held"]
pub struct BusyGuard {
    busy: Arc<AtomicBool>,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="4" height="2" viewBox="0 0 4 2"><rect x="0" y="0" width="2" height="2" fill="red"/></svg>"#;

    fn recorded() -> (ExportPipeline, Arc<Mutex<Vec<ExportState>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let pipeline =
            ExportPipeline::new(Vec::new()).on_transition(move |s| sink.lock().unwrap().push(s));
        (pipeline, seen)
    }

    #[test]
    fn view_box_parsing() {
        assert_eq!(parse_view_box("0 0 100 50"), Some((100.0, 50.0)));
        assert_eq!(parse_view_box("0,0, 3.5,2"), Some((3.5, 2.0)));
        assert_eq!(parse_view_box("0 0 100"), None);
        assert_eq!(parse_view_box("0 0 a b"), None);
        assert_eq!(parse_view_box("0 0 1 1 1"), None);
    }

    #[test]
    fn style_is_spliced_into_root() {
        let doc = Document::inspect(RED).unwrap();
        let out = doc.with_style(RED, "@font-face {}");
        assert!(out.ends_with("</defs>\n</svg>"));
        assert!(out.contains("<![CDATA[\n@font-face {}\n]]>"));
        roxmltree::Document::parse(&out).unwrap();
    }

    #[test]
    fn self_closing_root_is_opened() {
        let markup = r#"<svg:svg xmlns:svg="http://www.w3.org/2000/svg" viewBox="0 0 1 1"/>"#;
        let doc = Document::inspect(markup).unwrap();
        let out = doc.with_style(markup, "");
        assert!(out.ends_with("</defs>\n</svg:svg>"));
        roxmltree::Document::parse(&out).unwrap();
    }

    #[test]
    fn inspect_rejects_bad_documents() {
        assert!(matches!(
            Document::inspect("<svg"),
            Err(ExportFailure::Markup(_))
        ));
        assert!(matches!(
            Document::inspect("<html/>"),
            Err(ExportFailure::NotSvgRoot(tag)) if tag == "html"
        ));
        assert!(matches!(
            Document::inspect(r#"<svg xmlns="http://www.w3.org/2000/svg"/>"#),
            Err(ExportFailure::MissingViewBox)
        ));
    }

    #[test]
    fn successful_export_transitions() {
        let (pipeline, seen) = recorded();
        let target = MemoryTarget::new();
        pipeline.export_markup(RED, "out.png", &target).unwrap();

        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                ExportState::Serializing,
                ExportState::Rasterizing,
                ExportState::Done
            ]
        );
        assert_eq!(pipeline.state(), ExportState::Done);
        assert_eq!(target.downloads().len(), 1);
        let urls = pipeline.object_urls();
        assert_eq!((urls.created(), urls.revoked(), urls.live()), (1, 1, 0));
    }

    #[test]
    fn rendered_pixels() {
        let pipeline = ExportPipeline::new(Vec::new());
        let doc = Document::inspect(RED).unwrap();
        let url = pipeline.urls.create(RED.as_bytes().to_vec(), SVG_MIME);
        let pixmap = pipeline.rasterize(&url, &doc).unwrap();
        assert_eq!((pixmap.width(), pixmap.height()), (4, 2));
        let left = pixmap.pixel(0, 0).unwrap();
        let right = pixmap.pixel(3, 1).unwrap();
        assert_eq!((left.red(), left.green(), left.blue()), (255, 0, 0));
        assert_eq!((right.red(), right.green(), right.blue()), (255, 255, 255));
    }

    #[test]
    fn zero_canvas_fails_while_rasterizing() {
        let (pipeline, seen) = recorded();
        let target = MemoryTarget::new();
        let markup = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 0 0"/>"#;
        let err = pipeline.export_markup(markup, "out.png", &target).unwrap_err();

        assert_eq!(err.stage, ExportStage::Rasterizing);
        assert!(matches!(
            err.kind,
            ExportFailure::CanvasUnavailable {
                width: 0,
                height: 0
            }
        ));
        assert_eq!(
            seen.lock().unwrap().last(),
            Some(&ExportState::Failed(ExportStage::Rasterizing))
        );
        assert!(target.downloads().is_empty());
        let urls = pipeline.object_urls();
        assert_eq!((urls.created(), urls.revoked(), urls.live()), (1, 1, 0));
    }

    #[test]
    fn error_message_names_stage() {
        let err = ExportError {
            stage: ExportStage::EmbeddingFonts,
            kind: ExportFailure::UnrecognizedFont {
                family: "X".into(),
            },
        };
        assert_eq!(
            err.to_string(),
            "export failed while embedding fonts: font \"X\" is not a TrueType, OpenType or WOFF file"
        );
    }

    #[test]
    fn trigger_is_exclusive_across_clones() {
        let trigger = ExportTrigger::new();
        let other = trigger.clone();
        let guard = trigger.try_begin().unwrap();
        assert!(other.is_busy());
        assert!(matches!(other.try_begin(), Err(ExportFailure::Busy)));
        drop(guard);
        assert!(other.try_begin().is_ok());
    }
}
