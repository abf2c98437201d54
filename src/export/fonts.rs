//! Font assets and their `@font-face` rules.
//!
//! A rasterizer loading the exported document has no network and no access
//! to the host's stylesheets, so every font the scene uses is written into
//! the document as a `data:` URI.

use std::borrow::Cow;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;

use super::ExportFailure;

/// `font-weight` of a face.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

impl FontWeight {
    fn css(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Bold => "bold",
        }
    }
}

/// `font-style` of a face.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

impl FontStyle {
    fn css(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Italic => "italic",
        }
    }
}

/// Where a font's bytes come from.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum FontSource {
    /// Bytes already in memory.
    Data(Arc<[u8]>),
    /// A font file, read when the export runs.
    File(PathBuf),
}

/// Container format, sniffed from the first four bytes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FontFormat {
    TrueType,
    OpenType,
    Woff,
    Woff2,
}

impl FontFormat {
    /// Identify a font container by its magic number.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        match bytes.get(..4)? {
            [0x00, 0x01, 0x00, 0x00] | b"true" => Some(Self::TrueType),
            b"OTTO" => Some(Self::OpenType),
            b"wOFF" => Some(Self::Woff),
            b"wOF2" => Some(Self::Woff2),
            _ => None,
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            Self::TrueType => "font/ttf",
            Self::OpenType => "font/otf",
            Self::Woff => "font/woff",
            Self::Woff2 => "font/woff2",
        }
    }

    /// Value for the CSS `format()` hint.
    pub fn css_format(self) -> &'static str {
        match self {
            Self::TrueType => "truetype",
            Self::OpenType => "opentype",
            Self::Woff => "woff",
            Self::Woff2 => "woff2",
        }
    }
}

/// One face of a font family.
///
/// ```
/// use posterframe::export::{FontAsset, FontWeight};
///
/// let bold = FontAsset::file("Helvetica Neue", "fonts/HelveticaNeueBold.ttf")
///     .weight(FontWeight::Bold);
/// assert!(bold.face_rule().contains("font-weight: bold"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FontAsset {
    pub family: String,
    pub weight: FontWeight,
    pub style: FontStyle,
    pub source: FontSource,
}

impl FontAsset {
    /// A face backed by in-memory bytes.
    pub fn data(family: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self::new(family, FontSource::Data(bytes.into()))
    }

    /// A face backed by a file.
    pub fn file(family: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::new(family, FontSource::File(path.into()))
    }

    pub fn new(family: impl Into<String>, source: FontSource) -> Self {
        Self {
            family: family.into(),
            weight: FontWeight::Normal,
            style: FontStyle::Normal,
            source,
        }
    }

    pub fn weight(mut self, weight: FontWeight) -> Self {
        self.weight = weight;
        self
    }

    pub fn style(mut self, style: FontStyle) -> Self {
        self.style = style;
        self
    }

    /// The `@font-face` rule referencing the font where it lives.
    ///
    /// In-memory fonts are referenced by a `data:` URI; files by path.
    pub fn face_rule(&self) -> String {
        let src = match &self.source {
            FontSource::Data(bytes) => data_uri(bytes),
            FontSource::File(path) => path.display().to_string(),
        };
        self.rule_with_src(&src, FontFormat::sniff(self.peek()))
    }

    /// The same rule with the font inlined as a `data:` URI.
    pub fn embedded_rule(&self) -> Result<String, ExportFailure> {
        let bytes = self.fetch()?;
        if FontFormat::sniff(&bytes).is_none() {
            return Err(ExportFailure::UnrecognizedFont {
                family: self.family.clone(),
            });
        }
        Ok(self.rule_with_src(&data_uri(&bytes), FontFormat::sniff(&bytes)))
    }

    fn rule_with_src(&self, src: &str, format: Option<FontFormat>) -> String {
        let format = format
            .map(|f| format!(" format(\"{}\")", f.css_format()))
            .unwrap_or_default();
        format!(
            "@font-face {{ font-family: \"{}\"; font-style: {}; font-weight: {}; src: url(\"{}\"){}; }}",
            css_escape(&self.family),
            self.style.css(),
            self.weight.css(),
            css_escape(src),
            format
        )
    }

    /// Leading bytes for in-memory fonts; empty for files, which are only
    /// read when embedding.
    fn peek(&self) -> &[u8] {
        match &self.source {
            FontSource::Data(bytes) => &bytes[..],
            FontSource::File(_) => &[],
        }
    }

    fn fetch(&self) -> Result<Cow<'_, [u8]>, ExportFailure> {
        match &self.source {
            FontSource::Data(bytes) => Ok(Cow::Borrowed(&bytes[..])),
            FontSource::File(path) => {
                log::debug!("reading font {}", path.display());
                Ok(Cow::Owned(std::fs::read(path)?))
            }
        }
    }
}

/// Inline every font as an `@font-face` rule, one per line.
///
/// Assets whose reference rule is textually identical are embedded once.
pub fn embed_font_rules(fonts: &[FontAsset]) -> Result<String, ExportFailure> {
    let mut seen = HashSet::new();
    let mut rules = Vec::with_capacity(fonts.len());
    for font in fonts {
        if !seen.insert(font.face_rule()) {
            log::debug!("skipping duplicate font face {:?} {:?}", font.family, font.weight);
            continue;
        }
        rules.push(font.embedded_rule()?);
    }
    Ok(rules.join("\n"))
}

/// Decode every base64 `data:` URI referenced from a `src: url(...)`
/// declaration in `css`. Other references are ignored.
pub fn embedded_font_data(css: &str) -> Vec<Vec<u8>> {
    let mut fonts = Vec::new();
    let mut rest = css;
    while let Some(at) = rest.find("src:") {
        rest = &rest[at + 4..];
        let Some(url) = rest.trim_start().strip_prefix("url(") else {
            continue;
        };
        let Some(end) = url.find(')') else {
            break;
        };
        let target = url[..end].trim().trim_matches(|c| c == '"' || c == '\'');
        rest = &url[end..];

        let Some(payload) = target
            .strip_prefix("data:")
            .and_then(|t| t.split_once(";base64,"))
            .map(|(_, data)| data)
        else {
            log::warn!("ignoring non-embedded font reference {target:?}");
            continue;
        };
        match BASE64_STANDARD.decode(payload) {
            Ok(bytes) => fonts.push(bytes),
            Err(e) => log::warn!("skipping malformed embedded font: {e}"),
        }
    }
    fonts
}

fn data_uri(bytes: &[u8]) -> String {
    let mime = FontFormat::sniff(bytes).map_or("application/octet-stream", FontFormat::mime);
    format!("data:{mime};base64,{}", BASE64_STANDARD.encode(bytes))
}

fn css_escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}
