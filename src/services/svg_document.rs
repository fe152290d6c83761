//! The vector document: SVG text with its `<path>` regions addressable by
//! index.
//!
//! Only `<path>` start tags and the root `<svg>` tag are parsed. Comments,
//! CDATA sections and processing instructions are stepped over whole, so
//! markup quoted inside them is never a region. Everything else is carried
//! as opaque text, so a document with no fill changes
//! serializes back byte for byte, and an edited document differs only inside
//! the tags that were touched.

use mosaic_dither::{Palette, Rgb};
use regex::Regex;
use std::ops::Range;
use std::sync::OnceLock;

use crate::error::DocumentError;
use crate::models::{FillState, Region, RegionId, ViewBox};

/// Fill written to every recolorable region before sampling.
pub const BASE_FILL: &str = "#ffffff";

/// File name offered when exporting.
pub const EXPORT_FILE_NAME: &str = "mandala-colored.svg";

/// Id prefix given to regions in the measurement copy.
pub const MEASURE_ID_PREFIX: &str = "hexmosaic-region-";

/// Spans whose content is not markup. Listed first in each tag pattern so a
/// match starting at `<!--` consumes the whole comment.
const OPAQUE_SPANS: &str = r"<!--.*?-->|<!\[CDATA\[.*?\]\]>|<\?.*?\?>";

fn path_tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(
            r#"(?s){OPAQUE_SPANS}|<path\b(?:[^>"']|"[^"]*"|'[^']*')*>"#
        ))
        .expect("path tag pattern")
    })
}

fn svg_tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(
            r#"(?s){OPAQUE_SPANS}|<svg\b(?:[^>"']|"[^"]*"|'[^']*')*>"#
        ))
        .expect("svg tag pattern")
    })
}

fn attribute_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"([A-Za-z_:][-A-Za-z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
            .expect("attribute pattern")
    })
}

/// One attribute of a start tag. `value` is the raw text between the quotes.
#[derive(Debug, Clone, PartialEq)]
struct Attribute {
    name: String,
    value: String,
    /// Byte range of the value inside the tag text.
    span: Range<usize>,
}

/// Parse attributes from a start tag, skipping the element name.
fn parse_attributes(tag: &str, name_len: usize) -> Vec<Attribute> {
    let body = &tag[name_len..];
    attribute_re()
        .captures_iter(body)
        .filter_map(|caps| {
            let name = caps.get(1)?;
            let value = caps.get(2).or_else(|| caps.get(3))?;
            Some(Attribute {
                name: name.as_str().to_string(),
                value: value.as_str().to_string(),
                span: (value.start() + name_len)..(value.end() + name_len),
            })
        })
        .collect()
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
}

/// A `<path ...>` start tag that can be edited in place.
#[derive(Debug, Clone, PartialEq)]
struct PathTag {
    raw: String,
    attrs: Vec<Attribute>,
}

impl PathTag {
    const NAME_LEN: usize = "<path".len();

    fn parse(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
            attrs: parse_attributes(raw, Self::NAME_LEN),
        }
    }

    fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Replace an attribute value, or add the attribute before the tag end.
    /// `value` is written as-is and must already be escaped.
    fn set_attr_raw(&mut self, name: &str, value: &str) {
        if let Some(attr) = self.attrs.iter().find(|a| a.name == name) {
            self.raw.replace_range(attr.span.clone(), value);
        } else {
            let mut end = self.raw.len() - 1; // '>'
            if self.raw[..end].ends_with('/') {
                end -= 1;
            }
            let at = self.raw[..end].trim_end().len();
            self.raw.insert_str(at, &format!(" {name}=\"{value}\""));
        }
        self.attrs = parse_attributes(&self.raw, Self::NAME_LEN);
    }

    /// Fill as written: `style` declaration first, then the attribute.
    fn fill_value(&self) -> Option<&str> {
        if let Some(style) = self.attr("style").filter(|s| !s.is_empty()) {
            for decl in style.split(';').map(str::trim).filter(|d| !d.is_empty()) {
                if let Some((key, value)) = decl.split_once(':') {
                    if key.trim() == "fill" {
                        return Some(value.trim());
                    }
                }
            }
        }
        self.attr("fill").map(str::trim)
    }

    fn fill_state(&self) -> FillState {
        FillState::from_value(self.fill_value())
    }

    /// Write a fill where it will win: into `style` when one is present,
    /// else the `fill` attribute.
    fn set_fill(&mut self, color: &str) {
        let color = escape_attr(color);
        let style = self
            .attr("style")
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        match style {
            Some(style) => {
                let mut found = false;
                let mut decls: Vec<String> = style
                    .split(';')
                    .map(str::trim)
                    .filter(|d| !d.is_empty())
                    .map(|decl| match decl.split_once(':') {
                        Some((key, _)) if key.trim() == "fill" => {
                            found = true;
                            format!("fill:{color}")
                        }
                        _ => decl.to_string(),
                    })
                    .collect();
                if !found {
                    decls.push(format!("fill:{color}"));
                }
                let style = format!("{};", decls.join(";"));
                self.set_attr_raw("style", &style);
            }
            None => self.set_attr_raw("fill", &color),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Piece {
    Text(String),
    Path(usize),
}

/// A loaded SVG mosaic.
#[derive(Debug, Clone)]
pub struct SvgDocument {
    original: String,
    pieces: Vec<Piece>,
    tags: Vec<PathTag>,
    view_box: ViewBox,
}

impl SvgDocument {
    /// Parse SVG text. Fails only when there is no `<svg>` start tag.
    pub fn parse(text: impl Into<String>) -> Result<Self, DocumentError> {
        let original = text.into();
        let (pieces, tags, view_box) = Self::split(&original)?;
        tracing::debug!(
            regions = tags.len(),
            width = view_box.width,
            height = view_box.height,
            "Parsed SVG document"
        );
        Ok(Self {
            original,
            pieces,
            tags,
            view_box,
        })
    }

    fn split(text: &str) -> Result<(Vec<Piece>, Vec<PathTag>, ViewBox), DocumentError> {
        let root = svg_tag_re()
            .find_iter(text)
            .find(|m| m.as_str().starts_with("<svg"))
            .ok_or(DocumentError::MissingRoot)?;
        let root_attrs = parse_attributes(root.as_str(), "<svg".len());
        let root_attr = |name: &str| {
            root_attrs
                .iter()
                .find(|a| a.name == name)
                .map(|a| a.value.as_str())
        };
        let view_box = root_attr("viewBox")
            .and_then(ViewBox::parse)
            .unwrap_or_else(|| {
                let size = |name: &str| {
                    root_attr(name)
                        .and_then(|v| v.trim().parse::<f32>().ok())
                        .filter(|v| v.is_finite())
                        .unwrap_or(0.0)
                };
                ViewBox::new(size("width"), size("height"))
            });

        let mut pieces = Vec::new();
        let mut tags = Vec::new();
        let mut cursor = 0;
        let tags_only = path_tag_re()
            .find_iter(text)
            .filter(|m| m.as_str().starts_with("<path"));
        for m in tags_only {
            if m.start() > cursor {
                pieces.push(Piece::Text(text[cursor..m.start()].to_string()));
            }
            pieces.push(Piece::Path(tags.len()));
            tags.push(PathTag::parse(m.as_str()));
            cursor = m.end();
        }
        if cursor < text.len() {
            pieces.push(Piece::Text(text[cursor..].to_string()));
        }
        Ok((pieces, tags, view_box))
    }

    pub fn view_box(&self) -> ViewBox {
        self.view_box
    }

    /// Number of `<path>` regions.
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// All regions in document order.
    pub fn regions(&self) -> Vec<Region> {
        self.tags
            .iter()
            .enumerate()
            .map(|(i, tag)| Region {
                id: RegionId(i),
                fill: tag.fill_state(),
            })
            .collect()
    }

    pub fn fill_state(&self, id: RegionId) -> Option<FillState> {
        self.tags.get(id.0).map(PathTag::fill_state)
    }

    /// Regions with a paint fill, in document order.
    pub fn recolorable(&self) -> Vec<RegionId> {
        self.tags
            .iter()
            .enumerate()
            .filter(|(_, tag)| tag.fill_state().is_paint())
            .map(|(i, _)| RegionId(i))
            .collect()
    }

    /// Overwrite a region's fill. Returns false for an unknown id.
    pub fn set_fill(&mut self, id: RegionId, color: &str) -> bool {
        match self.tags.get_mut(id.0) {
            Some(tag) => {
                tag.set_fill(color);
                true
            }
            None => false,
        }
    }

    /// Re-parse the retained original text, discarding all fill changes.
    pub fn reset(&mut self) {
        // The original parsed once already, so the root is present.
        if let Ok((pieces, tags, view_box)) = Self::split(&self.original) {
            self.pieces = pieces;
            self.tags = tags;
            self.view_box = view_box;
        }
    }

    /// The text the document was loaded from.
    pub fn original_source(&self) -> &str {
        &self.original
    }

    /// Current document text.
    pub fn to_svg_string(&self) -> String {
        self.render(|_, tag| tag.raw.clone())
    }

    /// Document text with each region tagged `id="hexmosaic-region-N"`, for
    /// measuring region geometry.
    pub fn measurement_svg(&self) -> String {
        self.render(|i, tag| {
            let mut tag = tag.clone();
            tag.set_attr_raw("id", &format!("{MEASURE_ID_PREFIX}{i}"));
            tag.raw
        })
    }

    fn render(&self, mut tag_text: impl FnMut(usize, &PathTag) -> String) -> String {
        let mut out = String::with_capacity(self.original.len() + self.tags.len() * 16);
        for piece in &self.pieces {
            match piece {
                Piece::Text(text) => out.push_str(text),
                Piece::Path(i) => out.push_str(&tag_text(*i, &self.tags[*i])),
            }
        }
        out
    }

    /// Distinct hex fills of the original document, in order of first use.
    ///
    /// Only `#rgb` and `#rrggbb` fills count; named colors and gradients are
    /// ignored.
    pub fn document_palette(&self) -> Palette {
        let mut seen: Vec<Rgb> = Vec::new();
        let original = Self::split(&self.original)
            .map(|(_, tags, _)| tags)
            .unwrap_or_default();
        for tag in &original {
            if let Some(rgb) = tag
                .fill_state()
                .paint()
                .and_then(|p| p.parse::<Rgb>().ok())
            {
                if !seen.contains(&rgb) {
                    seen.push(rgb);
                }
            }
        }
        Palette::from_colors(seen)
    }
}

/// Region id encoded in a measurement-copy element id.
pub fn parse_measure_id(id: &str) -> Option<RegionId> {
    id.strip_prefix(MEASURE_ID_PREFIX)?
        .parse()
        .ok()
        .map(RegionId)
}
