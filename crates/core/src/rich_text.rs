//! Image blocks embedded in rich text.
//!
//! Rich text is stored as an HTML string. Images inside it are written as a
//! `<figure>` tagged with `data-image-layout`, which carries everything
//! needed to rebuild the block for editing:
//!
//! ```html
//! <figure class="image-block image-block--double" data-image-layout="double"
//!         data-position="right" data-align="center" style="...">
//!   <div class="image-block__text" data-side-text style="...">Made by hand</div>
//!   <img src="/media/a.jpg" data-width="300" style="width: 300px; ...">
//! </figure>
//! ```
//!
//! Older content used a bare `<img data-custom-image>` (optionally inside a
//! centering `<div>`). That markup is still accepted and reads back as a
//! single-column block.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Width used when the markup does not specify one.
pub const DEFAULT_WIDTH: u32 = 300;

const IMG_STYLE: &str = "max-width: 100%; height: auto; border-radius: 4px; display: inline-block;";

static BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<figure\b([^>]*\bdata-image-layout="[^"]*"[^>]*)>(.*?)</figure>"#).expect("Invalid regex")
});

static LEGACY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?s)<div\b([^>]*)>\s*(<img\b[^>]*\bdata-custom-image\b[^>]*>)\s*</div>|(<img\b[^>]*\bdata-custom-image\b[^>]*>)",
    ).expect("Invalid regex")
});

static IMG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<img\b([^>]*?)\s*/?>").expect("Invalid regex")
});

static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([a-zA-Z][\w:-]*)(?:\s*=\s*"([^"]*)")?"#).expect("Invalid regex")
});

static SIDE_TEXT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<div\b[^>]*\bdata-side-text\b[^>]*>(.*?)</div>").expect("Invalid regex")
});

static STYLE_WIDTH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|;)\s*width\s*:\s*(\d+)px").expect("Invalid regex")
});

static STYLE_ALIGN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|;)\s*text-align\s*:\s*(left|center|right)").expect("Invalid regex")
});

/// Errors from reading an image block out of markup.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RichTextError {
    /// No image block or legacy image was found.
    #[error("markup does not contain an image block")]
    NotAnImageBlock,
    /// The image element has no `src`.
    #[error("image block has no source")]
    MissingSource,
}

/// Horizontal alignment of a single-column block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    /// Flush left.
    Left,
    /// Centered.
    #[default]
    Center,
    /// Flush right.
    Right,
}

impl Align {
    /// CSS keyword.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }

    fn from_attr(value: &str) -> Self {
        match value.trim() {
            "left" => Self::Left,
            "right" => Self::Right,
            _ => Self::Center,
        }
    }
}

/// Which side of the text the image sits on in a double-column block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SidePosition {
    /// Image on the left, text on the right.
    #[default]
    Left,
    /// Text on the left, image on the right.
    Right,
}

impl SidePosition {
    /// Attribute value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    fn from_attr(value: &str) -> Self {
        if value.trim() == "right" {
            Self::Right
        } else {
            Self::Left
        }
    }
}

/// Layout mode of an image block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum ImageLayout {
    /// The image on its own line.
    #[default]
    Single,
    /// The image next to a block of text.
    Double {
        /// Side the image sits on.
        position: SidePosition,
        /// Plain text shown beside the image.
        side_text: String,
    },
}

impl ImageLayout {
    /// Marker attribute value.
    #[must_use]
    pub const fn marker(&self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Double { .. } => "double",
        }
    }
}

/// An image embedded in rich text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageBlock {
    /// Image reference.
    pub src: String,
    /// Alternative text.
    pub alt: Option<String>,
    /// Tooltip title.
    pub title: Option<String>,
    /// Rendered width in pixels.
    pub width: u32,
    /// Alignment of the block.
    pub align: Align,
    /// Single or double column.
    pub layout: ImageLayout,
}

impl ImageBlock {
    /// A centered single-column block at the default width.
    #[must_use]
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            alt: None,
            title: None,
            width: DEFAULT_WIDTH,
            align: Align::default(),
            layout: ImageLayout::default(),
        }
    }

    /// Render the block as HTML.
    #[must_use]
    pub fn to_html(&self) -> String {
        let img = self.img_html();
        match &self.layout {
            ImageLayout::Single => format!(
                r#"<figure class="image-block image-block--single" data-image-layout="single" data-align="{align}" style="text-align: {align}; margin: 1rem 0;">{img}</figure>"#,
                align = self.align.as_str(),
            ),
            ImageLayout::Double {
                position,
                side_text,
            } => {
                let text = format!(
                    r#"<div class="image-block__text" data-side-text style="flex: 1; min-width: 0;">{}</div>"#,
                    escape(side_text)
                );
                let (first, second) = match position {
                    SidePosition::Left => (img, text),
                    SidePosition::Right => (text, img),
                };
                format!(
                    r#"<figure class="image-block image-block--double" data-image-layout="double" data-position="{position}" data-align="{align}" style="display: flex; flex-direction: row; align-items: center; gap: 1.5rem; margin: 1rem 0;">{first}{second}</figure>"#,
                    position = position.as_str(),
                    align = self.align.as_str(),
                )
            }
        }
    }

    fn img_html(&self) -> String {
        let mut html = format!(r#"<img src="{}""#, escape(&self.src));
        if let Some(alt) = &self.alt {
            html.push_str(&format!(r#" alt="{}""#, escape(alt)));
        }
        if let Some(title) = &self.title {
            html.push_str(&format!(r#" title="{}""#, escape(title)));
        }
        html.push_str(&format!(
            r#" data-width="{width}" style="width: {width}px; {IMG_STYLE}">"#,
            width = self.width
        ));
        html
    }

    /// Read the first image block out of `markup`.
    ///
    /// Tagged blocks are preferred; a legacy `data-custom-image` element is
    /// read as a centered single-column block.
    ///
    /// # Errors
    ///
    /// Returns [`RichTextError::NotAnImageBlock`] if no block is present and
    /// [`RichTextError::MissingSource`] if the image has no `src`.
    pub fn parse(markup: &str) -> Result<Self, RichTextError> {
        if let Some(caps) = BLOCK_RE.captures(markup) {
            let figure = attrs(caps.get(1).map_or("", |m| m.as_str()));
            let inner = caps.get(2).map_or("", |m| m.as_str());
            return Self::from_tagged(&figure, inner);
        }
        LEGACY_RE
            .captures_iter(markup)
            .map(|caps| Self::from_legacy(&caps))
            .find(|parsed| parsed != &Err(RichTextError::NotAnImageBlock))
            .unwrap_or(Err(RichTextError::NotAnImageBlock))
    }

    fn from_tagged(figure: &Attrs, inner: &str) -> Result<Self, RichTextError> {
        let img = IMG_RE
            .captures(inner)
            .map(|c| attrs(c.get(1).map_or("", |m| m.as_str())))
            .ok_or(RichTextError::MissingSource)?;

        let layout = match figure.get("data-image-layout") {
            Some("double") => ImageLayout::Double {
                position: figure
                    .get("data-position")
                    .map_or_else(SidePosition::default, SidePosition::from_attr),
                side_text: SIDE_TEXT_RE
                    .captures(inner)
                    .and_then(|c| c.get(1))
                    .map(|m| unescape(m.as_str()))
                    .unwrap_or_default(),
            },
            _ => ImageLayout::Single,
        };

        let align = figure
            .get("data-align")
            .map_or_else(Align::default, Align::from_attr);

        Self::from_img(&img, align, layout)
    }

    fn from_legacy(caps: &regex::Captures<'_>) -> Result<Self, RichTextError> {
        let (wrapper, img) = match (caps.get(1), caps.get(2), caps.get(3)) {
            (Some(wrapper), Some(img), _) => (Some(attrs(wrapper.as_str())), img.as_str()),
            (_, _, Some(img)) => (None, img.as_str()),
            _ => return Err(RichTextError::NotAnImageBlock),
        };
        let img = IMG_RE
            .captures(img)
            .map(|c| attrs(c.get(1).map_or("", |m| m.as_str())))
            .ok_or(RichTextError::MissingSource)?;
        if img.get("data-custom-image").is_none() {
            return Err(RichTextError::NotAnImageBlock);
        }

        let align = wrapper
            .as_ref()
            .and_then(|w| w.get("style"))
            .and_then(|style| STYLE_ALIGN_RE.captures(style))
            .and_then(|c| c.get(1))
            .map_or_else(Align::default, |m| Align::from_attr(m.as_str()));

        Self::from_img(&img, align, ImageLayout::Single)
    }

    fn from_img(img: &Attrs, align: Align, layout: ImageLayout) -> Result<Self, RichTextError> {
        let src = img
            .get("src")
            .filter(|s| !s.trim().is_empty())
            .ok_or(RichTextError::MissingSource)?
            .to_owned();

        Ok(Self {
            src,
            alt: img.get("alt").map(str::to_owned),
            title: img.get("title").map(str::to_owned),
            width: img_width(img),
            align,
            layout,
        })
    }
}

fn img_width(img: &Attrs) -> u32 {
    if let Some(width) = img.get("data-width").and_then(|w| w.trim().parse().ok()) {
        return width;
    }
    if let Some(width) = img
        .get("style")
        .and_then(|style| STYLE_WIDTH_RE.captures(style))
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
    {
        return width;
    }
    img.get("width")
        .and_then(|w| w.trim().trim_end_matches("px").parse().ok())
        .unwrap_or(DEFAULT_WIDTH)
}

/// Flat attribute set exchanged with the editor.
///
/// Every field except `src` is optional and falls back to the same defaults
/// as markup parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageAttrs {
    /// Image reference.
    pub src: String,
    /// Alternative text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    /// Tooltip title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Width in pixels.
    #[serde(default)]
    pub width: Option<u32>,
    /// Block alignment.
    #[serde(default)]
    pub align: Option<Align>,
    /// `single` or `double`.
    #[serde(default)]
    pub layout: Option<String>,
    /// Image side for double layout.
    #[serde(default)]
    pub position: Option<SidePosition>,
    /// Text beside the image for double layout.
    #[serde(default)]
    pub side_text: Option<String>,
}

impl From<ImageAttrs> for ImageBlock {
    fn from(attrs: ImageAttrs) -> Self {
        let layout = match attrs.layout.as_deref() {
            Some("double") => ImageLayout::Double {
                position: attrs.position.unwrap_or_default(),
                side_text: attrs.side_text.unwrap_or_default(),
            },
            _ => ImageLayout::Single,
        };
        Self {
            src: attrs.src,
            alt: attrs.alt,
            title: attrs.title,
            width: attrs.width.unwrap_or(DEFAULT_WIDTH),
            align: attrs.align.unwrap_or_default(),
            layout,
        }
    }
}

impl From<ImageBlock> for ImageAttrs {
    fn from(block: ImageBlock) -> Self {
        let layout = Some(block.layout.marker().to_owned());
        let (position, side_text) = match block.layout {
            ImageLayout::Single => (None, None),
            ImageLayout::Double {
                position,
                side_text,
            } => (Some(position), Some(side_text)),
        };
        Self {
            src: block.src,
            alt: block.alt,
            title: block.title,
            width: Some(block.width),
            align: Some(block.align),
            layout,
            position,
            side_text,
        }
    }
}

/// Rewrite every image block in `html` to canonical markup.
///
/// Legacy images are upgraded to tagged blocks. Blocks that cannot be read
/// and everything outside image blocks are left untouched.
#[must_use]
pub fn normalize_document(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = 0;
    for caps in BLOCK_RE.captures_iter(html) {
        let Some(whole) = caps.get(0) else { continue };
        out.push_str(&normalize_legacy(&html[rest..whole.start()]));
        let block = whole.as_str();
        match ImageBlock::parse(block) {
            Ok(parsed) => out.push_str(&parsed.to_html()),
            Err(_) => out.push_str(block),
        }
        rest = whole.end();
    }
    out.push_str(&normalize_legacy(&html[rest..]));
    out
}

/// Upgrade legacy images in a stretch of markup that holds no tagged block.
fn normalize_legacy(html: &str) -> Cow<'_, str> {
    LEGACY_RE.replace_all(html, |caps: &regex::Captures<'_>| {
        let whole = caps.get(0).map_or("", |m| m.as_str());
        ImageBlock::from_legacy(caps).map_or_else(|_| whole.to_owned(), |block| block.to_html())
    })
}

/// Parsed attributes of one tag, in source order.
struct Attrs(Vec<(String, Option<String>)>);

impl Attrs {
    fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_deref().unwrap_or(""))
    }
}

fn attrs(source: &str) -> Attrs {
    Attrs(
        ATTR_RE
            .captures_iter(source)
            .filter_map(|caps| {
                let name = caps.get(1)?.as_str().to_owned();
                let value = caps.get(2).map(|m| unescape(m.as_str()));
                Some((name, value))
            })
            .collect(),
    )
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn unescape(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&amp;", "&")
}
