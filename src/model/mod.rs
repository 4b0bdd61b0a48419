//! # Page & Block Model
//!
//! The output representation of the flow engine. A document becomes an
//! ordered list of [`Page`]s, each holding absolutely-positioned [`Block`]s.
//! This is designed to be consumed directly by a rendering layer that paints
//! each block at its coordinates, and by a raster exporter that snapshots
//! rendered pages in order.
//!
//! One quirk is load-bearing: **the first page is a sentinel.** It is always
//! empty, exists for the consumer's bookkeeping, and is never shown. Real
//! content starts at the second page.

use serde::{Deserialize, Serialize};

use crate::theme::PRESET_MAIN_COLORS;

/// One positioned, styled, atomic visual unit of content.
///
/// Blocks are never split across pages. Flowed kinds are intrinsically
/// sized by the box sizer; only free-form `Shape` blocks (placed by an
/// editor, never by the classifier) carry an explicit height.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    /// Identifier, sequential within one transform invocation.
    pub id: String,
    pub kind: BlockKind,
    /// Textual payload. Table blocks carry an HTML fragment with escaped
    /// cell text; step and summary blocks carry a `label|body` pair.
    pub content: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    /// Explicit height, shapes only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    /// Rotation in degrees (editor-facing).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    /// Locked against editing (editor-facing).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
    #[serde(default)]
    pub style: BlockStyle,
}

/// The visual kind of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockKind {
    HeadingTitle,
    HeadingChapter,
    HeadingSub,
    Paragraph,
    ListItem,
    Callout(CalloutVariant),
    Step,
    Summary,
    BigQuote,
    ChecklistItem,
    Highlight,
    ImagePlaceholder,
    Table,
    Divider,
    Shape,
}

/// Keyword-driven callout subtype. `Tip` is the fallback when no keyword
/// matches the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CalloutVariant {
    Tip,
    Important,
    Example,
    Data,
    Note,
}

/// Style record attached to every block. All values are resolved CSS
/// strings or numbers the rendering layer applies verbatim; unset fields
/// fall back to the renderer's defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_align: Option<TextAlign>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_left: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_bottom: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<String>,
    /// Step badge background.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_bg: Option<String>,
    /// Step badge text color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_color: Option<String>,
    // Shape-only properties.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape_type: Option<ShapeType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeType {
    Rect,
    Circle,
    Line,
}

/// An ordered collection of blocks bounded by a fixed content box.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    pub id: String,
    pub blocks: Vec<Block>,
}

/// The page box the flow runs against, in the same unit as block
/// coordinates. The content box is derived from it with fixed ratios:
/// 8% side gutters, content starting at 6% of the height and ending
/// at 85%.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetrics {
    pub width: f64,
    pub height: f64,
}

impl PageMetrics {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Left edge of the content box.
    pub fn content_x(&self) -> f64 {
        self.width * 0.08
    }

    /// Width of the content box.
    pub fn content_width(&self) -> f64 {
        self.width * 0.84
    }

    /// Vertical offset where flow starts on a fresh page.
    pub fn start_y(&self) -> f64 {
        self.height * 0.06
    }

    /// Vertical offset no block may extend past (unless it is the sole
    /// block on its page).
    pub fn content_floor(&self) -> f64 {
        self.height * 0.85
    }
}

impl Default for PageMetrics {
    /// A4 proportions at the canonical 500-unit preview width.
    fn default() -> Self {
        Self::new(500.0, 500.0 * 297.0 / 210.0)
    }
}

/// A complete pagination request, the JSON boundary of the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutRequest {
    /// The full accumulated source text (not a delta).
    pub text: String,
    /// Main seed color as a hex string.
    #[serde(default = "default_main_color")]
    pub main_color: String,
    /// Accent seed color. Derived from the main color when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent_color: Option<String>,
    #[serde(default = "default_page_width")]
    pub page_width: f64,
    #[serde(default = "default_page_height")]
    pub page_height: f64,
}

fn default_main_color() -> String {
    PRESET_MAIN_COLORS[0].0.to_string()
}

fn default_page_width() -> f64 {
    PageMetrics::default().width
}

fn default_page_height() -> f64 {
    PageMetrics::default().height
}
