//! # Bookflow
//!
//! A page-native document flow engine.
//!
//! Bookflow converts a flat stream of semantically-tagged text lines —
//! headings, callouts, step boxes, summaries, checklists, tables, image
//! placeholders, dividers, plain paragraphs — into a sequence of
//! fixed-size pages of absolutely-positioned, styled blocks that never
//! overflow the page bounds. **The page is the fundamental unit of
//! layout**: every placement decision is made with the page floor as a
//! hard constraint, so no consumer ever has to slice an infinite canvas
//! after the fact.
//!
//! ## Architecture
//!
//! ```text
//! Input (tagged text + seed colors + page box)
//!       ↓
//!   [classify] — one trimmed line → tagged block kind + payload
//!   [theme]    — seed colors → cyclic palettes, contrast, complements
//!       ↓
//!   [layout]   — box sizing, table buffering, flow cursor, page breaks
//!       ↓
//!   [model]    — ordered Page list of positioned Blocks (JSON-ready)
//! ```
//!
//! The transform is synchronous, allocation-only, and deterministic: the
//! same text, theme, and page box always produce the same geometry. It is
//! designed to be re-run on every streaming update with the full
//! accumulated text, which makes prefix-stability (no position drift as
//! more text arrives) fall out for free.

pub mod classify;
pub mod error;
pub mod layout;
pub mod model;
pub mod theme;

pub use error::BookflowError;

use layout::LayoutEngine;
use model::{LayoutRequest, Page, PageMetrics};
use theme::Theme;

/// Flow tagged text into pages.
///
/// This is the primary entry point. The first returned page is always an
/// empty sentinel reserved for the consumer's bookkeeping; visible
/// content starts at the second page.
pub fn paginate(text: &str, theme: &Theme, metrics: PageMetrics) -> Vec<Page> {
    LayoutEngine::new(theme.clone(), metrics).paginate(text)
}

/// Flow a [`LayoutRequest`] into pages, validating its seed colors and
/// page box first.
pub fn paginate_request(request: &LayoutRequest) -> Result<Vec<Page>, BookflowError> {
    if theme::parse_hex(&request.main_color).is_none() {
        return Err(BookflowError::InvalidColor(request.main_color.clone()));
    }
    if let Some(accent) = &request.accent_color {
        if theme::parse_hex(accent).is_none() {
            return Err(BookflowError::InvalidColor(accent.clone()));
        }
    }
    if !(request.page_width > 0.0) || !(request.page_height > 0.0) {
        return Err(BookflowError::InvalidPageBox {
            width: request.page_width,
            height: request.page_height,
        });
    }

    let theme = match &request.accent_color {
        Some(accent) => Theme::with_accent(&request.main_color, accent),
        None => Theme::new(&request.main_color),
    };
    let metrics = PageMetrics::new(request.page_width, request.page_height);
    Ok(paginate(&request.text, &theme, metrics))
}

/// Flow a request described as JSON into a page-list JSON string.
pub fn paginate_json(json: &str) -> Result<String, BookflowError> {
    let request: LayoutRequest = serde_json::from_str(json)?;
    let pages = paginate_request(&request)?;
    serde_json::to_string(&pages).map_err(BookflowError::Serialize)
}
