//! # Page-Aware Flow Engine
//!
//! This is the heart of Bookflow and the reason it exists.
//!
//! The engine makes a single linear pass over the source text. Each line
//! is classified, sized, and placed with the page floor as a hard
//! constraint: before a block lands, the engine asks "does this fit?", and
//! a block that doesn't fit moves whole to a fresh page. Blocks are atomic
//! — nothing is ever sliced at a page boundary.
//!
//! ## The algorithm
//!
//! 1. Classify the trimmed line (blank lines collapse into one spacing
//!    unit per run).
//! 2. Table rows go to the table buffer; any other line flushes a
//!    non-empty buffer first so the composite table lands as one block.
//! 3. Resolve height and contextual top margin via the box sizer.
//! 4. If `cursor + margin + height` crosses the content floor and the
//!    page already holds a block, close the page, reset the cursor, and
//!    re-apply the margin rule as if the block were first on a page.
//! 5. Advance the cursor and remember the emitted kind for the next
//!    margin lookup.
//!
//! The transform is re-run over the full accumulated text on every
//! streaming update. That is deliberate: re-deriving from scratch makes
//! idempotence trivial — a prefix of the text always produces the same
//! geometry it produced on its own.

pub mod sizing;
pub mod table;

use log::{debug, trace};

use crate::classify::{classify, Line};
use crate::model::{Block, BlockKind, BlockStyle, Page, PageMetrics, TextAlign};
use crate::theme::Theme;
use table::TableBuffer;

/// Running palette counters. They advance every time their block kind is
/// emitted and never reset, so palette rotation is continuous across the
/// whole document rather than per page.
#[derive(Debug, Clone, Copy, Default)]
struct StyleCycles {
    chapter: usize,
    subheading: usize,
    highlight: usize,
}

/// Per-invocation identifier source. Scoped to one transform call so the
/// engine carries no process-wide state.
#[derive(Debug, Default)]
struct IdGen {
    next: u64,
}

impl IdGen {
    fn block(&mut self) -> String {
        self.next += 1;
        format!("block-{}", self.next)
    }
}

/// Tracks where we are on the current page during flow.
#[derive(Debug)]
struct FlowCursor {
    /// Current vertical offset.
    y: f64,
    /// Blocks placed on the in-progress page.
    blocks: Vec<Block>,
    /// Kind of the last emitted block, for contextual margin rules.
    last_kind: Option<BlockKind>,
    /// Collapses runs of blank lines into one spacing unit.
    last_was_blank: bool,
    /// Index of the in-progress page (the sentinel is page 0).
    page_no: usize,
}

impl FlowCursor {
    fn new(start_y: f64) -> Self {
        Self {
            y: start_y,
            blocks: Vec::new(),
            last_kind: None,
            last_was_blank: false,
            page_no: 1,
        }
    }
}

/// The main flow engine: a theme and a page box, reusable across
/// invocations. Each [`paginate`](LayoutEngine::paginate) call is pure
/// over its input text.
pub struct LayoutEngine {
    theme: Theme,
    metrics: PageMetrics,
}

impl LayoutEngine {
    pub fn new(theme: Theme, metrics: PageMetrics) -> Self {
        Self { theme, metrics }
    }

    /// Flow the full source text into pages. The first returned page is
    /// always the empty sentinel; the result holds at least that page.
    pub fn paginate(&self, text: &str) -> Vec<Page> {
        let start_y = self.metrics.start_y();
        let mut ids = IdGen::default();
        let mut pages = vec![Page {
            id: "page-0".to_string(),
            blocks: Vec::new(),
        }];
        let mut cursor = FlowCursor::new(start_y);
        let mut cycles = StyleCycles::default();
        let mut buffer = TableBuffer::new();

        for raw in text.lines() {
            let trimmed = raw.trim();

            if trimmed.is_empty() {
                if !cursor.last_was_blank {
                    cursor.y += sizing::blank_spacing(cursor.last_kind);
                    cursor.last_was_blank = true;
                }
                continue;
            }
            cursor.last_was_blank = false;

            match classify(trimmed) {
                Line::TableRow(cells) => {
                    trace!("buffered table row with {} cells", cells.len());
                    buffer.push(cells);
                }
                // Separator rows vanish without ending the table run.
                Line::TableSeparator => {}
                line => {
                    if !buffer.is_empty() {
                        self.flush_table(&mut buffer, &mut cursor, &mut pages, &mut ids);
                    }
                    let (block, height) = self.build_block(line, &mut cycles, &mut ids);
                    self.place(block, height, &mut cursor, &mut pages);
                }
            }
        }

        if !buffer.is_empty() {
            self.flush_table(&mut buffer, &mut cursor, &mut pages, &mut ids);
        }
        if !cursor.blocks.is_empty() {
            pages.push(Page {
                id: format!("page-{}", cursor.page_no),
                blocks: cursor.blocks,
            });
        }

        debug!("flowed text into {} pages (incl. sentinel)", pages.len());
        pages
    }

    /// Place a sized block, breaking the page first when it would cross
    /// the content floor. A block only lands past the floor when it is
    /// alone on its page (accepted overflow — blocks are never split).
    fn place(&self, mut block: Block, height: f64, cursor: &mut FlowCursor, pages: &mut Vec<Page>) {
        let floor = self.metrics.content_floor();
        let mut margin = sizing::margin_above(block.kind, cursor.last_kind);

        if cursor.y + margin + height > floor && !cursor.blocks.is_empty() {
            debug!(
                "page {} full at y={:.1}, moving {:?} to next page",
                cursor.page_no, cursor.y, block.kind
            );
            pages.push(Page {
                id: format!("page-{}", cursor.page_no),
                blocks: std::mem::take(&mut cursor.blocks),
            });
            cursor.page_no += 1;
            cursor.y = self.metrics.start_y();
            // First on a fresh page: the margin rule re-applies with no
            // preceding block.
            margin = sizing::margin_above(block.kind, None);
        }

        block.y = cursor.y + margin;
        cursor.y += margin + height;
        cursor.last_kind = Some(block.kind);
        cursor.blocks.push(block);
    }

    /// Emit the buffered table rows as one composite block and clear the
    /// buffer. Rows are never split across pages: the overflow check runs
    /// against the whole table before it lands.
    fn flush_table(
        &self,
        buffer: &mut TableBuffer,
        cursor: &mut FlowCursor,
        pages: &mut Vec<Page>,
        ids: &mut IdGen,
    ) {
        let height = sizing::table_height(buffer.row_count());
        debug!("flushing table: {} rows, height {height}", buffer.row_count());
        let block = Block {
            id: ids.block(),
            kind: BlockKind::Table,
            content: buffer.render_html(),
            x: self.metrics.content_x(),
            y: 0.0,
            width: self.metrics.content_width(),
            height: None,
            rotation: None,
            locked: None,
            style: BlockStyle::default(),
        };
        buffer.clear();
        self.place(block, height, cursor, pages);
    }

    /// Construct the styled block for a classified line, advancing the
    /// palette counters where the kind cycles. Returns the block with a
    /// placeholder `y` plus its estimated height; `place` finalizes the
    /// position.
    fn build_block(&self, line: Line<'_>, cycles: &mut StyleCycles, ids: &mut IdGen) -> (Block, f64) {
        let x = self.metrics.content_x();
        let w = self.metrics.content_width();
        let theme = &self.theme;

        let make = |ids: &mut IdGen, kind, content: String, x, w, style| Block {
            id: ids.block(),
            kind,
            content,
            x,
            y: 0.0,
            width: w,
            height: None,
            rotation: None,
            locked: None,
            style,
        };

        match line {
            Line::Divider => {
                let style = BlockStyle {
                    background: Some(
                        "linear-gradient(90deg, transparent, #d1d5db, transparent)".to_string(),
                    ),
                    border_radius: Some("1px".to_string()),
                    padding: Some("1px 0".to_string()),
                    ..Default::default()
                };
                let block = make(ids, BlockKind::Divider, String::new(), x + w * 0.1, w * 0.8, style);
                (block, sizing::block_height(BlockKind::Divider, 0))
            }

            Line::Title(text) => {
                let style = BlockStyle {
                    font_size: Some(26.0),
                    font_weight: Some("bold".to_string()),
                    text_align: Some(TextAlign::Center),
                    background: Some("linear-gradient(135deg, #1e3a5f, #34495e)".to_string()),
                    color: Some("#fff".to_string()),
                    padding: Some("16px 20px".to_string()),
                    border_radius: Some("8px".to_string()),
                    ..Default::default()
                };
                let block = make(ids, BlockKind::HeadingTitle, text.to_string(), x, w, style);
                (block, sizing::block_height(BlockKind::HeadingTitle, 0))
            }

            Line::Chapter(text) => {
                let entry = &theme.chapter_styles[cycles.chapter % theme.chapter_styles.len()];
                cycles.chapter += 1;
                let style = BlockStyle {
                    font_size: Some(17.0),
                    font_weight: Some("bold".to_string()),
                    background: Some(entry.background.clone()),
                    color: Some(entry.color.clone()),
                    border_left: entry.border_left.clone(),
                    border_bottom: entry.border_bottom.clone(),
                    border_radius: Some(entry.border_radius.to_string()),
                    padding: Some("12px 16px".to_string()),
                    ..Default::default()
                };
                let block = make(ids, BlockKind::HeadingChapter, text.to_string(), x, w, style);
                (block, sizing::block_height(BlockKind::HeadingChapter, 0))
            }

            Line::Subheading(text) => {
                let entry =
                    &theme.subheading_styles[cycles.subheading % theme.subheading_styles.len()];
                cycles.subheading += 1;
                let style = BlockStyle {
                    font_size: Some(13.0),
                    font_weight: Some("600".to_string()),
                    color: Some(entry.color.clone()),
                    border_left: Some(entry.border_left.clone()),
                    background: Some("transparent".to_string()),
                    padding: Some("4px 10px".to_string()),
                    ..Default::default()
                };
                let block = make(ids, BlockKind::HeadingSub, text.to_string(), x, w, style);
                (block, sizing::block_height(BlockKind::HeadingSub, 0))
            }

            Line::Step { number, text } => {
                // The step number, not a running counter, selects the
                // palette entry, so re-numbered steps restyle themselves.
                let idx = (number.max(1) as usize - 1) % theme.step_styles.len();
                let entry = &theme.step_styles[idx];
                let style = BlockStyle {
                    background: Some(entry.bg.clone()),
                    border: Some(format!("2px solid {}", entry.border)),
                    border_radius: Some("10px".to_string()),
                    padding: Some("12px 14px 12px 50px".to_string()),
                    num_bg: Some(entry.num_bg.clone()),
                    num_color: Some(entry.num_color.clone()),
                    ..Default::default()
                };
                let chars = text.chars().count();
                let block = make(ids, BlockKind::Step, format!("STEP {number}|{text}"), x, w, style);
                (block, sizing::block_height(BlockKind::Step, chars))
            }

            Line::Summary(text) => {
                let s = &theme.summary_style;
                let style = BlockStyle {
                    background: Some(s.bg.clone()),
                    color: Some(s.color.to_string()),
                    border_left: Some(format!("5px solid {}", s.border)),
                    border_radius: Some("8px".to_string()),
                    padding: Some("14px 16px".to_string()),
                    ..Default::default()
                };
                let chars = text.chars().count();
                let content = format!("{} Key Summary|{text}", s.icon);
                let block = make(ids, BlockKind::Summary, content, x, w, style);
                (block, sizing::block_height(BlockKind::Summary, chars))
            }

            Line::BigQuote(text) => {
                let q = crate::theme::QUOTE_BOX_STYLE;
                let style = BlockStyle {
                    background: Some(q.bg.to_string()),
                    color: Some(q.color.to_string()),
                    border_left: Some(format!("4px solid {}", q.border)),
                    border_radius: Some("8px".to_string()),
                    padding: Some("16px 16px 16px 40px".to_string()),
                    font_style: Some("italic".to_string()),
                    ..Default::default()
                };
                let chars = text.chars().count();
                let block = make(ids, BlockKind::BigQuote, text.to_string(), x, w, style);
                (block, sizing::block_height(BlockKind::BigQuote, chars))
            }

            Line::Checklist(text) => {
                let c = &theme.checklist_style;
                let style = BlockStyle {
                    background: Some(c.bg.clone()),
                    color: Some(c.text_color.clone()),
                    padding: Some("6px 12px".to_string()),
                    border_radius: Some("6px".to_string()),
                    ..Default::default()
                };
                let block =
                    make(ids, BlockKind::ChecklistItem, format!("✅ {text}"), x, w, style);
                (block, sizing::block_height(BlockKind::ChecklistItem, 0))
            }

            Line::Highlight(text) => {
                let entry =
                    &theme.highlight_styles[cycles.highlight % theme.highlight_styles.len()];
                cycles.highlight += 1;
                let style = BlockStyle {
                    background: Some(entry.bg.clone()),
                    color: Some(entry.color.clone()),
                    padding: Some("10px 14px".to_string()),
                    border_radius: Some("20px".to_string()),
                    font_weight: Some("600".to_string()),
                    text_align: Some(TextAlign::Center),
                    ..Default::default()
                };
                let chars = text.chars().count();
                let content = format!("{} {text}", entry.icon);
                let block = make(ids, BlockKind::Highlight, content, x, w, style);
                (block, sizing::block_height(BlockKind::Highlight, chars))
            }

            Line::Callout { variant, text } => {
                let c = theme.callout_style(variant);
                let style = BlockStyle {
                    background: Some(c.bg.clone()),
                    border_left: Some(format!("4px solid {}", c.border)),
                    color: Some(c.color.clone()),
                    padding: Some("12px 14px".to_string()),
                    border_radius: Some("6px".to_string()),
                    ..Default::default()
                };
                let kind = BlockKind::Callout(variant);
                let chars = text.chars().count();
                let block = make(ids, kind, format!("{} {text}", c.icon), x, w, style);
                (block, sizing::block_height(kind, chars))
            }

            Line::ListItem(text) => {
                let block = make(
                    ids,
                    BlockKind::ListItem,
                    text.to_string(),
                    x,
                    w,
                    BlockStyle::default(),
                );
                (block, sizing::block_height(BlockKind::ListItem, 0))
            }

            Line::ImagePlaceholder(desc) => {
                let style = BlockStyle {
                    background: Some("#f1f5f9".to_string()),
                    border: Some("2px dashed #94a3b8".to_string()),
                    border_radius: Some("8px".to_string()),
                    padding: Some("20px".to_string()),
                    text_align: Some(TextAlign::Center),
                    color: Some("#64748b".to_string()),
                    ..Default::default()
                };
                let content = format!("📷 Image area\n{desc}");
                let block = make(
                    ids,
                    BlockKind::ImagePlaceholder,
                    content,
                    x + 20.0,
                    w - 40.0,
                    style,
                );
                (block, sizing::block_height(BlockKind::ImagePlaceholder, 0))
            }

            Line::Paragraph(text) => {
                let style = BlockStyle {
                    color: Some("#2d3748".to_string()),
                    ..Default::default()
                };
                let chars = text.chars().count();
                let block = make(ids, BlockKind::Paragraph, text.to_string(), x, w, style);
                (block, sizing::block_height(BlockKind::Paragraph, chars))
            }

            // Handled by the caller before build_block.
            Line::TableRow(_) | Line::TableSeparator => unreachable!("table lines are buffered"),
        }
    }
}
