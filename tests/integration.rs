//! Integration tests for the Bookflow flow engine.
//!
//! These tests exercise the full path from tagged text to the page list.
//! They verify:
//! - Determinism and prefix stability under streaming re-runs
//! - Page breaks happen at the right places and nothing overflows
//! - Table runs merge into one atomic block
//! - Palette cycling and contrast selection
//! - The JSON request boundary

use pretty_assertions::assert_eq;

use bookflow::layout::sizing;
use bookflow::model::{Block, BlockKind, CalloutVariant, Page, PageMetrics};
use bookflow::paginate;
use bookflow::theme::{luminance, Theme};

// ─── Helpers ────────────────────────────────────────────────────

fn default_theme() -> Theme {
    Theme::new("#1e3a5f")
}

fn flow(text: &str) -> Vec<Page> {
    paginate(text, &default_theme(), PageMetrics::new(500.0, 700.0))
}

fn content_blocks(pages: &[Page]) -> Vec<&Block> {
    pages.iter().skip(1).flat_map(|p| p.blocks.iter()).collect()
}

/// Geometry signature of a block, ignoring identifiers.
fn signature(b: &Block) -> (BlockKind, String, f64, f64, f64) {
    (b.kind, b.content.clone(), b.x, b.y, b.width)
}

/// Recover a block's estimated height from its payload, undoing the
/// decoration the flow engine applied. Mirrors the public box sizer.
fn estimated_height(block: &Block) -> f64 {
    let payload_chars = match block.kind {
        BlockKind::Step | BlockKind::Summary => block
            .content
            .split_once('|')
            .map(|(_, body)| body.chars().count())
            .unwrap_or(0),
        BlockKind::Callout(_) | BlockKind::Highlight => block
            .content
            .split_once(' ')
            .map(|(_, body)| body.chars().count())
            .unwrap_or(0),
        _ => block.content.chars().count(),
    };
    if block.kind == BlockKind::Table {
        let rows = block.content.matches("<tr").count();
        sizing::table_height(rows)
    } else {
        sizing::block_height(block.kind, payload_chars)
    }
}

// ─── Determinism & streaming re-derivation ──────────────────────

#[test]
fn test_repeated_runs_are_identical() {
    let text = "# T\n\n## C\n\npara one\n\n> note: remember\n\n- a\n- b\n";
    let a = flow(text);
    let b = flow(text);
    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        serde_json::to_string(&b).unwrap()
    );
}

#[test]
fn test_prefix_blocks_do_not_drift_as_text_streams_in() {
    let prefix = "# Title\n\n## Chapter 1\n\nFirst paragraph of the book.\n";
    let more = "\nSecond paragraph.\n\n[STEP 1] Do the thing.\n\n## Chapter 2\n\nMore prose.\n";

    let short_run = flow(prefix);
    let long_run = flow(&format!("{prefix}{more}"));

    let short_sigs: Vec<_> = content_blocks(&short_run).iter().map(|b| signature(b)).collect();
    let long_sigs: Vec<_> = content_blocks(&long_run).iter().map(|b| signature(b)).collect();

    assert!(long_sigs.len() > short_sigs.len());
    assert_eq!(
        &long_sigs[..short_sigs.len()],
        &short_sigs[..],
        "earlier blocks must keep their geometry as later text arrives"
    );
}

#[test]
fn test_sentinel_page_is_always_first_and_empty() {
    for text in ["", "hello", "# T\n\nbody\n", "| a |\n| b |"] {
        let pages = flow(text);
        assert!(!pages.is_empty());
        assert!(pages[0].blocks.is_empty(), "sentinel must be empty for {text:?}");
    }
}

// ─── Overflow invariant ─────────────────────────────────────────

#[test]
fn test_no_block_crosses_the_content_floor_unless_alone() {
    // A long mixed document that forces several page breaks.
    let mut text = String::from("# The Long Haul\n\n");
    for i in 0..12 {
        text.push_str(&format!("## Chapter {i}\n\n"));
        text.push_str("A paragraph of reasonable length that takes up a couple of lines once wrapped by the sizer.\n\n");
        text.push_str(&format!("[STEP {}] Work through the step text carefully.\n\n", i + 1));
        text.push_str("> important: density check\n\n");
        text.push_str("- item one\n- item two\n\n");
    }

    let metrics = PageMetrics::new(500.0, 700.0);
    let pages = paginate(&text, &default_theme(), metrics);
    assert!(pages.len() > 3, "document should span several pages");

    for page in pages.iter().skip(1) {
        for (i, block) in page.blocks.iter().enumerate() {
            let bottom = block.y + estimated_height(block);
            if page.blocks.len() == 1 && i == 0 {
                continue; // sole block may legitimately overflow
            }
            assert!(
                bottom <= metrics.content_floor() + 1e-9,
                "block {} ({:?}) on {} ends at {bottom}, past the floor {}",
                block.id,
                block.kind,
                page.id,
                metrics.content_floor()
            );
        }
    }
}

#[test]
fn test_blocks_belong_to_exactly_one_page() {
    let text = "# T\n\n".to_string() + &"a paragraph\n\n".repeat(80);
    let pages = flow(&text);
    let mut seen = std::collections::HashSet::new();
    for page in &pages {
        for block in &page.blocks {
            assert!(seen.insert(block.id.clone()), "block {} appears twice", block.id);
        }
    }
}

// ─── Table atomicity ────────────────────────────────────────────

#[test]
fn test_three_table_rows_become_one_block_before_the_paragraph() {
    let text = "| h1 | h2 |\n| a | b |\n| c | d |\nClosing remark.";
    let pages = flow(text);
    let blocks = content_blocks(&pages);

    let tables: Vec<_> = blocks.iter().filter(|b| b.kind == BlockKind::Table).collect();
    assert_eq!(tables.len(), 1, "three rows must merge into one table block");
    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[0].kind, BlockKind::Table);
    assert_eq!(blocks[1].kind, BlockKind::Paragraph);
    assert!(blocks[0].y < blocks[1].y);
}

#[test]
fn test_tall_table_moves_whole_to_next_page() {
    // Fill most of the page, then a table too tall for the space left.
    let mut text = String::from("# T\n\n");
    for _ in 0..8 {
        text.push_str("filler paragraph\n\n");
    }
    for i in 0..8 {
        text.push_str(&format!("| row {i} | value {i} |\n"));
    }

    let metrics = PageMetrics::new(500.0, 400.0);
    let pages = paginate(&text, &default_theme(), metrics);
    let table_pages: Vec<_> = pages
        .iter()
        .skip(1)
        .filter(|p| p.blocks.iter().any(|b| b.kind == BlockKind::Table))
        .collect();
    assert_eq!(table_pages.len(), 1, "the table must live on exactly one page");
    let table = table_pages[0]
        .blocks
        .iter()
        .find(|b| b.kind == BlockKind::Table)
        .unwrap();
    assert_eq!(table.content.matches("<tr").count(), 8, "no rows may be lost");
}

#[test]
fn test_separator_row_does_not_split_the_table() {
    let text = "| a | b |\n|---|---|\n| 1 | 2 |\n";
    let pages = flow(text);
    let blocks = content_blocks(&pages);
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].content.matches("<tr").count(), 2);
}

// ─── Divider ────────────────────────────────────────────────────

#[test]
fn test_divider_between_paragraphs() {
    let pages = flow("first paragraph\n\n---\n\nsecond paragraph\n");
    let blocks = content_blocks(&pages);
    let kinds: Vec<_> = blocks.iter().map(|b| b.kind).collect();
    assert_eq!(
        kinds,
        vec![BlockKind::Paragraph, BlockKind::Divider, BlockKind::Paragraph],
        "the divider line must not produce a paragraph block"
    );
    assert!(
        sizing::margin_above(BlockKind::Divider, Some(BlockKind::Paragraph))
            > sizing::margin_above(BlockKind::Paragraph, Some(BlockKind::Paragraph))
    );
}

// ─── Theme-driven styling ───────────────────────────────────────

#[test]
fn test_five_chapters_cycle_through_the_four_entry_palette() {
    let theme = default_theme();
    let pages = paginate(
        "## A\n## B\n## C\n## D\n## E\n",
        &theme,
        PageMetrics::new(500.0, 700.0),
    );
    let blocks = content_blocks(&pages);
    let backgrounds: Vec<_> = blocks
        .iter()
        .map(|b| b.style.background.clone().unwrap())
        .collect();
    let expected: Vec<_> = [0, 1, 2, 3, 0]
        .iter()
        .map(|&i| theme.chapter_styles[i].background.clone())
        .collect();
    assert_eq!(backgrounds, expected);
}

#[test]
fn test_chapter_gradient_text_follows_main_luminance() {
    // Pale main color: dark text on the gradient entry.
    let light = Theme::new("#fef08a");
    assert!(luminance("#fef08a") > 0.4);
    let pages = paginate("## C\n", &light, PageMetrics::new(500.0, 700.0));
    assert_eq!(
        content_blocks(&pages)[0].style.color.as_deref(),
        Some("#1a202c")
    );

    // Navy main color: light text.
    let dark = Theme::new("#1e3a5f");
    assert!(luminance("#1e3a5f") < 0.4);
    let pages = paginate("## C\n", &dark, PageMetrics::new(500.0, 700.0));
    assert_eq!(
        content_blocks(&pages)[0].style.color.as_deref(),
        Some("#ffffff")
    );
}

#[test]
fn test_highlight_styles_cycle_deterministically() {
    let theme = default_theme();
    let pages = paginate(
        "[HIGHLIGHT] one\n[HIGHLIGHT] two\n[HIGHLIGHT] three\n[HIGHLIGHT] four\n",
        &theme,
        PageMetrics::new(500.0, 700.0),
    );
    let blocks = content_blocks(&pages);
    assert_eq!(
        blocks[0].style.background, blocks[3].style.background,
        "the three-entry highlight palette must wrap at the fourth use"
    );
    assert_ne!(blocks[0].style.background, blocks[1].style.background);
}

// ─── The documented example run ─────────────────────────────────

#[test]
fn test_example_run_breaks_after_three_blocks() {
    // A 500x250 page box admits the title, chapter, and paragraph, but
    // not the callout: 0.06·250 = 15 start, 0.85·250 = 212.5 floor.
    let text = "# Title\n\n## Chapter 1\n\nHello world.\n\n> important: watch out\n";
    let pages = paginate(text, &default_theme(), PageMetrics::new(500.0, 250.0));

    assert_eq!(pages.len(), 3);
    assert!(pages[0].blocks.is_empty(), "page 1 is the sentinel");

    let kinds: Vec<_> = pages[1].blocks.iter().map(|b| b.kind).collect();
    assert_eq!(
        kinds,
        vec![
            BlockKind::HeadingTitle,
            BlockKind::HeadingChapter,
            BlockKind::Paragraph
        ]
    );

    assert_eq!(pages[2].blocks.len(), 1);
    assert_eq!(
        pages[2].blocks[0].kind,
        BlockKind::Callout(CalloutVariant::Important),
        "the callout text contains the `important` keyword"
    );
}

// ─── Totality ───────────────────────────────────────────────────

#[test]
fn test_hostile_input_never_panics_or_malforms() {
    let nasty = [
        "[STEP ] broken",
        "[STEP 99999999999999999999] overflowing digits",
        "|||||",
        "| --- |",
        ">",
        "######",
        "[IMAGE:]",
        "[이미지:",
        "---extra",
        "\u{0}\u{1}binary-ish\u{7f}",
        "🎯🎯🎯 emoji soup ✓ [x✓] [ ]",
    ]
    .join("\n");

    let pages = flow(&nasty);
    assert!(pages[0].blocks.is_empty());
    // Every non-blank line must have become some block (or table content),
    // never vanished into an error.
    assert!(content_blocks(&pages).len() > 5);
}
