//! # Line Classifier
//!
//! Turns one trimmed, non-empty source line into a tagged [`Line`] variant.
//!
//! Classification is an explicit ordered list of predicate checks — first
//! match wins, evaluated top to bottom exactly as documented on
//! [`classify`]. The classifier is referentially transparent: no state, no
//! side effects, the same line always yields the same variant. Which
//! *palette entry* a heading eventually gets is the flow engine's concern,
//! not the classifier's.

use crate::model::CalloutVariant;

/// A classified source line. Payloads borrow from the input line except
/// where marker stripping forces an owned string.
#[derive(Debug, Clone, PartialEq)]
pub enum Line<'a> {
    /// `---`, `***`, or `___`.
    Divider,
    /// `# ` book title.
    Title(&'a str),
    /// `## ` chapter heading.
    Chapter(&'a str),
    /// `### ` subheading.
    Subheading(&'a str),
    /// `[STEP n]` box. The number also selects the palette entry.
    Step { number: u32, text: &'a str },
    /// `[SUMMARY]` box.
    Summary(&'a str),
    /// `[QUOTE]` pull-quote box.
    BigQuote(&'a str),
    /// `[x]` / `[✓]` checklist entry.
    Checklist(&'a str),
    /// `[HIGHLIGHT]` banner.
    Highlight(&'a str),
    /// `> ` callout with its keyword-derived subtype.
    Callout { variant: CalloutVariant, text: &'a str },
    /// `- ` or `N.` list entry; the payload keeps its marker.
    ListItem(&'a str),
    /// `[IMAGE: …]` placeholder (or the localized `[이미지: …]` form),
    /// stripped down to the description.
    ImagePlaceholder(String),
    /// `|`-delimited table row, split into trimmed non-empty cells.
    TableRow(Vec<String>),
    /// A table row consisting only of separator punctuation (or with no
    /// cells at all). Discarded without flushing the table buffer.
    TableSeparator,
    /// Anything else.
    Paragraph(&'a str),
}

/// Classify one trimmed, non-empty line. Precedence, first match wins:
///
/// 1. divider markers `---` / `***` / `___`
/// 2. `# ` title
/// 3. `## ` chapter
/// 4. `### ` subheading
/// 5. `[STEP n]` (case-insensitive; `[STEP]` without a number falls through)
/// 6. `[SUMMARY]`
/// 7. `[QUOTE]`
/// 8. `[x]` / `[✓]`
/// 9. `[HIGHLIGHT]`
/// 10. `> ` callout, sub-classified by payload keywords
/// 11. `- ` or `N.` list item
/// 12. `[IMAGE:` / `[이미지:` placeholder
/// 13. `|` table row (separator rows discarded)
/// 14. plain paragraph
pub fn classify(trimmed: &str) -> Line<'_> {
    if trimmed == "---" || trimmed == "***" || trimmed == "___" {
        return Line::Divider;
    }
    if let Some(rest) = trimmed.strip_prefix("# ") {
        return Line::Title(rest);
    }
    if let Some(rest) = trimmed.strip_prefix("## ") {
        return Line::Chapter(rest);
    }
    if let Some(rest) = trimmed.strip_prefix("### ") {
        return Line::Subheading(rest);
    }
    if let Some((number, text)) = parse_step(trimmed) {
        return Line::Step { number, text };
    }
    if let Some(rest) = strip_tag(trimmed, "[SUMMARY]") {
        return Line::Summary(rest);
    }
    if let Some(rest) = strip_tag(trimmed, "[QUOTE]") {
        return Line::BigQuote(rest);
    }
    if let Some(rest) = strip_tag(trimmed, "[x]").or_else(|| strip_tag(trimmed, "[✓]")) {
        return Line::Checklist(rest);
    }
    if let Some(rest) = strip_tag(trimmed, "[HIGHLIGHT]") {
        return Line::Highlight(rest);
    }
    if let Some(text) = trimmed.strip_prefix("> ") {
        return Line::Callout {
            variant: callout_variant(text),
            text,
        };
    }
    if trimmed.starts_with("- ") || is_numbered_item(trimmed) {
        return Line::ListItem(trimmed);
    }
    if let Some(rest) = trimmed
        .strip_prefix("[IMAGE:")
        .or_else(|| trimmed.strip_prefix("[이미지:"))
    {
        return Line::ImagePlaceholder(rest.replace(']', "").trim().to_string());
    }
    if trimmed.starts_with('|') {
        if trimmed.contains("---") || trimmed.contains(":-") {
            return Line::TableSeparator;
        }
        let cells: Vec<String> = trimmed
            .split('|')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect();
        if cells.is_empty() {
            return Line::TableSeparator;
        }
        return Line::TableRow(cells);
    }
    Line::Paragraph(trimmed)
}

/// Pick the callout subtype by scanning the payload for keyword
/// substrings, case-insensitively. The lists carry Korean keywords
/// alongside their English equivalents; order matters, tip is the
/// fallback.
pub fn callout_variant(text: &str) -> CalloutVariant {
    const IMPORTANT: &[&str] = &["important", "warning", "중요", "주의", "경고"];
    const EXAMPLE: &[&str] = &["example", "예시", "사례", "예를 들"];
    const DATA: &[&str] = &["data", "statistic", "research", "%", "데이터", "통계", "연구"];
    const NOTE: &[&str] = &["note", "memo", "참고", "노트", "메모"];

    let lower = text.to_lowercase();
    let hit = |keys: &[&str]| keys.iter().any(|k| lower.contains(k));

    if hit(IMPORTANT) {
        CalloutVariant::Important
    } else if hit(EXAMPLE) {
        CalloutVariant::Example
    } else if hit(DATA) {
        CalloutVariant::Data
    } else if hit(NOTE) {
        CalloutVariant::Note
    } else {
        CalloutVariant::Tip
    }
}

/// Strip an ASCII bracket tag (case-insensitive) plus any following
/// whitespace. `[✓]` sneaks through because the comparison is bytewise
/// on equal-length prefixes.
fn strip_tag<'a>(line: &'a str, tag: &str) -> Option<&'a str> {
    if line.len() < tag.len() || !line.is_char_boundary(tag.len()) {
        return None;
    }
    let (head, rest) = line.split_at(tag.len());
    if head.eq_ignore_ascii_case(tag) {
        Some(rest.trim_start())
    } else {
        None
    }
}

/// Parse `[STEP n]` (case-insensitive, optional spaces before the number).
/// Returns the number and the remaining text.
fn parse_step(line: &str) -> Option<(u32, &str)> {
    let rest = line
        .get(..5)
        .filter(|head| head.eq_ignore_ascii_case("[STEP"))
        .map(|_| &line[5..])?;
    let rest = rest.trim_start_matches(' ');
    let digits_end = rest.find(|c: char| !c.is_ascii_digit())?;
    if digits_end == 0 || !rest[digits_end..].starts_with(']') {
        return None;
    }
    let number: u32 = rest[..digits_end].parse().ok()?;
    Some((number, rest[digits_end + 1..].trim_start()))
}

/// Leading integer immediately followed by a dot, e.g. `3. Do the thing`.
fn is_numbered_item(line: &str) -> bool {
    let digits = line.bytes().take_while(|b| b.is_ascii_digit()).count();
    digits > 0 && line.as_bytes().get(digits) == Some(&b'.')
}
