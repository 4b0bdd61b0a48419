//! # Theme Resolver
//!
//! Pure color math plus the derived palettes that style every block kind.
//!
//! A theme is seeded by two colors: a main color (chapter headings, step
//! boxes, summary boxes) and an accent color (subheadings, callouts,
//! highlights, checklists). When the caller picks only a main color, the
//! accent is derived as its complement: rotate the hue by a half turn,
//! boost saturation, and clamp lightness into a readable mid-range.
//!
//! The chapter, step, subheading, and highlight palettes are cyclic — the
//! flow engine indexes them with running counters so the rotation is
//! continuous across the whole document, not per page.

/// Preset main seed colors offered to callers, as `(hex, name)` pairs.
pub const PRESET_MAIN_COLORS: [(&str, &str); 8] = [
    ("#1e3a5f", "Navy"),
    ("#166534", "Forest Green"),
    ("#7c3aed", "Royal Purple"),
    ("#0369a1", "Ocean Blue"),
    ("#374151", "Charcoal"),
    ("#b45309", "Gold"),
    ("#0d9488", "Teal"),
    ("#4338ca", "Indigo"),
];

/// Relative-luminance threshold above which dark text is used.
const CONTRAST_THRESHOLD: f64 = 0.4;

const DARK_TEXT: &str = "#1a202c";
const LIGHT_TEXT: &str = "#ffffff";

// ── Color primitives ────────────────────────────────────────────

/// Parse a `#rrggbb` hex color (leading `#` optional). Strict: returns
/// `None` on anything that is not exactly six hex digits.
pub fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}

/// Lenient variant used inside the transform: the engine is total over its
/// input, so unparseable colors degrade to black instead of failing.
pub fn hex_to_rgb(hex: &str) -> (u8, u8, u8) {
    parse_hex(hex).unwrap_or((0, 0, 0))
}

/// Format an RGB triple as `#rrggbb`, clamping and rounding each channel.
pub fn rgb_to_hex(r: f64, g: f64, b: f64) -> String {
    let clamp = |v: f64| v.round().clamp(0.0, 255.0) as u8;
    format!("#{:02x}{:02x}{:02x}", clamp(r), clamp(g), clamp(b))
}

/// Relative luminance per the sRGB gamma curve (WCAG weights).
pub fn luminance(hex: &str) -> f64 {
    let (r, g, b) = hex_to_rgb(hex);
    let lin = |c: u8| {
        let c = c as f64 / 255.0;
        if c <= 0.03928 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    0.2126 * lin(r) + 0.7152 * lin(g) + 0.0722 * lin(b)
}

/// Pick a readable text color for the given background.
pub fn contrast_color(bg: &str) -> &'static str {
    if luminance(bg) > CONTRAST_THRESHOLD {
        DARK_TEXT
    } else {
        LIGHT_TEXT
    }
}

/// Blend a color toward white by `percent` (0–100).
pub fn lighten(hex: &str, percent: f64) -> String {
    let (r, g, b) = hex_to_rgb(hex);
    let up = |c: u8| c as f64 + (255.0 - c as f64) * (percent / 100.0);
    rgb_to_hex(up(r), up(g), up(b))
}

/// Blend a color toward black by `percent` (0–100).
pub fn darken(hex: &str, percent: f64) -> String {
    let (r, g, b) = hex_to_rgb(hex);
    let down = |c: u8| c as f64 * (1.0 - percent / 100.0);
    rgb_to_hex(down(r), down(g), down(b))
}

/// Derive the complementary accent color from a main seed: hue rotated by
/// a half turn, saturation boosted (`s·1.3 + 0.2`, capped at 1), lightness
/// clamped into `[0.3, 0.6]`.
pub fn accent_from_main(main: &str) -> String {
    let (r8, g8, b8) = hex_to_rgb(main);
    let (r, g, b) = (r8 as f64 / 255.0, g8 as f64 / 255.0, b8 as f64 / 255.0);

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;
    let mut h = 0.0;
    let mut s = 0.0;
    if max != min {
        let d = max - min;
        s = if l > 0.5 { d / (2.0 - max - min) } else { d / (max + min) };
        h = if max == r {
            ((g - b) / d + if g < b { 6.0 } else { 0.0 }) / 6.0
        } else if max == g {
            ((b - r) / d + 2.0) / 6.0
        } else {
            ((r - g) / d + 4.0) / 6.0
        };
    }

    let h = (h + 0.5) % 1.0;
    let s = (s * 1.3 + 0.2).min(1.0);
    let l = l.clamp(0.3, 0.6);

    let hue = |p: f64, q: f64, mut t: f64| {
        if t < 0.0 {
            t += 1.0;
        }
        if t > 1.0 {
            t -= 1.0;
        }
        if t < 1.0 / 6.0 {
            p + (q - p) * 6.0 * t
        } else if t < 0.5 {
            q
        } else if t < 2.0 / 3.0 {
            p + (q - p) * (2.0 / 3.0 - t) * 6.0
        } else {
            p
        }
    };

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    rgb_to_hex(
        hue(p, q, h + 1.0 / 3.0) * 255.0,
        hue(p, q, h) * 255.0,
        hue(p, q, h - 1.0 / 3.0) * 255.0,
    )
}

// ── Derived palettes ────────────────────────────────────────────

/// One entry of the four-way chapter heading palette.
#[derive(Debug, Clone, PartialEq)]
pub struct ChapterStyle {
    pub background: String,
    pub color: String,
    pub border_left: Option<String>,
    pub border_bottom: Option<String>,
    pub border_radius: &'static str,
}

/// Colors and icon for one callout subtype.
#[derive(Debug, Clone, PartialEq)]
pub struct CalloutStyle {
    pub bg: String,
    pub border: String,
    pub color: String,
    pub icon: &'static str,
}

/// One entry of the four-way step box palette. The badge (`num_*`) holds
/// the step number.
#[derive(Debug, Clone, PartialEq)]
pub struct StepStyle {
    pub num_bg: String,
    pub num_color: String,
    pub bg: String,
    pub border: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryStyle {
    pub bg: String,
    pub color: &'static str,
    pub border: String,
    pub icon: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChecklistStyle {
    pub bg: String,
    pub check_color: String,
    pub text_color: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HighlightStyle {
    pub bg: String,
    pub color: String,
    pub icon: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubheadingStyle {
    pub color: String,
    pub border_left: String,
}

/// The big-quote box never varies with the seed colors.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteStyle {
    pub bg: &'static str,
    pub color: &'static str,
    pub border: &'static str,
}

pub const QUOTE_BOX_STYLE: QuoteStyle = QuoteStyle {
    bg: "#f8fafc",
    color: "#475569",
    border: "#94a3b8",
};

/// The pair of seed colors and every palette derived from them.
///
/// Construction is the only non-trivial work; lookups afterwards are
/// plain indexing, so a `Theme` is built once per transform invocation.
#[derive(Debug, Clone)]
pub struct Theme {
    pub main: String,
    pub accent: String,
    pub chapter_styles: [ChapterStyle; 4],
    pub step_styles: [StepStyle; 4],
    pub subheading_styles: [SubheadingStyle; 4],
    pub highlight_styles: [HighlightStyle; 3],
    pub summary_style: SummaryStyle,
    pub checklist_style: ChecklistStyle,
    tip: CalloutStyle,
    important: CalloutStyle,
    example: CalloutStyle,
    data: CalloutStyle,
    note: CalloutStyle,
}

impl Theme {
    /// Build a theme from a main seed color, deriving the accent.
    pub fn new(main: &str) -> Self {
        let accent = accent_from_main(main);
        Self::with_accent(main, &accent)
    }

    /// Build a theme from explicit main and accent seed colors.
    pub fn with_accent(main: &str, accent: &str) -> Self {
        let chapter_styles = [
            ChapterStyle {
                background: format!(
                    "linear-gradient(135deg, {}, {})",
                    main,
                    lighten(main, 25.0)
                ),
                color: contrast_color(main).to_string(),
                border_left: None,
                border_bottom: None,
                border_radius: "6px",
            },
            ChapterStyle {
                background: "#f8f9fa".to_string(),
                color: "#2d3748".to_string(),
                border_left: Some(format!("5px solid {main}")),
                border_bottom: None,
                border_radius: "0",
            },
            ChapterStyle {
                background: "transparent".to_string(),
                color: "#1a202c".to_string(),
                border_left: None,
                border_bottom: Some(format!("2px solid {main}")),
                border_radius: "0",
            },
            ChapterStyle {
                background: lighten(main, 85.0),
                color: darken(main, 10.0),
                border_left: None,
                border_bottom: None,
                border_radius: "6px",
            },
        ];

        let badge = |c: &str| (c.to_string(), contrast_color(c).to_string());
        let (b1, f1) = badge(main);
        let lighter = lighten(main, 20.0);
        let (b2, f2) = badge(&lighter);
        let darker = darken(main, 10.0);
        let (b3, f3) = badge(&darker);
        let step_styles = [
            StepStyle {
                num_bg: b1.clone(),
                num_color: f1.clone(),
                bg: lighten(main, 90.0),
                border: main.to_string(),
            },
            StepStyle {
                num_bg: b2,
                num_color: f2,
                bg: lighten(main, 92.0),
                border: lighter.clone(),
            },
            StepStyle {
                num_bg: b3,
                num_color: f3,
                bg: lighten(main, 88.0),
                border: darker.clone(),
            },
            StepStyle {
                num_bg: b1,
                num_color: f1,
                bg: lighten(main, 85.0),
                border: main.to_string(),
            },
        ];

        let subheading_styles = [
            SubheadingStyle {
                color: accent.to_string(),
                border_left: format!("3px solid {accent}"),
            },
            SubheadingStyle {
                color: darken(accent, 10.0),
                border_left: format!("3px solid {}", darken(accent, 10.0)),
            },
            SubheadingStyle {
                color: lighten(accent, 10.0),
                border_left: format!("3px solid {}", lighten(accent, 10.0)),
            },
            SubheadingStyle {
                color: accent.to_string(),
                border_left: format!("3px solid {accent}"),
            },
        ];

        let grad90 = |hi: f64, lo: f64| {
            format!(
                "linear-gradient(90deg, {}, {})",
                lighten(accent, hi),
                lighten(accent, lo)
            )
        };
        let highlight_styles = [
            HighlightStyle {
                bg: grad90(70.0, 60.0),
                color: darken(accent, 30.0),
                icon: "⭐",
            },
            HighlightStyle {
                bg: grad90(75.0, 65.0),
                color: darken(accent, 25.0),
                icon: "✨",
            },
            HighlightStyle {
                bg: grad90(80.0, 70.0),
                color: darken(accent, 20.0),
                icon: "🔥",
            },
        ];

        Self {
            chapter_styles,
            step_styles,
            subheading_styles,
            highlight_styles,
            summary_style: SummaryStyle {
                bg: format!(
                    "linear-gradient(135deg, {}, {})",
                    darken(main, 30.0),
                    darken(main, 10.0)
                ),
                color: "#f8fafc",
                border: main.to_string(),
                icon: "🎯",
            },
            checklist_style: ChecklistStyle {
                bg: lighten(accent, 92.0),
                check_color: accent.to_string(),
                text_color: darken(accent, 20.0),
            },
            tip: CalloutStyle {
                bg: "linear-gradient(135deg, #fffbeb, #fef3c7)".to_string(),
                border: "#d97706".to_string(),
                color: "#92400e".to_string(),
                icon: "💡",
            },
            important: CalloutStyle {
                bg: format!(
                    "linear-gradient(135deg, {}, {})",
                    lighten(accent, 90.0),
                    lighten(accent, 80.0)
                ),
                border: accent.to_string(),
                color: darken(accent, 20.0),
                icon: "❗",
            },
            example: CalloutStyle {
                bg: "linear-gradient(135deg, #f0fdf4, #dcfce7)".to_string(),
                border: "#16a34a".to_string(),
                color: "#166534".to_string(),
                icon: "📌",
            },
            data: CalloutStyle {
                bg: "linear-gradient(135deg, #eff6ff, #dbeafe)".to_string(),
                border: "#2563eb".to_string(),
                color: "#1e40af".to_string(),
                icon: "📊",
            },
            note: CalloutStyle {
                bg: "linear-gradient(135deg, #faf5ff, #f3e8ff)".to_string(),
                border: "#9333ea".to_string(),
                color: "#7c3aed".to_string(),
                icon: "📝",
            },
            main: main.to_string(),
            accent: accent.to_string(),
        }
    }

    pub fn callout_style(&self, variant: crate::model::CalloutVariant) -> &CalloutStyle {
        use crate::model::CalloutVariant::*;
        match variant {
            Tip => &self.tip,
            Important => &self.important,
            Example => &self.example,
            Data => &self.data,
            Note => &self.note,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CalloutVariant;

    #[test]
    fn test_parse_hex_strict() {
        assert_eq!(parse_hex("#1e3a5f"), Some((0x1e, 0x3a, 0x5f)));
        assert_eq!(parse_hex("1e3a5f"), Some((0x1e, 0x3a, 0x5f)));
        assert_eq!(parse_hex("#fff"), None);
        assert_eq!(parse_hex("#zzzzzz"), None);
        assert_eq!(parse_hex(""), None);
    }

    #[test]
    fn test_lenient_parse_degrades_to_black() {
        assert_eq!(hex_to_rgb("not-a-color"), (0, 0, 0));
    }

    #[test]
    fn test_lighten_darken_known_values() {
        assert_eq!(lighten("#000000", 50.0), "#808080");
        assert_eq!(darken("#ffffff", 50.0), "#808080");
        assert_eq!(lighten("#123456", 0.0), "#123456");
        assert_eq!(lighten("#123456", 100.0), "#ffffff");
        assert_eq!(darken("#123456", 100.0), "#000000");
    }

    #[test]
    fn test_luminance_extremes() {
        assert!(luminance("#ffffff") > 0.99);
        assert!(luminance("#000000") < 0.01);
    }

    #[test]
    fn test_contrast_selection() {
        assert_eq!(contrast_color("#ffffff"), "#1a202c");
        assert_eq!(contrast_color("#fef08a"), "#1a202c"); // pale yellow
        assert_eq!(contrast_color("#1e3a5f"), "#ffffff"); // navy
        assert_eq!(contrast_color("#000000"), "#ffffff");
    }

    #[test]
    fn test_accent_derivation_is_deterministic_and_valid() {
        for (hex, _) in PRESET_MAIN_COLORS {
            let a = accent_from_main(hex);
            assert!(parse_hex(&a).is_some(), "accent of {hex} is not hex: {a}");
            assert_eq!(a, accent_from_main(hex));
        }
    }

    #[test]
    fn test_accent_rotates_hue() {
        // Pure red complements into the cyan range.
        let a = accent_from_main("#ff0000");
        let (r, g, b) = hex_to_rgb(&a);
        assert!(g > r && b > r, "expected cyan-ish accent, got {a}");
    }

    #[test]
    fn test_grey_main_keeps_zero_hue_path() {
        // max == min leaves hue/saturation at zero before the boost.
        let a = accent_from_main("#808080");
        assert!(parse_hex(&a).is_some());
    }

    #[test]
    fn test_important_callout_derives_from_accent() {
        let theme = Theme::with_accent("#1e3a5f", "#be123c");
        let style = theme.callout_style(CalloutVariant::Important);
        assert_eq!(style.border, "#be123c");
        assert_eq!(style.color, darken("#be123c", 20.0));
        // The other subtypes are fixed regardless of seed.
        assert_eq!(theme.callout_style(CalloutVariant::Data).border, "#2563eb");
    }

    #[test]
    fn test_palette_shapes() {
        let theme = Theme::new("#166534");
        assert_eq!(theme.chapter_styles.len(), 4);
        assert_eq!(theme.step_styles.len(), 4);
        assert_eq!(theme.subheading_styles.len(), 4);
        assert_eq!(theme.highlight_styles.len(), 3);
        assert_eq!(theme.summary_style.icon, "🎯");
    }
}
