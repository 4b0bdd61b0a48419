//! # Table Buffer
//!
//! Consecutive table-row lines are merged into a single composite table
//! block. The buffer holds parsed row-cell arrays while rows keep arriving;
//! the flow engine flushes it on the first non-table line or at end of
//! input. Separator rows never reach the buffer — the classifier discards
//! them without ending the run.

use html_escape::encode_text;

/// Accumulator for the rows of one in-progress table.
#[derive(Debug, Default)]
pub struct TableBuffer {
    rows: Vec<Vec<String>>,
}

impl TableBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, cells: Vec<String>) {
        self.rows.push(cells);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Render the buffered rows as an HTML fragment: bordered table, dark
    /// header row, alternate data-row shading, cell text escaped.
    pub fn render_html(&self) -> String {
        let mut html = String::from(
            "<table style=\"width:100%;border-collapse:collapse;\
             border:1px solid #cbd5e1;border-radius:6px;overflow:hidden;\">",
        );
        for (row_idx, row) in self.rows.iter().enumerate() {
            let is_header = row_idx == 0;
            let bg = if is_header {
                "#1e40af"
            } else if row_idx % 2 == 1 {
                "#f8fafc"
            } else {
                "#ffffff"
            };
            let text_color = if is_header { "#ffffff" } else { "#1e293b" };
            let font_weight = if is_header { "600" } else { "normal" };
            let tag = if is_header { "th" } else { "td" };

            html.push_str(&format!("<tr style=\"background:{bg};\">"));
            for (cell_idx, cell) in row.iter().enumerate() {
                let border_right = if cell_idx < row.len() - 1 {
                    "border-right:1px solid #cbd5e1;"
                } else {
                    ""
                };
                let border_bottom = if row_idx < self.rows.len() - 1 {
                    "border-bottom:1px solid #e2e8f0;"
                } else {
                    ""
                };
                html.push_str(&format!(
                    "<{tag} style=\"padding:8px 12px;text-align:left;color:{text_color};\
                     font-weight:{font_weight};{border_right}{border_bottom}\">{}</{tag}>",
                    encode_text(cell)
                ));
            }
            html.push_str("</tr>");
        }
        html.push_str("</table>");
        html
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }
}
