//! Renderers for a [`ComparisonMatrix`].
//!
//! Converts the display model into a fixed-width text table for terminals or an
//! HTML table for embedding in a page. Rows whose values differ are flagged
//! (`*` in text, `class="differs"` in HTML) so the reader's eye lands on them.

use unicode_width::UnicodeWidthStr;

use crate::matrix::{Column, ComparisonMatrix};

const PLACEHOLDER_TITLE: &str = "Add another vehicle";
const DIFF_MARKER: &str = "*";
const COLUMN_GAP: &str = " | ";

/// Render the matrix as an aligned text table.
pub fn render_text(matrix: &ComparisonMatrix) -> String {
    let names: Vec<String> = matrix
        .columns
        .iter()
        .map(|c| match c {
            Column::Vehicle(col) => col.name.clone(),
            Column::Placeholder => PLACEHOLDER_TITLE.to_string(),
        })
        .collect();
    let subtitles: Vec<String> = matrix
        .columns
        .iter()
        .map(|c| match c {
            Column::Vehicle(col) => format!("{} · {}", col.brand, col.price),
            Column::Placeholder => String::new(),
        })
        .collect();

    let label_width = matrix
        .rows
        .iter()
        .map(|r| r.label.width())
        .max()
        .unwrap_or(0)
        .max("Products".width());

    let widths: Vec<usize> = (0..matrix.columns.len())
        .map(|i| {
            let header = names[i].width().max(subtitles[i].width());
            matrix
                .rows
                .iter()
                .filter_map(|r| r.cells.get(i))
                .map(|c| c.text.width())
                .fold(header, usize::max)
        })
        .collect();

    let mut out = String::new();
    out.push_str(&matrix.title());
    out.push('\n');

    push_line(&mut out, " ", &pad("Products", label_width), &names, &widths);
    push_line(&mut out, " ", &pad("", label_width), &subtitles, &widths);

    let rule_len = 2 + label_width + widths.iter().map(|w| w + COLUMN_GAP.len()).sum::<usize>();
    out.push_str(&"-".repeat(rule_len));
    out.push('\n');

    for row in &matrix.rows {
        let marker = if row.differs() { DIFF_MARKER } else { " " };
        let cells: Vec<String> = row.cells.iter().map(|c| c.text.clone()).collect();
        push_line(&mut out, marker, &pad(&row.label, label_width), &cells, &widths);
    }

    if matrix.rows.is_empty() {
        out.push_str("  (no differences)\n");
    }
    out
}

fn push_line(out: &mut String, marker: &str, label: &str, cells: &[String], widths: &[usize]) {
    let mut line = format!("{marker} {label}");
    for (cell, width) in cells.iter().zip(widths) {
        line.push_str(COLUMN_GAP);
        line.push_str(&pad(cell, *width));
    }
    out.push_str(line.trim_end());
    out.push('\n');
}

/// Left-align `s` in a field `width` display columns wide.
fn pad(s: &str, width: usize) -> String {
    let fill = width.saturating_sub(s.width());
    format!("{s}{}", " ".repeat(fill))
}

/// Render the matrix as an HTML table.
pub fn render_html(matrix: &ComparisonMatrix) -> String {
    let mut html = String::from("<table class=\"comparison-matrix\">\n");
    html.push_str(&format!(
        "<caption>{}</caption>\n<thead><tr>\n  <th>Products</th>\n",
        escape_html(&matrix.title())
    ));
    for column in &matrix.columns {
        match column {
            Column::Vehicle(col) => {
                html.push_str(&format!(
                    "  <th data-vehicle-id=\"{}\">",
                    escape_html(&col.id)
                ));
                if let Some(src) = &col.thumbnail {
                    html.push_str(&format!(
                        "<img src=\"{}\" alt=\"{}\">",
                        escape_html(src),
                        escape_html(&col.name)
                    ));
                }
                html.push_str(&format!(
                    "<div class=\"name\">{}</div><div class=\"brand\">{}</div><div class=\"price\">{}</div></th>\n",
                    escape_html(&col.name),
                    escape_html(&col.brand),
                    escape_html(&col.price)
                ));
            }
            Column::Placeholder => {
                html.push_str(&format!(
                    "  <th class=\"placeholder\">{PLACEHOLDER_TITLE}</th>\n"
                ));
            }
        }
    }
    html.push_str("</tr></thead>\n<tbody>\n");

    for row in &matrix.rows {
        if row.differs() {
            html.push_str(&format!(
                "<tr class=\"differs\" data-key=\"{}\">\n",
                escape_html(&row.key)
            ));
        } else {
            html.push_str(&format!("<tr data-key=\"{}\">\n", escape_html(&row.key)));
        }
        html.push_str(&format!("  <th>{}</th>\n", escape_html(&row.label)));
        for cell in &row.cells {
            if cell.placeholder {
                html.push_str(&format!(
                    "  <td class=\"placeholder\">{}</td>\n",
                    escape_html(&cell.text)
                ));
            } else {
                html.push_str(&format!("  <td>{}</td>\n", escape_html(&cell.text)));
            }
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</tbody>\n</table>");
    html
}

/// Escape HTML special characters.
/// Escape text for element content and double- or single-quoted attributes.
fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
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
