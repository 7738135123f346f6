//! Terminal code-frame rendering for diagnostics.
//!
//! A frame shows the lines around a diagnostic with the error line marked
//! and a caret run under the offending span:
//!
//! ```text
//! Error in file:///app/src/ComponentOne.vue
//! 2:40 Property 'property' does not exist on type '{ value: number; }'.
//!   0 | <template>
//!   1 |   <div id="app">
//! > 2 |     <p v-for="item in items" :key="item.property">{{ item.value }}</p>
//!     |                                         ^^^^^^^
//!   3 |   </div>
//!   4 | </template>
//! ```

use crate::{Diagnostic, Range, TextDocument};

/// Context lines shown above and below the diagnostic range.
const CONTEXT_LINES: u32 = 2;

/// Inclusive line span rendered for one diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineWindow {
    pub start: u32,
    pub end: u32,
}

/// Window around `range`, clamped to the document's valid lines.
pub fn line_window(range: &Range, line_count: u32) -> LineWindow {
    let last = line_count.saturating_sub(1);
    let start = range.start.line.saturating_sub(CONTEXT_LINES).min(last);
    let end = range
        .end
        .line
        .saturating_add(CONTEXT_LINES)
        .clamp(start, last);
    LineWindow { start, end }
}

fn digits(number: u32) -> usize {
    number.to_string().len()
}

/// One rendered source line: marker, aligned number, separator, code.
pub fn format_line(number: u32, width: usize, code: &str, is_error: bool) -> String {
    let marker = if is_error { '>' } else { ' ' };
    format!("{marker} {number:>width$} | {code}")
}

/// Caret line anchored under the error line's start column.
///
/// A range ending on a later line still anchors to the start line: the caret
/// run extends to the end of that line's text (a deliberate choice, since
/// the end column belongs to a different line). A zero-width range renders a
/// single caret.
pub fn format_cursor(range: &Range, line_len: usize, width: usize) -> String {
    let caret_len = if range.start.line == range.end.line {
        range
            .end
            .character
            .saturating_sub(range.start.character)
            .max(1) as usize
    } else {
        line_len
            .saturating_sub(range.start.character as usize)
            .max(1)
    };

    let mut cursor = " ".repeat(width + 3);
    cursor.push('|');
    cursor.push_str(&" ".repeat(range.start.character as usize + 1));
    cursor.push_str(&"^".repeat(caret_len));
    cursor
}

/// Renders the full frame for one diagnostic: header, message line, and the
/// marked source window.
pub fn render_frame(document: &TextDocument, diagnostic: &Diagnostic) -> String {
    let window = line_window(&diagnostic.range, document.line_count());
    let width = digits(window.end);

    let mut out = String::new();
    out.push_str(&format!("Error in {}\n", document.uri()));
    out.push_str(&format!(
        "{}:{} {}\n",
        diagnostic.range.start.line, diagnostic.range.start.character, diagnostic.message
    ));

    for number in window.start..=window.end {
        let code = document.line(number).unwrap_or_default();
        let is_error = number == diagnostic.range.start.line;
        out.push_str(&format_line(number, width, code, is_error));
        out.push('\n');
        if is_error {
            out.push_str(&format_cursor(
                &diagnostic.range,
                code.chars().count(),
                width,
            ));
            out.push('\n');
        }
    }

    out
}
