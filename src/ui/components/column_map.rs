//! Conversion between visual terminal columns and byte offsets within a line.
//!
//! Lines are walked as extended grapheme clusters so a combining mark is never
//! separated from its base character. Each cluster occupies 0, 1 or 2 columns.
//! All functions clamp out-of-range input instead of panicking.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Display width of a single grapheme cluster (0, 1 or 2 columns).
pub fn cluster_width(cluster: &str) -> usize {
    UnicodeWidthStr::width(cluster).min(2)
}

/// Total display width of a line, summed per grapheme cluster.
pub fn display_width(line: &str) -> usize {
    line.graphemes(true).map(cluster_width).sum()
}

/// Byte offset of the cluster that occupies visual column `col`.
///
/// Returns the offset of the first cluster whose cumulative width would
/// exceed `col`, or `line.len()` when `col` is past the end of the line.
/// Exception: a zero-width cluster starting exactly at `col` is returned
/// rather than skipped, so a slice starting at `col` keeps it.
pub fn column_to_byte_offset(line: &str, col: usize) -> usize {
    if col == 0 {
        return 0;
    }

    let mut width = 0usize;
    for (offset, cluster) in line.grapheme_indices(true) {
        let w = cluster_width(cluster);
        if width + w.max(1) > col {
            return offset;
        }
        width += w;
    }

    line.len()
}

/// Byte offset just past every cluster that starts before column `col`.
///
/// The exclusive counterpart of [`column_to_byte_offset`]: an end column
/// landing on the second cell of a wide glyph takes the whole glyph.
pub fn column_to_byte_end(line: &str, col: usize) -> usize {
    let mut width = 0usize;
    for (offset, cluster) in line.grapheme_indices(true) {
        if width >= col {
            return offset;
        }
        width += cluster_width(cluster);
    }

    line.len()
}

/// Visual column at which the cluster containing byte `offset` starts.
pub fn byte_offset_to_column(line: &str, offset: usize) -> usize {
    if offset == 0 {
        return 0;
    }
    if offset >= line.len() {
        return display_width(line);
    }

    let mut width = 0usize;
    for (start, cluster) in line.grapheme_indices(true) {
        if start + cluster.len() > offset {
            return width;
        }
        width += cluster_width(cluster);
    }

    width
}

/// Columns between tab stops
pub const TAB_WIDTH: usize = 4;

/// Expand tabs to the next tab stop and drop other control characters.
///
/// The terminal draws neither, so leaving them in would put the text a
/// different number of columns from where it is measured.
pub fn sanitize_line(line: &str) -> String {
    if !line.chars().any(char::is_control) {
        return line.to_string();
    }

    let mut out = String::with_capacity(line.len());
    let mut width = 0usize;
    for cluster in line.graphemes(true) {
        if cluster == "\t" {
            let pad = TAB_WIDTH - width % TAB_WIDTH;
            out.push_str(&" ".repeat(pad));
            width += pad;
        } else if cluster.chars().any(char::is_control) {
            continue;
        } else {
            out.push_str(cluster);
            width += cluster_width(cluster);
        }
    }
    out
}

/// Greedy word wrap of a plain line to `width` columns.
///
/// Breaks at word boundaries, dropping the whitespace at each break; a word
/// wider than `width` is split between clusters. `width == 0` disables wrapping.
pub fn wrap_to_width(line: &str, width: usize) -> Vec<String> {
    if width == 0 || display_width(line) <= width {
        return vec![line.to_string()];
    }

    let mut rows = Vec::new();
    let mut current = String::new();
    let mut current_width = 0usize;

    for word in line.split_word_bounds() {
        let word_width = display_width(word);
        let is_space = word.trim().is_empty();

        if current_width + word_width <= width {
            current.push_str(word);
            current_width += word_width;
            continue;
        }
        if is_space {
            rows.push(std::mem::take(&mut current).trim_end().to_string());
            current_width = 0;
            continue;
        }
        if current_width > 0 {
            rows.push(std::mem::take(&mut current).trim_end().to_string());
            current_width = 0;
        }
        for cluster in word.graphemes(true) {
            let w = cluster_width(cluster);
            if current_width + w > width && current_width > 0 {
                rows.push(std::mem::take(&mut current));
                current_width = 0;
            }
            current.push_str(cluster);
            current_width += w;
        }
    }

    if !current.is_empty() || rows.is_empty() {
        rows.push(current);
    }
    rows
}
