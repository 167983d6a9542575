//! Comment normalization and lookup.
//!
//! Declarations own the contiguous comment block immediately above them; an
//! inline trailing comment on the declaration's own line is a fallback used
//! only when no preceding block exists.

/// Strips comment syntax from one line: a `//` or `/*` prefix, a `*/` suffix,
/// and a continuation `*`. A leading `**` is kept verbatim so emphasis markup
/// inside block comments survives.
fn strip_line(line: &str) -> &str {
    let mut stripped = line.trim();
    if let Some(rest) = stripped
        .strip_prefix("//")
        .or_else(|| stripped.strip_prefix("/*"))
    {
        stripped = rest.trim();
    }
    if let Some(rest) = stripped.strip_suffix("*/") {
        stripped = rest.trim();
    }
    if stripped.starts_with('*') && !stripped.starts_with("**") {
        stripped = stripped[1..].trim();
    }
    stripped
}

/// Normalizes a raw comment span to a single line of text, dropping blank
/// lines and joining the rest with spaces.
pub(crate) fn normalize(comment: &str) -> String {
    let lines: Vec<&str> = comment
        .lines()
        .map(strip_line)
        .filter(|line| !line.is_empty())
        .collect();
    lines.join(" ")
}

/// Like [`normalize`], but keeps the line structure. The annotation extractor
/// matches keywords against line starts, so it needs the newlines intact.
pub(crate) fn normalize_lines(comment: &str) -> String {
    let lines: Vec<&str> = comment
        .lines()
        .map(strip_line)
        .filter(|line| !line.is_empty())
        .collect();
    lines.join("\n")
}

/// Collects the contiguous comment block immediately preceding `index`,
/// scanning backward.
///
/// Line comments accumulate one by one. A line containing `*/` splices in the
/// whole block back to its `/*` opening line. A blank line ends the scan once
/// comments have accumulated, and is skipped over otherwise. Any other
/// non-comment line ends the scan: the declaration is bare.
///
/// The returned text keeps the comment markers and the original line breaks;
/// callers normalize it afterwards.
pub(crate) fn block_before(lines: &[&str], index: usize) -> String {
    let mut comments: Vec<&str> = Vec::new();
    let mut idx = index.min(lines.len());
    while idx > 0 {
        idx -= 1;
        let line = lines[idx].trim();
        if line.is_empty() {
            if !comments.is_empty() {
                break;
            }
        } else if line.starts_with("//") {
            comments.insert(0, line);
        } else if line.contains("*/") {
            let end = idx;
            while idx > 0 && !lines[idx].contains("/*") {
                idx -= 1;
            }
            let mut block: Vec<&str> = lines[idx..=end].iter().map(|line| line.trim()).collect();
            block.append(&mut comments);
            comments = block;
        } else {
            break;
        }
    }
    comments.join("\n")
}

/// Splits a line at its inline `//` comment, returning the code portion and
/// the normalized comment text.
///
/// The split happens at the first `//` occurrence; a `//` inside a string
/// literal is not special-cased and will be taken for a comment start.
pub(crate) fn split_inline(line: &str) -> (&str, String) {
    match line.find("//") {
        Some(pos) => (line[..pos].trim_end(), normalize(&line[pos..])),
        None => (line, String::new()),
    }
}
