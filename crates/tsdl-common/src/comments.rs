//! Comment ranges and attachment queries.
//!
//! Comments are not part of the AST. The scanner records every comment
//! as a [`CommentRange`] while tokenizing, and the emitter re-associates
//! them with nodes positionally at print time using the queries in this
//! module. A comment whose anchoring node is erased is never emitted.

use serde::Serialize;

/// A range representing a comment in the source text.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CommentRange {
    /// Start position (byte offset), at the `//` or `/*`.
    pub pos: u32,
    /// End position (byte offset), past the closing `*/` or at the line end.
    pub end: u32,
    /// Whether this is a `/* */` comment.
    pub is_multi_line: bool,
    /// Whether a line break follows this comment in the source.
    pub has_trailing_new_line: bool,
}

impl CommentRange {
    pub fn new(pos: u32, end: u32, is_multi_line: bool, has_trailing_new_line: bool) -> Self {
        CommentRange {
            pos,
            end,
            is_multi_line,
            has_trailing_new_line,
        }
    }

    /// The comment text from source, delimiters included.
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        let start = self.pos as usize;
        let end = self.end as usize;
        if end <= source.len() && start < end {
            &source[start..end]
        } else {
            ""
        }
    }
}

fn is_ws(b: u8) -> bool {
    b == b' ' || b == b'\t' || b == b'\r' || b == b'\n'
}

fn newline_count(text: &str) -> usize {
    text.bytes().filter(|b| *b == b'\n').count()
}

/// Whether code (not whitespace, not an earlier comment) precedes
/// `comments[i]` on its own line.
///
/// Chains of same-line comments are looked through, so in
/// `f(); /* a */ /* b */` both comments count as following code.
fn code_precedes_on_line(comments: &[CommentRange], source: &str, i: usize) -> bool {
    let bytes = source.as_bytes();
    let mut j = i;
    loop {
        let mut k = comments[j].pos as usize;
        loop {
            if k == 0 {
                return false;
            }
            let b = bytes[k - 1];
            if b == b'\n' {
                return false;
            }
            if b == b' ' || b == b'\t' || b == b'\r' {
                k -= 1;
                continue;
            }
            break;
        }
        // Non-whitespace right before the comment. If it is the end of
        // the previous comment, keep walking the chain; otherwise it is
        // real code.
        if j > 0 && comments[j - 1].end as usize == k {
            j -= 1;
        } else {
            return true;
        }
    }
}

/// Leading comments for a node whose span starts at `pos`.
///
/// Walks backward through the sorted comment list collecting comments
/// separated from the node (and from each other) by whitespace only,
/// allowing at most one blank line of separation. The walk stops at any
/// intervening code, so comments attached to an erased construct whose
/// text still sits between them and the next emitted node are not
/// stolen. A comment that trails code on its own line attaches only
/// when the node continues on that same line.
pub fn leading_comment_slice<'a>(
    comments: &'a [CommentRange],
    source: &str,
    pos: u32,
) -> &'a [CommentRange] {
    let idx = comments.partition_point(|c| c.end <= pos);
    if idx == 0 {
        return &comments[0..0];
    }

    let mut first = idx;
    let mut boundary = pos;
    for i in (0..idx).rev() {
        let c = &comments[i];
        let between = &source[c.end as usize..boundary as usize];
        if between.bytes().any(|b| !is_ws(b)) {
            break;
        }
        if newline_count(between) > 2 {
            break;
        }
        if code_precedes_on_line(comments, source, i) && newline_count(between) > 0 {
            // Trailing comment of earlier code on that line.
            break;
        }
        first = i;
        boundary = c.pos;
    }
    &comments[first..idx]
}

/// Trailing comments for a node whose span ends at `end`.
///
/// Collects comments that start on the same line as `end`, separated
/// from it (and from each other) by spaces or tabs only.
pub fn trailing_comment_slice<'a>(
    comments: &'a [CommentRange],
    source: &str,
    end: u32,
) -> &'a [CommentRange] {
    let start_idx = comments.partition_point(|c| c.pos < end);
    let mut stop = start_idx;
    let mut prev_end = end;
    for c in &comments[start_idx..] {
        let gap = &source[prev_end as usize..c.pos as usize];
        if gap.bytes().any(|b| b != b' ' && b != b'\t') {
            break;
        }
        stop += 1;
        prev_end = c.end;
    }
    &comments[start_idx..stop]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(source: &str) -> Vec<CommentRange> {
        // Minimal comment scan for tests; the real one lives in the scanner.
        let bytes = source.as_bytes();
        let mut out = Vec::new();
        let mut pos = 0;
        while pos + 1 < bytes.len() {
            if bytes[pos] == b'/' && bytes[pos + 1] == b'/' {
                let start = pos;
                while pos < bytes.len() && bytes[pos] != b'\n' {
                    pos += 1;
                }
                out.push(CommentRange::new(
                    start as u32,
                    pos as u32,
                    false,
                    pos < bytes.len(),
                ));
            } else if bytes[pos] == b'/' && bytes[pos + 1] == b'*' {
                let start = pos;
                pos += 2;
                while pos + 1 < bytes.len() && !(bytes[pos] == b'*' && bytes[pos + 1] == b'/') {
                    pos += 1;
                }
                pos = (pos + 2).min(bytes.len());
                out.push(CommentRange::new(
                    start as u32,
                    pos as u32,
                    true,
                    pos < bytes.len() && (bytes[pos] == b'\n' || bytes[pos] == b'\r'),
                ));
            } else {
                pos += 1;
            }
        }
        out
    }

    #[test]
    fn doc_comment_attaches_to_next_statement() {
        let src = "/** doc */\nvar x = 1;\n";
        let comments = scan(src);
        let pos = src.find("var").unwrap() as u32;
        let leading = leading_comment_slice(&comments, src, pos);
        assert_eq!(leading.len(), 1);
        assert_eq!(leading[0].text(src), "/** doc */");
    }

    #[test]
    fn intervening_code_blocks_attachment() {
        let src = "/** doc */\ninterface I { }\nvar x = 1;\n";
        let comments = scan(src);
        let pos = src.find("var").unwrap() as u32;
        assert!(leading_comment_slice(&comments, src, pos).is_empty());
    }

    #[test]
    fn trailing_comment_of_previous_line_is_not_stolen() {
        let src = "var a = 1; // trail\nvar b = 2;\n";
        let comments = scan(src);
        let pos = src.find("var b").unwrap() as u32;
        assert!(leading_comment_slice(&comments, src, pos).is_empty());

        let end = src.find("1;").unwrap() as u32 + 2;
        let trailing = trailing_comment_slice(&comments, src, end);
        assert_eq!(trailing.len(), 1);
        assert_eq!(trailing[0].text(src), "// trail");
    }

    #[test]
    fn inline_comment_before_same_line_node_attaches() {
        let src = "foo(/** parameter comment*/p);\n";
        let comments = scan(src);
        let pos = src.rfind("p)").unwrap() as u32;
        let leading = leading_comment_slice(&comments, src, pos);
        assert_eq!(leading.len(), 1);
        assert_eq!(leading[0].text(src), "/** parameter comment*/");
    }

    #[test]
    fn comment_chain_collects_in_order() {
        let src = "// one\n// two\nvar x;\n";
        let comments = scan(src);
        let leading = leading_comment_slice(&comments, src, src.find("var").unwrap() as u32);
        assert_eq!(leading.len(), 2);
        assert_eq!(leading[0].text(src), "// one");
        assert_eq!(leading[1].text(src), "// two");
    }

    #[test]
    fn blank_line_gap_limit() {
        let src = "// far\n\n\n\nvar x;\n";
        let comments = scan(src);
        assert!(leading_comment_slice(&comments, src, src.find("var").unwrap() as u32).is_empty());
    }
}
