//! Comment ranges, shebangs and merge conflict markers.

use crate::char_codes::{is_line_break, is_white_space_like, MAX_ASCII_CHARACTER, MERGE_CONFLICT_MARKER_LENGTH};
use rsparse_ast::SyntaxKind;

/// A comment found in trivia.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentRange {
    pub pos: u32,
    pub end: u32,
    /// `SingleLineCommentTrivia` or `MultiLineCommentTrivia`.
    pub kind: SyntaxKind,
    pub has_trailing_new_line: bool,
}

impl CommentRange {
    /// `/** ... */` but not `/**/`.
    pub fn is_jsdoc(&self, text: &str) -> bool {
        let bytes = text.as_bytes();
        let pos = self.pos as usize;
        self.kind == SyntaxKind::MultiLineCommentTrivia
            && bytes.get(pos + 2) == Some(&b'*')
            && bytes.get(pos + 3) != Some(&b'/')
    }
}

#[inline]
fn char_at(text: &str, pos: usize) -> Option<char> {
    text.get(pos..).and_then(|rest| rest.chars().next())
}

/// Whether a `#!` line starts at `pos`.
pub fn is_shebang_trivia(text: &str, pos: usize) -> bool {
    text.as_bytes().get(pos..pos + 2) == Some(b"#!")
}

/// End of the shebang line starting at `pos`.
pub fn scan_shebang_trivia(text: &str, pos: usize) -> usize {
    let rest = &text[pos..];
    rest.char_indices()
        .find(|(_, ch)| is_line_break(*ch))
        .map_or(text.len(), |(offset, _)| pos + offset)
}

/// The shebang line at the start of `text`, if any.
pub fn get_shebang(text: &str) -> Option<&str> {
    if is_shebang_trivia(text, 0) {
        Some(&text[..scan_shebang_trivia(text, 0)])
    } else {
        None
    }
}

/// Conflict markers must be at the start of a line: seven identical `<`, `=`,
/// `|` or `>` characters, followed by a space unless they are `=`.
pub fn is_conflict_marker_trivia(text: &str, pos: usize) -> bool {
    let bytes = text.as_bytes();
    if pos != 0 && !matches!(bytes.get(pos - 1), Some(b'\n' | b'\r')) {
        return false;
    }
    let Some(&ch) = bytes.get(pos) else {
        return false;
    };
    if !matches!(ch, b'<' | b'=' | b'|' | b'>') || pos + MERGE_CONFLICT_MARKER_LENGTH >= bytes.len() {
        return false;
    }
    if bytes[pos..pos + MERGE_CONFLICT_MARKER_LENGTH].iter().any(|&b| b != ch) {
        return false;
    }
    ch == b'=' || bytes[pos + MERGE_CONFLICT_MARKER_LENGTH] == b' '
}

/// Skip a conflict marker. `<<<<<<<` and `>>>>>>>` lines are skipped to the end
/// of the line; `|||||||` and `=======` sections are skipped up to the next
/// `=======` or `>>>>>>>` marker.
pub fn scan_conflict_marker_trivia(text: &str, mut pos: usize) -> usize {
    let bytes = text.as_bytes();
    let ch = bytes[pos];
    if ch == b'<' || ch == b'>' {
        while pos < bytes.len() && !matches!(bytes[pos], b'\n' | b'\r') {
            pos += 1;
        }
    } else {
        while pos < bytes.len() {
            let current = bytes[pos];
            if (current == b'=' || current == b'>') && current != ch && is_conflict_marker_trivia(text, pos) {
                break;
            }
            pos += 1;
        }
    }
    pos
}

/// Comments in the trivia starting at `pos`.
///
/// Leading comments start after the first line break, except at the start of
/// the file. Trailing comments stop at the first line break.
fn collect_comment_ranges(text: &str, mut pos: usize, trailing: bool) -> Vec<CommentRange> {
    let bytes = text.as_bytes();
    let mut ranges = Vec::new();
    let mut pending: Option<CommentRange> = None;
    let mut collecting = trailing;

    if pos == 0 {
        collecting = true;
        if let Some(shebang) = get_shebang(text) {
            pos = shebang.len();
        }
    }

    while pos < bytes.len() {
        match bytes[pos] {
            b'\r' | b'\n' => {
                if bytes[pos] == b'\r' && bytes.get(pos + 1) == Some(&b'\n') {
                    pos += 1;
                }
                pos += 1;
                if trailing {
                    break;
                }
                collecting = true;
                if let Some(pending) = pending.as_mut() {
                    pending.has_trailing_new_line = true;
                }
            }
            b'\t' | 0x0B | 0x0C | b' ' => pos += 1,
            b'/' if matches!(bytes.get(pos + 1), Some(b'/' | b'*')) => {
                let start = pos;
                let single_line = bytes[pos + 1] == b'/';
                let mut has_trailing_new_line = false;
                pos += 2;
                if single_line {
                    while let Some(ch) = char_at(text, pos) {
                        if is_line_break(ch) {
                            has_trailing_new_line = true;
                            break;
                        }
                        pos += ch.len_utf8();
                    }
                } else {
                    pos = match memchr::memmem::find(&bytes[pos..], b"*/") {
                        Some(offset) => pos + offset + 2,
                        None => bytes.len(),
                    };
                }
                if collecting {
                    if let Some(previous) = pending.take() {
                        ranges.push(previous);
                    }
                    pending = Some(CommentRange {
                        pos: start as u32,
                        end: pos as u32,
                        kind: if single_line {
                            SyntaxKind::SingleLineCommentTrivia
                        } else {
                            SyntaxKind::MultiLineCommentTrivia
                        },
                        has_trailing_new_line,
                    });
                }
            }
            b if b as u32 > MAX_ASCII_CHARACTER => match char_at(text, pos) {
                Some(ch) if is_white_space_like(ch) => {
                    if is_line_break(ch) {
                        if let Some(pending) = pending.as_mut() {
                            pending.has_trailing_new_line = true;
                        }
                    }
                    pos += ch.len_utf8();
                }
                _ => break,
            },
            _ => break,
        }
    }

    ranges.extend(pending);
    ranges
}

pub fn get_leading_comment_ranges(text: &str, pos: usize) -> Vec<CommentRange> {
    collect_comment_ranges(text, pos, false)
}

pub fn get_trailing_comment_ranges(text: &str, pos: usize) -> Vec<CommentRange> {
    collect_comment_ranges(text, pos, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leading_comments_start_after_line_break() {
        let text = "a; /* trailing */\n/** doc */ // line\nb";
        let ranges = get_leading_comment_ranges(text, 2);
        assert_eq!(ranges.len(), 2);
        assert_eq!(&text[ranges[0].pos as usize..ranges[0].end as usize], "/** doc */");
        assert!(ranges[0].is_jsdoc(text));
        assert_eq!(ranges[1].kind, SyntaxKind::SingleLineCommentTrivia);
        assert!(ranges[1].has_trailing_new_line);
    }

    #[test]
    fn test_trailing_comments_stop_at_line_break() {
        let text = "a; /* one */ // two\n/* three */";
        let ranges = get_trailing_comment_ranges(text, 2);
        assert_eq!(ranges.len(), 2);
        assert_eq!(ranges[0].kind, SyntaxKind::MultiLineCommentTrivia);
        assert!(!ranges[0].is_jsdoc(text));
    }

    #[test]
    fn test_file_start_collects_and_skips_shebang() {
        let text = "#!/usr/bin/env node\n/** top */\nx";
        assert_eq!(get_shebang(text), Some("#!/usr/bin/env node"));
        let ranges = get_leading_comment_ranges(text, 0);
        assert_eq!(ranges.len(), 1);
        assert_eq!(ranges[0].pos, 20);
    }

    #[test]
    fn test_empty_block_comment_is_not_jsdoc() {
        let text = "/**/x";
        let ranges = get_leading_comment_ranges(text, 0);
        assert_eq!(ranges.len(), 1);
        assert!(!ranges[0].is_jsdoc(text));
    }

    #[test]
    fn test_conflict_markers() {
        let text = "<<<<<<< HEAD\nx\n=======\ny\n>>>>>>> branch\n";
        assert!(is_conflict_marker_trivia(text, 0));
        assert!(!is_conflict_marker_trivia(text, 1));
        assert_eq!(scan_conflict_marker_trivia(text, 0), 12);
        let middle = text.find("=======").unwrap_or(0);
        assert!(is_conflict_marker_trivia(text, middle));
        let after = scan_conflict_marker_trivia(text, middle);
        assert_eq!(&text[after..after + 7], ">>>>>>>");
    }
}
