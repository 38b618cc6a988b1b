//! Comment stripping.
//!
//! `//` comments end at the end of the line, `/* */` comments may span
//! several lines. The only state carried from one line to the next is
//! whether we are currently inside a block comment.

use alloc::string::String;

use crate::error::{ShdcError, ShdcResult};

const LINE_COMMENT: &str = "//";
const BLOCK_OPEN: &str = "/*";
const BLOCK_CLOSE: &str = "*/";

/// Line-oriented comment scanner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommentFilter {
    in_block_comment: bool,
}

impl CommentFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the next line starts inside a block comment.
    pub fn in_block_comment(&self) -> bool {
        self.in_block_comment
    }

    /// Strip comments from one line and return the trimmed remainder.
    ///
    /// # Errors
    ///
    /// Returns a syntax error when a comment marker shows up inside a block
    /// comment that was opened on a previous line.
    pub fn strip(&mut self, line: &str) -> ShdcResult<String> {
        let mut line = String::from(line);
        loop {
            if self.in_block_comment {
                match line.find(BLOCK_CLOSE) {
                    None => {
                        if line.contains(BLOCK_OPEN) || line.contains(LINE_COMMENT) {
                            return Err(nested_comment());
                        }
                        return Ok(String::new());
                    }
                    Some(end) => {
                        let comment = &line[..end + BLOCK_CLOSE.len()];
                        if comment.contains(BLOCK_OPEN) || comment.contains(LINE_COMMENT) {
                            return Err(nested_comment());
                        }
                        line.replace_range(..end + BLOCK_CLOSE.len(), "");
                        self.in_block_comment = false;
                    }
                }
            }

            if let Some(start) = line.find(LINE_COMMENT) {
                line.truncate(start);
            }

            let Some(start) = line.find(BLOCK_OPEN) else {
                break;
            };
            let body = start + BLOCK_OPEN.len();
            match line[body..].find(BLOCK_CLOSE) {
                // Splice it out and rescan, there may be a second comment.
                Some(rel) => line.replace_range(start..body + rel + BLOCK_CLOSE.len(), ""),
                None => {
                    line.truncate(start);
                    self.in_block_comment = true;
                    break;
                }
            }
        }
        Ok(String::from(
            line.trim_matches(|c| matches!(c, ' ' | '\t' | '\n' | '\r')),
        ))
    }
}

fn nested_comment() -> ShdcError {
    ShdcError::syntax("comment in comment")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn strip_all(lines: &[&str]) -> ShdcResult<alloc::vec::Vec<String>> {
        let mut filter = CommentFilter::new();
        lines.iter().map(|l| filter.strip(l)).collect()
    }

    #[test]
    fn test_plain_line_is_trimmed() {
        let mut filter = CommentFilter::new();
        assert_eq!(filter.strip("  gl_Position = pos;\r\n").unwrap(), "gl_Position = pos;");
        assert!(!filter.in_block_comment());
    }

    #[test]
    fn test_line_comment() {
        let mut filter = CommentFilter::new();
        assert_eq!(filter.strip("vec4 c; // color").unwrap(), "vec4 c;");
        assert_eq!(filter.strip("// whole line").unwrap(), "");
    }

    #[test]
    fn test_block_comment_same_line() {
        let mut filter = CommentFilter::new();
        assert_eq!(filter.strip("a /* x */ b").unwrap(), "a  b");
        assert!(!filter.in_block_comment());
    }

    #[test]
    fn test_two_block_comments_same_line() {
        let mut filter = CommentFilter::new();
        assert_eq!(filter.strip("a /* x */ b /* y */ c").unwrap(), "a  b  c");
    }

    #[test]
    fn test_block_comment_spans_lines() {
        let out = strip_all(&["float x; /* start", "still comment", "end */ float y;"]).unwrap();
        assert_eq!(out, ["float x;", "", "float y;"]);
    }

    #[test]
    fn test_state_carried_between_lines() {
        let mut filter = CommentFilter::new();
        filter.strip("/* open").unwrap();
        assert!(filter.in_block_comment());
        filter.strip("close */").unwrap();
        assert!(!filter.in_block_comment());
    }

    #[test]
    fn test_closer_must_follow_opener() {
        // "/*/" opens a comment, it does not close one
        let mut filter = CommentFilter::new();
        assert_eq!(filter.strip("a /*/ b").unwrap(), "a");
        assert!(filter.in_block_comment());
    }

    #[test]
    fn test_line_comment_clipped_before_block_opener() {
        let mut filter = CommentFilter::new();
        assert_eq!(filter.strip("a // b /* c").unwrap(), "a");
        assert!(!filter.in_block_comment());
    }

    #[test]
    fn test_nested_opener_inside_open_comment() {
        let result = strip_all(&["/* outer", "/* inner */"]);
        assert_eq!(result.unwrap_err().kind, ErrorKind::Syntax);
    }

    #[test]
    fn test_line_comment_inside_open_comment() {
        let result = strip_all(&["/* outer", "still // here"]);
        assert_eq!(result.unwrap_err().kind, ErrorKind::Syntax);
    }

    #[test]
    fn test_text_after_multiline_close_is_rescanned() {
        let out = strip_all(&["/* a", "b */ c /* d */ e // f"]).unwrap();
        assert_eq!(out, ["", "c  e"]);
    }
}
