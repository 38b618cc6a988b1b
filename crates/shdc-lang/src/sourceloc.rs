//! Source locations attached to lines, sections and errors.

use alloc::string::String;
use core::fmt;

/// A file path plus a 1-based line number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceLoc {
    pub path: String,
    pub line: u32,
}

impl SourceLoc {
    pub fn new(path: impl Into<String>, line: u32) -> Self {
        SourceLoc {
            path: path.into(),
            line,
        }
    }
}

impl fmt::Display for SourceLoc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.path, self.line)
    }
}

#[cfg(test)]
mod tests {
    use alloc::format;

    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", SourceLoc::new("shaders.shd", 12)), "shaders.shd:12");
    }
}
