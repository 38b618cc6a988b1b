//! Filecheck directive parsing and matching using the filecheck crate

use filecheck::{Checker, CheckerBuilder, NO_VARIABLES};

/// Build a filechecker from expected text containing directives.
///
/// Blank lines and `;` comment lines are skipped; every other line must be
/// a directive.
pub fn build_filechecker(expected_text: &str) -> Result<Checker, String> {
    let mut builder = CheckerBuilder::new();

    for line in expected_text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with(';') {
            continue;
        }
        let found = builder
            .directive(trimmed)
            .map_err(|e| format!("Failed to parse filecheck directive '{}': {}", trimmed, e))?;
        if !found {
            return Err(format!("Not a filecheck directive: '{}'", trimmed));
        }
    }

    Ok(builder.finish())
}

/// Match actual output against filecheck directives
pub fn match_filecheck(actual: &str, expected_text: &str) -> Result<(), String> {
    let checker = build_filechecker(expected_text)?;

    if checker
        .check(actual, NO_VARIABLES)
        .map_err(|e| format!("Filecheck error: {}", e))?
    {
        Ok(())
    } else {
        // Get explanation for why matching failed
        let (_, explain) = checker
            .explain(actual, NO_VARIABLES)
            .map_err(|e| format!("Failed to get filecheck explanation: {}", e))?;

        Err(format!("Filecheck failed:\n{}", explain))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEXT: &str = "enum SHD_PROGRAMS {\n    SHD_PROGRAM_INVALID = 0,\n    SHD_PROGRAM_P,\n};\n";

    #[test]
    fn test_match() {
        let expected = "check: enum SHD_PROGRAMS {\nnextln: SHD_PROGRAM_INVALID = 0,\n";
        assert!(match_filecheck(TEXT, expected).is_ok());
    }

    #[test]
    fn test_mismatch_is_explained() {
        let err = match_filecheck(TEXT, "check: SHD_PROGRAM_Q").unwrap_err();
        assert!(err.starts_with("Filecheck failed"));
    }

    #[test]
    fn test_comments_and_stray_text() {
        assert!(match_filecheck(TEXT, "; programs\ncheck: SHD_PROGRAM_P").is_ok());
        assert!(build_filechecker("SHD_PROGRAM_P").is_err());
    }
}
