//! The `validate` subtest - parse and validation outcome tests
//!
//! The expect section is either `ok`, or an `error: <kind>` line followed
//! by substrings the rendered error must contain, e.g.
//!
//! ```text
//! error: structural
//! lib.shd:12:
//! is not part of a program
//! ```

use shdc_lang::{parse_str, ErrorKind};
use shdc_reflect::{validate, ShdcResult};

use crate::{
    parser::{parse_test_file, Command, TestFile},
    test_generate::{build_store, SOURCE_PATH},
};

const KINDS: [ErrorKind; 8] = [
    ErrorKind::Syntax,
    ErrorKind::Structural,
    ErrorKind::Type,
    ErrorKind::InterfaceMismatch,
    ErrorKind::ReflectionMissing,
    ErrorKind::Reflection,
    ErrorKind::Compile,
    ErrorKind::Io,
];

#[derive(Debug)]
enum Expectation {
    Ok,
    Error(ErrorKind, Vec<String>),
}

fn parse_expectation(expected_text: &str) -> Result<Expectation, String> {
    let mut lines = expected_text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with(';'));
    let first = lines.next().ok_or("Empty expect section")?;
    if first == "ok" {
        return Ok(Expectation::Ok);
    }
    let name = first
        .strip_prefix("error:")
        .map(str::trim)
        .ok_or_else(|| format!("Expected 'ok' or 'error: <kind>', got '{}'", first))?;
    let kind = KINDS
        .into_iter()
        .find(|k| k.name() == name)
        .ok_or_else(|| format!("Unknown error kind '{}'", name))?;
    Ok(Expectation::Error(kind, lines.map(String::from).collect()))
}

fn check(test: &TestFile) -> ShdcResult<()> {
    let library = parse_str(SOURCE_PATH, &test.source)?;
    let store = build_store(test)?;
    validate(&library, &store, test.family.langs())
}

/// Run a single validate test
pub fn run_validate_test(test: &TestFile) {
    let expectation = parse_expectation(&test.expected_text)
        .unwrap_or_else(|e| panic!("Bad validate expectation: {}", e));

    match (expectation, check(test)) {
        (Expectation::Ok, Ok(())) => {}
        (Expectation::Ok, Err(e)) => {
            panic!("Validate test failed: expected success but got\n  {}", e)
        }
        (Expectation::Error(kind, _), Ok(())) => {
            panic!("Validate test failed: expected a {} error but validation passed", kind)
        }
        (Expectation::Error(kind, substrings), Err(e)) => {
            assert_eq!(e.kind, kind, "Validate test failed: wrong error kind for\n  {}", e);
            let rendered = e.to_string();
            for substring in &substrings {
                assert!(
                    rendered.contains(substring.as_str()),
                    "Validate test failed: '{}' not found in\n  {}",
                    substring,
                    rendered
                );
            }
        }
    }
}

/// Run the validate test in a file
#[allow(dead_code)]
fn run_test_from_file(content: &str) {
    let test = parse_test_file(content).unwrap_or_else(|e| panic!("Bad test file: {}", e));
    assert_eq!(
        test.command,
        Command::Validate,
        "Unexpected test command: {:?}",
        test.command
    );
    run_validate_test(&test);
}
