//! Directive tokenizer.
//!
//! A directive line is `@<verb> <arg>*`. The marker must be the first
//! non-whitespace character and the line may not contain a statement
//! terminator. Every recognized verb maps to one [`Directive`] variant, so
//! the parser can match on it exhaustively.

use alloc::{
    format,
    string::{String, ToString},
    vec::Vec,
};

use nom::{
    bytes::complete::{take_till1, take_while, take_while1},
    character::complete::{char, multispace0, multispace1, satisfy},
    combinator::{all_consuming, recognize},
    multi::many0,
    sequence::{pair, preceded, terminated},
    IResult,
};

use crate::error::{ShdcError, ShdcResult};

const MARKER: char = '@';

/// One recognized directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// `@block <name>`
    Block { name: String },
    /// `@vs <name>`
    VertexShader { name: String },
    /// `@fs <name>`
    FragmentShader { name: String },
    /// `@program <name> <vs> <fs>`
    Program { name: String, vs: String, fs: String },
    /// `@include <block>`
    Include { block: String },
    /// `@end`
    End,
}

impl Directive {
    /// The verb as written in source, without the marker.
    pub fn verb(&self) -> &'static str {
        match self {
            Directive::Block { .. } => "block",
            Directive::VertexShader { .. } => "vs",
            Directive::FragmentShader { .. } => "fs",
            Directive::Program { .. } => "program",
            Directive::Include { .. } => "include",
            Directive::End => "end",
        }
    }
}

/// Parse the verb (letters, digits, underscore)
fn verb(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_')(input)
}

/// Parse a C identifier, the only legal form of a name argument
fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        satisfy(|c| c.is_ascii_alphabetic() || c == '_'),
        take_while(|c: char| c.is_ascii_alphanumeric() || c == '_'),
    ))(input)
}

/// Parse one whitespace-delimited argument
fn argument(input: &str) -> IResult<&str, &str> {
    take_till1(|c: char| c.is_whitespace())(input)
}

/// Parse `@verb arg*` up to the end of the input
fn directive_words(input: &str) -> IResult<&str, (&str, Vec<&str>)> {
    all_consuming(terminated(
        preceded(
            char(MARKER),
            pair(verb, many0(preceded(multispace1, argument))),
        ),
        multispace0,
    ))(input)
}

fn expect_args(args: &[&str], count: usize, usage: &str) -> ShdcResult<()> {
    if args.len() == count {
        Ok(())
    } else {
        Err(ShdcError::syntax(format!(
            "expected `{}`, found {} argument(s)",
            usage,
            args.len()
        )))
    }
}

/// Tokenize a comment-free line.
///
/// Returns `Ok(None)` when the line carries no directive marker and is
/// therefore plain shader text.
///
/// # Errors
///
/// Returns a syntax error for a marker preceded by other text, a `;` on a
/// directive line, malformed words, a wrong argument count, an unknown verb
/// or a name that is not a C identifier.
pub fn tokenize(line: &str) -> ShdcResult<Option<Directive>> {
    let Some(marker) = line.find(MARKER) else {
        return Ok(None);
    };
    if !line[..marker].trim().is_empty() {
        return Err(ShdcError::syntax(
            "only whitespace allowed in front of a directive",
        ));
    }
    if line.contains(';') {
        return Err(ShdcError::syntax("no semicolons allowed in directive lines"));
    }

    let text = &line[marker..];
    let (verb, args) = match directive_words(text) {
        Ok((_, words)) => words,
        Err(_) => {
            return Err(ShdcError::syntax(format!(
                "malformed directive line '{}'",
                text.trim_end()
            )))
        }
    };

    let directive = match verb {
        "block" => {
            expect_args(&args, 1, "@block <name>")?;
            Directive::Block {
                name: args[0].to_string(),
            }
        }
        "vs" => {
            expect_args(&args, 1, "@vs <name>")?;
            Directive::VertexShader {
                name: args[0].to_string(),
            }
        }
        "fs" => {
            expect_args(&args, 1, "@fs <name>")?;
            Directive::FragmentShader {
                name: args[0].to_string(),
            }
        }
        "program" => {
            expect_args(&args, 3, "@program <name> <vs> <fs>")?;
            Directive::Program {
                name: args[0].to_string(),
                vs: args[1].to_string(),
                fs: args[2].to_string(),
            }
        }
        "include" => {
            expect_args(&args, 1, "@include <block>")?;
            Directive::Include {
                block: args[0].to_string(),
            }
        }
        "end" => {
            expect_args(&args, 0, "@end")?;
            Directive::End
        }
        other => {
            return Err(ShdcError::syntax(format!(
                "unrecognized directive '@{}'",
                other
            )))
        }
    };
    if let Some(bad) = args.iter().find(|arg| all_consuming(identifier)(**arg).is_err()) {
        return Err(ShdcError::syntax(format!(
            "'{}' in @{} is not a valid name, expected letters, digits and '_'",
            bad, verb
        )));
    }
    Ok(Some(directive))
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;
    use crate::error::ErrorKind;

    fn syntax_error(line: &str) -> String {
        let err = tokenize(line).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Syntax, "line: {}", line);
        err.message
    }

    #[test]
    fn test_directive_words() {
        assert_eq!(directive_words("@vs main"), Ok(("", ("vs", vec!["main"]))));
        assert_eq!(
            directive_words("@program p  a\tb "),
            Ok(("", ("program", vec!["p", "a", "b"])))
        );
        assert_eq!(directive_words("@end"), Ok(("", ("end", vec![]))));
        assert!(directive_words("@").is_err());
        assert!(directive_words("@vs-x").is_err());
    }

    #[test]
    fn test_identifier() {
        assert_eq!(identifier("_lit2D"), Ok(("", "_lit2D")));
        assert_eq!(identifier("a-b"), Ok(("-b", "a")));
        assert!(identifier("2d").is_err());
    }

    #[test]
    fn test_names_must_be_identifiers() {
        assert!(syntax_error("@vs my-shader").contains("'my-shader' in @vs"));
        assert!(syntax_error("@fs a\"b").contains("not a valid name"));
        assert!(syntax_error("@program p a 2b").contains("'2b'"));
        assert!(syntax_error("@include common.glsl").contains("'common.glsl'"));
    }

    #[test]
    fn test_plain_text_is_not_a_directive() {
        assert_eq!(tokenize("gl_Position = mvp * position;").unwrap(), None);
    }

    #[test]
    fn test_each_verb() {
        assert_eq!(
            tokenize("@block util").unwrap(),
            Some(Directive::Block { name: "util".into() })
        );
        assert_eq!(
            tokenize("@vs vsMain").unwrap(),
            Some(Directive::VertexShader { name: "vsMain".into() })
        );
        assert_eq!(
            tokenize("@fs fsMain").unwrap(),
            Some(Directive::FragmentShader { name: "fsMain".into() })
        );
        assert_eq!(
            tokenize("@program main vsMain fsMain").unwrap(),
            Some(Directive::Program {
                name: "main".into(),
                vs: "vsMain".into(),
                fs: "fsMain".into(),
            })
        );
        assert_eq!(
            tokenize("@include util").unwrap(),
            Some(Directive::Include { block: "util".into() })
        );
        assert_eq!(tokenize("@end").unwrap(), Some(Directive::End));
    }

    #[test]
    fn test_verb_names_round_trip() {
        for line in ["@block a", "@vs a", "@fs a", "@program a b c", "@include a", "@end"] {
            let directive = tokenize(line).unwrap().unwrap();
            assert!(line[1..].starts_with(directive.verb()));
        }
    }

    #[test]
    fn test_text_before_marker() {
        assert!(syntax_error("x @end").contains("only whitespace"));
    }

    #[test]
    fn test_semicolon_in_directive() {
        assert!(syntax_error("@vs main;").contains("semicolons"));
    }

    #[test]
    fn test_unknown_verb() {
        assert!(syntax_error("@geometry g").contains("unrecognized directive '@geometry'"));
    }

    #[test]
    fn test_bare_marker() {
        assert!(syntax_error("@").contains("malformed"));
    }

    #[test]
    fn test_argument_counts() {
        assert!(syntax_error("@block").contains("@block <name>"));
        assert!(syntax_error("@vs a b").contains("@vs <name>"));
        assert!(syntax_error("@program p a").contains("@program <name> <vs> <fs>"));
        assert!(syntax_error("@end now").contains("`@end`"));
    }
}
