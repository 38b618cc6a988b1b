//! Directive parser.
//!
//! Feeds each line through the [`CommentFilter`], tokenizes directive lines
//! and applies them to a [`ContextStack`] and a [`Library`]. Plain text is
//! collected into the open section, or ignored at top level.

pub mod context;
pub mod directive;

use alloc::{format, string::String};

use log::debug;

use crate::{
    comment::CommentFilter,
    error::{ShdcError, ShdcResult},
    library::{Block, Library, Line, Program, Shader, ShaderStage},
    sourceloc::SourceLoc,
};
use context::{Context, ContextStack};
use directive::{tokenize, Directive};

/// Parser state for one generation run.
///
/// Several source documents may be fed into the same parser; they all land
/// in one library.
#[derive(Debug, Default)]
pub struct Parser {
    library: Library,
    comments: CommentFilter,
    context: ContextStack,
    path: String,
    line_number: u32,
}

impl Parser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse one whole source document.
    ///
    /// # Errors
    ///
    /// Fails on the first syntax or structural error, or if a section or a
    /// block comment is still open at the end of the document.
    pub fn parse_source(&mut self, path: &str, text: &str) -> ShdcResult<()> {
        self.path = String::from(path);
        self.line_number = 0;
        self.comments = CommentFilter::new();

        for line in text.lines() {
            self.line_number += 1;
            self.parse_line(line)?;
        }

        if self.comments.in_block_comment() {
            return Err(
                ShdcError::syntax("unterminated /* comment at end of file").at(self.loc())
            );
        }
        let open = self.context.current();
        if open != Context::TopLevel {
            let name = self.library.open_section_name(open).unwrap_or_default();
            return Err(ShdcError::structural(format!(
                "missing @end for {} '{}' at end of file",
                open.tag(),
                name
            ))
            .at(self.loc()));
        }
        debug!(
            "parsed {}: {} blocks, {} shaders, {} programs so far",
            path,
            self.library.blocks().len(),
            self.library.shaders().len(),
            self.library.programs().len()
        );
        Ok(())
    }

    /// Parse the next line of the current document.
    pub fn parse_line(&mut self, raw: &str) -> ShdcResult<()> {
        let loc = self.loc();
        let line = self.comments.strip(raw).map_err(|e| e.at(loc.clone()))?;
        if line.is_empty() {
            return Ok(());
        }
        match tokenize(&line).map_err(|e| e.at(loc.clone()))? {
            Some(directive) => self.on_directive(directive, loc),
            None => {
                // Top-level text is prose, not an error
                if let Some(lines) = self.library.open_lines_mut(self.context.current()) {
                    lines.push(Line::text(line, loc));
                }
                Ok(())
            }
        }
    }

    /// The library built so far, before inclusion expansion.
    pub fn finish(self) -> Library {
        self.library
    }

    fn loc(&self) -> SourceLoc {
        SourceLoc::new(self.path.clone(), self.line_number)
    }

    fn on_directive(&mut self, directive: Directive, loc: SourceLoc) -> ShdcResult<()> {
        match directive {
            Directive::Block { name } => {
                self.open(Context::Block, &name, &loc)?;
                self.library.add_block(Block::new(name, loc))
            }
            Directive::VertexShader { name } => {
                self.open(Context::VertexShader, &name, &loc)?;
                self.library
                    .add_shader(Shader::new(name, ShaderStage::Vertex, loc))
            }
            Directive::FragmentShader { name } => {
                self.open(Context::FragmentShader, &name, &loc)?;
                self.library
                    .add_shader(Shader::new(name, ShaderStage::Fragment, loc))
            }
            Directive::Program { name, vs, fs } => {
                let open = self.context.current();
                if open != Context::TopLevel {
                    return Err(self.nesting_error("@program", &name, open).at(loc));
                }
                self.library.add_program(Program { name, vs, fs, loc })
            }
            Directive::Include { block } => {
                let open = self.context.current();
                if !open.is_shader() {
                    return Err(ShdcError::structural(format!(
                        "@include '{}' must be inside @vs or @fs, not {}",
                        block,
                        open.tag()
                    ))
                    .at(loc));
                }
                if let Some(lines) = self.library.open_lines_mut(open) {
                    lines.push(Line::include(block, loc));
                }
                Ok(())
            }
            Directive::End => self.close(loc),
        }
    }

    fn open(&mut self, context: Context, name: &str, loc: &SourceLoc) -> ShdcResult<()> {
        self.context
            .push(context)
            .map_err(|open| self.nesting_error(context.tag(), name, open).at(loc.clone()))
    }

    fn close(&mut self, loc: SourceLoc) -> ShdcResult<()> {
        let open = self.context.current();
        let empty = match self.library.open_lines_mut(open) {
            Some(lines) => lines.is_empty(),
            None => {
                return Err(
                    ShdcError::structural("@end must come after @block, @vs or @fs").at(loc),
                )
            }
        };
        if empty {
            let name = self.library.open_section_name(open).unwrap_or_default();
            return Err(ShdcError::structural(format!(
                "no source code lines in {} '{}'",
                open.tag(),
                name
            ))
            .at(loc));
        }
        self.context.pop();
        Ok(())
    }

    fn nesting_error(&self, tag: &str, name: &str, open: Context) -> ShdcError {
        let open_name = self.library.open_section_name(open).unwrap_or_default();
        ShdcError::structural(format!(
            "cannot open {} '{}' inside {} '{}' (missing @end?)",
            tag,
            name,
            open.tag(),
            open_name
        ))
    }
}

/// Parse one document and expand its includes.
pub fn parse_str(path: &str, text: &str) -> ShdcResult<Library> {
    parse_library(&[(path, text)])
}

/// Parse several documents, in order, into one expanded library.
pub fn parse_library(sources: &[(&str, &str)]) -> ShdcResult<Library> {
    let mut parser = Parser::new();
    for (path, text) in sources {
        parser.parse_source(path, text)?;
    }
    let mut library = parser.finish();
    library.expand()?;
    Ok(library)
}
