//! Front end for annotated shader libraries.
//!
//! A shader library is ordinary shading-language text interleaved with
//! `@`-directives that carve it into reusable blocks, vertex shaders,
//! fragment shaders and programs:
//! - comments are stripped line by line ([`CommentFilter`])
//! - directive lines are tokenized into a closed [`Directive`] set
//! - the [`Parser`] drives a single-slot section stack and fills a [`Library`]
//! - [`Library::expand`] splices `@include`d blocks into each shader

#![no_std]

extern crate alloc;

mod comment;
mod error;
mod library;
mod parser;
mod sourceloc;

pub use comment::CommentFilter;
pub use error::{ErrorKind, ShdcError, ShdcResult};
pub use library::{Block, Library, Line, LineContent, Program, Shader, ShaderStage};
pub use parser::{
    context::{Context, ContextStack, MAX_DEPTH},
    directive::{tokenize, Directive},
    parse_library, parse_str, Parser,
};
pub use sourceloc::SourceLoc;
