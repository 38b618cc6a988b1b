//! File-based tests for the shader library compiler.
//!
//! Each `.shdtest` file under `filetests/` holds:
//! - a test command (`test declarations`, `test definitions`, `test validate`)
//! - the variant family to generate (`family gles`)
//! - a shader library source and the reflection every shader compiled to
//! - the expected artifact text, as filecheck directives, or the expected error

pub mod filecheck;
pub mod parser;

mod test_generate;
mod test_validate;

pub use crate::{
    filecheck::{build_filechecker, match_filecheck},
    parser::{parse_test_file, Command, ReflectSection, TestFile},
    test_generate::{build_store, run_generate_test},
    test_validate::run_validate_test,
};
