//! Shader library compiler driver.
//!
//! Ties the front end, the external shader compiler and the C backend into
//! one generation run:
//!
//! 1. parse every source document into one [`Library`](shdc_lang::Library)
//! 2. compile each shader into every requested variant ([`compiler`])
//! 3. validate programs, types and stage interfaces
//! 4. emit the declarations/definitions pair and replace both files at once

pub mod compiler;
pub mod config;
pub mod output;
pub mod pipeline;

pub use compiler::{
    select_compiler, CompileJob, PrebuiltCompiler, ShaderCompiler, ToolchainCompiler,
};
pub use config::{CompilerKind, GenerateConfig, Overrides};
pub use pipeline::{compile_all, generate, load_library, run, Generated};

pub use shdc_reflect::{ErrorKind, Family, ShaderLang, ShdcError, ShdcResult};
