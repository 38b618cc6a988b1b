//! The parsed shader library.
//!
//! Blocks, shaders and programs are kept in declaration order, with a
//! name index per namespace. Vertex and fragment shaders have separate
//! namespaces, but share one flat list so generation can walk them in the
//! order they were written.

use alloc::{
    collections::BTreeMap,
    format,
    string::String,
    vec::Vec,
};

use crate::{
    error::{ShdcError, ShdcResult},
    parser::context::Context,
    sourceloc::SourceLoc,
};

/// What a collected line holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineContent {
    /// Comment-free shader text
    Text(String),
    /// Placeholder for an `@include`d block, resolved by [`Library::expand`]
    Include(String),
}

/// One collected source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub content: LineContent,
    pub loc: SourceLoc,
}

impl Line {
    pub fn text(text: impl Into<String>, loc: SourceLoc) -> Self {
        Line {
            content: LineContent::Text(text.into()),
            loc,
        }
    }

    pub fn include(block: impl Into<String>, loc: SourceLoc) -> Self {
        Line {
            content: LineContent::Include(block.into()),
            loc,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match &self.content {
            LineContent::Text(text) => Some(text),
            LineContent::Include(_) => None,
        }
    }

    pub fn as_include(&self) -> Option<&str> {
        match &self.content {
            LineContent::Include(block) => Some(block),
            LineContent::Text(_) => None,
        }
    }
}

/// A named, reusable fragment of shader text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub name: String,
    pub loc: SourceLoc,
    pub lines: Vec<Line>,
}

impl Block {
    pub fn new(name: impl Into<String>, loc: SourceLoc) -> Self {
        Block {
            name: name.into(),
            loc,
            lines: Vec::new(),
        }
    }
}

/// Pipeline stage of a shader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    /// Short tag, matching the directive that declares the shader.
    pub fn tag(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vs",
            ShaderStage::Fragment => "fs",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
        }
    }
}

impl core::fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// A vertex or fragment shader body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shader {
    pub name: String,
    pub stage: ShaderStage,
    /// Location of the declaring `@vs`/`@fs` line
    pub loc: SourceLoc,
    /// Lines as written, including include placeholders
    pub lines: Vec<Line>,
    /// Lines after inclusion expansion, empty until [`Library::expand`] ran
    pub expanded: Vec<Line>,
}

impl Shader {
    pub fn new(name: impl Into<String>, stage: ShaderStage, loc: SourceLoc) -> Self {
        Shader {
            name: name.into(),
            stage,
            loc,
            lines: Vec::new(),
            expanded: Vec::new(),
        }
    }

    /// Expanded source text handed to the external compiler.
    pub fn source(&self) -> String {
        let mut source = String::new();
        for line in &self.expanded {
            if let Some(text) = line.as_text() {
                source.push_str(text);
                source.push('\n');
            }
        }
        source
    }
}

/// A vertex + fragment shader pairing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    pub name: String,
    pub vs: String,
    pub fs: String,
    pub loc: SourceLoc,
}

/// All blocks, shaders and programs of one generation run.
#[derive(Debug, Clone, Default)]
pub struct Library {
    blocks: Vec<Block>,
    block_index: BTreeMap<String, usize>,
    shaders: Vec<Shader>,
    vertex_index: BTreeMap<String, usize>,
    fragment_index: BTreeMap<String, usize>,
    programs: Vec<Program>,
    program_index: BTreeMap<String, usize>,
}

impl Library {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn block(&self, name: &str) -> Option<&Block> {
        self.block_index.get(name).map(|&i| &self.blocks[i])
    }

    /// All shaders, in declaration order.
    pub fn shaders(&self) -> &[Shader] {
        &self.shaders
    }

    pub fn vertex_shaders(&self) -> impl Iterator<Item = &Shader> {
        self.shaders.iter().filter(|s| s.stage == ShaderStage::Vertex)
    }

    pub fn fragment_shaders(&self) -> impl Iterator<Item = &Shader> {
        self.shaders.iter().filter(|s| s.stage == ShaderStage::Fragment)
    }

    pub fn shader(&self, stage: ShaderStage, name: &str) -> Option<&Shader> {
        let index = match stage {
            ShaderStage::Vertex => &self.vertex_index,
            ShaderStage::Fragment => &self.fragment_index,
        };
        index.get(name).map(|&i| &self.shaders[i])
    }

    /// All programs, in declaration order.
    pub fn programs(&self) -> &[Program] {
        &self.programs
    }

    pub fn program(&self, name: &str) -> Option<&Program> {
        self.program_index.get(name).map(|&i| &self.programs[i])
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty() && self.shaders.is_empty() && self.programs.is_empty()
    }

    /// Register a block.
    ///
    /// # Errors
    ///
    /// Returns a structural error if a block with the same name exists.
    pub fn add_block(&mut self, block: Block) -> ShdcResult<()> {
        if self.block_index.contains_key(&block.name) {
            return Err(ShdcError::structural(format!(
                "@block '{}' already defined",
                block.name
            ))
            .at(block.loc));
        }
        self.block_index.insert(block.name.clone(), self.blocks.len());
        self.blocks.push(block);
        Ok(())
    }

    /// Register a shader in the flat list and in its stage's namespace.
    ///
    /// # Errors
    ///
    /// Returns a structural error if a shader of the same stage and name exists.
    pub fn add_shader(&mut self, shader: Shader) -> ShdcResult<()> {
        let index = match shader.stage {
            ShaderStage::Vertex => &mut self.vertex_index,
            ShaderStage::Fragment => &mut self.fragment_index,
        };
        if index.contains_key(&shader.name) {
            return Err(ShdcError::structural(format!(
                "@{} '{}' already defined",
                shader.stage.tag(),
                shader.name
            ))
            .at(shader.loc));
        }
        index.insert(shader.name.clone(), self.shaders.len());
        self.shaders.push(shader);
        Ok(())
    }

    /// Register a program. Shader names are resolved later, by validation.
    ///
    /// # Errors
    ///
    /// Returns a structural error if a program with the same name exists, or
    /// one whose name differs only in case, since program enumerators are
    /// upper-cased.
    pub fn add_program(&mut self, program: Program) -> ShdcResult<()> {
        if self.program_index.contains_key(&program.name) {
            return Err(ShdcError::structural(format!(
                "@program '{}' already defined",
                program.name
            ))
            .at(program.loc));
        }
        if let Some(other) = self
            .programs
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(&program.name))
        {
            return Err(ShdcError::structural(format!(
                "@program '{}' differs from '{}' only in case",
                program.name, other.name
            ))
            .at(program.loc));
        }
        self.program_index
            .insert(program.name.clone(), self.programs.len());
        self.programs.push(program);
        Ok(())
    }

    /// Name of the section opened last, which is the open one while parsing.
    pub(crate) fn open_section_name(&self, context: Context) -> Option<&str> {
        match context {
            Context::TopLevel => None,
            Context::Block => self.blocks.last().map(|b| b.name.as_str()),
            Context::VertexShader | Context::FragmentShader => {
                self.shaders.last().map(|s| s.name.as_str())
            }
        }
    }

    /// Lines of the open section.
    pub(crate) fn open_lines_mut(&mut self, context: Context) -> Option<&mut Vec<Line>> {
        match context {
            Context::TopLevel => None,
            Context::Block => self.blocks.last_mut().map(|b| &mut b.lines),
            Context::VertexShader | Context::FragmentShader => {
                self.shaders.last_mut().map(|s| &mut s.lines)
            }
        }
    }

    /// Build every shader's expanded line sequence.
    ///
    /// Each include placeholder is replaced by the referenced block's lines.
    /// Blocks cannot contain includes, so expansion is a single level.
    ///
    /// # Errors
    ///
    /// Returns a structural error, located at the `@include` line, when the
    /// referenced block doesn't exist.
    pub fn expand(&mut self) -> ShdcResult<()> {
        for i in 0..self.shaders.len() {
            let expanded = self.expand_lines(&self.shaders[i].lines)?;
            self.shaders[i].expanded = expanded;
        }
        Ok(())
    }

    fn expand_lines(&self, lines: &[Line]) -> ShdcResult<Vec<Line>> {
        let mut expanded = Vec::with_capacity(lines.len());
        for line in lines {
            match &line.content {
                LineContent::Text(_) => expanded.push(line.clone()),
                LineContent::Include(name) => {
                    let block = self.block(name).ok_or_else(|| {
                        ShdcError::structural(format!("included block '{}' doesn't exist", name))
                            .at(line.loc.clone())
                    })?;
                    expanded.extend(block.lines.iter().cloned());
                }
            }
        }
        Ok(expanded)
    }
}
