//! Section nesting.
//!
//! Sections never nest: at most one `@block`, `@vs` or `@fs` is open at any
//! time. The stack is modelled as a tag plus a depth capped at
//! [`MAX_DEPTH`], so the transitions can be checked without building any
//! library objects.

/// Maximum number of simultaneously open sections.
pub const MAX_DEPTH: u8 = 1;

/// The kind of section currently open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Context {
    TopLevel,
    Block,
    VertexShader,
    FragmentShader,
}

impl Context {
    /// Whether `@include` is allowed in this context.
    pub fn is_shader(self) -> bool {
        matches!(self, Context::VertexShader | Context::FragmentShader)
    }

    /// Directive spelling used in diagnostics.
    pub fn tag(self) -> &'static str {
        match self {
            Context::TopLevel => "top level",
            Context::Block => "@block",
            Context::VertexShader => "@vs",
            Context::FragmentShader => "@fs",
        }
    }
}

/// Single-slot section stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextStack {
    current: Context,
    depth: u8,
}

impl ContextStack {
    pub const fn new() -> Self {
        ContextStack {
            current: Context::TopLevel,
            depth: 0,
        }
    }

    pub fn current(&self) -> Context {
        self.current
    }

    pub fn depth(&self) -> u8 {
        self.depth
    }

    /// Open a section.
    ///
    /// On failure the stack is unchanged and the context that blocked the
    /// push is returned.
    pub fn push(&mut self, context: Context) -> Result<(), Context> {
        if self.depth >= MAX_DEPTH || context == Context::TopLevel {
            return Err(self.current);
        }
        self.current = context;
        self.depth += 1;
        Ok(())
    }

    /// Close the open section and return its kind, or `None` at top level.
    pub fn pop(&mut self) -> Option<Context> {
        if self.depth == 0 {
            return None;
        }
        let closed = self.current;
        self.current = Context::TopLevel;
        self.depth -= 1;
        Some(closed)
    }
}

impl Default for ContextStack {
    fn default() -> Self {
        Self::new()
    }
}
