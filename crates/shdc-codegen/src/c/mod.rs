//! C artifact backend.
//!
//! The declarations file is a self-contained header: portable value types,
//! the descriptor structs a runtime reads, one struct per uniform block and
//! variant, and accessor prototypes. The definitions file holds the
//! descriptor tables and the per-variant dispatch accessors.

mod declarations;
mod definitions;
mod names;
mod prelude;

use shdc_reflect::ShdcResult;

use crate::backend::{Backend, Unit};

/// Format version stamped into both artifacts.
pub const VERSION: u32 = 1;

/// Backend emitting a C header and a C source file.
#[derive(Debug, Clone, Copy, Default)]
pub struct CBackend;

impl Backend for CBackend {
    fn name(&self) -> &'static str {
        "c"
    }

    fn declarations(&self, unit: &Unit<'_>) -> ShdcResult<String> {
        let mut out = String::new();
        declarations::write_declarations(&mut out, unit)?;
        Ok(out)
    }

    fn definitions(&self, unit: &Unit<'_>) -> ShdcResult<String> {
        let mut out = String::new();
        definitions::write_definitions(&mut out, unit)?;
        Ok(out)
    }
}
