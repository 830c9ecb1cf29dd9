use std::ops::Range;

use crate::{
    image::Image,
    symbol::{Externs, Symbols},
};

/// Image words produced by one source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub line: usize,
    pub code: Range<usize>,
    pub data: Range<usize>,
}

/// All mutable state of one translation unit. A fresh context is created
/// for every input file.
#[derive(Debug, Clone, Default)]
pub struct Context {
    pub symbols: Symbols,
    pub externs: Externs,
    pub image: Image,
    pub placements: Vec<Placement>,
}

impl Context {
    pub fn new() -> Self {
        Context::default()
    }

    pub fn has_entries(&self) -> bool {
        self.symbols.entries().next().is_some()
    }

    pub fn has_externs(&self) -> bool {
        !self.externs.is_empty()
    }
}
