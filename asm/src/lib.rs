//! Two-pass assembler for the 15-bit word machine.
//!
//! The first pass builds the symbol table and the data image and reserves
//! space for every instruction. The second pass fills in operand words that
//! depend on symbols. Output is produced only when both passes are clean.

pub mod context;
pub mod error;
pub mod image;
pub mod lexer;
pub mod listing;
pub mod output;
pub mod pass1;
pub mod pass2;
pub mod symbol;

use std::io::BufRead;

use context::Context;
use error::{Diag, Error};
use output::Output;

/// A source file held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub path: String,
    pub lines: Vec<String>,
}

impl Source {
    pub fn new(path: &str, text: &str) -> Self {
        Source {
            path: path.to_string(),
            lines: text.lines().map(String::from).collect(),
        }
    }

    pub fn read(path: &str) -> Result<Self, Error> {
        let file = std::fs::File::open(path).map_err(|e| Error::FileOpen(path.to_string(), e))?;
        let lines = std::io::BufReader::new(file)
            .lines()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| Error::FileRead(path.to_string(), e))?;
        Ok(Source {
            path: path.to_string(),
            lines,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    First,
    Second,
}

/// Diagnostics of the pass that stopped the translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub pass: Pass,
    pub diags: Vec<Diag>,
}

/// Run both passes over a fresh context.
pub fn translate(source: &Source) -> Result<Context, Failure> {
    let mut ctx = Context::new();
    pass1::run(&mut ctx, &source.lines).map_err(|diags| Failure {
        pass: Pass::First,
        diags,
    })?;
    pass2::run(&mut ctx, &source.lines).map_err(|diags| Failure {
        pass: Pass::Second,
        diags,
    })?;
    Ok(ctx)
}

pub fn assemble(source: &Source) -> Result<Output, Failure> {
    translate(source).map(|ctx| Output::render(&ctx))
}
