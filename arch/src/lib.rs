//! Target architecture of the 15-bit word machine: registers, opcodes,
//! addressing modes and the bit layout of machine words.

pub mod mode;
pub mod op;
pub mod reg;
pub mod word;
