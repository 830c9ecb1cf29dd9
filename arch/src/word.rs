use color_print::cformat;
use num_enum::{IntoPrimitive, TryFromPrimitive};
use std::fmt::Display;

use crate::{mode::Mode, op::Opcode, reg::Reg};

pub const WORD_BITS: u32 = 15;
pub const WORD_MASK: u16 = (1u16 << WORD_BITS) - 1;

/// Added to a zero based image index to get a machine address.
pub const MEMORY_BASE: u16 = 100;

/// Combined capacity of the code and data images, in words.
pub const MEMORY_SIZE: usize = 4096;

// ----------------------------------------------------------------------------
// Fields

#[derive(Debug, Clone, Copy)]
struct Field {
    offset: u32,
    width: u32,
}

impl Field {
    const fn new(offset: u32, width: u32) -> Self {
        Field { offset, width }
    }

    const fn low(self) -> u16 {
        (1u16 << self.width) - 1
    }

    const fn mask(self) -> u16 {
        self.low() << self.offset
    }

    fn put(self, raw: u16, value: u16) -> u16 {
        (raw & !self.mask()) | ((value & self.low()) << self.offset)
    }

    fn get(self, raw: u16) -> u16 {
        (raw & self.mask()) >> self.offset
    }
}

const ARE: Field = Field::new(0, 3);
const DEST_MODE: Field = Field::new(3, 4);
const SRC_MODE: Field = Field::new(7, 4);
const OPCODE: Field = Field::new(11, 4);
const DEST_REG: Field = Field::new(3, 3);
const SRC_REG: Field = Field::new(6, 3);
const VALUE: Field = Field::new(3, 12);

/// Smallest and largest values the operand value field holds as signed.
pub const VALUE_MIN: i32 = -(1 << 11);
pub const VALUE_MAX: i32 = (1 << 11) - 1;

// ----------------------------------------------------------------------------
// ARE

/// Relocation tag. The discriminant is the bit index inside the ARE field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum Are {
    External = 0,
    Relocatable = 1,
    Absolute = 2,
}

impl Are {
    pub fn letter(self) -> char {
        match self {
            Are::Absolute => 'A',
            Are::Relocatable => 'R',
            Are::External => 'E',
        }
    }
}

fn one_hot(bits: u16) -> Option<u8> {
    if bits.count_ones() == 1 {
        Some(bits.trailing_zeros() as u8)
    } else {
        None
    }
}

// ----------------------------------------------------------------------------
// Word

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Word(u16);

impl Word {
    pub const ZERO: Word = Word(0);

    pub const fn new(raw: u16) -> Self {
        Word(raw & WORD_MASK)
    }

    pub fn raw(self) -> u16 {
        self.0
    }

    fn with_are(raw: u16, are: Are) -> Self {
        Word::new(ARE.put(raw, 1u16 << u8::from(are)))
    }

    /// A data image word: the value truncated to 15 bits, two's complement.
    pub fn data(value: i32) -> Self {
        Word::new(value as u16)
    }

    /// First word of an instruction. An absent operand sets no mode bit.
    pub fn instruction(op: Opcode, src: Option<Mode>, dest: Option<Mode>) -> Self {
        let mut raw = OPCODE.put(0, op.code());
        if let Some(mode) = src {
            raw = SRC_MODE.put(raw, 1u16 << u8::from(mode));
        }
        if let Some(mode) = dest {
            raw = DEST_MODE.put(raw, 1u16 << u8::from(mode));
        }
        Word::with_are(raw, Are::Absolute)
    }

    pub fn immediate(value: i32) -> Self {
        Word::with_are(VALUE.put(0, value as u16), Are::Absolute)
    }

    pub fn address(addr: u16, are: Are) -> Self {
        Word::with_are(VALUE.put(0, addr), are)
    }

    pub fn register(reg: Reg, is_source: bool) -> Self {
        let field = if is_source { SRC_REG } else { DEST_REG };
        Word::with_are(field.put(0, reg.num()), Are::Absolute)
    }

    pub fn registers(src: Reg, dest: Reg) -> Self {
        let raw = SRC_REG.put(0, src.num());
        Word::with_are(DEST_REG.put(raw, dest.num()), Are::Absolute)
    }
}

impl Word {
    pub fn are(self) -> Option<Are> {
        one_hot(ARE.get(self.0)).and_then(|bit| Are::try_from(bit).ok())
    }

    pub fn opcode(self) -> Option<Opcode> {
        Opcode::try_from(OPCODE.get(self.0) as u8).ok()
    }

    pub fn src_mode(self) -> Option<Mode> {
        one_hot(SRC_MODE.get(self.0)).and_then(|bit| Mode::try_from(bit).ok())
    }

    pub fn dest_mode(self) -> Option<Mode> {
        one_hot(DEST_MODE.get(self.0)).and_then(|bit| Mode::try_from(bit).ok())
    }

    /// The 12-bit value field, sign extended.
    pub fn value(self) -> i16 {
        let v = VALUE.get(self.0) as i16;
        if v & (1 << 11) != 0 {
            v - (1 << 12)
        } else {
            v
        }
    }

    /// The 12-bit value field, unsigned.
    pub fn addr(self) -> u16 {
        VALUE.get(self.0)
    }

    pub fn src_reg(self) -> Reg {
        Reg::try_from(SRC_REG.get(self.0) as u8).unwrap_or(Reg::R0)
    }

    pub fn dest_reg(self) -> Reg {
        Reg::try_from(DEST_REG.get(self.0) as u8).unwrap_or(Reg::R0)
    }

    /// Five octal digits, zero padded.
    pub fn octal(self) -> String {
        format!("{:05o}", self.0)
    }

    pub fn cformat(self) -> String {
        let are = self.are().map(Are::letter).unwrap_or('-');
        cformat!("<y>{}</> <c>{}</>", self.octal(), are)
    }
}

impl Display for Word {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.octal())
    }
}
