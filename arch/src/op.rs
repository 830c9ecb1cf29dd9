use num_enum::{IntoPrimitive, TryFromPrimitive};
use strum::{Display, EnumIter, EnumString};

use crate::mode::Mode;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    IntoPrimitive,
    TryFromPrimitive,
    EnumString,
    EnumIter,
    Display,
)]
#[repr(u8)]
#[strum(serialize_all = "lowercase")]
pub enum Opcode {
    Mov,
    Cmp,
    Add,
    Sub,
    Lea,
    Clr,
    Not,
    Inc,
    Dec,
    Jmp,
    Bne,
    Red,
    Prn,
    Jsr,
    Rts,
    Stop,
}

impl Opcode {
    /// Exact, case sensitive mnemonic match.
    pub fn parse(s: &str) -> Option<Self> {
        s.parse::<Self>().ok()
    }

    pub fn code(self) -> u16 {
        u8::from(self) as u16
    }
}

const ALL: &[Mode] = &[
    Mode::Immediate,
    Mode::Direct,
    Mode::RegisterIndirect,
    Mode::RegisterDirect,
];
const WRITABLE: &[Mode] = &[Mode::Direct, Mode::RegisterIndirect, Mode::RegisterDirect];
const JUMP: &[Mode] = &[Mode::Direct, Mode::RegisterIndirect];
const LABEL: &[Mode] = &[Mode::Direct];
const NONE: &[Mode] = &[];

impl Opcode {
    /// Allowed (source, destination) addressing modes. An empty set means the
    /// operand must be absent.
    pub fn operands(&self) -> (&'static [Mode], &'static [Mode]) {
        use Opcode::*;
        match self {
            Cmp => (ALL, ALL),
            Mov | Add | Sub => (ALL, WRITABLE),
            Lea => (LABEL, WRITABLE),
            Clr | Not | Inc | Dec | Red => (NONE, WRITABLE),
            Jmp | Bne | Jsr => (NONE, JUMP),
            Prn => (NONE, ALL),
            Rts | Stop => (NONE, NONE),
        }
    }

    pub fn arity(&self) -> usize {
        let (src, dest) = self.operands();
        [src, dest].iter().filter(|set| !set.is_empty()).count()
    }

    pub fn accepts(&self, src: Option<Mode>, dest: Option<Mode>) -> bool {
        fn fits(set: &[Mode], mode: Option<Mode>) -> bool {
            match mode {
                Some(mode) => set.contains(&mode),
                None => set.is_empty(),
            }
        }
        let (src_set, dest_set) = self.operands();
        fits(src_set, src) && fits(dest_set, dest)
    }
}
