use num_enum::{IntoPrimitive, TryFromPrimitive};
use strum::Display;

/// Operand addressing mode. The discriminant is the bit index used by the
/// one-hot mode fields of an instruction word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive, Display)]
#[repr(u8)]
pub enum Mode {
    Immediate = 0,
    Direct = 1,
    RegisterIndirect = 2,
    RegisterDirect = 3,
}

impl Mode {
    pub fn is_register(self) -> bool {
        matches!(self, Mode::RegisterIndirect | Mode::RegisterDirect)
    }
}

/// Number of operand words following the first word of an instruction.
/// Two register-class operands share one word.
pub fn operand_words(src: Option<Mode>, dest: Option<Mode>) -> u16 {
    let mut count = 2;
    if src.is_none() {
        count -= 1;
    }
    if dest.is_none() {
        count -= 1;
    }
    if let (Some(s), Some(d)) = (src, dest) {
        if s.is_register() && d.is_register() {
            count -= 1;
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use Mode::*;

    macro_rules! test_width {
        ($($name:ident: ($src:expr, $dest:expr) => $n:expr,)*) => {
            $(
                #[test]
                fn $name() {
                    assert_eq!(operand_words($src, $dest), $n);
                }
            )*
        }
    }

    test_width! {
        width_none: (None, None) => 0,
        width_dest_only: (None, Some(Direct)) => 1,
        width_dest_register: (None, Some(RegisterDirect)) => 1,
        width_imm_reg: (Some(Immediate), Some(RegisterDirect)) => 2,
        width_dir_dir: (Some(Direct), Some(Direct)) => 2,
        width_reg_reg: (Some(RegisterDirect), Some(RegisterIndirect)) => 1,
        width_ind_ind: (Some(RegisterIndirect), Some(RegisterIndirect)) => 1,
        width_reg_dir: (Some(RegisterDirect), Some(Direct)) => 2,
    }
}
