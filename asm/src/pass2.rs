use arch::{mode::Mode, reg::Reg, word::Word};

use crate::{
    context::Context,
    error::{Diag, ErrorKind},
    lexer::{self, Directive},
    symbol::Feature,
};

/// Fill in the operand words reserved by the first pass, mark entries and
/// record every use of an external symbol.
pub fn run(ctx: &mut Context, lines: &[String]) -> Result<(), Vec<Diag>> {
    ctx.image.rewind();
    let diags: Vec<Diag> = lines
        .iter()
        .enumerate()
        .filter_map(|(idx, line)| {
            analyze(ctx, line)
                .err()
                .map(|kind| Diag::new(idx + 1, kind))
        })
        .collect();
    if diags.is_empty() {
        Ok(())
    } else {
        Err(diags)
    }
}

pub fn analyze(ctx: &mut Context, line: &str) -> Result<(), ErrorKind> {
    if lexer::is_ignorable(line) {
        return Ok(());
    }
    match lexer::classify_directive(line) {
        Directive::Data | Directive::String | Directive::Extern => Ok(()),
        Directive::Entry => ctx
            .symbols
            .mark_entry(lexer::directive_args(line, Directive::Entry)),
        Directive::Unknown => instruction(ctx, line),
    }
}

fn instruction(ctx: &mut Context, line: &str) -> Result<(), ErrorKind> {
    let operands = lexer::extract_operands(line)?;
    let (src, dest) = operands.roles();

    // first word was emitted by the first pass
    ctx.image.skip();

    if let (Some(src), Some(dest)) = (src, dest) {
        let src_reg = register_operand(ctx, src);
        let dest_reg = register_operand(ctx, dest);
        if let (Some(src_reg), Some(dest_reg)) = (src_reg, dest_reg) {
            ctx.image.put(Word::registers(src_reg, dest_reg));
            return Ok(());
        }
    }

    let mut result = Ok(());
    for (token, is_source) in [(src, true), (dest, false)] {
        let Some(token) = token else {
            continue;
        };
        match operand_word(ctx, token, is_source) {
            Some(word) => ctx.image.put(word),
            None => {
                ctx.image.skip();
                result = Err(ErrorKind::UndefinedLabel);
            }
        }
    }
    result
}

/// Register of a `rN` or `*rN` operand that does not name a label.
fn register_operand(ctx: &Context, token: &str) -> Option<Reg> {
    match lexer::mode_second_pass(token, &ctx.symbols)? {
        mode if mode.is_register() => lexer::operand_register(token),
        _ => None,
    }
}

fn operand_word(ctx: &mut Context, token: &str, is_source: bool) -> Option<Word> {
    match lexer::mode_second_pass(token, &ctx.symbols)? {
        Mode::Immediate => {
            let value = token.strip_prefix('#').and_then(lexer::parse_number)?;
            Some(Word::immediate(value))
        }
        Mode::Direct => {
            let symbol = ctx.symbols.get(token)?;
            if symbol.feature == Feature::Extern {
                ctx.externs.record(token, ctx.image.address());
            }
            Some(symbol.operand_word())
        }
        Mode::RegisterIndirect | Mode::RegisterDirect => {
            lexer::operand_register(token).map(|reg| Word::register(reg, is_source))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pass1;
    use arch::word::Are;

    fn assemble(src: &str) -> (Context, Result<(), Vec<Diag>>) {
        let lines: Vec<String> = src.lines().map(String::from).collect();
        let mut ctx = Context::new();
        pass1::run(&mut ctx, &lines).unwrap();
        let result = run(&mut ctx, &lines);
        (ctx, result)
    }

    #[test]
    fn registers_share_one_word() {
        let (ctx, result) = assemble("mov *r2, r5\nstop");
        result.unwrap();
        assert_eq!(ctx.image.code().len(), 3);
        assert_eq!(ctx.image.code()[1], Word::registers(Reg::R2, Reg::R5));
        assert_eq!(ctx.image.code()[1].src_reg(), Reg::R2);
        assert_eq!(ctx.image.code()[1].dest_reg(), Reg::R5);
    }

    #[test]
    fn operand_words_in_order() {
        let (ctx, result) = assemble("K: .data 3\ncmp #-1, K\nprn r3\nstop");
        result.unwrap();
        let code = ctx.image.code();
        assert_eq!(code[1], Word::immediate(-1));
        // 3 + 2 + 1 code words
        assert_eq!(code[2], Word::address(106, Are::Relocatable));
        assert_eq!(code[4], Word::register(Reg::R3, false));
    }

    #[test]
    fn extern_use_records_operand_address() {
        let (ctx, result) = assemble(".extern X\njmp X\nmov X, r1\nstop");
        result.unwrap();
        let uses: Vec<_> = ctx.externs.iter().map(|e| (e.name.as_str(), e.address)).collect();
        assert_eq!(uses, vec![("X", 101), ("X", 103)]);
        assert_eq!(ctx.image.code()[1], Word::address(0, Are::External));
        assert_eq!(ctx.image.code()[1].are(), Some(Are::External));
    }

    #[test]
    fn entries_are_marked() {
        let (ctx, result) = assemble("MAIN: stop\n.entry MAIN");
        result.unwrap();
        let entries: Vec<_> = ctx.symbols.entries().map(|s| s.name.as_str()).collect();
        assert_eq!(entries, vec!["MAIN"]);
    }

    #[test]
    fn missing_entry() {
        let (_, result) = assemble("stop\n.entry GONE");
        let diags = result.unwrap_err();
        assert_eq!(diags, vec![Diag::new(2, ErrorKind::EntryLabelDoesntExist)]);
    }

    #[test]
    fn undefined_label_keeps_alignment() {
        let (ctx, result) = assemble("mov NOWHERE, r1\nprn #7\nstop");
        let diags = result.unwrap_err();
        assert_eq!(diags, vec![Diag::new(1, ErrorKind::UndefinedLabel)]);
        assert_eq!(ctx.image.code()[1], Word::ZERO);
        assert_eq!(ctx.image.code()[2], Word::register(Reg::R1, false));
        assert_eq!(ctx.image.code()[4], Word::immediate(7));
    }
}
