use arch::{
    mode::operand_words,
    word::{Word, MEMORY_BASE},
};

use crate::{
    context::{Context, Placement},
    error::{Diag, ErrorKind},
    lexer::{self, Directive},
    symbol::Feature,
};

/// Build the symbol table, the data image and the first word of every
/// instruction. Every line is analyzed even after an error.
pub fn run(ctx: &mut Context, lines: &[String]) -> Result<(), Vec<Diag>> {
    let mut diags = vec![];
    for (idx, line) in lines.iter().enumerate() {
        let (ic, dc) = (ctx.image.ic(), ctx.image.dc());
        if let Err(kind) = analyze(ctx, line) {
            diags.push(Diag::new(idx + 1, kind));
            continue;
        }
        if ctx.image.ic() > ic || ctx.image.dc() > dc {
            ctx.placements.push(Placement {
                line: idx + 1,
                code: ic..ctx.image.ic(),
                data: dc..ctx.image.dc(),
            });
        }
    }
    if !diags.is_empty() {
        return Err(diags);
    }

    ctx.symbols
        .rebase_data(ctx.image.ic() as u16 + MEMORY_BASE);
    Ok(())
}

pub fn analyze(ctx: &mut Context, line: &str) -> Result<(), ErrorKind> {
    if lexer::is_ignorable(line) {
        return Ok(());
    }
    if lexer::has_double_comma(line) {
        return Err(ErrorKind::InvalidCommas);
    }
    let label = lexer::extract_label(line)?;

    match lexer::classify_directive(line) {
        Directive::Data => {
            define_data(ctx, label)?;
            let words = data_words(lexer::directive_args(line, Directive::Data))?;
            ctx.image.push_data(&words)
        }
        Directive::String => {
            define_data(ctx, label)?;
            let words = string_words(lexer::directive_args(line, Directive::String))?;
            ctx.image.push_data(&words)
        }
        Directive::Extern => declare_extern(ctx, lexer::directive_args(line, Directive::Extern)),
        Directive::Entry => Ok(()),
        Directive::Unknown if lexer::starts_with_dot(line) => Err(ErrorKind::InvalidDirName),
        Directive::Unknown => instruction(ctx, line, label),
    }
}

// ----------------------------------------------------------------------------
// Directives

fn define_data(ctx: &mut Context, label: Option<&str>) -> Result<(), ErrorKind> {
    match label {
        Some(label) => ctx
            .symbols
            .insert(label, ctx.image.dc() as u16, Feature::Data),
        None => Ok(()),
    }
}

fn data_words(args: &str) -> Result<Vec<Word>, ErrorKind> {
    let words = args
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|tok| !tok.is_empty())
        .map(|tok| {
            lexer::parse_number(tok)
                .map(Word::data)
                .ok_or(ErrorKind::DataOperandInvalid)
        })
        .collect::<Result<Vec<_>, _>>()?;
    if words.is_empty() {
        return Err(ErrorKind::InvalidOperandsDataDir);
    }
    Ok(words)
}

fn string_words(args: &str) -> Result<Vec<Word>, ErrorKind> {
    if args.is_empty() {
        return Err(ErrorKind::InvalidOperandsStringDir);
    }
    let body = lexer::parse_string(args).ok_or(ErrorKind::StringOperandInvalid)?;
    Ok(body
        .chars()
        .map(|c| Word::data(c as i32))
        .chain(std::iter::once(Word::ZERO))
        .collect())
}

fn declare_extern(ctx: &mut Context, name: &str) -> Result<(), ErrorKind> {
    lexer::check_label(name).map_err(|_| ErrorKind::ExternOperandInvalid)?;
    match ctx.symbols.get(name) {
        Some(symbol) if symbol.feature == Feature::Extern => Ok(()),
        Some(_) => Err(ErrorKind::ExternOperandAlreadyExists),
        None => ctx.symbols.insert(name, 0, Feature::Extern),
    }
}

// ----------------------------------------------------------------------------
// Instruction

fn instruction(ctx: &mut Context, line: &str, label: Option<&str>) -> Result<(), ErrorKind> {
    if let Some(label) = label {
        ctx.symbols
            .insert(label, ctx.image.address(), Feature::Code)?;
    }
    let op = lexer::classify_instruction(line).ok_or(ErrorKind::InvalidCmdName)?;

    let operands = lexer::extract_operands(line)?;
    if operands.count() != op.arity() {
        return Err(ErrorKind::InvalidOperandNumberCmd);
    }

    let classify = |tok: &str| lexer::mode_first_pass(tok).ok_or(ErrorKind::InvalidAddrModes);
    let (src, dest) = operands.roles();
    let src = src.map(classify).transpose()?;
    let dest = dest.map(classify).transpose()?;
    if !op.accepts(src, dest) {
        return Err(ErrorKind::InvalidAddrModes);
    }

    ctx.image
        .push_instruction(Word::instruction(op, src, dest), operand_words(src, dest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use arch::{mode::Mode, op::Opcode};

    fn lines(src: &str) -> Vec<String> {
        src.lines().map(String::from).collect()
    }

    macro_rules! test_line {
        ($($name:ident: $line:expr => $expect:expr,)*) => {
            $(
                #[test]
                fn $name() {
                    let mut ctx = Context::new();
                    assert_eq!(analyze(&mut ctx, $line), $expect);
                }
            )*
        }
    }

    test_line! {
        blank: "   " => Ok(()),
        comment: "; mov" => Ok(()),
        double_comma: "mov r1,, r2" => Err(ErrorKind::InvalidCommas),
        bad_label: "1X: stop" => Err(ErrorKind::LabelInvalidSyntax),
        reserved_label: "stop: stop" => Err(ErrorKind::LabelReservedName),
        unknown_directive: "X: .word 5" => Err(ErrorKind::InvalidDirName),
        unknown_command: "move r1, r2" => Err(ErrorKind::InvalidCmdName),
        data_empty: "X: .data" => Err(ErrorKind::InvalidOperandsDataDir),
        data_bad: ".data 1, x, 3" => Err(ErrorKind::DataOperandInvalid),
        data_ok: ".data 1 -2\t+3" => Ok(()),
        string_empty: ".string" => Err(ErrorKind::InvalidOperandsStringDir),
        string_bad: ".string abc" => Err(ErrorKind::StringOperandInvalid),
        string_unterminated: ".string \"abc" => Err(ErrorKind::StringOperandInvalid),
        extern_bad: ".extern 9X" => Err(ErrorKind::ExternOperandInvalid),
        extern_reserved: ".extern r1" => Err(ErrorKind::ExternOperandInvalid),
        extern_missing: ".extern" => Err(ErrorKind::ExternOperandInvalid),
        entry_deferred: ".entry NOWHERE" => Ok(()),
        too_many_operands: "stop r1" => Err(ErrorKind::InvalidOperandNumberCmd),
        too_few_operands: "mov r1" => Err(ErrorKind::InvalidOperandNumberCmd),
        mov_to_immediate: "mov r1, #4" => Err(ErrorKind::InvalidAddrModes),
        lea_from_register: "lea r1, r2" => Err(ErrorKind::InvalidAddrModes),
        jmp_register: "jmp r1" => Err(ErrorKind::InvalidAddrModes),
        garbage_operand: "prn #x" => Err(ErrorKind::InvalidAddrModes),
        third_operand: "mov r1, r2, r3" => Err(ErrorKind::InvalidAddrModes),
        prn_immediate: "prn #-12" => Ok(()),
        jmp_forward: "jmp LATER" => Ok(()),
    }

    #[test]
    fn data_and_string_words() {
        let mut ctx = Context::new();
        analyze(&mut ctx, "ARR: .data 7, -1").unwrap();
        analyze(&mut ctx, "STR: .string \"ab\"").unwrap();
        assert_eq!(ctx.image.dc(), 5);
        assert_eq!(
            ctx.image.data(),
            &[
                Word::data(7),
                Word::data(-1),
                Word::data('a' as i32),
                Word::data('b' as i32),
                Word::ZERO
            ]
        );
        assert_eq!(ctx.symbols.get("ARR").unwrap().address, 0);
        assert_eq!(ctx.symbols.get("STR").unwrap().address, 2);
    }

    #[test]
    fn instruction_reserves_operand_slots() {
        let mut ctx = Context::new();
        analyze(&mut ctx, "MAIN: mov *r1, r2").unwrap();
        analyze(&mut ctx, "  cmp #1, LEN").unwrap();
        analyze(&mut ctx, "  rts").unwrap();
        assert_eq!(ctx.image.ic(), 2 + 3 + 1);
        assert_eq!(ctx.symbols.get("MAIN").unwrap().address, 100);
        assert_eq!(
            ctx.image.code()[0],
            Word::instruction(Opcode::Mov, Some(Mode::RegisterIndirect), Some(Mode::RegisterDirect))
        );
        assert_eq!(ctx.image.code()[5], Word::instruction(Opcode::Rts, None, None));
    }

    #[test]
    fn extern_redeclaration() {
        let mut ctx = Context::new();
        assert_eq!(analyze(&mut ctx, ".extern EXT"), Ok(()));
        assert_eq!(analyze(&mut ctx, ".extern EXT"), Ok(()));
        assert_eq!(analyze(&mut ctx, "EXT: stop"), Err(ErrorKind::LabelAlreadyExists));
        assert_eq!(analyze(&mut ctx, "LOC: stop"), Ok(()));
        assert_eq!(analyze(&mut ctx, ".extern LOC"), Err(ErrorKind::ExternOperandAlreadyExists));
        assert_eq!(ctx.symbols.len(), 2);
    }

    #[test]
    fn collects_every_error() {
        let mut ctx = Context::new();
        let src = lines("L: .data 1\nL: .data 2\nfoo\nstop\n.bogus");
        let diags = run(&mut ctx, &src).unwrap_err();
        let found: Vec<_> = diags.iter().map(|d| (d.line, d.kind)).collect();
        assert_eq!(
            found,
            vec![
                (2, ErrorKind::LabelAlreadyExists),
                (3, ErrorKind::InvalidCmdName),
                (5, ErrorKind::InvalidDirName),
            ]
        );
    }

    #[test]
    fn data_symbols_follow_code() {
        let mut ctx = Context::new();
        let src = lines("X: .data 4\nmov X, r1\nY: .string \"z\"\nstop");
        run(&mut ctx, &src).unwrap();
        // 3 + 1 code words
        assert_eq!(ctx.symbols.get("X").unwrap().address, 104);
        assert_eq!(ctx.symbols.get("Y").unwrap().address, 105);
        assert_eq!(ctx.placements.len(), 4);
        assert_eq!(ctx.placements[1].code, 0..3);
    }
}
