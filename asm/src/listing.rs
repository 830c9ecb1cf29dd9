use arch::{
    mode::Mode,
    word::{Word, MEMORY_BASE},
};
use color_print::cformat;

use crate::{context::Context, lexer, symbol::Feature, Source};

const GUTTER: usize = 14;

fn mode_sigil(mode: Option<Mode>) -> &'static str {
    match mode {
        None => "-",
        Some(Mode::Immediate) => "#",
        Some(Mode::Direct) => "L",
        Some(Mode::RegisterIndirect) => "*r",
        Some(Mode::RegisterDirect) => "r",
    }
}

/// Opcode and operand modes of a first instruction word.
fn describe(word: Word) -> String {
    match word.opcode() {
        Some(op) => cformat!(
            "<m>{}</> {},{}",
            op,
            mode_sigil(word.src_mode()),
            mode_sigil(word.dest_mode())
        ),
        None => String::new(),
    }
}

fn source_column(line_num: usize, text: &str) -> String {
    match lexer::extract_label(text) {
        Ok(Some(label)) => {
            let rest = lexer::statement(text).unwrap_or("");
            cformat!("{:>4}: <g>{}:</> {}", line_num, label, rest)
        }
        _ => format!("{:>4}: {}", line_num, text),
    }
}

/// Listing of the assembled image next to the source, one row per word.
pub fn render(source: &Source, ctx: &Context) -> Vec<String> {
    let code = ctx.image.code();
    let data = ctx.image.data();
    let data_base = MEMORY_BASE as usize + code.len();

    let mut rows = vec![format!(
        "{}+------[{}]{}",
        "-".repeat(GUTTER + 1),
        source.path,
        "-".repeat(45usize.saturating_sub(source.path.len()))
    )];

    let mut placements = ctx.placements.iter().peekable();
    for (idx, text) in source.lines.iter().enumerate() {
        let line_num = idx + 1;
        let placement = placements.next_if(|p| p.line == line_num);

        let mut words: Vec<String> = vec![];
        if let Some(placement) = placement {
            for (n, i) in placement.code.clone().enumerate() {
                let word = code[i];
                let note = if n == 0 { describe(word) } else { String::new() };
                words.push(format!(
                    "[{:04}] {}{}",
                    i + MEMORY_BASE as usize,
                    word.cformat(),
                    note
                ));
            }
            for i in placement.data.clone() {
                words.push(cformat!("[{:04}] <y>{}</>  ", data_base + i, data[i].octal()));
            }
        }

        match words.split_first() {
            Some((first, rest)) => {
                rows.push(format!("{} | {}", first, source_column(line_num, text)));
                rows.extend(rest.iter().map(|w| format!("{} |", w)));
            }
            None => rows.push(format!("{} | {}", " ".repeat(GUTTER), source_column(line_num, text))),
        }
    }

    rows.push(format!("{}+{}", "-".repeat(GUTTER + 1), "-".repeat(53)));
    for symbol in ctx.symbols.iter() {
        let feature = match symbol.feature {
            Feature::Code => cformat!("<g>code</>"),
            Feature::Data => cformat!("<c>data</>"),
            Feature::Extern => cformat!("<r>extern</>"),
        };
        let entry = if symbol.is_entry { " entry" } else { "" };
        rows.push(format!("[{:04}] {:>7} | {}{}", symbol.address, feature, symbol.name, entry));
    }
    rows
}

pub fn print_dump(source: &Source, ctx: &Context) {
    for row in render(source, ctx) {
        println!("{}", row);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translate;

    #[test]
    fn one_row_per_word() {
        let source = Source::new("prog.as", "MAIN: mov #5, r1\n; done\nstop\nS: .string \"a\"");
        let ctx = translate(&source).unwrap();
        let rows = render(&source, &ctx);

        // header, 3 + 1 + 1 + 2 word rows, separator, 2 symbols
        assert_eq!(rows.len(), 1 + 3 + 1 + 1 + 2 + 1 + 2);
        assert!(rows[0].contains("[prog.as]"));
        assert!(rows[1].starts_with("[0100]"));
        assert!(rows[1].contains("mov"));
        assert!(rows[2].starts_with("[0101]"));
        assert!(rows[4].contains("; done"));
        assert!(rows[5].starts_with("[0103]"));
        assert!(rows[6].starts_with("[0104]"));
        assert!(rows[7].starts_with("[0105]"));
        assert!(rows[9].contains("MAIN"));
        assert!(rows[10].starts_with("[0104]"));
    }
}
