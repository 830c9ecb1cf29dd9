use arch::{mode::Mode, op::Opcode, reg::Reg};
use bimap::BiMap;
use once_cell::sync::Lazy;

use crate::{error::ErrorKind, symbol::Symbols};

/// Longest legal label name, colon excluded.
pub const MAX_LABEL_LEN: usize = 30;

// ----------------------------------------------------------------------------
// Directive

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Directive {
    Data,
    String,
    Entry,
    Extern,
    Unknown,
}

static DIRECTIVES: Lazy<BiMap<Directive, &'static str>> = Lazy::new(|| {
    let mut map = BiMap::new();
    map.insert(Directive::Data, "data");
    map.insert(Directive::String, "string");
    map.insert(Directive::Entry, "entry");
    map.insert(Directive::Extern, "extern");
    map
});

impl Directive {
    /// Directive name without the leading dot.
    pub fn parse(s: &str) -> Directive {
        DIRECTIVES.get_by_right(s).copied().unwrap_or(Directive::Unknown)
    }

    pub fn name(&self) -> Option<&'static str> {
        DIRECTIVES.get_by_left(self).copied()
    }
}

// ----------------------------------------------------------------------------
// Line shape

pub fn is_ignorable(line: &str) -> bool {
    let line = line.trim_start();
    line.is_empty() || line.starts_with(';')
}

pub fn has_double_comma(line: &str) -> bool {
    line.contains(",,")
}

// ----------------------------------------------------------------------------
// Label

pub fn is_reserved(name: &str) -> bool {
    Reg::parse(name).is_some() || Opcode::parse(name).is_some() || DIRECTIVES.contains_right(name)
}

pub fn check_label(name: &str) -> Result<(), ErrorKind> {
    if name.chars().count() > MAX_LABEL_LEN {
        return Err(ErrorKind::LabelTooLong);
    }
    match name.chars().next() {
        Some(head) if head.is_ascii_alphabetic() => {}
        _ => return Err(ErrorKind::LabelInvalidSyntax),
    }
    if is_reserved(name) {
        return Err(ErrorKind::LabelReservedName);
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ErrorKind::LabelInvalidSyntax);
    }
    Ok(())
}

/// Split a line into its label (if any) and the statement that follows it.
/// A colon that comes after a quote or a semicolon is not a label separator.
fn split_label(line: &str) -> Result<(Option<&str>, &str), ErrorKind> {
    let line = line.trim_start();
    match line.split_once(':') {
        Some((head, rest)) if !head.contains(|c: char| c == '"' || c == ';') => {
            check_label(head)?;
            Ok((Some(head), rest.trim_start()))
        }
        _ => Ok((None, line)),
    }
}

pub fn extract_label(line: &str) -> Result<Option<&str>, ErrorKind> {
    split_label(line).map(|(label, _)| label)
}

/// The line with its label and leading whitespace removed.
pub fn statement(line: &str) -> Result<&str, ErrorKind> {
    split_label(line).map(|(_, stmt)| stmt)
}

// ----------------------------------------------------------------------------
// Directive / Instruction

/// Reads the token right after the first `.` of the line.
pub fn classify_directive(line: &str) -> Directive {
    match line.split_once('.') {
        Some((_, rest)) => Directive::parse(rest.split(char::is_whitespace).next().unwrap_or("")),
        None => Directive::Unknown,
    }
}

/// The text after `.<directive>` on a directive line.
pub fn directive_args(line: &str, dir: Directive) -> &str {
    let Some(name) = dir.name() else {
        return "";
    };
    match line.split_once('.') {
        Some((_, rest)) => rest.strip_prefix(name).unwrap_or(rest).trim(),
        None => "",
    }
}

pub fn starts_with_dot(line: &str) -> bool {
    statement(line).map(|s| s.starts_with('.')).unwrap_or(false)
}

pub fn classify_instruction(line: &str) -> Option<Opcode> {
    let stmt = statement(line).ok()?;
    stmt.split_whitespace().next().and_then(Opcode::parse)
}

// ----------------------------------------------------------------------------
// Operands

/// Operand tokens in source order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Operands<'a> {
    pub first: Option<&'a str>,
    pub second: Option<&'a str>,
}

impl<'a> Operands<'a> {
    pub fn count(&self) -> usize {
        self.first.iter().chain(self.second.iter()).count()
    }

    /// (source, destination). A lone operand is always the destination.
    pub fn roles(&self) -> (Option<&'a str>, Option<&'a str>) {
        match (self.first, self.second) {
            (Some(first), None) => (None, Some(first)),
            (first, second) => (first, second),
        }
    }
}

pub fn extract_operands<'a>(line: &'a str) -> Result<Operands<'a>, ErrorKind> {
    if has_double_comma(line) {
        return Err(ErrorKind::InvalidCommas);
    }
    let stmt = statement(line)?;
    let rest = match stmt.split_once(char::is_whitespace) {
        Some((_, rest)) => rest.trim(),
        None => "",
    };
    let non_empty = |s: &'a str| Some(s.trim()).filter(|s| !s.is_empty());
    match rest.split_once(',') {
        Some((first, second)) => match (non_empty(first), non_empty(second)) {
            (Some(first), Some(second)) => Ok(Operands {
                first: Some(first),
                second: Some(second),
            }),
            _ => Err(ErrorKind::InvalidCommas),
        },
        None => Ok(Operands {
            first: non_empty(rest),
            second: None,
        }),
    }
}

// ----------------------------------------------------------------------------
// Literals

/// Optional sign followed by decimal digits only.
pub fn parse_number(s: &str) -> Option<i32> {
    let digits = s.strip_prefix(|c: char| c == '+' || c == '-').unwrap_or(s);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse::<i32>().ok()
}

/// Body of a `"..."` literal; nothing but whitespace may follow it.
pub fn parse_string(s: &str) -> Option<&str> {
    let body = s.strip_prefix('"')?;
    let (inner, after) = body.split_once('"')?;
    if after.trim().is_empty() {
        Some(inner)
    } else {
        None
    }
}

/// Register named by a `rN` or `*rN` operand.
pub fn operand_register(s: &str) -> Option<Reg> {
    Reg::parse(s.strip_prefix('*').unwrap_or(s))
}

// ----------------------------------------------------------------------------
// Addressing mode

fn is_immediate(s: &str) -> bool {
    s.strip_prefix('#').and_then(parse_number).is_some()
}

fn is_register_indirect(s: &str) -> bool {
    s.strip_prefix('*').and_then(Reg::parse).is_some()
}

/// Syntax only: labels may not be defined yet.
pub fn mode_first_pass(s: &str) -> Option<Mode> {
    if is_immediate(s) {
        Some(Mode::Immediate)
    } else if is_register_indirect(s) {
        Some(Mode::RegisterIndirect)
    } else if Reg::parse(s).is_some() {
        Some(Mode::RegisterDirect)
    } else if check_label(s).is_ok() {
        Some(Mode::Direct)
    } else {
        None
    }
}

/// A label is direct only once it is in the table; it is checked before
/// the register forms.
pub fn mode_second_pass(s: &str, symbols: &Symbols) -> Option<Mode> {
    if is_immediate(s) {
        Some(Mode::Immediate)
    } else if symbols.contains(s) {
        Some(Mode::Direct)
    } else if is_register_indirect(s) {
        Some(Mode::RegisterIndirect)
    } else if Reg::parse(s).is_some() {
        Some(Mode::RegisterDirect)
    } else {
        None
    }
}
