use color_print::cprintln;
use std::fmt::Display;
use thiserror::Error;

/// Why a source line was rejected.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    #[error("The label is too long")]
    LabelTooLong,

    #[error("The label name is invalid")]
    LabelInvalidSyntax,

    #[error("The label name is reserved")]
    LabelReservedName,

    #[error("The label name is already defined")]
    LabelAlreadyExists,

    #[error("The instruction name is invalid")]
    InvalidCmdName,

    #[error("The directive name is invalid")]
    InvalidDirName,

    #[error("No operands were given to the data directive")]
    InvalidOperandsDataDir,

    #[error("No operand was given to the string directive")]
    InvalidOperandsStringDir,

    #[error("Invalid number of operands for that instruction")]
    InvalidOperandNumberCmd,

    #[error("Invalid addressing modes for that instruction")]
    InvalidAddrModes,

    #[error("Entry operand is not defined")]
    EntryLabelDoesntExist,

    #[error("Extern operand is not valid")]
    ExternOperandInvalid,

    #[error("Extern operand is already defined")]
    ExternOperandAlreadyExists,

    #[error("Two or more consecutive commas")]
    InvalidCommas,

    #[error("The operand of the string directive is invalid")]
    StringOperandInvalid,

    #[error("One or more operands of the data directive are invalid")]
    DataOperandInvalid,

    #[error("Undefined label")]
    UndefinedLabel,

    #[error("Program does not fit in memory")]
    MemoryOverflow,
}

/// A rejected line, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Diag {
    pub line: usize,
    pub kind: ErrorKind,
}

impl Diag {
    pub fn new(line: usize, kind: ErrorKind) -> Self {
        Diag { line, kind }
    }

    /// Print error with the file location and the offending line.
    pub fn print(&self, file: &str, lines: &[String]) {
        cprintln!("<red,bold>error</>: {}", self.kind);
        cprintln!("     <blue>--></> <underline>{}:{}</>", file, self.line);
        cprintln!("      <blue>|</>");
        let content = lines
            .get(self.line.wrapping_sub(1))
            .map(|s| s.as_str())
            .unwrap_or("");
        cprintln!(" <blue>{:>4} |</> {}", self.line, content);
        cprintln!("      <blue>|</>");
    }
}

impl Display for Diag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {}", self.line, self.kind)
    }
}

/// Failures of the driver around the passes.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to open file: {0}")]
    FileOpen(String, #[source] std::io::Error),

    #[error("Failed to read file: {0}")]
    FileRead(String, #[source] std::io::Error),

    #[error("Failed to create file: {0}")]
    FileCreate(String, #[source] std::io::Error),

    #[error("Failed to write file: {0}")]
    FileWrite(String, #[source] std::io::Error),
}
