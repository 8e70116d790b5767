//! Every way an assembly run can fail.
//!
//! All errors are fatal: the first one encountered aborts the run, and no
//! output file is written. Each variant carries the 1-based source line
//! number and the offending text so the message points at real source.

use std::error;
use std::fmt;

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum AsmError {
    /// A line could not be split into label/mnemonic/operands.
    Syntax { line: usize, text: String },
    /// The mnemonic is not in the instruction set table.
    UnknownMnemonic { line: usize, mnemonic: String },
    /// The operand count disagrees with the mnemonic's spec.
    OperandCount {
        line: usize,
        mnemonic: String,
        expected: usize,
        found: usize,
    },
    /// A register operand does not name a register valid in its position.
    RegisterName { line: usize, name: String },
    /// A numeric literal does not fit the destination field width.
    ImmediateOverflow {
        line: usize,
        literal: String,
        bits: u8,
    },
    /// A branch/address operand references a label never declared.
    UndefinedLabel { line: usize, label: String },
    /// A label is declared more than once.
    DuplicateLabel { line: usize, label: String },
    /// The program does not fit in the target ROM.
    ProgramTooLarge { line: usize, depth: usize },
}

impl AsmError {
    /// 1-based source line the error points at.
    pub fn line(&self) -> usize {
        use AsmError::*;
        match self {
            Syntax { line, .. }
            | UnknownMnemonic { line, .. }
            | OperandCount { line, .. }
            | RegisterName { line, .. }
            | ImmediateOverflow { line, .. }
            | UndefinedLabel { line, .. }
            | DuplicateLabel { line, .. }
            | ProgramTooLarge { line, .. } => *line,
        }
    }
}

impl fmt::Display for AsmError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use AsmError::*;
        match self {
            Syntax { line, text } => {
                write!(f, "syntax error on line {}: `{}`", line, text)
            }
            UnknownMnemonic { line, mnemonic } => {
                write!(f, "unknown mnemonic `{}` on line {}", mnemonic, line)
            }
            OperandCount {
                line,
                mnemonic,
                expected,
                found,
            } => write!(
                f,
                "`{}` on line {} takes {} operand(s), found {}",
                mnemonic, line, expected, found
            ),
            RegisterName { line, name } => {
                write!(f, "`{}` on line {} is not a valid register here", name, line)
            }
            ImmediateOverflow {
                line,
                literal,
                bits,
            } => write!(
                f,
                "value `{}` on line {} does not fit in a {}-bit field",
                literal, line, bits
            ),
            UndefinedLabel { line, label } => {
                write!(f, "undefined label `{}` on line {}", label, line)
            }
            DuplicateLabel { line, label } => {
                write!(f, "duplicate label `{}` on line {}", label, line)
            }
            ProgramTooLarge { line, depth } => write!(
                f,
                "program exceeds ROM depth of {} words at line {}",
                depth, line
            ),
        }
    }
}

impl error::Error for AsmError {}
