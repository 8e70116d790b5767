//! Pass 1: address assignment and label collection.
//!
//! Walks the tokenized lines once with a running word address. Labels are
//! recorded at the current address (before any instruction on the same
//! line); instructions become [`CleanInstruction`]s and advance the address
//! by exactly one, since every instruction is a single 16-bit word. No
//! operand validation happens here - forward references only become
//! resolvable once the whole table exists, so all of that is pass 2's job.

use std::collections::HashMap;

use super::error::AsmError;
use super::lexer::RawLine;
use super::mif::ROM_DEPTH;

/// Label -> absolute word address. Insertion only happens during pass 1
/// and is collision-checked; afterwards the table is only read.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct SymbolTable {
    map: HashMap<String, u16>,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable::default()
    }

    /// Record a label. Re-declaring an existing name fails, even when both
    /// declarations would have resolved to the same address.
    pub fn insert(&mut self, label: &str, addr: u16, line: usize) -> Result<(), AsmError> {
        if self.map.contains_key(label) {
            return Err(AsmError::DuplicateLabel {
                line,
                label: label.to_string(),
            });
        }
        self.map.insert(label.to_string(), addr);
        Ok(())
    }

    pub fn lookup(&self, label: &str) -> Option<u16> {
        self.map.get(label).copied()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// An instruction pinned to its word address, ready for encoding.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct CleanInstruction {
    pub addr: u16,
    /// 1-based source line number.
    pub line: usize,
    /// Original text, kept for diagnostics.
    pub raw: String,
    pub mnemonic: String,
    pub operands: Vec<String>,
}

/// Consume the tokenized lines, producing the ordered instruction list and
/// the completed symbol table. Stops at the first error.
pub fn resolve<I>(lines: I) -> Result<(Vec<CleanInstruction>, SymbolTable), AsmError>
where
    I: IntoIterator<Item = Result<RawLine, AsmError>>,
{
    let mut symbols = SymbolTable::new();
    let mut instructions = Vec::new();
    let mut addr: usize = 0;

    for line in lines {
        let line = line?;

        if let Some(label) = &line.label {
            symbols.insert(label, addr as u16, line.line)?;
        }

        if let Some(op) = line.op {
            if addr >= ROM_DEPTH {
                return Err(AsmError::ProgramTooLarge {
                    line: line.line,
                    depth: ROM_DEPTH,
                });
            }
            instructions.push(CleanInstruction {
                addr: addr as u16,
                line: line.line,
                raw: line.raw,
                mnemonic: op.mnemonic,
                operands: op.operands,
            });
            addr += 1;
        }
    }

    Ok((instructions, symbols))
}
