//! Pass 2: operand validation and instruction encoding.
//!
//! Consumes the ordered instruction list and the completed symbol table.
//! Validation is eager and total - every instruction must encode before any
//! output is considered valid, and the first failure aborts the run. All
//! range and class checks are driven by the field slots the instruction set
//! table declares.

use super::error::AsmError;
use super::isa::{self, Field, OperandKind};
use super::symbols::{CleanInstruction, SymbolTable};

/// A 16-bit machine word plus the ROM address it occupies.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct MachineWord {
    pub addr: u16,
    pub word: u16,
}

/// Encode every instruction in address order.
pub fn encode(
    instructions: &[CleanInstruction],
    symbols: &SymbolTable,
) -> Result<Vec<MachineWord>, AsmError> {
    instructions
        .iter()
        .map(|instruction| {
            let word = encode_one(instruction, symbols)?;
            Ok(MachineWord {
                addr: instruction.addr,
                word,
            })
        })
        .collect()
}

fn encode_one(instruction: &CleanInstruction, symbols: &SymbolTable) -> Result<u16, AsmError> {
    let line = instruction.line;

    let spec = isa::lookup(&instruction.mnemonic).ok_or_else(|| AsmError::UnknownMnemonic {
        line,
        mnemonic: instruction.mnemonic.clone(),
    })?;

    if instruction.operands.len() != spec.fields.len() {
        return Err(AsmError::OperandCount {
            line,
            mnemonic: instruction.mnemonic.clone(),
            expected: spec.fields.len(),
            found: instruction.operands.len(),
        });
    }

    let values = spec
        .fields
        .iter()
        .zip(&instruction.operands)
        .map(|(field, operand)| operand_value(field, operand, line, symbols))
        .collect::<Result<Vec<u16>, AsmError>>()?;

    Ok(spec.encode(&values))
}

/// Validate one operand against its field slot and produce the raw field
/// value to pack.
fn operand_value(
    field: &Field,
    operand: &str,
    line: usize,
    symbols: &SymbolTable,
) -> Result<u16, AsmError> {
    match field.kind {
        OperandKind::Register(class) => {
            isa::register_id(operand, class).ok_or_else(|| AsmError::RegisterName {
                line,
                name: operand.to_string(),
            })
        }
        OperandKind::Immediate => {
            // Two's complement: an N-bit field holds [-2^(N-1), 2^(N-1)-1].
            let value: i32 = operand.parse().map_err(|_| AsmError::Syntax {
                line,
                text: operand.to_string(),
            })?;
            let max = (1i32 << (field.width - 1)) - 1;
            let min = -(1i32 << (field.width - 1));
            if value < min || value > max {
                return Err(AsmError::ImmediateOverflow {
                    line,
                    literal: operand.to_string(),
                    bits: field.width,
                });
            }
            Ok((value as u16) & (((1u32 << field.width) - 1) as u16))
        }
        OperandKind::LabelOrAddress => {
            // A decimal literal is an absolute word address; anything else
            // is a label. Either way the result is absolute, never a
            // displacement.
            let addr = if operand.chars().next().map_or(false, |c| c.is_ascii_digit() || c == '-') {
                operand.parse::<i64>().map_err(|_| AsmError::Syntax {
                    line,
                    text: operand.to_string(),
                })?
            } else {
                match symbols.lookup(operand) {
                    Some(addr) => i64::from(addr),
                    None => {
                        return Err(AsmError::UndefinedLabel {
                            line,
                            label: operand.to_string(),
                        })
                    }
                }
            };
            let max = (1i64 << field.width) - 1;
            if addr < 0 || addr > max {
                return Err(AsmError::ImmediateOverflow {
                    line,
                    literal: operand.to_string(),
                    bits: field.width,
                });
            }
            Ok(addr as u16)
        }
    }
}
