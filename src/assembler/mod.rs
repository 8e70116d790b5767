//! The assembler core: a strictly linear two-pass pipeline.
//!
//! Source text is tokenized into line records, pass 1 assigns every
//! instruction an absolute word address and collects labels, pass 2 checks
//! every operand against the instruction set table and packs the machine
//! words, and the emitter renders them as an MIF memory image. Each stage
//! hands its complete output to the next; nothing is shared or re-entered,
//! and the first error aborts the whole run.

pub mod encoder;
pub mod error;
pub mod isa;
pub mod lexer;
pub mod mif;
pub mod symbols;

use self::encoder::MachineWord;
use self::error::AsmError;
use self::symbols::{CleanInstruction, SymbolTable};

/// Everything a successful run produces, kept around so the caller can
/// print a listing alongside the image.
pub struct Assembly {
    pub instructions: Vec<CleanInstruction>,
    pub symbols: SymbolTable,
    pub words: Vec<MachineWord>,
}

/// Run both passes over `source`. No I/O happens here; the caller decides
/// what to do with the words.
pub fn assemble(source: &str) -> Result<Assembly, AsmError> {
    let (instructions, symbols) = symbols::resolve(lexer::tokenize(source))?;
    let words = encoder::encode(&instructions, &symbols)?;
    Ok(Assembly {
        instructions,
        symbols,
        words,
    })
}
