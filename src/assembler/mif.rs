//! The memory-image emitter.
//!
//! Renders the machine words as a Quartus-style MIF block: header declaring
//! word width, ROM depth and radices, one `address : value ;` line per
//! occupied word (hex addresses, binary data), a fill range for the rest of
//! the ROM, and an end marker. The emitter trusts the encoder completely
//! and performs no validation of its own.

use std::fmt::Write;

use super::encoder::MachineWord;
use super::isa::WORD_BITS;

/// Word capacity of the target ROM.
pub const ROM_DEPTH: usize = 256;

/// Unoccupied addresses hold the all-zero word.
const FILL_WORD: u16 = 0x0000;

/// Render the complete memory image as text. `program_name` only appears
/// in the leading comment.
pub fn render(program_name: &str, words: &[MachineWord]) -> String {
    debug_assert!(words.len() <= ROM_DEPTH);

    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = writeln!(out, "-- program memory file for {}", program_name);
    let _ = writeln!(out, "DEPTH = {};", ROM_DEPTH);
    let _ = writeln!(out, "WIDTH = {};", WORD_BITS);
    let _ = writeln!(out, "ADDRESS_RADIX = HEX;");
    let _ = writeln!(out, "DATA_RADIX = BIN;");
    let _ = writeln!(out, "CONTENT");
    let _ = writeln!(out, "BEGIN");
    for mw in words {
        let _ = writeln!(out, "{:02X} : {:016b};", mw.addr, mw.word);
    }
    if words.len() < ROM_DEPTH {
        let _ = writeln!(
            out,
            "[{:02X}..{:02X}] : {:016b};",
            words.len(),
            ROM_DEPTH - 1,
            FILL_WORD
        );
    }
    let _ = writeln!(out, "END");
    out
}
