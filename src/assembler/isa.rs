//! The instruction set table.
//!
//! Every supported mnemonic is described by one [`InstructionSpec`]: a base
//! bit pattern (primary opcode plus don't-care bits, which this hardware
//! reads as 1s) and an ordered list of operand field slots. The table is the
//! single source of truth for operand counts, register classes, and field
//! widths; the encoder delegates all range checks to it. Adding an
//! instruction means adding one entry here, never new branching logic.
//!
//! Layout summary (one 16-bit word per instruction):
//!
//! ```text
//! load/loada/store/storea   00000..00011  reg[10:8]  addr[7:0]
//! braz/bran                 00100..00101  reg[10:8]  addr[7:0]
//! bra/brao/brac/call        00110         sub[10:8]  addr[7:0]
//! return/halt               00111         sub[10:8]  11111111
//! push/pop/oport/iport      0100..0111    reg[11:9]  111111111
//! add/sub/and/or/xor        1000..1100    a[11:9] b[8:6] 111 c[2:0]
//! shiftl/shiftr/rotl/rotr   11010..11101  a[10:8] 11111 c[2:0]
//! move                      11110         a[10:8] 11111 c[2:0]
//! movei                     11111         imm[10:3] reg[2:0]
//! ```

use std::collections::HashMap;

use lazy_static::lazy_static;

/// Word width of the target machine.
pub const WORD_BITS: u8 = 16;

/// Which register names are legal in a given operand position.
///
/// The numeric ids 0-5 always mean `ra`..`sp`; ids 6 and 7 change meaning
/// with the instruction family, which is why the class travels with the
/// field rather than with the register name.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum RegClass {
    /// `ra rb rc rd re sp` - any writable register.
    General,
    /// General plus the constant sources `zeros` and `ones`.
    Alu,
    /// General plus `pc` and `cr`, for push/pop.
    Stack,
    /// General plus `pc` and `ir`, for port transfers and `move` sources.
    Port,
}

/// Tagged operand shape, one per field slot.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum OperandKind {
    Register(RegClass),
    /// Signed two's-complement literal.
    Immediate,
    /// A label, or a literal absolute word address.
    LabelOrAddress,
}

/// One operand field: its kind plus where it lands in the word.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Field {
    pub kind: OperandKind,
    pub shift: u8,
    pub width: u8,
}

impl Field {
    const fn new(kind: OperandKind, shift: u8, width: u8) -> Self {
        Field { kind, shift, width }
    }

    /// Bit mask of this field within the instruction word.
    pub fn mask(&self) -> u16 {
        (((1u32 << self.width) - 1) as u16) << self.shift
    }
}

/// Static description of a single mnemonic.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct InstructionSpec {
    pub mnemonic: &'static str,
    /// Opcode bits plus don't-care 1s; all operand field bits are 0.
    pub base: u16,
    /// Field slots in source operand order.
    pub fields: &'static [Field],
}

impl InstructionSpec {
    /// Pack validated operand field values into the instruction word.
    ///
    /// `values` must hold one already-range-checked value per field, in
    /// operand order. Pure: same inputs, same word.
    pub fn encode(&self, values: &[u16]) -> u16 {
        debug_assert_eq!(values.len(), self.fields.len());
        self.fields
            .iter()
            .zip(values)
            .fold(self.base, |word, (field, &value)| {
                word | ((value << field.shift) & field.mask())
            })
    }
}

use OperandKind::{Immediate, LabelOrAddress, Register};
use RegClass::{Alu, General, Port, Stack};

const REG_HI: Field = Field::new(Register(General), 8, 3);
const ADDR: Field = Field::new(LabelOrAddress, 0, 8);

/// The full instruction set, in opcode order.
pub static TABLE: &[InstructionSpec] = &[
    // Memory transfers: opcode[15:11], register[10:8], address[7:0].
    InstructionSpec { mnemonic: "load",   base: 0b00000 << 11, fields: &[REG_HI, ADDR] },
    InstructionSpec { mnemonic: "loada",  base: 0b00001 << 11, fields: &[REG_HI, ADDR] },
    InstructionSpec { mnemonic: "store",  base: 0b00010 << 11, fields: &[REG_HI, ADDR] },
    InstructionSpec { mnemonic: "storea", base: 0b00011 << 11, fields: &[REG_HI, ADDR] },
    // Register-testing branches: branch when the named register is zero
    // (braz) or negative (bran).
    InstructionSpec { mnemonic: "braz", base: 0b00100 << 11, fields: &[REG_HI, ADDR] },
    InstructionSpec { mnemonic: "bran", base: 0b00101 << 11, fields: &[REG_HI, ADDR] },
    // Flow control under opcode 00110 with a 3-bit sub-opcode.
    InstructionSpec { mnemonic: "bra",  base: 0b00110_000 << 8, fields: &[ADDR] },
    InstructionSpec { mnemonic: "brao", base: 0b00110_001 << 8, fields: &[ADDR] },
    InstructionSpec { mnemonic: "brac", base: 0b00110_010 << 8, fields: &[ADDR] },
    InstructionSpec { mnemonic: "call", base: 0b00110_011 << 8, fields: &[ADDR] },
    InstructionSpec { mnemonic: "return", base: 0b00111_000_11111111, fields: &[] },
    InstructionSpec { mnemonic: "halt",   base: 0b00111_111_11111111, fields: &[] },
    // Stack and port transfers: opcode[15:12], register[11:9], rest 1s.
    InstructionSpec { mnemonic: "push",  base: 0b0100 << 12 | 0x01FF, fields: &[Field::new(Register(Stack), 9, 3)] },
    InstructionSpec { mnemonic: "pop",   base: 0b0101 << 12 | 0x01FF, fields: &[Field::new(Register(Stack), 9, 3)] },
    InstructionSpec { mnemonic: "oport", base: 0b0110 << 12 | 0x01FF, fields: &[Field::new(Register(Port), 9, 3)] },
    InstructionSpec { mnemonic: "iport", base: 0b0111 << 12 | 0x01FF, fields: &[Field::new(Register(Port), 9, 3)] },
    // Three-operand ALU: opcode[15:12], a[11:9], b[8:6], 111, c[2:0].
    InstructionSpec { mnemonic: "add", base: 0b1000 << 12 | 0b111 << 3, fields: ALU3 },
    InstructionSpec { mnemonic: "sub", base: 0b1001 << 12 | 0b111 << 3, fields: ALU3 },
    InstructionSpec { mnemonic: "and", base: 0b1010 << 12 | 0b111 << 3, fields: ALU3 },
    InstructionSpec { mnemonic: "or",  base: 0b1011 << 12 | 0b111 << 3, fields: ALU3 },
    InstructionSpec { mnemonic: "xor", base: 0b1100 << 12 | 0b111 << 3, fields: ALU3 },
    // Single-source ALU: opcode[15:11], a[10:8], 11111, c[2:0].
    InstructionSpec { mnemonic: "shiftl", base: 0b11010 << 11 | 0b11111 << 3, fields: ALU2 },
    InstructionSpec { mnemonic: "shiftr", base: 0b11011 << 11 | 0b11111 << 3, fields: ALU2 },
    InstructionSpec { mnemonic: "rotl",   base: 0b11100 << 11 | 0b11111 << 3, fields: ALU2 },
    InstructionSpec { mnemonic: "rotr",   base: 0b11101 << 11 | 0b11111 << 3, fields: ALU2 },
    // move may read pc/ir, movei takes destination then immediate.
    InstructionSpec {
        mnemonic: "move",
        base: 0b11110 << 11 | 0b11111 << 3,
        fields: &[Field::new(Register(Port), 8, 3), Field::new(Register(General), 0, 3)],
    },
    InstructionSpec {
        mnemonic: "movei",
        base: 0b11111 << 11,
        fields: &[Field::new(Register(General), 0, 3), Field::new(Immediate, 3, 8)],
    },
];

const ALU3: &[Field] = &[
    Field::new(Register(Alu), 9, 3),
    Field::new(Register(Alu), 6, 3),
    Field::new(Register(General), 0, 3),
];

const ALU2: &[Field] = &[
    Field::new(Register(Alu), 8, 3),
    Field::new(Register(General), 0, 3),
];

lazy_static! {
    static ref BY_MNEMONIC: HashMap<&'static str, &'static InstructionSpec> =
        TABLE.iter().map(|spec| (spec.mnemonic, spec)).collect();
}

/// Look up a (lower-case) mnemonic, or None for an unknown one.
pub fn lookup(mnemonic: &str) -> Option<&'static InstructionSpec> {
    BY_MNEMONIC.get(mnemonic).copied()
}

/// Resolve a register name to its numeric id within the given class.
pub fn register_id(name: &str, class: RegClass) -> Option<u16> {
    match name {
        "ra" => Some(0),
        "rb" => Some(1),
        "rc" => Some(2),
        "rd" => Some(3),
        "re" => Some(4),
        "sp" => Some(5),
        "zeros" if class == Alu => Some(6),
        "ones" if class == Alu => Some(7),
        "pc" if class == Stack || class == Port => Some(6),
        "cr" if class == Stack => Some(7),
        "ir" if class == Port => Some(7),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Recover (spec, field values) from a word. Test-only: the assembler
    /// never decodes, but encoding must be lossless per instruction.
    fn decode(word: u16) -> Vec<(&'static InstructionSpec, Vec<u16>)> {
        TABLE
            .iter()
            .filter(|spec| {
                let field_bits: u16 = spec.fields.iter().fold(0, |m, f| m | f.mask());
                word & !field_bits == spec.base
            })
            .map(|spec| {
                let values = spec
                    .fields
                    .iter()
                    .map(|f| (word & f.mask()) >> f.shift)
                    .collect();
                (spec, values)
            })
            .collect()
    }

    #[test]
    fn test_lookup() {
        assert_eq!(lookup("movei").unwrap().mnemonic, "movei");
        assert_eq!(lookup("add").unwrap().fields.len(), 3);
        assert_eq!(lookup("halt").unwrap().fields.len(), 0);
        assert!(lookup("nop").is_none());
        assert!(lookup("MOVEI").is_none()); // table is keyed lower-case
    }

    #[test]
    fn test_register_classes() {
        for class in [General, Alu, Stack, Port].iter() {
            assert_eq!(register_id("ra", *class), Some(0));
            assert_eq!(register_id("sp", *class), Some(5));
        }
        assert_eq!(register_id("zeros", Alu), Some(6));
        assert_eq!(register_id("ones", Alu), Some(7));
        assert_eq!(register_id("zeros", General), None);
        assert_eq!(register_id("pc", Stack), Some(6));
        assert_eq!(register_id("cr", Stack), Some(7));
        assert_eq!(register_id("pc", Port), Some(6));
        assert_eq!(register_id("ir", Port), Some(7));
        assert_eq!(register_id("ir", Stack), None);
        assert_eq!(register_id("cr", Port), None);
        assert_eq!(register_id("r0", General), None);
    }

    #[test]
    fn test_encode_known_words() {
        // movei ra, 5 -> 11111 00000101 000
        assert_eq!(lookup("movei").unwrap().encode(&[0, 5]), 0xF828);
        // braz ra, 0 -> 00100 000 00000000
        assert_eq!(lookup("braz").unwrap().encode(&[0, 0]), 0x2000);
        // add ra rb rc -> 1000 000 001 111 010
        assert_eq!(lookup("add").unwrap().encode(&[0, 1, 2]), 0x807A);
        // push pc -> 0100 110 111111111
        assert_eq!(lookup("push").unwrap().encode(&[6]), 0x4DFF);
        // load re, 200 -> 00000 100 11001000
        assert_eq!(lookup("load").unwrap().encode(&[4, 200]), 0x04C8);
        // shiftl ones, sp -> 11010 111 11111 101
        assert_eq!(lookup("shiftl").unwrap().encode(&[7, 5]), 0xD7FD);
        assert_eq!(lookup("halt").unwrap().encode(&[]), 0x3FFF);
        assert_eq!(lookup("return").unwrap().encode(&[]), 0x38FF);
    }

    #[test]
    fn test_encode_masks_out_of_field_bits() {
        // Values are pre-validated by the encoder; stray high bits must
        // still never leak into neighbouring fields.
        let spec = lookup("movei").unwrap();
        assert_eq!(spec.encode(&[0, 0x1FF]), spec.encode(&[0, 0xFF]));
    }

    #[test]
    fn test_round_trip_every_spec() {
        for spec in TABLE {
            // Representative in-range value per field: registers get the
            // top id their class allows, immediates an alternating pattern.
            let values: Vec<u16> = spec
                .fields
                .iter()
                .map(|f| match f.kind {
                    Register(General) => 5,
                    Register(_) => 7,
                    _ => 0xA5 & ((1 << f.width) - 1),
                })
                .collect();
            let word = spec.encode(&values);
            let matches = decode(word);
            assert_eq!(
                matches.len(),
                1,
                "word {:#06X} for `{}` decodes ambiguously",
                word,
                spec.mnemonic
            );
            let (found, recovered) = &matches[0];
            assert_eq!(found.mnemonic, spec.mnemonic);
            assert_eq!(*recovered, values, "lossy encoding for `{}`", spec.mnemonic);
        }
    }

    #[test]
    fn test_round_trip_low_values() {
        for spec in TABLE {
            let values: Vec<u16> = spec.fields.iter().map(|_| 0).collect();
            let word = spec.encode(&values);
            let matches = decode(word);
            assert_eq!(matches.len(), 1);
            assert_eq!(matches[0].0.mnemonic, spec.mnemonic);
            assert_eq!(matches[0].1, values);
        }
    }
}
