//! Static instruction tables for the primary and CB-prefixed opcode spaces.
//!
//! Each entry carries the mnemonic used by the disassembler, the encoded
//! length and the default cycle cost. For conditional jumps, calls and
//! returns the default is the not-taken cost; the executed operation
//! reports the actual cost.

use lazy_static::lazy_static;

/// Extra cost of the 0xCB prefix byte on top of the prefixed operation.
pub const PREFIX_CYCLES: u32 = 4;

const R8: [&str; 8] = ["B", "C", "D", "E", "H", "L", "(HL)", "A"];
const RP: [&str; 4] = ["BC", "DE", "HL", "SP"];
const RP2: [&str; 4] = ["BC", "DE", "HL", "AF"];
const CC: [&str; 4] = ["NZ", "Z", "NC", "C"];
const ALU: [&str; 8] = ["ADD A,", "ADC A,", "SUB ", "SBC A,", "AND ", "XOR ", "OR ", "CP "];
const ROT: [&str; 8] = ["RLC", "RRC", "RL", "RR", "SLA", "SRA", "SWAP", "SRL"];

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Instruction {
    /// Assembly form with operand placeholders: `d8`, `d16`, `a8`, `a16`, `r8`.
    pub mnemonic: String,
    /// Encoded length in bytes, including the opcode.
    pub length: u8,
    /// Default T-cycle cost.
    pub cycles: u32,
}

impl Instruction {
    fn new(mnemonic: impl Into<String>, length: u8, cycles: u32) -> Self {
        Self {
            mnemonic: mnemonic.into(),
            length,
            cycles,
        }
    }
}

lazy_static! {
    static ref PRIMARY: Vec<Option<Instruction>> = (0..=0xFF).map(primary_entry).collect();
    static ref PREFIXED: Vec<Instruction> = (0..=0xFF).map(prefixed_entry).collect();
}

/// Primary table entry for `opcode`, or `None` for the eleven unused bytes.
pub fn instruction(opcode: u8) -> Option<&'static Instruction> {
    PRIMARY[usize::from(opcode)].as_ref()
}

/// Entry of the CB-prefixed table. Every byte is a valid operation.
pub fn prefixed_instruction(opcode: u8) -> &'static Instruction {
    &PREFIXED[usize::from(opcode)]
}

fn primary_entry(opcode: u8) -> Option<Instruction> {
    let x = opcode >> 6;
    let y = usize::from((opcode >> 3) & 0x07);
    let z = usize::from(opcode & 0x07);
    let p = y >> 1;
    let q = y & 1;
    let indirect = |slot: usize| slot == 6;

    let entry = match (x, z) {
        (0, 0) => match y {
            0 => Instruction::new("NOP", 1, 4),
            1 => Instruction::new("LD (a16),SP", 3, 20),
            2 => Instruction::new("STOP", 2, 4),
            3 => Instruction::new("JR r8", 2, 12),
            _ => Instruction::new(format!("JR {},r8", CC[y - 4]), 2, 8),
        },
        (0, 1) if q == 0 => Instruction::new(format!("LD {},d16", RP[p]), 3, 12),
        (0, 1) => Instruction::new(format!("ADD HL,{}", RP[p]), 1, 8),
        (0, 2) => {
            let target = ["(BC)", "(DE)", "(HL+)", "(HL-)"][p];
            if q == 0 {
                Instruction::new(format!("LD {target},A"), 1, 8)
            } else {
                Instruction::new(format!("LD A,{target}"), 1, 8)
            }
        }
        (0, 3) if q == 0 => Instruction::new(format!("INC {}", RP[p]), 1, 8),
        (0, 3) => Instruction::new(format!("DEC {}", RP[p]), 1, 8),
        (0, 4) => Instruction::new(format!("INC {}", R8[y]), 1, if indirect(y) { 12 } else { 4 }),
        (0, 5) => Instruction::new(format!("DEC {}", R8[y]), 1, if indirect(y) { 12 } else { 4 }),
        (0, 6) => Instruction::new(format!("LD {},d8", R8[y]), 2, if indirect(y) { 12 } else { 8 }),
        (0, _) => {
            let name = ["RLCA", "RRCA", "RLA", "RRA", "DAA", "CPL", "SCF", "CCF"][y];
            Instruction::new(name, 1, 4)
        }

        (1, 6) if y == 6 => Instruction::new("HALT", 1, 4),
        (1, _) => {
            let cycles = if indirect(y) || indirect(z) { 8 } else { 4 };
            Instruction::new(format!("LD {},{}", R8[y], R8[z]), 1, cycles)
        }

        (2, _) => {
            let cycles = if indirect(z) { 8 } else { 4 };
            Instruction::new(format!("{}{}", ALU[y], R8[z]), 1, cycles)
        }

        (_, 0) => match y {
            0..=3 => Instruction::new(format!("RET {}", CC[y]), 1, 8),
            4 => Instruction::new("LDH (a8),A", 2, 12),
            5 => Instruction::new("ADD SP,r8", 2, 16),
            6 => Instruction::new("LDH A,(a8)", 2, 12),
            _ => Instruction::new("LD HL,SP+r8", 2, 12),
        },
        (_, 1) if q == 0 => Instruction::new(format!("POP {}", RP2[p]), 1, 12),
        (_, 1) => match p {
            0 => Instruction::new("RET", 1, 16),
            1 => Instruction::new("RETI", 1, 16),
            2 => Instruction::new("JP (HL)", 1, 4),
            _ => Instruction::new("LD SP,HL", 1, 8),
        },
        (_, 2) => match y {
            0..=3 => Instruction::new(format!("JP {},a16", CC[y]), 3, 12),
            4 => Instruction::new("LD (C),A", 1, 8),
            5 => Instruction::new("LD (a16),A", 3, 16),
            6 => Instruction::new("LD A,(C)", 1, 8),
            _ => Instruction::new("LD A,(a16)", 3, 16),
        },
        (_, 3) => match y {
            0 => Instruction::new("JP a16", 3, 16),
            1 => Instruction::new("PREFIX CB", 1, PREFIX_CYCLES),
            6 => Instruction::new("DI", 1, 4),
            7 => Instruction::new("EI", 1, 4),
            _ => return None,
        },
        (_, 4) if y < 4 => Instruction::new(format!("CALL {},a16", CC[y]), 3, 12),
        (_, 4) => return None,
        (_, 5) if q == 0 => Instruction::new(format!("PUSH {}", RP2[p]), 1, 16),
        (_, 5) if p == 0 => Instruction::new("CALL a16", 3, 24),
        (_, 5) => return None,
        (_, 6) => Instruction::new(format!("{}d8", ALU[y]), 2, 8),
        (_, _) => Instruction::new(format!("RST {:02X}H", y * 8), 1, 16),
    };

    Some(entry)
}

/// Cycle costs exclude the prefix byte: 4 on a register, 12 on (HL), and
/// 8 for `BIT b,(HL)` which only reads memory.
fn prefixed_entry(opcode: u8) -> Instruction {
    let x = opcode >> 6;
    let y = usize::from((opcode >> 3) & 0x07);
    let z = usize::from(opcode & 0x07);
    let indirect = z == 6;

    let (mnemonic, cycles) = match x {
        0 => (format!("{} {}", ROT[y], R8[z]), if indirect { 12 } else { 4 }),
        1 => (format!("BIT {y},{}", R8[z]), if indirect { 8 } else { 4 }),
        2 => (format!("RES {y},{}", R8[z]), if indirect { 12 } else { 4 }),
        _ => (format!("SET {y},{}", R8[z]), if indirect { 12 } else { 4 }),
    };
    Instruction::new(mnemonic, 1, cycles)
}
