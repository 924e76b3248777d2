use super::{instruction, prefixed_instruction};

/// One decoded instruction rendered for trace output.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Disassembly {
    pub text: String,
    /// Bytes covered, including the 0xCB prefix.
    pub length: u8,
}

/// Render the instruction at `pc` with its operands resolved.
///
/// `read` supplies bytes without side effects. Immediate operands are shown
/// as `$XX`/`$XXXX`, high-page operands as `$FFXX` and relative jumps as
/// their absolute target. Unused opcodes render as `DB $XX`.
pub fn disassemble(pc: u16, read: impl Fn(u16) -> u8) -> Disassembly {
    let opcode = read(pc);
    let byte = |offset: u16| read(pc.wrapping_add(offset));
    let word = || u16::from_le_bytes([byte(1), byte(2)]);

    if opcode == 0xCB {
        let entry = prefixed_instruction(byte(1));
        return Disassembly {
            text: entry.mnemonic.clone(),
            length: 2,
        };
    }

    let Some(entry) = instruction(opcode) else {
        return Disassembly {
            text: format!("DB ${opcode:02X}"),
            length: 1,
        };
    };

    let m = entry.mnemonic.as_str();
    let text = if m.contains("d16") {
        m.replace("d16", &format!("${:04X}", word()))
    } else if m.contains("a16") {
        m.replace("a16", &format!("${:04X}", word()))
    } else if m.contains("a8") {
        m.replace("a8", &format!("$FF{:02X}", byte(1)))
    } else if m.contains("SP+r8") {
        m.replace("r8", &format!("${:02X}", byte(1)))
    } else if m.starts_with("JR") {
        let target = pc
            .wrapping_add(2)
            .wrapping_add(byte(1) as i8 as i16 as u16);
        m.replace("r8", &format!("${target:04X}"))
    } else if m.contains("r8") {
        m.replace("r8", &format!("${:02X}", byte(1)))
    } else if m.contains("d8") {
        m.replace("d8", &format!("${:02X}", byte(1)))
    } else {
        m.to_string()
    };

    Disassembly {
        text,
        length: entry.length,
    }
}
