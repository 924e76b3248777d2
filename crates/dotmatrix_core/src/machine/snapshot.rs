use super::Memory;
use crate::cpu::{Cpu, Flag, Registers, RunState};

/// The four condition flags, unpacked.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Flags {
    pub zero: bool,
    pub subtract: bool,
    pub half_carry: bool,
    pub carry: bool,
}

/// Read-only copy of the machine state for debuggers and tests.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Snapshot {
    pub registers: Registers,
    pub flags: Flags,
    /// Opcode at PC, i.e. the next one to execute.
    pub opcode: u8,
    /// Opcode of the instruction executed last.
    pub last_opcode: u8,
    pub pc: u16,
    pub sp: u16,
    pub ime: bool,
    pub run_state: RunState,
    /// Full 64 KiB address space.
    pub memory: Vec<u8>,
}

impl Snapshot {
    pub(super) fn capture(cpu: &Cpu, memory: &Memory) -> Self {
        let regs = cpu.regs;
        Self {
            registers: regs,
            flags: Flags {
                zero: regs.flag(Flag::Z),
                subtract: regs.flag(Flag::N),
                half_carry: regs.flag(Flag::H),
                carry: regs.flag(Flag::C),
            },
            opcode: memory.read(regs.pc),
            last_opcode: cpu.last_opcode(),
            pc: regs.pc,
            sp: regs.sp,
            ime: cpu.interrupts.is_enabled(),
            run_state: cpu.run_state(),
            memory: memory.as_slice().to_vec(),
        }
    }
}
