mod alu;
mod bus;
mod cb;
mod disasm;
mod exec;
mod helpers;
mod init;
mod interrupts;
mod opcodes;
mod regs;
mod step;

pub use bus::Bus;
pub use disasm::{disassemble, Disassembly};
pub use interrupts::{
    Interrupt, InterruptController, InterruptFlags, IE_ADDR, IF_ADDR, SERVICE_CYCLES,
};
pub use opcodes::{instruction, prefixed_instruction, Instruction, PREFIX_CYCLES};
pub use regs::{bit_mask, Flag, Reg16, Reg8, Registers};

/// Whether the CPU fetches instructions.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum RunState {
    #[default]
    Running,
    /// HALT under [`HaltBehavior::WaitForInterrupt`]: no fetches until an
    /// interrupt is both requested and enabled.
    Halted,
    /// STOP, or HALT under [`HaltBehavior::Stop`]: the run is over; the
    /// driver stops stepping.
    Stopped,
}

/// What opcode 0x76 does.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum HaltBehavior {
    /// End the run, like STOP.
    #[default]
    Stop,
    /// Idle until an interrupt is both requested and enabled, as the
    /// hardware does.
    WaitForInterrupt,
}

/// DMG CPU core.
///
/// Owns the register file and the interrupt controller. Memory is reached
/// through the [`Bus`] trait so the same core runs against the real address
/// space or a flat test bus.
#[derive(Clone, Debug)]
pub struct Cpu {
    pub regs: Registers,
    pub interrupts: InterruptController,
    run_state: RunState,
    halt_behavior: HaltBehavior,
    /// Opcode of the most recently executed instruction (0xCB for prefixed).
    last_opcode: u8,
}

impl Cpu {
    #[inline]
    pub fn get_flag(&self, flag: Flag) -> bool {
        self.regs.flag(flag)
    }

    #[inline]
    pub fn set_flag(&mut self, flag: Flag, value: bool) {
        self.regs.set_flag(flag, value);
    }

    #[inline]
    pub fn clear_flags(&mut self) {
        self.regs.clear_flags();
    }

    #[inline]
    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    #[inline]
    pub fn is_halted(&self) -> bool {
        self.run_state == RunState::Halted
    }

    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.run_state == RunState::Stopped
    }

    #[inline]
    pub fn halt_behavior(&self) -> HaltBehavior {
        self.halt_behavior
    }

    pub fn set_halt_behavior(&mut self, behavior: HaltBehavior) {
        self.halt_behavior = behavior;
    }

    #[inline]
    pub fn last_opcode(&self) -> u8 {
        self.last_opcode
    }
}
