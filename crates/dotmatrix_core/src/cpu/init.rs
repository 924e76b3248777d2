use super::{Cpu, HaltBehavior, InterruptController, Registers, RunState};

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl Cpu {
    pub fn new() -> Self {
        Self {
            regs: Registers::post_boot(),
            interrupts: InterruptController::default(),
            run_state: RunState::Running,
            halt_behavior: HaltBehavior::default(),
            last_opcode: 0x00,
        }
    }

    /// Reset the CPU to the state the DMG boot ROM hands to cartridge code.
    ///
    /// Per Pan Docs, IME is clear at 0x0100; the cartridge enables
    /// interrupts via EI/RETI as needed. The HALT behavior is kept.
    pub fn reset(&mut self) {
        let halt_behavior = self.halt_behavior;
        *self = Self::new();
        self.halt_behavior = halt_behavior;
    }

    /// Request the cooperative stop of the current run.
    pub fn stop(&mut self) {
        self.run_state = RunState::Stopped;
    }
}
