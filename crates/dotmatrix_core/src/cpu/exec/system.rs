use crate::cpu::{Bus, Cpu, HaltBehavior, RunState};

impl Cpu {
    /// HALT. By default this ends the run the way STOP does.
    ///
    /// With [`HaltBehavior::WaitForInterrupt`] the CPU stops fetching until
    /// an interrupt is both requested and enabled. If one already is while
    /// IME is clear, it carries on with the next instruction instead.
    pub(super) fn exec_halt<B: Bus>(&mut self, bus: &mut B) -> u32 {
        if self.halt_behavior == HaltBehavior::Stop {
            log::debug!("HALT at PC=0x{:04X}", self.regs.pc.wrapping_sub(1));
            self.stop();
            return 4;
        }
        if !self.interrupts.is_enabled() && self.interrupts.pending(bus) != 0 {
            log::debug!("HALT skipped: interrupt already pending with IME clear");
            return 4;
        }
        self.run_state = RunState::Halted;
        4
    }

    pub(super) fn exec_stop<B: Bus>(&mut self, bus: &mut B) -> u32 {
        // STOP is two bytes long; the second one is padding.
        let _padding = self.fetch8(bus);
        log::debug!("STOP at PC=0x{:04X}", self.regs.pc.wrapping_sub(2));
        self.stop();
        4
    }

    pub(super) fn exec_di(&mut self) -> u32 {
        self.interrupts.disable();
        4
    }

    pub(super) fn exec_ei(&mut self) -> u32 {
        // IME becomes 1 after the *next* instruction completes.
        self.interrupts.schedule_enable();
        4
    }
}
