use super::{Bus, Cpu, RunState};
use crate::EmulationError;

impl Cpu {
    /// Execute one instruction and return the T-cycles it consumed.
    ///
    /// A halted CPU idles for 4 cycles per call until an interrupt is both
    /// requested and enabled; a stopped CPU does nothing. Interrupt
    /// dispatch is left to [`Cpu::service_interrupts`], which the driver
    /// calls once the timer and PPU have seen the elapsed cycles.
    pub fn step<B: Bus>(&mut self, bus: &mut B) -> Result<u32, EmulationError> {
        match self.run_state {
            RunState::Stopped => return Ok(0),
            RunState::Halted => {
                if self.interrupts.pending(bus) != 0 {
                    self.run_state = RunState::Running;
                }
                return Ok(4);
            }
            RunState::Running => {}
        }

        let opcode = self.fetch8(bus);
        self.last_opcode = opcode;
        let cycles = self.exec_opcode(bus, opcode)?;
        self.interrupts.apply_delay();
        Ok(cycles)
    }

    /// Service the highest-priority pending interrupt, waking a halted CPU.
    pub fn service_interrupts<B: Bus>(&mut self, bus: &mut B) -> Option<u32> {
        let cycles = self.interrupts.service(&mut self.regs, bus)?;
        if self.run_state == RunState::Halted {
            self.run_state = RunState::Running;
        }
        Some(cycles)
    }
}
