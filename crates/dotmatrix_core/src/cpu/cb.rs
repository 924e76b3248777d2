use super::{bit_mask, Bus, Cpu, Flag};
use crate::EmulationError;

impl Cpu {
    /// Handle CB-prefixed instructions (bit operations, shifts, and rotates).
    ///
    /// Fetches the second opcode byte and returns the cost of the prefixed
    /// operation alone; the caller adds the prefix cost.
    pub(super) fn exec_prefixed<B: Bus>(&mut self, bus: &mut B) -> Result<u32, EmulationError> {
        let cb = self.fetch8(bus);
        let x = cb >> 6;
        let y = (cb >> 3) & 0x07;
        let z = cb & 0x07;
        let indirect = z == 6;

        let cycles = match x {
            0 => {
                // RLC RRC RL RR SLA SRA SWAP SRL
                let value = self.read_reg8(bus, z);
                let result = self.alu_rotate_shift(y, value);
                self.write_reg8(bus, z, result);
                if indirect { 12 } else { 4 }
            }
            1 => {
                // BIT b, r: preserve C, set H, clear N.
                let value = self.read_reg8(bus, z);
                let bit_set = value & bit_mask(y)? != 0;
                self.set_flag(Flag::Z, !bit_set);
                self.set_flag(Flag::N, false);
                self.set_flag(Flag::H, true);
                if indirect { 8 } else { 4 }
            }
            2 => {
                // RES b, r
                let value = self.read_reg8(bus, z) & !bit_mask(y)?;
                self.write_reg8(bus, z, value);
                if indirect { 12 } else { 4 }
            }
            _ => {
                // SET b, r
                let value = self.read_reg8(bus, z) | bit_mask(y)?;
                self.write_reg8(bus, z, value);
                if indirect { 12 } else { 4 }
            }
        };

        Ok(cycles)
    }
}
