mod alu;
mod control;
mod incdec;
mod ld;
mod stack;
mod system;

use super::{Bus, Cpu, PREFIX_CYCLES};
use crate::EmulationError;

impl Cpu {
    /// Decode and execute a single opcode whose byte has already been
    /// fetched, and return the number of T-cycles it took.
    ///
    /// Decoding splits the byte into `x` (bits 7..6), `y` (bits 5..3) and
    /// `z` (bits 2..0). The cycle count is the instruction's own:
    /// conditional jumps, calls and returns report the taken or not-taken
    /// cost depending on the flags.
    pub(super) fn exec_opcode<B: Bus>(
        &mut self,
        bus: &mut B,
        opcode: u8,
    ) -> Result<u32, EmulationError> {
        let x = opcode >> 6;
        let y = (opcode >> 3) & 0x07;
        let z = opcode & 0x07;
        let odd = y & 1 == 1;

        let cycles = match (x, z) {
            (0, 0) => match y {
                0 => 4, // NOP
                1 => self.exec_ld_a16_sp(bus),
                2 => self.exec_stop(bus),
                3 => self.jr(bus, true),
                _ => self.exec_jr_cc(bus, opcode),
            },
            (0, 1) if odd => self.exec_add_hl_rr(opcode),
            (0, 1) => self.exec_ld_rr_d16(bus, opcode),
            (0, 2) if odd => self.exec_ld_a_indirect(bus, opcode),
            (0, 2) => self.exec_ld_indirect_a(bus, opcode),
            (0, 3) if odd => self.exec_dec16_rr(opcode),
            (0, 3) => self.exec_inc16_rr(opcode),
            (0, 4) => self.exec_inc8_reg(bus, opcode),
            (0, 5) => self.exec_dec8_reg(bus, opcode),
            (0, 6) => self.exec_ld_r_d8(bus, opcode),
            (0, _) => match y {
                0..=3 => self.exec_rotate_a(opcode),
                4 => self.exec_daa(),
                5 => self.exec_cpl(),
                6 => self.exec_scf(),
                _ => self.exec_ccf(),
            },

            // HALT takes the slot of LD (HL),(HL).
            (1, 6) if y == 6 => self.exec_halt(bus),
            (1, _) => self.exec_ld_r_r(bus, opcode),

            (2, _) => self.exec_alu_reg_group(bus, opcode),

            (_, 0) => match y {
                0..=3 => self.exec_ret_cc(bus, opcode),
                4 | 6 => self.exec_ldh_a8(bus, opcode),
                5 => self.exec_add_sp_r8(bus),
                _ => self.exec_ld_hl_sp_r8(bus),
            },
            (_, 1) if odd => match y >> 1 {
                0 => self.exec_ret(bus),
                1 => self.exec_reti(bus),
                2 => self.exec_jp_hl(),
                _ => self.exec_ld_sp_hl(),
            },
            (_, 1) => self.exec_pop_rr(bus, opcode),
            (_, 2) => match y {
                0..=3 => self.exec_jp_cc(bus, opcode),
                4 | 6 => self.exec_ldh_c(bus, opcode),
                _ => self.exec_ld_a16_a(bus, opcode),
            },
            (_, 3) => match y {
                0 => self.exec_jp_a16(bus),
                1 => PREFIX_CYCLES + self.exec_prefixed(bus)?,
                6 => self.exec_di(),
                7 => self.exec_ei(),
                _ => return Err(self.decode_failure(opcode)),
            },
            (_, 4) if y < 4 => self.exec_call_cc(bus, opcode),
            (_, 5) if !odd => self.exec_push_rr(bus, opcode),
            (_, 5) if y == 1 => self.exec_call_a16(bus),
            (_, 4) | (_, 5) => return Err(self.decode_failure(opcode)),
            (_, 6) => self.exec_alu_imm(bus, opcode),
            _ => self.exec_rst(bus, opcode),
        };

        Ok(cycles)
    }

    /// Log the CPU state around an unused opcode and build the error.
    fn decode_failure(&self, opcode: u8) -> EmulationError {
        let address = self.regs.pc.wrapping_sub(1);
        log::error!(
            "decode failure: opcode 0x{opcode:02X} at PC=0x{address:04X} (SP=0x{sp:04X} AF=0x{af:04X} BC=0x{bc:04X} DE=0x{de:04X} HL=0x{hl:04X})",
            sp = self.regs.sp,
            af = self.regs.af(),
            bc = self.regs.bc(),
            de = self.regs.de(),
            hl = self.regs.hl(),
        );
        EmulationError::InvalidOpcode { opcode, address }
    }
}
