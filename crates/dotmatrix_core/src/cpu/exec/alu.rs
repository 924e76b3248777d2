use super::incdec::pair_slot;
use crate::cpu::{Bus, Cpu, Flag};

impl Cpu {
    /// 0x80..=0xBF: `y` selects the operation, `z` the operand slot.
    pub(super) fn exec_alu_reg_group<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> u32 {
        let slot = opcode & 0x07;
        let operand = self.read_reg8(bus, slot);
        self.apply_alu((opcode >> 3) & 0x07, operand);
        if slot == 6 { 8 } else { 4 }
    }

    /// ADD A,d8 .. CP d8.
    pub(super) fn exec_alu_imm<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> u32 {
        let operand = self.fetch8(bus);
        self.apply_alu((opcode >> 3) & 0x07, operand);
        8
    }

    fn apply_alu(&mut self, operation: u8, operand: u8) {
        match operation {
            0 | 1 => self.alu_add(operand, operation == 1),
            2 | 3 => self.alu_sub(operand, operation == 3),
            4 => self.alu_and(operand),
            5 => self.alu_xor(operand),
            6 => self.alu_or(operand),
            _ => self.alu_cp(operand),
        }
    }

    /// RLCA/RRCA/RLA/RRA: the prefixed rotation with Z forced clear.
    pub(super) fn exec_rotate_a(&mut self, opcode: u8) -> u32 {
        let rotated = self.alu_rotate_shift(opcode >> 3, self.regs.a());
        self.regs.set_a(rotated);
        self.set_flag(Flag::Z, false);
        4
    }

    pub(super) fn exec_add_hl_rr(&mut self, opcode: u8) -> u32 {
        let operand = self.regs.get16(pair_slot(opcode));
        self.alu_add16_hl(operand);
        8
    }

    pub(super) fn exec_add_sp_r8<B: Bus>(&mut self, bus: &mut B) -> u32 {
        let offset = self.fetch8(bus);
        self.regs.sp = self.alu_add16_signed(self.regs.sp, offset);
        16
    }

    pub(super) fn exec_ld_hl_sp_r8<B: Bus>(&mut self, bus: &mut B) -> u32 {
        let offset = self.fetch8(bus);
        let address = self.alu_add16_signed(self.regs.sp, offset);
        self.regs.set_hl(address);
        12
    }

    pub(super) fn exec_daa(&mut self) -> u32 {
        self.alu_daa();
        4
    }

    pub(super) fn exec_cpl(&mut self) -> u32 {
        self.regs.set_a(!self.regs.a());
        let (z, c) = (self.get_flag(Flag::Z), self.get_flag(Flag::C));
        self.set_znhc(z, true, true, c);
        4
    }

    pub(super) fn exec_scf(&mut self) -> u32 {
        let z = self.get_flag(Flag::Z);
        self.set_znhc(z, false, false, true);
        4
    }

    pub(super) fn exec_ccf(&mut self) -> u32 {
        let (z, c) = (self.get_flag(Flag::Z), self.get_flag(Flag::C));
        self.set_znhc(z, false, false, !c);
        4
    }
}
