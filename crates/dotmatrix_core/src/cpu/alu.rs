use super::{Cpu, Flag};

impl Cpu {
    /// Write all four flags at once.
    #[inline]
    pub(super) fn set_znhc(&mut self, z: bool, n: bool, h: bool, c: bool) {
        let f = (u8::from(z) << Flag::Z as u8)
            | (u8::from(n) << Flag::N as u8)
            | (u8::from(h) << Flag::H as u8)
            | (u8::from(c) << Flag::C as u8);
        self.regs.set_f(f);
    }

    #[inline]
    fn carry_in(&self, use_carry: bool) -> u8 {
        u8::from(use_carry && self.get_flag(Flag::C))
    }

    /// ADD (`use_carry == false`) or ADC on A.
    pub(super) fn alu_add(&mut self, value: u8, use_carry: bool) {
        let a = self.regs.a();
        let carry = self.carry_in(use_carry);
        let (partial, c1) = a.overflowing_add(value);
        let (result, c2) = partial.overflowing_add(carry);
        let half = (a & 0x0F) + (value & 0x0F) + carry > 0x0F;

        self.regs.set_a(result);
        self.set_znhc(result == 0, false, half, c1 || c2);
    }

    /// SUB (`use_carry == false`) or SBC on A.
    ///
    /// Borrows are found by comparing the operands before the subtraction:
    /// H when the low nibble of A is smaller than the subtrahend's, C when
    /// A as a whole is.
    pub(super) fn alu_sub(&mut self, value: u8, use_carry: bool) {
        let a = self.regs.a();
        let carry = self.carry_in(use_carry);
        let result = a.wrapping_sub(value).wrapping_sub(carry);
        let half = (a & 0x0F) < (value & 0x0F) + carry;
        let borrow = u16::from(a) < u16::from(value) + u16::from(carry);

        self.regs.set_a(result);
        self.set_znhc(result == 0, true, half, borrow);
    }

    pub(super) fn alu_and(&mut self, value: u8) {
        let result = self.regs.a() & value;
        self.regs.set_a(result);
        self.set_znhc(result == 0, false, true, false);
    }

    pub(super) fn alu_or(&mut self, value: u8) {
        let result = self.regs.a() | value;
        self.regs.set_a(result);
        self.set_znhc(result == 0, false, false, false);
    }

    pub(super) fn alu_xor(&mut self, value: u8) {
        let result = self.regs.a() ^ value;
        self.regs.set_a(result);
        self.set_znhc(result == 0, false, false, false);
    }

    /// Flags of `A - value`; A is left alone.
    pub(super) fn alu_cp(&mut self, value: u8) {
        let a = self.regs.a();
        self.set_znhc(a == value, true, (a & 0x0F) < (value & 0x0F), a < value);
    }

    /// BCD correction of A after an addition or subtraction. N is kept.
    pub(super) fn alu_daa(&mut self) {
        let a = self.regs.a();
        let subtract = self.get_flag(Flag::N);
        let mut correction = 0u8;
        let mut carry = self.get_flag(Flag::C);

        if self.get_flag(Flag::H) || (!subtract && a & 0x0F > 0x09) {
            correction |= 0x06;
        }
        if carry || (!subtract && a > 0x99) {
            correction |= 0x60;
            carry = true;
        }

        let result = if subtract {
            a.wrapping_sub(correction)
        } else {
            a.wrapping_add(correction)
        };
        self.regs.set_a(result);
        self.set_znhc(result == 0, subtract, false, carry);
    }

    /// INC r / INC (HL). C is kept.
    pub(super) fn alu_inc8(&mut self, value: u8) -> u8 {
        let result = value.wrapping_add(1);
        let carry = self.get_flag(Flag::C);
        self.set_znhc(result == 0, false, value & 0x0F == 0x0F, carry);
        result
    }

    /// DEC r / DEC (HL). C is kept.
    pub(super) fn alu_dec8(&mut self, value: u8) -> u8 {
        let result = value.wrapping_sub(1);
        let carry = self.get_flag(Flag::C);
        self.set_znhc(result == 0, true, value & 0x0F == 0, carry);
        result
    }

    /// ADD HL,rr. Z is kept; H is the carry out of bit 11, C out of bit 15.
    pub(super) fn alu_add16_hl(&mut self, value: u16) {
        let hl = self.regs.hl();
        let (result, carry) = hl.overflowing_add(value);
        let half = (hl & 0x0FFF) + (value & 0x0FFF) > 0x0FFF;
        let zero = self.get_flag(Flag::Z);

        self.regs.set_hl(result);
        self.set_znhc(zero, false, half, carry);
    }

    /// `base + (imm8 as i8)` for ADD SP,r8 and LD HL,SP+r8.
    ///
    /// Z and N are cleared; H and C come from the unsigned low-byte add.
    pub(super) fn alu_add16_signed(&mut self, base: u16, imm8: u8) -> u16 {
        let offset = imm8 as i8 as i16 as u16;
        let half = (base & 0x000F) + (offset & 0x000F) > 0x000F;
        let carry = (base & 0x00FF) + (offset & 0x00FF) > 0x00FF;
        self.set_znhc(false, false, half, carry);
        base.wrapping_add(offset)
    }

    /// Rotate/shift family, `op` in prefixed encoding order (bits 5..3):
    /// RLC, RRC, RL, RR, SLA, SRA, SWAP, SRL.
    pub(super) fn alu_rotate_shift(&mut self, op: u8, value: u8) -> u8 {
        let carry_in = u8::from(self.get_flag(Flag::C));
        let top = value & 0x80 != 0;
        let bottom = value & 0x01 != 0;

        let (result, carry) = match op & 0x07 {
            0 => (value.rotate_left(1), top),
            1 => (value.rotate_right(1), bottom),
            2 => ((value << 1) | carry_in, top),
            3 => ((value >> 1) | (carry_in << 7), bottom),
            4 => (value << 1, top),
            5 => ((value >> 1) | (value & 0x80), bottom),
            6 => (value.rotate_left(4), false),
            _ => (value >> 1, bottom),
        };

        self.set_znhc(result == 0, false, false, carry);
        result
    }
}
