use crate::EmulationError;

/// 8-bit register names.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Reg8 {
    A,
    F,
    B,
    C,
    D,
    E,
    H,
    L,
}

/// 16-bit register names: the four pairs plus SP and PC.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Reg16 {
    AF,
    BC,
    DE,
    HL,
    SP,
    PC,
}

/// Registers for the DMG CPU (LR35902).
///
/// Each pair is stored as a single 16-bit word; the 8-bit registers are
/// views onto the high or low byte of their pair, so a write through either
/// view is immediately visible through the other.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Registers {
    af: u16,
    bc: u16,
    de: u16,
    hl: u16,
    pub sp: u16,
    pub pc: u16,
}

/// Flag bits in the F register.
///
/// Layout (bit index in the byte, from MSB to LSB):
/// - bit 7: Z (zero)
/// - bit 6: N (subtract)
/// - bit 5: H (half carry)
/// - bit 4: C (carry)
/// - bits 0–3 are always zero.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Flag {
    Z = 7,
    N = 6,
    H = 5,
    C = 4,
}

#[inline]
fn high(word: u16) -> u8 {
    (word >> 8) as u8
}

#[inline]
fn low(word: u16) -> u8 {
    word as u8
}

#[inline]
fn with_high(word: u16, value: u8) -> u16 {
    (word & 0x00FF) | (u16::from(value) << 8)
}

#[inline]
fn with_low(word: u16, value: u8) -> u16 {
    (word & 0xFF00) | u16::from(value)
}

/// Mask for bit `bit` of a byte, rejecting indices above 7.
#[inline]
pub fn bit_mask(bit: u8) -> Result<u8, EmulationError> {
    if bit > 7 {
        return Err(EmulationError::InvalidBitIndex(bit));
    }
    Ok(1 << bit)
}

impl Registers {
    /// Register values the DMG boot ROM leaves behind at 0x0100.
    pub fn post_boot() -> Self {
        Self {
            af: 0x01B0,
            bc: 0x0013,
            de: 0x00D8,
            hl: 0x014D,
            sp: 0xFFFE,
            pc: 0x0100,
        }
    }

    pub fn get8(&self, reg: Reg8) -> u8 {
        match reg {
            Reg8::A => high(self.af),
            Reg8::F => low(self.af),
            Reg8::B => high(self.bc),
            Reg8::C => low(self.bc),
            Reg8::D => high(self.de),
            Reg8::E => low(self.de),
            Reg8::H => high(self.hl),
            Reg8::L => low(self.hl),
        }
    }

    pub fn set8(&mut self, reg: Reg8, value: u8) {
        match reg {
            Reg8::A => self.af = with_high(self.af, value),
            // Lower 4 bits of F are always zero.
            Reg8::F => self.af = with_low(self.af, value & 0xF0),
            Reg8::B => self.bc = with_high(self.bc, value),
            Reg8::C => self.bc = with_low(self.bc, value),
            Reg8::D => self.de = with_high(self.de, value),
            Reg8::E => self.de = with_low(self.de, value),
            Reg8::H => self.hl = with_high(self.hl, value),
            Reg8::L => self.hl = with_low(self.hl, value),
        }
    }

    pub fn get16(&self, reg: Reg16) -> u16 {
        match reg {
            Reg16::AF => self.af,
            Reg16::BC => self.bc,
            Reg16::DE => self.de,
            Reg16::HL => self.hl,
            Reg16::SP => self.sp,
            Reg16::PC => self.pc,
        }
    }

    pub fn set16(&mut self, reg: Reg16, value: u16) {
        match reg {
            Reg16::AF => self.af = value & 0xFFF0,
            Reg16::BC => self.bc = value,
            Reg16::DE => self.de = value,
            Reg16::HL => self.hl = value,
            Reg16::SP => self.sp = value,
            Reg16::PC => self.pc = value,
        }
    }

    #[inline]
    pub fn a(&self) -> u8 {
        self.get8(Reg8::A)
    }

    #[inline]
    pub fn set_a(&mut self, value: u8) {
        self.set8(Reg8::A, value);
    }

    #[inline]
    pub fn f(&self) -> u8 {
        self.get8(Reg8::F)
    }

    #[inline]
    pub fn set_f(&mut self, value: u8) {
        self.set8(Reg8::F, value);
    }

    #[inline]
    pub fn b(&self) -> u8 {
        self.get8(Reg8::B)
    }

    #[inline]
    pub fn set_b(&mut self, value: u8) {
        self.set8(Reg8::B, value);
    }

    #[inline]
    pub fn c(&self) -> u8 {
        self.get8(Reg8::C)
    }

    #[inline]
    pub fn set_c(&mut self, value: u8) {
        self.set8(Reg8::C, value);
    }

    #[inline]
    pub fn d(&self) -> u8 {
        self.get8(Reg8::D)
    }

    #[inline]
    pub fn set_d(&mut self, value: u8) {
        self.set8(Reg8::D, value);
    }

    #[inline]
    pub fn e(&self) -> u8 {
        self.get8(Reg8::E)
    }

    #[inline]
    pub fn set_e(&mut self, value: u8) {
        self.set8(Reg8::E, value);
    }

    #[inline]
    pub fn h(&self) -> u8 {
        self.get8(Reg8::H)
    }

    #[inline]
    pub fn set_h(&mut self, value: u8) {
        self.set8(Reg8::H, value);
    }

    #[inline]
    pub fn l(&self) -> u8 {
        self.get8(Reg8::L)
    }

    #[inline]
    pub fn set_l(&mut self, value: u8) {
        self.set8(Reg8::L, value);
    }

    #[inline]
    pub fn af(&self) -> u16 {
        self.af
    }

    #[inline]
    pub fn set_af(&mut self, value: u16) {
        self.set16(Reg16::AF, value);
    }

    #[inline]
    pub fn bc(&self) -> u16 {
        self.bc
    }

    #[inline]
    pub fn set_bc(&mut self, value: u16) {
        self.bc = value;
    }

    #[inline]
    pub fn de(&self) -> u16 {
        self.de
    }

    #[inline]
    pub fn set_de(&mut self, value: u16) {
        self.de = value;
    }

    #[inline]
    pub fn hl(&self) -> u16 {
        self.hl
    }

    #[inline]
    pub fn set_hl(&mut self, value: u16) {
        self.hl = value;
    }

    #[inline]
    pub fn flag(&self, flag: Flag) -> bool {
        self.f() & (1 << flag as u8) != 0
    }

    /// Set `flag` to `value`.
    #[inline]
    pub fn set_flag(&mut self, flag: Flag, value: bool) {
        let mask = 1 << flag as u8;
        let f = if value { self.f() | mask } else { self.f() & !mask };
        self.set_f(f);
    }

    #[inline]
    pub fn clear_flags(&mut self) {
        self.set_f(0);
    }

    pub fn is_bit_set(&self, reg: Reg8, bit: u8) -> Result<bool, EmulationError> {
        Ok(self.get8(reg) & bit_mask(bit)? != 0)
    }

    pub fn set_bit(&mut self, reg: Reg8, bit: u8) -> Result<(), EmulationError> {
        let value = self.get8(reg) | bit_mask(bit)?;
        self.set8(reg, value);
        Ok(())
    }

    pub fn reset_bit(&mut self, reg: Reg8, bit: u8) -> Result<(), EmulationError> {
        let value = self.get8(reg) & !bit_mask(bit)?;
        self.set8(reg, value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_boot_values() {
        let regs = Registers::post_boot();
        assert_eq!(regs.af(), 0x01B0);
        assert_eq!(regs.bc(), 0x0013);
        assert_eq!(regs.de(), 0x00D8);
        assert_eq!(regs.hl(), 0x014D);
        assert_eq!(regs.pc, 0x0100);
        assert_eq!(regs.sp, 0xFFFE);
    }

    #[test]
    fn pair_writes_split_into_halves() {
        let mut regs = Registers::default();
        let pairs = [
            (Reg16::BC, Reg8::B, Reg8::C),
            (Reg16::DE, Reg8::D, Reg8::E),
            (Reg16::HL, Reg8::H, Reg8::L),
        ];
        for (pair, hi, lo) in pairs {
            regs.set16(pair, 0xBEEF);
            assert_eq!(regs.get8(hi), 0xBE);
            assert_eq!(regs.get8(lo), 0xEF);

            regs.set8(hi, 0x12);
            regs.set8(lo, 0x34);
            assert_eq!(regs.get16(pair), 0x1234);
        }
    }

    #[test]
    fn af_masks_low_nibble_of_f() {
        let mut regs = Registers::default();
        regs.set_af(0x12FF);
        assert_eq!(regs.a(), 0x12);
        assert_eq!(regs.f(), 0xF0);

        regs.set_f(0x0F);
        assert_eq!(regs.af(), 0x1200);
    }

    #[test]
    fn flags_map_to_upper_nibble() {
        let regs = Registers::post_boot();
        // F = 0xB0 -> Z=1 N=0 H=1 C=1
        assert!(regs.flag(Flag::Z));
        assert!(!regs.flag(Flag::N));
        assert!(regs.flag(Flag::H));
        assert!(regs.flag(Flag::C));

        let mut regs = Registers::default();
        regs.set_flag(Flag::N, true);
        assert_eq!(regs.f(), 0x40);
        regs.set_flag(Flag::N, false);
        assert_eq!(regs.f(), 0x00);
    }

    #[test]
    fn single_bit_accessors() {
        let mut regs = Registers::default();
        regs.set_bit(Reg8::D, 3).unwrap();
        assert_eq!(regs.d(), 0x08);
        assert!(regs.is_bit_set(Reg8::D, 3).unwrap());
        regs.reset_bit(Reg8::D, 3).unwrap();
        assert!(!regs.is_bit_set(Reg8::D, 3).unwrap());
    }

    #[test]
    fn bit_index_above_seven_is_rejected() {
        let mut regs = Registers::default();
        assert_eq!(
            regs.set_bit(Reg8::A, 8),
            Err(EmulationError::InvalidBitIndex(8))
        );
        assert_eq!(
            regs.is_bit_set(Reg8::A, 200),
            Err(EmulationError::InvalidBitIndex(200))
        );
        assert_eq!(regs.a(), 0);
    }
}
