use super::{Bus, Registers};

/// Interrupt request register (IF).
pub const IF_ADDR: u16 = 0xFF0F;
/// Interrupt enable register (IE).
pub const IE_ADDR: u16 = 0xFFFF;

/// Cycles consumed by dispatching to a service routine.
pub const SERVICE_CYCLES: u32 = 20;

bitflags::bitflags! {
    /// Bit layout shared by IE and IF.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct InterruptFlags: u8 {
        const VBLANK = 1 << 0;
        const LCD    = 1 << 1;
        const TIMER  = 1 << 2;
        const SERIAL = 1 << 3;
        const JOYPAD = 1 << 4;
    }
}

/// Interrupt sources in priority order.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Interrupt {
    VBlank,
    Lcd,
    Timer,
    Serial,
    Joypad,
}

impl Interrupt {
    pub const PRIORITY: [Interrupt; 5] = [
        Interrupt::VBlank,
        Interrupt::Lcd,
        Interrupt::Timer,
        Interrupt::Serial,
        Interrupt::Joypad,
    ];

    pub fn flag(self) -> InterruptFlags {
        match self {
            Interrupt::VBlank => InterruptFlags::VBLANK,
            Interrupt::Lcd => InterruptFlags::LCD,
            Interrupt::Timer => InterruptFlags::TIMER,
            Interrupt::Serial => InterruptFlags::SERIAL,
            Interrupt::Joypad => InterruptFlags::JOYPAD,
        }
    }

    /// Service routine address.
    pub fn vector(self) -> u16 {
        match self {
            Interrupt::VBlank => 0x0040,
            Interrupt::Lcd => 0x0048,
            Interrupt::Timer => 0x0050,
            Interrupt::Serial => 0x0058,
            Interrupt::Joypad => 0x0060,
        }
    }
}

/// Master enable switch (IME) plus the one-instruction EI delay.
///
/// The request and enable masks themselves live in the address space at
/// IF/IE; this only tracks what the CPU core owns.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct InterruptController {
    master_enable: bool,
    enable_pending: bool,
    enable_delay: bool,
}

impl InterruptController {
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.master_enable
    }

    /// RETI and direct callers: IME on right away.
    pub fn enable(&mut self) {
        self.master_enable = true;
        self.enable_pending = false;
        self.enable_delay = false;
    }

    /// EI: IME on once the instruction after EI has completed.
    pub fn schedule_enable(&mut self) {
        self.enable_pending = true;
    }

    /// DI. Also cancels a pending EI.
    pub fn disable(&mut self) {
        self.master_enable = false;
        self.enable_pending = false;
        self.enable_delay = false;
    }

    /// Advance the EI delay by one retired instruction.
    ///
    /// Called after every instruction: the EI itself moves the request into
    /// the delay slot, the following instruction flips IME.
    pub fn apply_delay(&mut self) {
        if self.enable_delay {
            self.master_enable = true;
            self.enable_delay = false;
        } else if self.enable_pending {
            self.enable_pending = false;
            self.enable_delay = true;
        }
    }

    /// Set the request bit for `source`, whatever the state of IME.
    pub fn request<B: Bus>(bus: &mut B, source: Interrupt) {
        let flags = bus.read8(IF_ADDR) | source.flag().bits();
        bus.write8(IF_ADDR, flags);
    }

    /// Sources both requested and enabled.
    pub fn pending<B: Bus>(&self, bus: &mut B) -> u8 {
        bus.read8(IE_ADDR) & bus.read8(IF_ADDR) & InterruptFlags::all().bits()
    }

    /// Dispatch the highest-priority pending interrupt, if IME allows it.
    ///
    /// Returns the cycles spent, or `None` when nothing was serviced. Only
    /// one source is handled per call.
    pub fn service<B: Bus>(&mut self, regs: &mut Registers, bus: &mut B) -> Option<u32> {
        if !self.master_enable {
            return None;
        }

        let pending = InterruptFlags::from_bits_truncate(self.pending(bus));
        let source = Interrupt::PRIORITY
            .into_iter()
            .find(|source| pending.contains(source.flag()))?;

        self.disable();
        let flags = bus.read8(IF_ADDR) & !source.flag().bits();
        bus.write8(IF_ADDR, flags);

        let [lo, hi] = regs.pc.to_le_bytes();
        regs.sp = regs.sp.wrapping_sub(1);
        bus.write8(regs.sp, hi);
        regs.sp = regs.sp.wrapping_sub(1);
        bus.write8(regs.sp, lo);
        regs.pc = source.vector();

        log::debug!("servicing {source:?} interrupt, jumping to 0x{:04X}", regs.pc);
        Some(SERVICE_CYCLES)
    }
}
