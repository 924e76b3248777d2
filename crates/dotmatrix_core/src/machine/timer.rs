use super::memory::{IoEvent, Memory, TAC, TIMA, TMA};
use crate::cpu::{Interrupt, InterruptController};

/// T-cycles per DIV increment (16384 Hz).
pub const DIVIDER_PERIOD: u32 = 256;

/// Divider and TIMA counters.
///
/// Both are driven by the cycle counts the driver feeds in after each
/// instruction. DIV always advances; TIMA only while TAC bit 2 is set, at
/// the rate selected by TAC bits 1..0.
#[derive(Clone, Debug)]
pub struct Timer {
    /// Cycles accumulated towards the next DIV increment.
    divider_counter: u32,
    /// Cycles accumulated towards the next TIMA increment.
    counter: u32,
    /// Cycles per TIMA increment for the current TAC frequency.
    period: u32,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

/// Cycles per TIMA increment for TAC bits 1..0:
/// 00 → 4096 Hz, 01 → 262144 Hz, 10 → 65536 Hz, 11 → 16384 Hz.
pub fn period_for(tac: u8) -> u32 {
    match tac & 0x03 {
        0x00 => 1024,
        0x01 => 16,
        0x02 => 64,
        _ => 256,
    }
}

impl Timer {
    pub fn new() -> Self {
        Self {
            divider_counter: 0,
            counter: 0,
            period: period_for(0),
        }
    }

    #[inline]
    pub fn period(&self) -> u32 {
        self.period
    }

    /// React to a CPU write to DIV or TAC.
    pub fn handle_event(&mut self, event: IoEvent) {
        match event {
            IoEvent::DividerReset => self.divider_counter = 0,
            IoEvent::TimerControl(tac) => self.select_frequency(tac),
        }
    }

    fn select_frequency(&mut self, tac: u8) {
        let period = period_for(tac);
        if period != self.period {
            log::debug!("timer period {} -> {period} cycles", self.period);
            self.period = period;
            self.counter = 0;
        }
    }

    /// Advance both counters by `cycles` T-cycles.
    pub fn update(&mut self, cycles: u32, memory: &mut Memory) {
        self.divider_counter += cycles;
        while self.divider_counter >= DIVIDER_PERIOD {
            self.divider_counter -= DIVIDER_PERIOD;
            memory.increment_divider();
        }

        let tac = memory.read(TAC);
        if tac & 0x04 == 0 {
            return;
        }
        self.select_frequency(tac);

        self.counter += cycles;
        while self.counter >= self.period {
            self.counter -= self.period;
            Self::tick(memory);
        }
    }

    fn tick(memory: &mut Memory) {
        match memory.read(TIMA) {
            0xFF => {
                let modulo = memory.read(TMA);
                memory.store(TIMA, modulo);
                InterruptController::request(memory, Interrupt::Timer);
            }
            tima => memory.store(TIMA, tima + 1),
        }
    }
}
