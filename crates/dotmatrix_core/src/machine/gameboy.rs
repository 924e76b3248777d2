use super::{Cartridge, FrameBuffer, MachineConfig, Memory, Ppu, Snapshot, Timer};
use crate::cpu::{disassemble, Cpu};
use crate::{CartridgeError, EmulationError};

/// How a call to [`GameBoy::run_frame`] ended.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FrameStatus {
    /// The frame budget was spent; the framebuffer holds a full frame.
    Completed,
    /// The program executed STOP or HALT, or no cartridge is loaded.
    Stopped,
}

/// High-level Game Boy machine.
///
/// Owns the CPU core, the address space, the timer and the PPU, and drives
/// them in lockstep: each [`step`](GameBoy::step) executes one instruction,
/// feeds its cycles to the timer and PPU, then services interrupts.
pub struct GameBoy {
    pub cpu: Cpu,
    memory: Memory,
    timer: Timer,
    ppu: Ppu,
    config: MachineConfig,
    /// Cycles accumulated towards the current frame.
    frame_cycles: u32,
    cartridge: Option<Cartridge>,
    fault: Option<EmulationError>,
    last_trace: Option<String>,
}

impl Default for GameBoy {
    fn default() -> Self {
        Self::new(MachineConfig::default())
    }
}

impl GameBoy {
    pub fn new(config: MachineConfig) -> Self {
        let mut cpu = Cpu::new();
        cpu.set_halt_behavior(config.halt);
        Self {
            cpu,
            memory: Memory::new(),
            timer: Timer::new(),
            ppu: Ppu::new(),
            config,
            frame_cycles: 0,
            cartridge: None,
            fault: None,
            last_trace: None,
        }
    }

    /// Validate `data` and start a fresh run from it.
    ///
    /// A rejected image leaves the machine exactly as it was.
    pub fn load_cartridge(&mut self, data: &[u8]) -> Result<(), CartridgeError> {
        let cartridge = Cartridge::new(data).inspect_err(|err| log::warn!("{err}"))?;
        log::info!(
            "loaded cartridge \"{}\" (type 0x{:02X}, {} bytes)",
            cartridge.title(),
            cartridge.cartridge_type(),
            cartridge.len()
        );
        self.cartridge = Some(cartridge);
        self.reset();
        Ok(())
    }

    /// Restart the loaded cartridge from the post-boot state.
    pub fn reset(&mut self) {
        self.cpu.reset();
        self.memory = Memory::new();
        if let Some(cartridge) = &self.cartridge {
            self.memory.load_cartridge(cartridge);
        }
        self.timer = Timer::new();
        self.ppu = Ppu::new();
        self.frame_cycles = 0;
        self.fault = None;
        self.last_trace = None;
    }

    pub fn is_loaded(&self) -> bool {
        self.cartridge.is_some()
    }

    pub fn cartridge(&self) -> Option<&Cartridge> {
        self.cartridge.as_ref()
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    /// The error that ended the current run, if any.
    pub fn fault(&self) -> Option<EmulationError> {
        self.fault
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut Memory {
        &mut self.memory
    }

    pub fn ppu(&self) -> &Ppu {
        &self.ppu
    }

    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    pub fn framebuffer(&self) -> &FrameBuffer {
        self.ppu.framebuffer()
    }

    /// Cycles spent so far in the current frame.
    pub fn frame_cycles(&self) -> u32 {
        self.frame_cycles
    }

    /// Disassembly of the last executed instruction, when tracing is on.
    pub fn last_trace(&self) -> Option<&str> {
        self.last_trace.as_deref()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.cpu, &self.memory)
    }

    /// Execute one instruction and let the rest of the machine catch up.
    ///
    /// Returns the cycles consumed, including interrupt dispatch. Returns 0
    /// without doing anything when no cartridge is loaded, the program has
    /// stopped, or an earlier step failed.
    pub fn step(&mut self) -> Result<u32, EmulationError> {
        if self.cartridge.is_none() || self.cpu.is_stopped() || self.fault.is_some() {
            return Ok(0);
        }

        if self.config.trace && !self.cpu.is_halted() {
            let pc = self.cpu.regs.pc;
            let memory = &self.memory;
            let line = format!("{pc:04X}: {}", disassemble(pc, |addr| memory.read(addr)).text);
            log::trace!("{line}");
            self.last_trace = Some(line);
        }

        let cycles = self.cpu.step(&mut self.memory).inspect_err(|err| {
            log::error!("CPU fault: {err}");
        });
        let mut total = self.record(cycles)?;
        self.advance(total)?;

        if let Some(service) = self.cpu.service_interrupts(&mut self.memory) {
            self.advance(service)?;
            total += service;
        }

        self.frame_cycles = self.frame_cycles.saturating_add(total);
        Ok(total)
    }

    /// Run until one frame's worth of cycles has elapsed.
    ///
    /// The budget is subtracted rather than reset, so overshoot from the
    /// last instruction carries into the next frame.
    pub fn run_frame(&mut self) -> Result<FrameStatus, EmulationError> {
        if let Some(fault) = self.fault {
            return Err(fault);
        }

        let budget = self.config.frame_cycles;
        while self.frame_cycles < budget {
            if self.cartridge.is_none() || self.cpu.is_stopped() {
                return Ok(FrameStatus::Stopped);
            }
            self.step()?;
        }
        self.frame_cycles -= budget;
        Ok(FrameStatus::Completed)
    }

    /// Route pending I/O events, then advance the timer and PPU.
    fn advance(&mut self, cycles: u32) -> Result<(), EmulationError> {
        for event in self.memory.take_events() {
            self.timer.handle_event(event);
        }
        self.timer.update(cycles, &mut self.memory);
        let rendered = self.ppu.update(cycles, &mut self.memory).inspect_err(|err| {
            log::error!("PPU fault: {err}");
        });
        self.record(rendered)
    }

    fn record<T>(&mut self, result: Result<T, EmulationError>) -> Result<T, EmulationError> {
        if let Err(err) = &result {
            self.fault = Some(*err);
        }
        result
    }
}
