use super::*;
use crate::cpu::{Bus, HaltBehavior, Reg16, RunState, IE_ADDR, IF_ADDR};
use crate::{CartridgeError, EmulationError};

/// 32 KiB ROM-only image with `program` at the 0x0100 entry point.
fn rom_with(program: &[u8]) -> Vec<u8> {
    let mut rom = vec![0u8; 0x8000];
    rom[0x0100..0x0100 + program.len()].copy_from_slice(program);
    rom[0x0134..0x0138].copy_from_slice(b"TEST");
    rom[0x0147] = 0x00;
    rom
}

fn loaded_memory() -> Memory {
    let cartridge = Cartridge::new(&rom_with(&[0x00])).unwrap();
    let mut memory = Memory::new();
    memory.load_cartridge(&cartridge);
    memory
}

fn machine_with(program: &[u8]) -> GameBoy {
    let mut gb = GameBoy::default();
    gb.load_cartridge(&rom_with(program)).unwrap();
    gb
}

// --- Memory ---------------------------------------------------------------

#[test]
fn load_copies_fixed_bank_and_seeds_io_defaults() {
    let mut rom = rom_with(&[0x3C]);
    rom[0x3FFF] = 0x11;
    rom[0x4000] = 0x22;
    let cartridge = Cartridge::new(&rom).unwrap();
    let mut memory = Memory::new();
    memory.store(0xC000, 0x99);
    memory.load_cartridge(&cartridge);

    assert_eq!(memory.read(0x0100), 0x3C);
    assert_eq!(memory.read(0x3FFF), 0x11);
    // Only the first bank is mapped.
    assert_eq!(memory.read(0x4000), 0x00);
    // Previous contents are cleared.
    assert_eq!(memory.read(0xC000), 0x00);

    assert_eq!(memory.read(LCDC), 0x91);
    assert_eq!(memory.read(STAT), 0x85);
    assert_eq!(memory.read(BGP), 0xFC);
    assert_eq!(memory.read(OBP0), 0xFF);
    assert_eq!(memory.read(OBP1), 0xFF);
    assert_eq!(memory.read(TAC), 0x00);
    assert_eq!(memory.read(0xFF26), 0xF1);
    assert_eq!(memory.read(IF_ADDR), 0xE1);
    assert_eq!(memory.read(IE_ADDR), 0x00);
}

#[test]
fn writes_below_0x8000_are_ignored() {
    let mut memory = loaded_memory();
    assert_eq!(memory.write(0x0100, 0xAA), None);
    assert_eq!(memory.write(0x2000, 0x01), None);
    assert_eq!(memory.read(0x0100), 0x00);
    assert_eq!(memory.read(0x2000), 0x00);
}

#[test]
fn echo_ram_writes_mirror_into_working_ram() {
    let mut memory = loaded_memory();
    memory.write(0xE010, 0x42);
    assert_eq!(memory.read(0xC010), 0x42);
    assert_eq!(memory.read(0xE010), 0x42);

    // Working RAM is visible through the echo.
    memory.write(0xC123, 0x17);
    assert_eq!(memory.read(0xE123), 0x17);
}

#[test]
fn unusable_region_drops_writes() {
    let mut memory = loaded_memory();
    memory.write(0xFEA0, 0x12);
    memory.write(0xFEFF, 0x34);
    assert_eq!(memory.read(0xFEA0), 0x00);
    assert_eq!(memory.read(0xFEFF), 0x00);

    // OAM just below is plain RAM.
    memory.write(0xFE9F, 0x56);
    assert_eq!(memory.read(0xFE9F), 0x56);
}

#[test]
fn io_writes_apply_their_side_effects() {
    let mut memory = loaded_memory();

    memory.increment_divider();
    memory.increment_divider();
    assert_eq!(memory.read(DIV), 2);
    memory.write8(DIV, 0x99);
    assert_eq!(memory.read(DIV), 0);

    memory.write8(TAC, 0x05);
    assert_eq!(memory.read(TAC), 0x05);

    memory.increment_scanline();
    assert_eq!(memory.read(LY), 1);
    memory.write8(LY, 0x50);
    assert_eq!(memory.read(LY), 0);

    memory.write8(DMA, 0xC0);
    assert_eq!(memory.read(DMA), 0x00);

    assert_eq!(
        memory.take_events(),
        vec![IoEvent::DividerReset, IoEvent::TimerControl(0x05)]
    );
    assert!(memory.take_events().is_empty());
}

#[test]
fn joypad_reads_report_no_buttons_pressed() {
    let mut memory = loaded_memory();
    assert_eq!(memory.read(JOYP), 0xCF);
    memory.write(JOYP, 0x20);
    assert_eq!(memory.read(JOYP), 0xEF);
}

#[test]
fn bus_word_access_is_little_endian() {
    let mut memory = loaded_memory();
    memory.write16(0xC000, 0xBEEF);
    assert_eq!(memory.read(0xC000), 0xEF);
    assert_eq!(memory.read(0xC001), 0xBE);
    assert_eq!(memory.read16(0xC000), 0xBEEF);
}

// --- Cartridge ------------------------------------------------------------

#[test]
fn cartridge_rejects_unusable_images() {
    assert_eq!(Cartridge::new(&[]).unwrap_err(), CartridgeError::Empty);
    assert_eq!(
        Cartridge::new(&vec![0u8; 0x8000]).unwrap_err(),
        CartridgeError::NoData
    );
    let huge = vec![0xFFu8; MAX_CARTRIDGE_SIZE + 1];
    assert_eq!(
        Cartridge::new(&huge).unwrap_err(),
        CartridgeError::TooLarge(MAX_CARTRIDGE_SIZE + 1)
    );
}

#[test]
fn cartridge_header_fields() {
    let mut rom = rom_with(&[0x00]);
    rom[0x0147] = 0x01;
    let cartridge = Cartridge::new(&rom).unwrap();
    assert_eq!(cartridge.title(), "TEST");
    assert_eq!(cartridge.cartridge_type(), 0x01);
    assert_eq!(cartridge.fixed_bank().len(), BANK_SIZE);

    // Images shorter than the header still load.
    let tiny = Cartridge::new(&[0x3C, 0x00]).unwrap();
    assert_eq!(tiny.title(), "");
    assert_eq!(tiny.fixed_bank(), &[0x3C, 0x00]);
}

#[test]
fn rejected_cartridge_leaves_machine_untouched() {
    let mut gb = GameBoy::default();
    assert_eq!(
        gb.load_cartridge(&[0u8; 0x200]).unwrap_err(),
        CartridgeError::NoData
    );
    assert!(!gb.is_loaded());
    assert_eq!(gb.step(), Ok(0));
    assert_eq!(gb.run_frame(), Ok(FrameStatus::Stopped));

    // A running machine keeps its state too.
    let mut gb = machine_with(&[0x3C, 0x3C]);
    gb.step().unwrap();
    let before = gb.snapshot();
    assert!(gb.load_cartridge(&[]).is_err());
    assert_eq!(gb.snapshot(), before);
}

// --- Timer ----------------------------------------------------------------

#[test]
fn disabled_timer_only_advances_divider() {
    let mut memory = loaded_memory();
    let mut timer = Timer::new();

    timer.update(DIVIDER_PERIOD * 3, &mut memory);
    assert_eq!(memory.read(DIV), 3);
    assert_eq!(memory.read(TIMA), 0);

    timer.update(DIVIDER_PERIOD - 1, &mut memory);
    assert_eq!(memory.read(DIV), 3);
    timer.update(1, &mut memory);
    assert_eq!(memory.read(DIV), 4);
}

#[test]
fn enabled_timer_ticks_at_each_frequency() {
    for (tac, period) in [(0x04, 1024), (0x05, 16), (0x06, 64), (0x07, 256)] {
        let mut memory = loaded_memory();
        let mut timer = Timer::new();
        memory.write8(TAC, tac);
        for event in memory.take_events() {
            timer.handle_event(event);
        }
        assert_eq!(timer.period(), period, "TAC {tac:#04x}");

        timer.update(period * 3, &mut memory);
        assert_eq!(memory.read(TIMA), 3, "TAC {tac:#04x}");

        timer.update(period - 1, &mut memory);
        assert_eq!(memory.read(TIMA), 3, "TAC {tac:#04x}");
        timer.update(1, &mut memory);
        assert_eq!(memory.read(TIMA), 4, "TAC {tac:#04x}");
    }
}

#[test]
fn timer_overflow_reloads_modulo_and_requests_once() {
    let mut memory = loaded_memory();
    let mut timer = Timer::new();
    memory.store(IF_ADDR, 0xE0);
    memory.store(TIMA, 0xFF);
    memory.store(TMA, 0xAB);
    memory.write8(TAC, 0x05);
    for event in memory.take_events() {
        timer.handle_event(event);
    }

    timer.update(16, &mut memory);
    assert_eq!(memory.read(TIMA), 0xAB);
    assert_eq!(memory.read(IF_ADDR), 0xE4);

    memory.store(IF_ADDR, 0xE0);
    timer.update(15, &mut memory);
    assert_eq!(memory.read(TIMA), 0xAB);
    assert_eq!(memory.read(IF_ADDR), 0xE0);
}

#[test]
fn frequency_change_takes_effect_immediately() {
    let mut memory = loaded_memory();
    let mut timer = Timer::new();
    memory.write8(TAC, 0x04);
    for event in memory.take_events() {
        timer.handle_event(event);
    }
    timer.update(1000, &mut memory);
    assert_eq!(memory.read(TIMA), 0);

    memory.write8(TAC, 0x05);
    for event in memory.take_events() {
        timer.handle_event(event);
    }
    assert_eq!(timer.period(), 16);
    timer.update(16, &mut memory);
    assert_eq!(memory.read(TIMA), 1);
}

#[test]
fn divider_write_restarts_divider_count() {
    let mut memory = loaded_memory();
    let mut timer = Timer::new();
    timer.update(200, &mut memory);

    memory.write8(DIV, 0);
    for event in memory.take_events() {
        timer.handle_event(event);
    }
    timer.update(100, &mut memory);
    assert_eq!(memory.read(DIV), 0);
    timer.update(156, &mut memory);
    assert_eq!(memory.read(DIV), 1);
}

// --- PPU ------------------------------------------------------------------

#[test]
fn full_scanline_increments_line_once() {
    let mut memory = loaded_memory();
    let mut ppu = Ppu::new();

    ppu.update(455, &mut memory).unwrap();
    assert_eq!(memory.read(LY), 0);
    assert_eq!(ppu.scanline_counter(), 1);

    ppu.update(1, &mut memory).unwrap();
    assert_eq!(memory.read(LY), 1);
    assert_eq!(ppu.scanline_counter(), CYCLES_PER_LINE);
}

#[test]
fn vblank_requested_exactly_when_line_reaches_144() {
    let mut memory = loaded_memory();
    let mut ppu = Ppu::new();
    memory.store(IF_ADDR, 0xE0);

    for _ in 0..143 {
        ppu.update(456, &mut memory).unwrap();
    }
    assert_eq!(memory.read(LY), 143);
    assert_eq!(memory.read(IF_ADDR) & 0x01, 0);

    ppu.update(456, &mut memory).unwrap();
    assert_eq!(memory.read(LY), 144);
    assert_eq!(memory.read(IF_ADDR) & 0x01, 0x01);

    memory.store(IF_ADDR, 0xE0);
    ppu.update(456, &mut memory).unwrap();
    assert_eq!(memory.read(LY), 145);
    assert_eq!(memory.read(IF_ADDR) & 0x01, 0);
}

#[test]
fn line_wraps_to_zero_after_153() {
    let mut memory = loaded_memory();
    let mut ppu = Ppu::new();

    for _ in 0..153 {
        ppu.update(456, &mut memory).unwrap();
    }
    assert_eq!(memory.read(LY), 153);
    ppu.update(456, &mut memory).unwrap();
    assert_eq!(memory.read(LY), 0);
}

#[test]
fn stat_mode_follows_the_scanline_countdown() {
    let mut memory = loaded_memory();
    let mut ppu = Ppu::new();
    let mode = |memory: &Memory| memory.read(STAT) & 0x03;

    ppu.update(0, &mut memory).unwrap();
    assert_eq!(mode(&memory), LcdMode::OamScan as u8);

    ppu.update(81, &mut memory).unwrap();
    ppu.update(0, &mut memory).unwrap();
    assert_eq!(mode(&memory), LcdMode::Transfer as u8);

    ppu.update(172, &mut memory).unwrap();
    ppu.update(0, &mut memory).unwrap();
    assert_eq!(mode(&memory), LcdMode::HBlank as u8);

    for _ in 0..144 {
        ppu.update(456, &mut memory).unwrap();
    }
    ppu.update(0, &mut memory).unwrap();
    assert_eq!(mode(&memory), LcdMode::VBlank as u8);
}

#[test]
fn mode_interrupt_fires_once_on_entering_enabled_mode() {
    let mut memory = loaded_memory();
    let mut ppu = Ppu::new();
    memory.store(IF_ADDR, 0xE0);
    memory.store(STAT, LcdStatus::HBLANK_INTERRUPT.bits());

    ppu.update(300, &mut memory).unwrap();
    assert_eq!(memory.read(IF_ADDR) & 0x02, 0);

    ppu.update(4, &mut memory).unwrap();
    assert_eq!(memory.read(IF_ADDR) & 0x02, 0x02);

    memory.store(IF_ADDR, 0xE0);
    ppu.update(4, &mut memory).unwrap();
    assert_eq!(memory.read(IF_ADDR) & 0x02, 0);
}

#[test]
fn coincidence_sets_stat_bit_and_raises_lcd_interrupt() {
    let mut memory = loaded_memory();
    let mut ppu = Ppu::new();
    memory.store(IF_ADDR, 0xE0);
    memory.store(LYC, 2);
    memory.store(STAT, LcdStatus::COINCIDENCE_INTERRUPT.bits());

    ppu.update(456, &mut memory).unwrap();
    ppu.update(456, &mut memory).unwrap();
    assert_eq!(memory.read(LY), 2);
    assert_eq!(memory.read(STAT) & 0x04, 0);
    assert_eq!(memory.read(IF_ADDR) & 0x02, 0);

    ppu.update(4, &mut memory).unwrap();
    assert_eq!(memory.read(STAT) & 0x04, 0x04);
    assert_eq!(memory.read(IF_ADDR) & 0x02, 0x02);

    // Still matching: no second request.
    memory.store(IF_ADDR, 0xE0);
    ppu.update(4, &mut memory).unwrap();
    assert_eq!(memory.read(IF_ADDR) & 0x02, 0);
}

#[test]
fn lcd_off_holds_line_zero_in_vblank_mode() {
    let mut memory = loaded_memory();
    let mut ppu = Ppu::new();
    ppu.update(456 * 3, &mut memory).unwrap();
    assert_eq!(memory.read(LY), 1);

    memory.store(LCDC, 0x11);
    ppu.update(456 * 3, &mut memory).unwrap();
    assert_eq!(memory.read(LY), 0);
    assert_eq!(memory.read(STAT) & 0x03, LcdMode::VBlank as u8);
    assert_eq!(ppu.scanline_counter(), CYCLES_PER_LINE);
}

/// Render line 0 once with the given LCDC.
fn render_line_zero(memory: &mut Memory, lcdc: u8) -> Ppu {
    memory.store(LCDC, lcdc);
    memory.store(BGP, 0xE4);
    memory.store(OBP0, 0xE4);
    let mut ppu = Ppu::new();
    ppu.update(456, memory).unwrap();
    ppu
}

#[test]
fn background_tiles_map_through_palette() {
    let mut memory = loaded_memory();
    // Tile 1, row 0: color index 1 across the row.
    memory.store(0x8010, 0xFF);
    memory.store(0x8011, 0x00);
    memory.store(0x9800, 1);

    let ppu = render_line_zero(&mut memory, 0x91);
    let frame = ppu.framebuffer();
    for x in 0..8 {
        assert_eq!(frame.get(0, x), Some(Rgb::LIGHT_GRAY), "x={x}");
    }
    assert_eq!(frame.get(0, 8), Some(Rgb::WHITE));
    // Lines not rasterized yet keep their previous contents.
    assert_eq!(frame.get(1, 0), Some(Rgb::WHITE));
}

#[test]
fn signed_tile_data_addresses_around_0x9000() {
    let mut memory = loaded_memory();
    // Tile -1 lives at 0x8FF0; row 0 has color index 2.
    memory.store(0x8FF0, 0x00);
    memory.store(0x8FF1, 0xFF);
    memory.store(0x9800, 0xFF);

    let ppu = render_line_zero(&mut memory, 0x81);
    assert_eq!(ppu.framebuffer().get(0, 0), Some(Rgb::DARK_GRAY));
}

#[test]
fn window_covers_background_from_wx_minus_seven() {
    let mut memory = loaded_memory();
    memory.store(0x8010, 0xFF);
    for offset in 0..32 {
        memory.store(0x9C00 + offset, 1);
    }
    memory.store(WY, 0);
    memory.store(WX, 7 + 80);

    let ppu = render_line_zero(&mut memory, 0xF1);
    assert_eq!(ppu.framebuffer().get(0, 79), Some(Rgb::WHITE));
    assert_eq!(ppu.framebuffer().get(0, 80), Some(Rgb::LIGHT_GRAY));
}

/// OAM entry `index` showing tile 2 at screen (0, x).
fn place_sprite(memory: &mut Memory, index: u16, x: u8, attrs: u8) {
    let base = 0xFE00 + index * 4;
    memory.store(base, 16);
    memory.store(base + 1, x + 8);
    memory.store(base + 2, 2);
    memory.store(base + 3, attrs);
}

/// Tile 2, row 0: only the leftmost pixel, color index 3.
fn store_sprite_tile(memory: &mut Memory) {
    memory.store(0x8020, 0x80);
    memory.store(0x8021, 0x80);
}

#[test]
fn sprites_draw_over_background_with_transparency() {
    let mut memory = loaded_memory();
    store_sprite_tile(&mut memory);
    place_sprite(&mut memory, 0, 0, 0x00);

    let ppu = render_line_zero(&mut memory, 0x93);
    assert_eq!(ppu.framebuffer().get(0, 0), Some(Rgb::BLACK));
    assert_eq!(ppu.framebuffer().get(0, 1), Some(Rgb::WHITE));
}

#[test]
fn sprite_flip_and_priority() {
    let mut memory = loaded_memory();
    store_sprite_tile(&mut memory);
    place_sprite(&mut memory, 0, 0, 0x20);
    // Behind a non-zero background pixel: hidden.
    memory.store(0x8010, 0xFF);
    memory.store(0x9801, 1);
    place_sprite(&mut memory, 1, 8, 0x80);
    // Behind a zero background pixel: shown.
    place_sprite(&mut memory, 2, 16, 0x80);

    let ppu = render_line_zero(&mut memory, 0x93);
    let frame = ppu.framebuffer();
    assert_eq!(frame.get(0, 0), Some(Rgb::WHITE));
    assert_eq!(frame.get(0, 7), Some(Rgb::BLACK));
    assert_eq!(frame.get(0, 8), Some(Rgb::LIGHT_GRAY));
    assert_eq!(frame.get(0, 16), Some(Rgb::BLACK));
}

#[test]
fn behind_background_sprite_tests_index_not_shade() {
    let mut memory = loaded_memory();
    store_sprite_tile(&mut memory);
    place_sprite(&mut memory, 0, 0, 0x80);
    memory.store(LCDC, 0x93);
    // Index 0 shows as dark gray.
    memory.store(BGP, 0xE6);
    memory.store(OBP0, 0xE4);

    let mut ppu = Ppu::new();
    ppu.update(456, &mut memory).unwrap();
    assert_eq!(ppu.framebuffer().get(0, 0), Some(Rgb::BLACK));
    assert_eq!(ppu.framebuffer().get(0, 1), Some(Rgb::DARK_GRAY));
}

#[test]
fn at_most_ten_sprites_per_line() {
    let mut memory = loaded_memory();
    store_sprite_tile(&mut memory);
    for index in 0..11u16 {
        place_sprite(&mut memory, index, (index * 8) as u8, 0x00);
    }

    let ppu = render_line_zero(&mut memory, 0x93);
    assert_eq!(ppu.framebuffer().get(0, 72), Some(Rgb::BLACK));
    assert_eq!(ppu.framebuffer().get(0, 80), Some(Rgb::WHITE));
}

#[test]
fn partially_offscreen_sprites_are_clipped() {
    let mut memory = loaded_memory();
    memory.store(0x8020, 0xFF);
    memory.store(0x8021, 0xFF);
    // X = 4 puts the sprite four pixels off the left edge.
    memory.store(0xFE00, 16);
    memory.store(0xFE01, 4);
    memory.store(0xFE02, 2);

    let ppu = render_line_zero(&mut memory, 0x93);
    for x in 0..4 {
        assert_eq!(ppu.framebuffer().get(0, x), Some(Rgb::BLACK));
    }
    assert_eq!(ppu.framebuffer().get(0, 4), Some(Rgb::WHITE));
}

#[test]
fn framebuffer_rejects_out_of_range_pixels() {
    let mut frame = FrameBuffer::new();
    assert_eq!(
        frame.set(144, 0, Rgb::BLACK),
        Err(EmulationError::PixelOutOfBounds { line: 144, x: 0 })
    );
    assert_eq!(
        frame.set(0, 160, Rgb::BLACK),
        Err(EmulationError::PixelOutOfBounds { line: 0, x: 160 })
    );
    assert!(frame.set(143, 159, Rgb::BLACK).is_ok());
}

#[test]
fn framebuffer_packs_rgb24_row_major() {
    let mut frame = FrameBuffer::new();
    frame.set(0, 1, Rgb::DARK_GRAY).unwrap();

    let bytes = frame.to_rgb24();
    assert_eq!(bytes.len(), 160 * 144 * 3);
    assert_eq!(&bytes[0..6], &[0xFF, 0xFF, 0xFF, 0x55, 0x55, 0x55]);

    let mut short = [0u8; 7];
    assert_eq!(frame.write_rgb24(&mut short), 2);
}

// --- Driver ---------------------------------------------------------------

#[test]
fn load_resets_registers_to_post_boot_values() {
    let gb = machine_with(&[0x00]);
    let snapshot = gb.snapshot();
    assert_eq!(snapshot.pc, 0x0100);
    assert_eq!(snapshot.sp, 0xFFFE);
    assert_eq!(snapshot.registers.get16(Reg16::AF), 0x01B0);
    assert_eq!(snapshot.registers.get16(Reg16::BC), 0x0013);
    assert_eq!(snapshot.registers.get16(Reg16::DE), 0x00D8);
    assert_eq!(snapshot.registers.get16(Reg16::HL), 0x014D);
    assert!(snapshot.flags.zero);
    assert!(!snapshot.flags.subtract);
    assert!(snapshot.flags.half_carry);
    assert!(snapshot.flags.carry);
    assert!(!snapshot.ime);
    assert_eq!(snapshot.run_state, RunState::Running);
    assert_eq!(snapshot.memory.len(), MEMORY_SIZE);
}

#[test]
fn snapshot_reports_current_and_last_opcode() {
    let mut gb = machine_with(&[0x3E, 0x42, 0x04]);
    assert_eq!(gb.snapshot().opcode, 0x3E);

    assert_eq!(gb.step(), Ok(8));
    let snapshot = gb.snapshot();
    assert_eq!(snapshot.last_opcode, 0x3E);
    assert_eq!(snapshot.opcode, 0x04);
    assert_eq!(snapshot.registers.a(), 0x42);
    assert_eq!(snapshot.pc, 0x0102);
}

#[test]
fn run_frame_spends_the_cycle_budget() {
    // JR -2: a 12-cycle spin loop.
    let mut gb = machine_with(&[0x18, 0xFE]);
    gb.memory_mut().store(IF_ADDR, 0xE0);

    assert_eq!(gb.run_frame(), Ok(FrameStatus::Completed));
    assert!(gb.frame_cycles() < FRAME_CYCLES);
    assert_eq!(gb.cpu.regs.pc, 0x0100);
    // A whole frame passes through VBlank and back to line 0.
    assert_eq!(gb.memory().read(IF_ADDR) & 0x01, 0x01);
    assert_eq!(gb.memory().read(LY), 0);
}

#[test]
fn custom_frame_budget_is_honoured() {
    let config = MachineConfig::builder().frame_cycles(456).build();
    let mut gb = GameBoy::new(config);
    gb.load_cartridge(&rom_with(&[0x18, 0xFE])).unwrap();

    assert_eq!(gb.run_frame(), Ok(FrameStatus::Completed));
    assert_eq!(gb.memory().read(LY), 1);
}

#[test]
fn stop_ends_the_run() {
    let mut gb = machine_with(&[0x10, 0x00]);
    assert_eq!(gb.run_frame(), Ok(FrameStatus::Stopped));
    assert!(gb.cpu.is_stopped());
    assert_eq!(gb.step(), Ok(0));
}

#[test]
fn decode_failure_stops_interpretation() {
    let mut gb = machine_with(&[0x00, 0xD3]);
    let expected = EmulationError::InvalidOpcode {
        opcode: 0xD3,
        address: 0x0101,
    };

    assert_eq!(gb.run_frame(), Err(expected));
    assert_eq!(gb.fault(), Some(expected));
    assert_eq!(gb.step(), Ok(0));
    assert_eq!(gb.run_frame(), Err(expected));
    assert_eq!(gb.cpu.regs.pc, 0x0102);

    // Reloading clears the fault.
    gb.load_cartridge(&rom_with(&[0x00])).unwrap();
    assert_eq!(gb.fault(), None);
    assert_eq!(gb.step(), Ok(4));
}

#[test]
fn trace_records_the_executed_instruction() {
    let config = MachineConfig::builder().trace(true).build();
    let mut gb = GameBoy::new(config);
    gb.load_cartridge(&rom_with(&[0x3E, 0x42, 0xC3, 0x00, 0x01])).unwrap();

    gb.step().unwrap();
    assert_eq!(gb.last_trace(), Some("0100: LD A,$42"));
    gb.step().unwrap();
    assert_eq!(gb.last_trace(), Some("0102: JP $0100"));

    let quiet = machine_with(&[0x00]);
    assert_eq!(quiet.last_trace(), None);
}

#[test]
fn pending_interrupt_is_serviced_after_ei_delay() {
    // LD A,0x04 ; LDH (0xFF),A ; EI ; NOP ; JR -2
    let mut gb = machine_with(&[0x3E, 0x04, 0xE0, 0xFF, 0xFB, 0x00, 0x18, 0xFE]);
    gb.memory_mut().store(IF_ADDR, 0xE4);

    assert_eq!(gb.step(), Ok(8));
    assert_eq!(gb.step(), Ok(12));
    assert_eq!(gb.memory().read(IE_ADDR), 0x04);
    assert_eq!(gb.step(), Ok(4));
    assert_eq!(gb.cpu.regs.pc, 0x0105);

    // NOP retires, IME turns on, the timer interrupt is dispatched.
    assert_eq!(gb.step(), Ok(4 + 20));
    assert_eq!(gb.cpu.regs.pc, 0x0050);
    assert_eq!(gb.cpu.regs.sp, 0xFFFC);
    assert_eq!(gb.memory().read(0xFFFC), 0x06);
    assert_eq!(gb.memory().read(0xFFFD), 0x01);
    assert_eq!(gb.memory().read(IF_ADDR), 0xE0);
    assert!(!gb.cpu.interrupts.is_enabled());
}

#[test]
fn halt_ends_the_run() {
    let mut gb = machine_with(&[0x00, 0x76, 0x00]);
    assert_eq!(gb.run_frame(), Ok(FrameStatus::Stopped));
    assert!(gb.cpu.is_stopped());
    assert_eq!(gb.cpu.regs.pc, 0x0102);
    assert_eq!(gb.frame_cycles(), 8);

    assert_eq!(gb.run_frame(), Ok(FrameStatus::Stopped));
    assert_eq!(gb.step(), Ok(0));
    assert_eq!(gb.cpu.regs.pc, 0x0102);
}

#[test]
fn timer_overflow_wakes_halted_cpu() {
    // LD A,0x05 ; LDH (0x07),A ; LD A,0x04 ; LDH (0xFF),A ; HALT ; INC B
    let program = [0x3E, 0x05, 0xE0, 0x07, 0x3E, 0x04, 0xE0, 0xFF, 0x76, 0x04];
    let config = MachineConfig::builder()
        .halt(HaltBehavior::WaitForInterrupt)
        .build();
    let mut gb = GameBoy::new(config);
    gb.load_cartridge(&rom_with(&program)).unwrap();
    gb.memory_mut().store(IF_ADDR, 0xE0);
    gb.memory_mut().store(TIMA, 0xF0);

    for _ in 0..5 {
        gb.step().unwrap();
    }
    assert!(gb.cpu.is_halted());
    assert_eq!(gb.cpu.regs.pc, 0x0109);

    let mut guard = 0;
    while gb.cpu.is_halted() {
        assert_eq!(gb.step(), Ok(4));
        guard += 1;
        assert!(guard < 1000, "CPU never woke up");
    }
    assert_eq!(gb.memory().read(IF_ADDR) & 0x04, 0x04);

    // IME is off: execution resumes after HALT instead of dispatching.
    gb.step().unwrap();
    assert_eq!(gb.cpu.regs.pc, 0x010A);
    assert_eq!(gb.cpu.regs.b(), 0x01);
}
