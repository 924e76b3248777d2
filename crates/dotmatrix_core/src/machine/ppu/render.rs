use super::LcdControl;
use crate::machine::memory::{Memory, BGP, LCDC, OBP0, OBP1, SCX, SCY, WX, WY};
use crate::machine::{FrameBuffer, Rgb};
use crate::{EmulationError, SCREEN_WIDTH};

const OAM_BASE: u16 = 0xFE00;
const OAM_ENTRIES: u16 = 40;
const SPRITES_PER_LINE: usize = 10;

const ATTR_PRIORITY: u8 = 1 << 7;
const ATTR_FLIP_Y: u8 = 1 << 6;
const ATTR_FLIP_X: u8 = 1 << 5;
const ATTR_PALETTE: u8 = 1 << 4;

/// Rasterize visible line `line` into the framebuffer: background and
/// window first, then sprites.
pub(super) fn draw_scanline(
    memory: &Memory,
    line: u8,
    framebuffer: &mut FrameBuffer,
) -> Result<(), EmulationError> {
    let lcdc = LcdControl::from_bits_truncate(memory.read(LCDC));
    // Background color index per pixel, consulted by sprite priority.
    let mut bg_index = [0u8; SCREEN_WIDTH];

    if lcdc.contains(LcdControl::BG_ENABLE) {
        draw_tiles(memory, lcdc, line, framebuffer, &mut bg_index)?;
    }
    if lcdc.contains(LcdControl::OBJ_ENABLE) {
        draw_sprites(memory, lcdc, line, framebuffer, &bg_index)?;
    }
    Ok(())
}

/// Color index (0..=3) of pixel `x` in the 8-pixel row at `row_addr`.
#[inline]
fn tile_pixel(memory: &Memory, row_addr: u16, x: u8) -> u8 {
    let lo = memory.read(row_addr);
    let hi = memory.read(row_addr.wrapping_add(1));
    let bit = 7 - (x & 0x07);
    (((hi >> bit) & 0x01) << 1) | ((lo >> bit) & 0x01)
}

/// Address of tile `index` in the selected tile data area.
#[inline]
fn tile_address(lcdc: LcdControl, index: u8) -> u16 {
    if lcdc.contains(LcdControl::TILE_DATA) {
        // 0x8000-based, unsigned tile index.
        0x8000 + u16::from(index) * 16
    } else {
        // 0x8800-based, signed tile index around 0x9000.
        0x9000u16.wrapping_add((index as i8 as i16 * 16) as u16)
    }
}

fn draw_tiles(
    memory: &Memory,
    lcdc: LcdControl,
    line: u8,
    framebuffer: &mut FrameBuffer,
    bg_index: &mut [u8; SCREEN_WIDTH],
) -> Result<(), EmulationError> {
    let scy = memory.read(SCY);
    let scx = memory.read(SCX);
    let wy = memory.read(WY);
    let window_x = i32::from(memory.read(WX)) - 7;
    let bgp = memory.read(BGP);

    let window_on_line = lcdc.contains(LcdControl::WINDOW_ENABLE) && wy <= line;
    let bg_map: u16 = if lcdc.contains(LcdControl::BG_TILE_MAP) { 0x9C00 } else { 0x9800 };
    let window_map: u16 = if lcdc.contains(LcdControl::WINDOW_TILE_MAP) { 0x9C00 } else { 0x9800 };

    for x in 0..SCREEN_WIDTH {
        let in_window = window_on_line && x as i32 >= window_x;
        let (map, map_x, map_y) = if in_window {
            (window_map, (x as i32 - window_x) as u8, line - wy)
        } else {
            (bg_map, (x as u8).wrapping_add(scx), line.wrapping_add(scy))
        };

        let tile_addr = map + u16::from(map_y / 8) * 32 + u16::from(map_x / 8);
        let tile = memory.read(tile_addr);
        let row_addr = tile_address(lcdc, tile) + u16::from(map_y % 8) * 2;
        let color_index = tile_pixel(memory, row_addr, map_x);

        bg_index[x] = color_index;
        framebuffer.set(usize::from(line), x, Rgb::from_palette(bgp, color_index))?;
    }
    Ok(())
}

struct Sprite {
    y: i32,
    x: i32,
    tile: u8,
    attrs: u8,
}

/// Draw up to ten sprites on `line` over the background color indices in
/// `bg_index`.
///
/// A sprite with the behind-background attribute only shows over pixels
/// whose background color index is 0, whatever shade BGP maps it to.
fn draw_sprites(
    memory: &Memory,
    lcdc: LcdControl,
    line: u8,
    framebuffer: &mut FrameBuffer,
    bg_index: &[u8; SCREEN_WIDTH],
) -> Result<(), EmulationError> {
    let height: i32 = if lcdc.contains(LcdControl::OBJ_TALL) { 16 } else { 8 };
    let line_i = i32::from(line);

    let sprites: Vec<Sprite> = (0..OAM_ENTRIES)
        .map(|i| {
            let base = OAM_BASE + i * 4;
            Sprite {
                y: i32::from(memory.read(base)) - 16,
                x: i32::from(memory.read(base + 1)) - 8,
                tile: memory.read(base + 2),
                attrs: memory.read(base + 3),
            }
        })
        .filter(|sprite| line_i >= sprite.y && line_i < sprite.y + height)
        .take(SPRITES_PER_LINE)
        .collect();

    // Lower OAM index wins overlaps, so it is drawn last.
    for sprite in sprites.iter().rev() {
        let tile = if height == 16 { sprite.tile & 0xFE } else { sprite.tile };
        let mut row = line_i - sprite.y;
        if sprite.attrs & ATTR_FLIP_Y != 0 {
            row = height - 1 - row;
        }
        let row_addr = 0x8000 + u16::from(tile) * 16 + row as u16 * 2;
        let palette = memory.read(if sprite.attrs & ATTR_PALETTE != 0 { OBP1 } else { OBP0 });

        for col in 0..8 {
            let screen_x = sprite.x + col;
            if !(0..SCREEN_WIDTH as i32).contains(&screen_x) {
                continue;
            }
            let screen_x = screen_x as usize;

            let src_x = if sprite.attrs & ATTR_FLIP_X != 0 { 7 - col } else { col };
            let color_index = tile_pixel(memory, row_addr, src_x as u8);
            // Color index 0 is transparent for sprites.
            if color_index == 0 {
                continue;
            }
            if sprite.attrs & ATTR_PRIORITY != 0 && bg_index[screen_x] != 0 {
                continue;
            }

            framebuffer.set(usize::from(line), screen_x, Rgb::from_palette(palette, color_index))?;
        }
    }
    Ok(())
}
