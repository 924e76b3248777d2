use crate::{EmulationError, SCREEN_HEIGHT, SCREEN_WIDTH};

/// One output pixel.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::gray(0xFF);
    pub const LIGHT_GRAY: Rgb = Rgb::gray(0xAA);
    pub const DARK_GRAY: Rgb = Rgb::gray(0x55);
    pub const BLACK: Rgb = Rgb::gray(0x00);

    pub const fn gray(level: u8) -> Self {
        Self {
            r: level,
            g: level,
            b: level,
        }
    }

    /// Map a 2-bit color index through a DMG palette register
    /// (BGP/OBP0/OBP1) to a grayscale shade: 0=white, 3=black.
    pub fn from_palette(palette: u8, color_index: u8) -> Self {
        match (palette >> ((color_index & 0x03) * 2)) & 0x03 {
            0 => Self::WHITE,
            1 => Self::LIGHT_GRAY,
            2 => Self::DARK_GRAY,
            _ => Self::BLACK,
        }
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::WHITE
    }
}

/// 144 rows of 160 pixels.
///
/// Lines are only overwritten when the PPU rasterizes them, so the buffer
/// keeps the previous frame's contents for anything not redrawn.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FrameBuffer {
    rows: Vec<[Rgb; SCREEN_WIDTH]>,
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self {
            rows: vec![[Rgb::WHITE; SCREEN_WIDTH]; SCREEN_HEIGHT],
        }
    }

    pub fn get(&self, line: usize, x: usize) -> Option<Rgb> {
        self.rows.get(line).and_then(|row| row.get(x)).copied()
    }

    /// Write a pixel, refusing coordinates outside the visible grid.
    pub fn set(&mut self, line: usize, x: usize, color: Rgb) -> Result<(), EmulationError> {
        let pixel = self
            .rows
            .get_mut(line)
            .and_then(|row| row.get_mut(x))
            .ok_or(EmulationError::PixelOutOfBounds { line, x })?;
        *pixel = color;
        Ok(())
    }

    pub fn rows(&self) -> &[[Rgb; SCREEN_WIDTH]] {
        &self.rows
    }

    /// Pack the grid row-major into `buffer` as RGB24.
    ///
    /// Writes as many whole pixels as fit and returns how many were written.
    pub fn write_rgb24(&self, buffer: &mut [u8]) -> usize {
        let pixels = self.rows.iter().flat_map(|row| row.iter());
        let mut written = 0;
        for (chunk, pixel) in buffer.chunks_exact_mut(3).zip(pixels) {
            chunk.copy_from_slice(&[pixel.r, pixel.g, pixel.b]);
            written += 1;
        }
        written
    }

    pub fn to_rgb24(&self) -> Vec<u8> {
        let mut buffer = vec![0; SCREEN_WIDTH * SCREEN_HEIGHT * 3];
        self.write_rgb24(&mut buffer);
        buffer
    }
}
