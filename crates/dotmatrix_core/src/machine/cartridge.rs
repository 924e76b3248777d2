use crate::CartridgeError;

/// Largest image accepted.
pub const MAX_CARTRIDGE_SIZE: usize = 2 * 1024 * 1024;

/// Size of the fixed bank mapped at 0x0000..0x3FFF.
pub const BANK_SIZE: usize = 0x4000;

const TITLE_START: usize = 0x0134;
const TITLE_END: usize = 0x0144;
const TYPE_ADDR: usize = 0x0147;

/// Immutable cartridge image.
///
/// Only the first bank is ever mapped into the address space; bank
/// switching is not modelled.
#[derive(Clone, Debug)]
pub struct Cartridge {
    data: Vec<u8>,
}

impl Cartridge {
    pub fn new(data: &[u8]) -> Result<Self, CartridgeError> {
        if data.is_empty() {
            return Err(CartridgeError::Empty);
        }
        if data.len() > MAX_CARTRIDGE_SIZE {
            return Err(CartridgeError::TooLarge(data.len()));
        }
        if data.iter().all(|&byte| byte == 0) {
            return Err(CartridgeError::NoData);
        }
        Ok(Self {
            data: data.to_vec(),
        })
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Header title, trimmed at the first NUL and stripped of non-ASCII.
    pub fn title(&self) -> String {
        let end = TITLE_END.min(self.data.len());
        self.data
            .get(TITLE_START..end)
            .unwrap_or_default()
            .iter()
            .take_while(|&&byte| byte != 0)
            .filter(|byte| byte.is_ascii_graphic() || **byte == b' ')
            .map(|&byte| char::from(byte))
            .collect()
    }

    /// Cartridge type byte (0x00 = ROM only, 0x01 = MBC1, ...).
    pub fn cartridge_type(&self) -> u8 {
        self.data.get(TYPE_ADDR).copied().unwrap_or(0)
    }

    /// The bytes mapped at 0x0000..0x3FFF; shorter images map what they have.
    pub fn fixed_bank(&self) -> &[u8] {
        &self.data[..self.data.len().min(BANK_SIZE)]
    }
}
