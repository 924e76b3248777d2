use typed_builder::TypedBuilder;

use crate::cpu::HaltBehavior;

/// T-cycles in one DMG frame (154 lines of 456 cycles).
pub const FRAME_CYCLES: u32 = 70_224;

/// Knobs for a [`GameBoy`](super::GameBoy).
///
/// ```
/// use dotmatrix_core::{HaltBehavior, MachineConfig};
///
/// let config = MachineConfig::builder().trace(true).build();
/// assert_eq!(config.frame_cycles, 70_224);
/// assert_eq!(config.halt, HaltBehavior::Stop);
/// ```
#[derive(Clone, Debug, Eq, PartialEq, TypedBuilder)]
pub struct MachineConfig {
    /// Record a disassembly line for every executed instruction.
    #[builder(default = false)]
    pub trace: bool,
    /// Cycle budget of one call to `run_frame`.
    #[builder(default = FRAME_CYCLES)]
    pub frame_cycles: u32,
    /// Whether HALT ends the run or waits for an interrupt.
    #[builder(default)]
    pub halt: HaltBehavior,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}
