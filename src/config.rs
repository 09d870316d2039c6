//! Host-supplied configuration, supplied once at [`crate::System::new`].
//!
//! Plain data, `Default`-constructible, and immutable for the life of the
//! instance except [`Config::undocumented_opcode_level`], which the CPU
//! consults on every opcode dispatch so a host settings UI could flip it
//! between frames (the hook exists; no such UI is in scope here).

use crate::error::CartridgeError;

/// How aggressively the CPU emulates undocumented ("illegal") 6502 opcodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UndocumentedLevel {
    /// Undocumented opcodes behave as a `NOP`/halt of the matching length;
    /// none of their documented side effects are emulated.
    Off,
    /// The commonly relied-upon subset: `LAX`, `SAX`, `DCP`, `ISC`, `SLO`,
    /// `RLA`, `RRA`, `SRE`, the multi-byte `NOP`s, and `KIL`/`JAM`.
    #[default]
    Common,
    /// Additionally enables the highly unstable subset (`ANC`, `ALR`, `ARR`,
    /// `XAA`, `LXA`, `LAS`, `SBX`, `SHA`, `SHX`, `SHY`, `TAS`), whose exact
    /// behavior is chip-revision-dependent and only approximated here.
    All,
}

/// Source of the 64-entry RGB palette used to present PPU output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaletteSource {
    /// The crate's built-in NES RGB palette (see [`crate::ppu::palette::DEFAULT_PALETTE`]).
    BuiltIn,
    /// A host-supplied 64-entry RGB palette, e.g. loaded from a `.pal` file.
    Custom(Box<[[u8; 3]; 64]>),
}

impl Default for PaletteSource {
    fn default() -> Self {
        Self::BuiltIn
    }
}

impl PaletteSource {
    /// Builds a [`PaletteSource::Custom`] from a raw `.pal` file: 64 RGB
    /// triples, 192 bytes total, per §6's "64 × 3 raw bytes" format.
    pub fn from_pal_bytes(bytes: &[u8]) -> Result<Self, CartridgeError> {
        const EXPECTED: usize = 64 * 3;
        if bytes.len() != EXPECTED {
            return Err(CartridgeError::InvalidPaletteSize { actual: bytes.len() });
        }
        let mut table = [[0u8; 3]; 64];
        for (entry, chunk) in table.iter_mut().zip(bytes.chunks_exact(3)) {
            entry.copy_from_slice(chunk);
        }
        Ok(PaletteSource::Custom(Box::new(table)))
    }
}

/// Frame-pacing hint. The core never blocks on wall time regardless of this
/// setting (per §5, the core is driven by cycles, not a clock) — it is
/// accepted for interface completeness with the host's audio/vsync sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncMode {
    #[default]
    None,
    Audio,
    Vsync,
}

/// Host-tunable knobs for a [`crate::System`] instance.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub undocumented_opcode_level: UndocumentedLevel,
    /// When set, a stack pointer push/pop that wraps past `$0100`/`$01FF`
    /// becomes a fatal [`crate::RuntimeError`] instead of silently wrapping.
    pub strict_stack: bool,
    pub palette: PaletteSource,
    pub sync_mode: SyncMode,
}

impl Config {
    pub fn undocumented_opcodes_enabled(&self) -> bool {
        !matches!(self.undocumented_opcode_level, UndocumentedLevel::Off)
    }

    pub fn unstable_undocumented_opcodes_enabled(&self) -> bool {
        matches!(self.undocumented_opcode_level, UndocumentedLevel::All)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pal_bytes_round_trips_into_custom_table() {
        let mut bytes = vec![0u8; 64 * 3];
        bytes[0..3].copy_from_slice(&[1, 2, 3]);
        bytes[189..192].copy_from_slice(&[4, 5, 6]);
        let source = PaletteSource::from_pal_bytes(&bytes).unwrap();
        match source {
            PaletteSource::Custom(table) => {
                assert_eq!(table[0], [1, 2, 3]);
                assert_eq!(table[63], [4, 5, 6]);
            }
            PaletteSource::BuiltIn => panic!("expected Custom"),
        }
    }

    #[test]
    fn pal_bytes_rejects_wrong_size() {
        let err = PaletteSource::from_pal_bytes(&[0u8; 100]).unwrap_err();
        assert_eq!(err, CartridgeError::InvalidPaletteSize { actual: 100 });
    }
}
