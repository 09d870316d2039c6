//! Error taxonomy for cartridge construction and strict-mode runtime faults.
//!
//! Recoverable runtime conditions (open-bus reads, ROM writes, duplicate-cycle
//! MMC1 writes, out-of-range bank selects) are *not* part of this taxonomy —
//! they are absorbed internally and reported through [`tracing`] at the level
//! prescribed by the spec, never surfaced as a `Result::Err`.

use thiserror::Error;

/// Fatal error raised while parsing a cartridge image or constructing its mapper.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CartridgeError {
    /// Buffer is shorter than the 16-byte iNES header.
    #[error("header expected 16 bytes, got {actual}")]
    TooShort { actual: usize },

    /// The `"NES\x1A"` magic is missing.
    #[error("bad cartridge header: missing NES magic bytes")]
    BadHeader,

    /// Header declares a `PRG_ROM_SIZE` exponent-notation byte (`0xF` high
    /// nibble) that this core does not implement.
    #[error("unsupported cartridge format: {0}")]
    UnsupportedFormat(&'static str),

    /// A ROM section (trainer/PRG/CHR) is shorter than the header declares.
    #[error("{section} section expected {expected} bytes, got {actual}")]
    SectionTooShort {
        section: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Header declares a mapper id this core does not implement.
    #[error("mapper {0} is not implemented")]
    UnsupportedMapper(u16),

    /// A user-supplied alternate palette was not exactly 64 RGB triples.
    #[error("palette blobs must contain 64 RGB triples (192 bytes), got {actual} bytes")]
    InvalidPaletteSize { actual: usize },
}

/// Fatal runtime condition, only ever returned when [`crate::config::Config`]
/// has converted a normally-silent condition into a hard stop.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeError {
    /// The CPU executed a `KIL`/`JAM` opcode and halted.
    #[error("CPU halted by a KIL/JAM opcode at PC={pc:#06X}")]
    CpuHalted { pc: u16 },

    /// Stack pointer underflowed (pop past `$01FF`) while `strict_stack` was set.
    #[error("stack underflow at PC={pc:#06X}")]
    StackUnderflow { pc: u16 },

    /// Stack pointer overflowed (push past `$0100`) while `strict_stack` was set.
    #[error("stack overflow at PC={pc:#06X}")]
    StackOverflow { pc: u16 },
}
