//! Cycle-synchronized NES (Ricoh 2A03 / 2C02) hardware core.
//!
//! This crate implements the hardware-accurate subsystem of an NES emulator:
//! the 6502 CPU core (including the commonly-used undocumented opcodes), the
//! scanline/dot-accurate PPU rendering pipeline, the cartridge/mapper
//! abstraction (mappers 0/1/2/4), the shared interrupt/DMA latch, and the
//! [`System`] runner that ties them together at the fixed CPU:PPU 1:3 cycle
//! ratio real hardware runs at.
//!
//! Host concerns — display presentation, input polling, file I/O, audio
//! output, and save-state serialization — are modeled as traits the host
//! implements; this crate never touches a window, a gamepad driver, or the
//! filesystem directly.

pub mod bus;
pub mod cartridge;
pub mod config;
pub mod controller;
pub mod cpu;
pub mod error;
pub mod interrupt_bus;
pub mod memory;
pub mod ppu;
pub mod system;

pub use config::{Config, PaletteSource, SyncMode, UndocumentedLevel};
pub use controller::{Button, Controller};
pub use error::{CartridgeError, RuntimeError};
pub use system::{FrameSink, InputSource, System};

#[cfg(test)]
mod test_support {
    use ctor::ctor;
    use tracing_subscriber::FmtSubscriber;

    #[ctor]
    fn init_tracing() {
        let subscriber = FmtSubscriber::builder()
            .with_test_writer()
            .with_max_level(tracing::Level::TRACE)
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }
}
