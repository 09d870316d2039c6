//! Cartridge mapper trait and the bank-switching boards this core implements.
//!
//! Per §9's design note, mapper dispatch is hot (every CPU/PPU memory access
//! that lands in cartridge space goes through it), so a tagged enum wrapping
//! the small, fixed mapper set keeps it to one indirection instead of a
//! `Box<dyn Mapper>` vtable call; `dyn_clone`'s `DynClone` bound is kept on
//! the trait anyway so a future out-of-tree mapper could still be object-safe
//! if the host needs one.

use std::fmt::Debug;

use dyn_clone::DynClone;

pub mod mapper0;
pub mod mapper1;
pub mod mapper2;
pub mod mapper4;

pub use mapper0::Mapper0;
pub use mapper1::Mapper1;
pub use mapper2::Mapper2;
pub use mapper4::Mapper4;

use crate::cartridge::header::Header;
use crate::error::CartridgeError;

/// Core mapper interface implemented by every cartridge board.
///
/// Mirrors §4.2's contract directly: CPU-side and PPU-side read/write, the
/// logical-to-physical nametable mirror table, an A12 edge observer hook for
/// IRQ-generating boards (MMC3), and a level-sensitive IRQ query.
pub trait Mapper: Debug + DynClone {
    fn read_cpu(&mut self, addr: u16) -> u8;
    /// `cpu_cycle` is the CPU's monotonic cycle counter at the time of the
    /// write; MMC1 uses it to detect and collapse same-cycle consecutive
    /// writes (a documented quirk triggered by certain RMW instructions).
    fn write_cpu(&mut self, addr: u16, value: u8, cpu_cycle: u64);

    fn read_chr(&mut self, addr: u16) -> u8;
    fn write_chr(&mut self, addr: u16, value: u8);

    fn nametable_mirror(&self) -> [u8; 4];

    /// Called by the PPU on every VRAM address change so A12-edge-sensitive
    /// mappers (MMC3) can clock their scanline counter. `rising` is `true`
    /// only on a documented low-to-high transition of address line 12.
    fn on_ppu_a12(&mut self, _rising: bool) {}

    fn irq_pending(&self) -> bool {
        false
    }

    /// Acknowledges (clears) a pending mapper IRQ.
    fn acknowledge_irq(&mut self) {}

    fn prg_ram(&self) -> Option<&[u8]> {
        None
    }

    fn load_prg_ram(&mut self, _data: &[u8]) {}
}

dyn_clone::clone_trait_object!(Mapper);

/// Allocates PRG-RAM per the header, copying the optional 512-byte trainer
/// into the `$7000-$71FF` window within it when present (per nesdev
/// convention; this is the one true home for the trainer region).
pub(crate) fn allocate_prg_ram(header: &Header, trainer: Option<&[u8]>) -> Box<[u8]> {
    let size = header.prg_ram_size.max(header.prg_nvram_size).max(8 * 1024);
    let mut ram = vec![0u8; size].into_boxed_slice();
    if let Some(trainer) = trainer {
        const TRAINER_OFFSET: usize = 0x1000; // $7000 - $6000
        if ram.len() >= TRAINER_OFFSET + trainer.len() {
            ram[TRAINER_OFFSET..TRAINER_OFFSET + trainer.len()].copy_from_slice(trainer);
        }
    }
    ram
}

/// CHR storage: either ROM (read-only, from the cartridge image) or RAM
/// (writable, allocated per the header's CHR-RAM size hint).
#[derive(Debug, Clone)]
pub(crate) enum ChrStorage {
    Rom(Box<[u8]>),
    Ram(Box<[u8]>),
}

impl ChrStorage {
    pub fn new(header: &Header, chr_rom: &[u8]) -> Self {
        if header.chr_rom_size > 0 {
            ChrStorage::Rom(chr_rom.to_vec().into_boxed_slice())
        } else {
            let size = header.chr_ram_size.max(header.chr_nvram_size).max(8 * 1024);
            ChrStorage::Ram(vec![0u8; size].into_boxed_slice())
        }
    }

    pub fn read(&self, addr: usize) -> u8 {
        match self {
            ChrStorage::Rom(data) | ChrStorage::Ram(data) => {
                if data.is_empty() {
                    0
                } else {
                    data[addr % data.len()]
                }
            }
        }
    }

    pub fn write(&mut self, addr: usize, value: u8) {
        if let ChrStorage::Ram(data) = self {
            if !data.is_empty() {
                let len = data.len();
                data[addr % len] = value;
            }
        }
    }
}

/// Tagged-variant mapper dispatch: a single indirection-free `match` instead
/// of a dynamic vtable call, per §9's "enum-dispatch" preference.
#[derive(Debug, Clone)]
pub enum AnyMapper {
    Nrom(Mapper0),
    Mmc1(Mapper1),
    Uxrom(Mapper2),
    Mmc3(Mapper4),
}

impl AnyMapper {
    pub fn new(header: &Header, prg_rom: &[u8], chr_rom: &[u8], trainer: Option<&[u8]>) -> Result<Self, CartridgeError> {
        match header.mapper {
            0 => Ok(AnyMapper::Nrom(Mapper0::new(header, prg_rom, chr_rom, trainer))),
            1 => Ok(AnyMapper::Mmc1(Mapper1::new(header, prg_rom, chr_rom, trainer))),
            2 => Ok(AnyMapper::Uxrom(Mapper2::new(header, prg_rom, chr_rom, trainer))),
            4 => Ok(AnyMapper::Mmc3(Mapper4::new(header, prg_rom, chr_rom, trainer))),
            other => Err(CartridgeError::UnsupportedMapper(other)),
        }
    }
}

impl Mapper for AnyMapper {
    fn read_cpu(&mut self, addr: u16) -> u8 {
        match self {
            AnyMapper::Nrom(m) => m.read_cpu(addr),
            AnyMapper::Mmc1(m) => m.read_cpu(addr),
            AnyMapper::Uxrom(m) => m.read_cpu(addr),
            AnyMapper::Mmc3(m) => m.read_cpu(addr),
        }
    }

    fn write_cpu(&mut self, addr: u16, value: u8, cpu_cycle: u64) {
        match self {
            AnyMapper::Nrom(m) => m.write_cpu(addr, value, cpu_cycle),
            AnyMapper::Mmc1(m) => m.write_cpu(addr, value, cpu_cycle),
            AnyMapper::Uxrom(m) => m.write_cpu(addr, value, cpu_cycle),
            AnyMapper::Mmc3(m) => m.write_cpu(addr, value, cpu_cycle),
        }
    }

    fn read_chr(&mut self, addr: u16) -> u8 {
        match self {
            AnyMapper::Nrom(m) => m.read_chr(addr),
            AnyMapper::Mmc1(m) => m.read_chr(addr),
            AnyMapper::Uxrom(m) => m.read_chr(addr),
            AnyMapper::Mmc3(m) => m.read_chr(addr),
        }
    }

    fn write_chr(&mut self, addr: u16, value: u8) {
        match self {
            AnyMapper::Nrom(m) => m.write_chr(addr, value),
            AnyMapper::Mmc1(m) => m.write_chr(addr, value),
            AnyMapper::Uxrom(m) => m.write_chr(addr, value),
            AnyMapper::Mmc3(m) => m.write_chr(addr, value),
        }
    }

    fn nametable_mirror(&self) -> [u8; 4] {
        match self {
            AnyMapper::Nrom(m) => m.nametable_mirror(),
            AnyMapper::Mmc1(m) => m.nametable_mirror(),
            AnyMapper::Uxrom(m) => m.nametable_mirror(),
            AnyMapper::Mmc3(m) => m.nametable_mirror(),
        }
    }

    fn on_ppu_a12(&mut self, rising: bool) {
        match self {
            AnyMapper::Nrom(m) => m.on_ppu_a12(rising),
            AnyMapper::Mmc1(m) => m.on_ppu_a12(rising),
            AnyMapper::Uxrom(m) => m.on_ppu_a12(rising),
            AnyMapper::Mmc3(m) => m.on_ppu_a12(rising),
        }
    }

    fn irq_pending(&self) -> bool {
        match self {
            AnyMapper::Nrom(m) => m.irq_pending(),
            AnyMapper::Mmc1(m) => m.irq_pending(),
            AnyMapper::Uxrom(m) => m.irq_pending(),
            AnyMapper::Mmc3(m) => m.irq_pending(),
        }
    }

    fn acknowledge_irq(&mut self) {
        match self {
            AnyMapper::Nrom(m) => m.acknowledge_irq(),
            AnyMapper::Mmc1(m) => m.acknowledge_irq(),
            AnyMapper::Uxrom(m) => m.acknowledge_irq(),
            AnyMapper::Mmc3(m) => m.acknowledge_irq(),
        }
    }

    fn prg_ram(&self) -> Option<&[u8]> {
        match self {
            AnyMapper::Nrom(m) => m.prg_ram(),
            AnyMapper::Mmc1(m) => m.prg_ram(),
            AnyMapper::Uxrom(m) => m.prg_ram(),
            AnyMapper::Mmc3(m) => m.prg_ram(),
        }
    }

    fn load_prg_ram(&mut self, data: &[u8]) {
        match self {
            AnyMapper::Nrom(m) => m.load_prg_ram(data),
            AnyMapper::Mmc1(m) => m.load_prg_ram(data),
            AnyMapper::Uxrom(m) => m.load_prg_ram(data),
            AnyMapper::Mmc3(m) => m.load_prg_ram(data),
        }
    }
}
