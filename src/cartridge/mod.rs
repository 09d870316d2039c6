//! Cartridge construction: parses an iNES/NES 2.0 image and wraps the
//! resulting [`AnyMapper`] in the [`Cartridge`] facade the rest of the core
//! talks to.

pub mod header;
pub mod mapper;

use crate::error::CartridgeError;
use header::{Header, RomImage};
use mapper::{AnyMapper, Mapper};

/// A loaded `.nes` cartridge: a parsed header plus its mapper.
#[derive(Debug, Clone)]
pub struct Cartridge {
    header: Header,
    mapper: AnyMapper,
}

impl Cartridge {
    /// Parses a full `.nes` byte image and constructs the matching mapper.
    pub fn from_ines(bytes: &[u8]) -> Result<Self, CartridgeError> {
        let image = RomImage::parse(bytes)?;
        let mapper = AnyMapper::new(&image.header, image.prg_rom, image.chr_rom, image.trainer)?;
        Ok(Self {
            header: image.header,
            mapper,
        })
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn read_cpu(&mut self, addr: u16) -> u8 {
        self.mapper.read_cpu(addr)
    }

    pub fn write_cpu(&mut self, addr: u16, value: u8, cpu_cycle: u64) {
        self.mapper.write_cpu(addr, value, cpu_cycle);
    }

    pub fn read_chr(&mut self, addr: u16) -> u8 {
        self.mapper.read_chr(addr)
    }

    pub fn write_chr(&mut self, addr: u16, value: u8) {
        self.mapper.write_chr(addr, value);
    }

    pub fn nametable_mirror(&self) -> [u8; 4] {
        self.mapper.nametable_mirror()
    }

    pub fn on_ppu_a12(&mut self, rising: bool) {
        self.mapper.on_ppu_a12(rising);
    }

    pub fn irq_pending(&self) -> bool {
        self.mapper.irq_pending()
    }

    pub fn acknowledge_irq(&mut self) {
        self.mapper.acknowledge_irq();
    }

    /// Battery-backed PRG-RAM contents, for hosts that persist save data.
    pub fn prg_ram(&self) -> Option<&[u8]> {
        self.mapper.prg_ram()
    }

    /// Restores previously-saved PRG-RAM contents (e.g. at construction time).
    pub fn load_prg_ram(&mut self, data: &[u8]) {
        self.mapper.load_prg_ram(data);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_rom(mapper_nibble_lo: u8, prg_banks: u8, chr_banks: u8) -> Vec<u8> {
        let mut bytes = vec![0u8; 16];
        bytes[0..4].copy_from_slice(b"NES\x1A");
        bytes[4] = prg_banks;
        bytes[5] = chr_banks;
        bytes[6] = mapper_nibble_lo << 4;
        bytes.extend(vec![0u8; prg_banks as usize * 0x4000]);
        bytes.extend(vec![0u8; chr_banks as usize * 0x2000]);
        bytes
    }

    #[test]
    fn loads_mapper0_cartridge() {
        let bytes = minimal_rom(0, 1, 1);
        let cart = Cartridge::from_ines(&bytes).unwrap();
        assert_eq!(cart.header().mapper, 0);
    }

    #[test]
    fn rejects_unsupported_mapper() {
        let bytes = minimal_rom(5, 1, 1);
        let err = Cartridge::from_ines(&bytes).unwrap_err();
        assert_eq!(err, CartridgeError::UnsupportedMapper(5));
    }
}
