//! iNES / NES 2.0 header parsing.
//!
//! The first 16 bytes of every `.nes` ROM are the iNES header. It declares
//! how much PRG/CHR data follows, which mapper is required, the nametable
//! mirroring mode, and (for NES 2.0 dumps) extended RAM/NVRAM sizing. This
//! module turns those 16 bytes into a [`Header`] and slices the PRG/CHR/
//! trainer sections out of the rest of the file; it does not instantiate a
//! mapper — [`crate::cartridge::Cartridge::from_ines`] does that.

use crate::error::CartridgeError;

const NES_MAGIC: &[u8; 4] = b"NES\x1A";

/// Size of the fixed iNES header in bytes.
pub const HEADER_LEN: usize = 16;
/// Size of the optional trainer section, when present.
pub const TRAINER_SIZE: usize = 512;
/// PRG-ROM bank unit (byte 4 is a count of 16 KiB banks).
const PRG_ROM_UNIT: usize = 16 * 1024;
/// CHR-ROM bank unit (byte 5 is a count of 8 KiB banks).
const CHR_ROM_UNIT: usize = 8 * 1024;

/// Nametable mirroring declared by the cartridge header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mirroring {
    Horizontal,
    Vertical,
    FourScreen,
    /// Single-screen mirroring using nametable 0, as MMC1 control register 0 selects.
    SingleScreenLower,
    /// Single-screen mirroring using nametable 1, as MMC1 control register 1 selects.
    SingleScreenUpper,
}

impl Mirroring {
    /// The 4-entry logical-nametable-to-physical-bank table described in §3/§4.2.
    pub fn table(self) -> [u8; 4] {
        match self {
            Mirroring::Horizontal => [0, 0, 1, 1],
            Mirroring::Vertical => [0, 1, 0, 1],
            Mirroring::FourScreen => [0, 1, 2, 3],
            Mirroring::SingleScreenLower => [0, 0, 0, 0],
            Mirroring::SingleScreenUpper => [1, 1, 1, 1],
        }
    }
}

/// Which header flavor was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RomFormat {
    /// Pre-iNES prototype dumps (rare); treated like iNES 1.0.
    Archaic,
    /// The original iNES 1.0 header.
    INes,
    /// NES 2.0, with extended size/timing fields.
    Nes20,
}

/// Parsed iNES/NES 2.0 header plus the byte ranges of the sections that follow it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub format: RomFormat,
    pub mapper: u16,
    pub submapper: u8,
    pub mirroring: Mirroring,
    pub battery_backed_ram: bool,
    pub trainer_present: bool,
    pub prg_rom_size: usize,
    pub chr_rom_size: usize,
    pub prg_ram_size: usize,
    pub prg_nvram_size: usize,
    pub chr_ram_size: usize,
    pub chr_nvram_size: usize,
}

impl Header {
    /// Parses the fixed 16-byte header. Does not validate that the remainder
    /// of the buffer actually holds `prg_rom_size + chr_rom_size (+trainer)`
    /// bytes — call [`Header::parse_ines`] for that.
    pub fn parse(bytes: &[u8]) -> Result<Self, CartridgeError> {
        if bytes.len() < HEADER_LEN {
            return Err(CartridgeError::TooShort {
                actual: bytes.len(),
            });
        }
        if &bytes[0..4] != NES_MAGIC {
            return Err(CartridgeError::BadHeader);
        }

        let flags6 = bytes[6];
        let flags7 = bytes[7];

        let format = match (flags7 >> 2) & 0b11 {
            0b10 => RomFormat::Nes20,
            0b00 => RomFormat::INes,
            _ => RomFormat::Archaic,
        };

        let four_screen = flags6 & 0b0000_1000 != 0;
        let mirroring = if four_screen {
            Mirroring::FourScreen
        } else if flags6 & 0b0000_0001 != 0 {
            Mirroring::Vertical
        } else {
            Mirroring::Horizontal
        };
        let battery_backed_ram = flags6 & 0b0000_0010 != 0;
        let trainer_present = flags6 & 0b0000_0100 != 0;

        let mapper_low = (flags6 & 0xF0) >> 4;
        let mapper_mid = flags7 & 0xF0;
        let mut mapper = u16::from(mapper_mid) | u16::from(mapper_low);
        let mut submapper = 0u8;

        let prg_rom_banks_low = bytes[4];
        let chr_rom_banks_low = bytes[5];
        let (mut prg_rom_size, mut chr_rom_size) = (
            prg_rom_banks_low as usize * PRG_ROM_UNIT,
            chr_rom_banks_low as usize * CHR_ROM_UNIT,
        );
        let mut prg_ram_size = 0usize;
        let mut prg_nvram_size = 0usize;
        let mut chr_ram_size = 0usize;
        let mut chr_nvram_size = 0usize;

        if format == RomFormat::Nes20 {
            let mapper_high = u16::from(bytes[8] & 0x0F) << 8;
            mapper |= mapper_high;
            submapper = (bytes[8] & 0xF0) >> 4;

            // Exponent-notation sizes use the high nibble == 0xF encoding;
            // treat that as an unsupported (acceptably minimal) format.
            if prg_rom_banks_low == 0xFF || chr_rom_banks_low == 0xFF {
                let prg_msb = (bytes[9] & 0x0F) == 0x0F;
                let chr_msb = (bytes[9] & 0xF0) == 0xF0;
                if prg_msb || chr_msb {
                    return Err(CartridgeError::UnsupportedFormat(
                        "NES 2.0 exponent-notation PRG/CHR size",
                    ));
                }
            }
            let prg_rom_msb = u16::from(bytes[9] & 0x0F);
            let chr_rom_msb = u16::from((bytes[9] & 0xF0) >> 4);
            prg_rom_size = ((u16::from(prg_rom_msb) << 8) | u16::from(prg_rom_banks_low)) as usize
                * PRG_ROM_UNIT;
            chr_rom_size = ((u16::from(chr_rom_msb) << 8) | u16::from(chr_rom_banks_low)) as usize
                * CHR_ROM_UNIT;

            let prg_ram_nibble = bytes[10] & 0x0F;
            let prg_nvram_nibble = (bytes[10] & 0xF0) >> 4;
            let chr_ram_nibble = bytes[11] & 0x0F;
            let chr_nvram_nibble = (bytes[11] & 0xF0) >> 4;
            prg_ram_size = nes2_ram_size(prg_ram_nibble);
            prg_nvram_size = nes2_ram_size(prg_nvram_nibble);
            chr_ram_size = nes2_ram_size(chr_ram_nibble);
            chr_nvram_size = nes2_ram_size(chr_nvram_nibble);
        } else if chr_rom_size == 0 {
            // iNES 1.0 has no standard CHR RAM size field; 8 KiB is the
            // conventional default most emulators (and real boards) assume.
            chr_ram_size = 8 * 1024;
        }

        if battery_backed_ram && format != RomFormat::Nes20 && prg_ram_size == 0 {
            prg_nvram_size = 8 * 1024;
        }

        Ok(Header {
            format,
            mapper,
            submapper,
            mirroring,
            battery_backed_ram,
            trainer_present,
            prg_rom_size,
            chr_rom_size,
            prg_ram_size,
            prg_nvram_size,
            chr_ram_size,
            chr_nvram_size,
        })
    }

    pub fn is_nes20(&self) -> bool {
        self.format == RomFormat::Nes20
    }
}

fn nes2_ram_size(nibble: u8) -> usize {
    if nibble == 0 { 0 } else { 64usize << nibble }
}

/// Header plus the byte slices of every section, sliced out of a full `.nes`
/// image according to what the header declared.
pub struct RomImage<'a> {
    pub header: Header,
    pub trainer: Option<&'a [u8]>,
    pub prg_rom: &'a [u8],
    pub chr_rom: &'a [u8],
    pub misc_rom: &'a [u8],
}

impl<'a> RomImage<'a> {
    /// Parses the header and slices PRG/CHR/trainer/misc sections, failing
    /// with [`CartridgeError::SectionTooShort`] if the buffer is truncated
    /// relative to what the header declares.
    pub fn parse(bytes: &'a [u8]) -> Result<Self, CartridgeError> {
        let header = Header::parse(bytes)?;
        let mut offset = HEADER_LEN;

        let trainer = if header.trainer_present {
            let end = offset + TRAINER_SIZE;
            if bytes.len() < end {
                return Err(CartridgeError::SectionTooShort {
                    section: "trainer",
                    expected: TRAINER_SIZE,
                    actual: bytes.len() - offset.min(bytes.len()),
                });
            }
            let slice = &bytes[offset..end];
            offset = end;
            Some(slice)
        } else {
            None
        };

        let prg_end = offset + header.prg_rom_size;
        if bytes.len() < prg_end {
            return Err(CartridgeError::SectionTooShort {
                section: "PRG-ROM",
                expected: header.prg_rom_size,
                actual: bytes.len() - offset.min(bytes.len()),
            });
        }
        let prg_rom = &bytes[offset..prg_end];
        offset = prg_end;

        let chr_end = offset + header.chr_rom_size;
        if bytes.len() < chr_end {
            return Err(CartridgeError::SectionTooShort {
                section: "CHR-ROM",
                expected: header.chr_rom_size,
                actual: bytes.len() - offset.min(bytes.len()),
            });
        }
        let chr_rom = &bytes[offset..chr_end];
        offset = chr_end;

        let misc_rom = &bytes[offset..];

        Ok(RomImage {
            header,
            trainer,
            prg_rom,
            chr_rom,
            misc_rom,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_header(prg_banks: u8, chr_banks: u8, flags6: u8, flags7: u8) -> Vec<u8> {
        let mut bytes = vec![0u8; HEADER_LEN];
        bytes[0..4].copy_from_slice(NES_MAGIC);
        bytes[4] = prg_banks;
        bytes[5] = chr_banks;
        bytes[6] = flags6;
        bytes[7] = flags7;
        bytes
    }

    #[test]
    fn rejects_short_buffers() {
        let err = Header::parse(&[0u8; 4]).unwrap_err();
        assert_eq!(err, CartridgeError::TooShort { actual: 4 });
    }

    #[test]
    fn rejects_bad_magic() {
        let bytes = vec![0u8; HEADER_LEN];
        assert_eq!(Header::parse(&bytes).unwrap_err(), CartridgeError::BadHeader);
    }

    #[test]
    fn decodes_mapper_mirroring_and_sizes() {
        let bytes = minimal_header(2, 1, 0b0001_0001, 0b0010_0000);
        let header = Header::parse(&bytes).unwrap();
        assert_eq!(header.mapper, 2);
        assert_eq!(header.mirroring, Mirroring::Vertical);
        assert_eq!(header.prg_rom_size, 2 * PRG_ROM_UNIT);
        assert_eq!(header.chr_rom_size, CHR_ROM_UNIT);
        assert_eq!(header.format, RomFormat::INes);
    }

    #[test]
    fn detects_nes20() {
        let mut bytes = minimal_header(1, 1, 0, 0b0000_1000);
        bytes[7] |= 0b0000_1000; // bits 2-3 == 0b10
        let header = Header::parse(&bytes).unwrap();
        assert!(header.is_nes20());
    }

    #[test]
    fn four_screen_overrides_mirroring_bit() {
        let bytes = minimal_header(1, 1, 0b0000_1001, 0);
        let header = Header::parse(&bytes).unwrap();
        assert_eq!(header.mirroring, Mirroring::FourScreen);
    }

    #[test]
    fn section_too_short_when_prg_truncated() {
        let mut bytes = minimal_header(1, 0, 0, 0);
        bytes.extend(std::iter::repeat(0u8).take(100));
        let err = RomImage::parse(&bytes).unwrap_err();
        matches!(err, CartridgeError::SectionTooShort { section: "PRG-ROM", .. });
    }
}
