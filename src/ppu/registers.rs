use bitflags::bitflags;

bitflags! {
    /// `$2000` PPUCTRL (write-only).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Control: u8 {
        /// Bits 0-1 (nametable select) live here but are applied to the
        /// internal `t` register directly rather than read back from this flag set.
        const NAMETABLE_X      = 0b0000_0001;
        const NAMETABLE_Y      = 0b0000_0010;
        /// VRAM address increment per PPUDATA access: 0 = +1, 1 = +32.
        const VRAM_INCREMENT   = 0b0000_0100;
        /// Pattern table used for 8x8 sprites (ignored when `SPRITE_SIZE` is set).
        const SPRITE_PATTERN   = 0b0000_1000;
        /// Pattern table used for the background.
        const BG_PATTERN       = 0b0001_0000;
        /// 0 = 8x8 sprites, 1 = 8x16 sprites.
        const SPRITE_SIZE      = 0b0010_0000;
        /// PPU master/slave select; unused by any NES cartridge board.
        const MASTER_SLAVE     = 0b0100_0000;
        /// Generate NMI at the start of vblank.
        const NMI_ENABLE       = 0b1000_0000;
    }
}

impl Control {
    pub fn vram_increment(self) -> u16 {
        if self.contains(Control::VRAM_INCREMENT) { 32 } else { 1 }
    }

    pub fn bg_pattern_table(self) -> u16 {
        if self.contains(Control::BG_PATTERN) { 0x1000 } else { 0x0000 }
    }

    pub fn sprite_pattern_table_8x8(self) -> u16 {
        if self.contains(Control::SPRITE_PATTERN) { 0x1000 } else { 0x0000 }
    }

    pub fn sprite_height(self) -> u8 {
        if self.contains(Control::SPRITE_SIZE) { 16 } else { 8 }
    }

    pub fn nmi_enabled(self) -> bool {
        self.contains(Control::NMI_ENABLE)
    }
}

bitflags! {
    /// `$2001` PPUMASK (write-only).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Mask: u8 {
        const GREYSCALE           = 0b0000_0001;
        const SHOW_BG_LEFT8       = 0b0000_0010;
        const SHOW_SPRITES_LEFT8  = 0b0000_0100;
        const SHOW_BACKGROUND     = 0b0000_1000;
        const SHOW_SPRITES        = 0b0001_0000;
        const EMPHASIZE_RED       = 0b0010_0000;
        const EMPHASIZE_GREEN     = 0b0100_0000;
        const EMPHASIZE_BLUE      = 0b1000_0000;
    }
}

impl Mask {
    pub fn rendering_enabled(self) -> bool {
        self.intersects(Mask::SHOW_BACKGROUND | Mask::SHOW_SPRITES)
    }
}

bitflags! {
    /// `$2002` PPUSTATUS (read-only, lower 5 bits are open bus).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct StatusFlags: u8 {
        const SPRITE_OVERFLOW = 0b0010_0000;
        const SPRITE_ZERO_HIT = 0b0100_0000;
        const VBLANK          = 0b1000_0000;
    }
}
