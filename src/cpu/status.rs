use bitflags::bitflags;

bitflags! {
    /// The 8-bit processor status register (P).
    ///
    /// ```text
    /// 7 6 5 4 3 2 1 0
    /// N V _ B D I Z C
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Status: u8 {
        /// Carry (C): set on unsigned overflow out of bit 7, or no borrow on subtraction.
        const CARRY     = 0b0000_0001;
        /// Zero (Z): set when the result of an operation is zero.
        const ZERO      = 0b0000_0010;
        /// Interrupt disable (I): when set, IRQ is ignored.
        const INTERRUPT = 0b0000_0100;
        /// Decimal (D): unused on the 2A03 (no BCD), honored only as a register bit.
        const DECIMAL   = 0b0000_1000;
        /// Break (B): not a real latch, only meaningful in the byte pushed by BRK/PHP.
        const BREAK     = 0b0001_0000;
        /// Unused bit, always read back as 1 from a pushed status byte.
        const UNUSED    = 0b0010_0000;
        /// Overflow (V): set on signed overflow.
        const OVERFLOW  = 0b0100_0000;
        /// Negative (N): mirrors bit 7 of the last result.
        const NEGATIVE  = 0b1000_0000;
    }
}

impl Status {
    /// Power-up status value (`0x34`): I set, the two unused/break bits set.
    pub fn power_on() -> Self {
        Status::from_bits_truncate(0x34)
    }

    pub fn update_zero(&mut self, value: u8) {
        self.set(Status::ZERO, value == 0);
    }

    pub fn update_negative(&mut self, value: u8) {
        self.set(Status::NEGATIVE, value & 0x80 != 0);
    }

    pub fn update_zero_negative(&mut self, value: u8) {
        self.update_zero(value);
        self.update_negative(value);
    }

    pub fn to_byte(self) -> u8 {
        self.bits()
    }

    pub fn from_byte(byte: u8) -> Self {
        Status::from_bits_truncate(byte)
    }
}
