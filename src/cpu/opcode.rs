//! The 256-entry opcode dispatch table: mnemonic, addressing mode, and base
//! cycle count for every possible opcode byte, including the documented
//! minimum set of undocumented opcodes and the `All`-tier unstable ones.

use crate::cpu::addressing::AddressMode as A;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::upper_case_acronyms)]
pub enum Mnemonic {
    // Official (56).
    Adc, And, Asl, Bcc, Bcs, Beq, Bit, Bmi, Bne, Bpl, Brk, Bvc, Bvs, Clc, Cld,
    Cli, Clv, Cmp, Cpx, Cpy, Dec, Dex, Dey, Eor, Inc, Inx, Iny, Jmp, Jsr, Lda,
    Ldx, Ldy, Lsr, Nop, Ora, Pha, Php, Pla, Plp, Rol, Ror, Rti, Rts, Sbc, Sec,
    Sed, Sei, Sta, Stx, Sty, Tax, Tay, Tsx, Txa, Txs, Tya,

    // Undocumented, "Common" tier: behavior is fully deterministic and widely
    // depended on by existing software.
    Lax, Sax, Dcp, Isc, Slo, Rla, Rra, Sre, Jam,

    // Undocumented, "All" tier: chip-revision/analog-dependent (magic
    // constant, bus capacitance) opcodes; gated further behind the
    // `undocumented_opcodes_all` Cargo feature.
    Anc, Alr, Arr, Xaa, Lxa, Las, Sbx, Sha, Shx, Shy, Tas,
}

impl Mnemonic {
    pub fn is_undocumented(self) -> bool {
        !matches!(
            self,
            Mnemonic::Adc | Mnemonic::And | Mnemonic::Asl | Mnemonic::Bcc | Mnemonic::Bcs
                | Mnemonic::Beq | Mnemonic::Bit | Mnemonic::Bmi | Mnemonic::Bne | Mnemonic::Bpl
                | Mnemonic::Brk | Mnemonic::Bvc | Mnemonic::Bvs | Mnemonic::Clc | Mnemonic::Cld
                | Mnemonic::Cli | Mnemonic::Clv | Mnemonic::Cmp | Mnemonic::Cpx | Mnemonic::Cpy
                | Mnemonic::Dec | Mnemonic::Dex | Mnemonic::Dey | Mnemonic::Eor | Mnemonic::Inc
                | Mnemonic::Inx | Mnemonic::Iny | Mnemonic::Jmp | Mnemonic::Jsr | Mnemonic::Lda
                | Mnemonic::Ldx | Mnemonic::Ldy | Mnemonic::Lsr | Mnemonic::Nop | Mnemonic::Ora
                | Mnemonic::Pha | Mnemonic::Php | Mnemonic::Pla | Mnemonic::Plp | Mnemonic::Rol
                | Mnemonic::Ror | Mnemonic::Rti | Mnemonic::Rts | Mnemonic::Sbc | Mnemonic::Sec
                | Mnemonic::Sed | Mnemonic::Sei | Mnemonic::Sta | Mnemonic::Stx | Mnemonic::Sty
                | Mnemonic::Tax | Mnemonic::Tay | Mnemonic::Tsx | Mnemonic::Txa | Mnemonic::Txs
                | Mnemonic::Tya
        )
    }

    /// `true` for the analog/chip-revision-dependent subset only reachable
    /// when [`crate::config::UndocumentedLevel::All`] is configured.
    pub fn is_unstable(self) -> bool {
        matches!(
            self,
            Mnemonic::Anc
                | Mnemonic::Alr
                | Mnemonic::Arr
                | Mnemonic::Xaa
                | Mnemonic::Lxa
                | Mnemonic::Las
                | Mnemonic::Sbx
                | Mnemonic::Sha
                | Mnemonic::Shx
                | Mnemonic::Shy
                | Mnemonic::Tas
        )
    }
}

/// Whether `mnemonic`'s indexed-addressing-mode page-cross adds an extra
/// bus cycle. Write and read-modify-write instructions are already priced
/// at their worst case in [`BASE_CYCLES`]; only "read" instructions pay the
/// penalty conditionally.
pub fn reads_extra_cycle_on_page_cross(mnemonic: Mnemonic) -> bool {
    matches!(
        mnemonic,
        Mnemonic::Lda
            | Mnemonic::Ldx
            | Mnemonic::Ldy
            | Mnemonic::Eor
            | Mnemonic::And
            | Mnemonic::Ora
            | Mnemonic::Adc
            | Mnemonic::Sbc
            | Mnemonic::Cmp
            | Mnemonic::Bit
            | Mnemonic::Lax
            | Mnemonic::Las
            | Mnemonic::Nop
    )
}

use Mnemonic::*;

macro_rules! op {
    ($ins:ident, $mode:ident, $cycles:expr) => {
        ($ins, A::$mode, $cycles)
    };
}

#[rustfmt::skip]
pub static OPCODES: [(Mnemonic, A, u8); 256] = [
    // 0x00
    op!(Brk, Implied, 7), op!(Ora, IndirectX, 6), op!(Jam, Implied, 2), op!(Slo, IndirectX, 8),
    op!(Nop, ZeroPage, 3), op!(Ora, ZeroPage, 3), op!(Asl, ZeroPage, 5), op!(Slo, ZeroPage, 5),
    op!(Php, Implied, 3), op!(Ora, Immediate, 2), op!(Asl, Accumulator, 2), op!(Anc, Immediate, 2),
    op!(Nop, Absolute, 4), op!(Ora, Absolute, 4), op!(Asl, Absolute, 6), op!(Slo, Absolute, 6),
    // 0x10
    op!(Bpl, Relative, 2), op!(Ora, IndirectY, 5), op!(Jam, Implied, 2), op!(Slo, IndirectY, 8),
    op!(Nop, ZeroPageX, 4), op!(Ora, ZeroPageX, 4), op!(Asl, ZeroPageX, 6), op!(Slo, ZeroPageX, 6),
    op!(Clc, Implied, 2), op!(Ora, AbsoluteY, 4), op!(Nop, Implied, 2), op!(Slo, AbsoluteY, 7),
    op!(Nop, AbsoluteX, 4), op!(Ora, AbsoluteX, 4), op!(Asl, AbsoluteX, 7), op!(Slo, AbsoluteX, 7),
    // 0x20
    op!(Jsr, Absolute, 6), op!(And, IndirectX, 6), op!(Jam, Implied, 2), op!(Rla, IndirectX, 8),
    op!(Bit, ZeroPage, 3), op!(And, ZeroPage, 3), op!(Rol, ZeroPage, 5), op!(Rla, ZeroPage, 5),
    op!(Plp, Implied, 4), op!(And, Immediate, 2), op!(Rol, Accumulator, 2), op!(Anc, Immediate, 2),
    op!(Bit, Absolute, 4), op!(And, Absolute, 4), op!(Rol, Absolute, 6), op!(Rla, Absolute, 6),
    // 0x30
    op!(Bmi, Relative, 2), op!(And, IndirectY, 5), op!(Jam, Implied, 2), op!(Rla, IndirectY, 8),
    op!(Nop, ZeroPageX, 4), op!(And, ZeroPageX, 4), op!(Rol, ZeroPageX, 6), op!(Rla, ZeroPageX, 6),
    op!(Sec, Implied, 2), op!(And, AbsoluteY, 4), op!(Nop, Implied, 2), op!(Rla, AbsoluteY, 7),
    op!(Nop, AbsoluteX, 4), op!(And, AbsoluteX, 4), op!(Rol, AbsoluteX, 7), op!(Rla, AbsoluteX, 7),
    // 0x40
    op!(Rti, Implied, 6), op!(Eor, IndirectX, 6), op!(Jam, Implied, 2), op!(Sre, IndirectX, 8),
    op!(Nop, ZeroPage, 3), op!(Eor, ZeroPage, 3), op!(Lsr, ZeroPage, 5), op!(Sre, ZeroPage, 5),
    op!(Pha, Implied, 3), op!(Eor, Immediate, 2), op!(Lsr, Accumulator, 2), op!(Alr, Immediate, 2),
    op!(Jmp, Absolute, 3), op!(Eor, Absolute, 4), op!(Lsr, Absolute, 6), op!(Sre, Absolute, 6),
    // 0x50
    op!(Bvc, Relative, 2), op!(Eor, IndirectY, 5), op!(Jam, Implied, 2), op!(Sre, IndirectY, 8),
    op!(Nop, ZeroPageX, 4), op!(Eor, ZeroPageX, 4), op!(Lsr, ZeroPageX, 6), op!(Sre, ZeroPageX, 6),
    op!(Cli, Implied, 2), op!(Eor, AbsoluteY, 4), op!(Nop, Implied, 2), op!(Sre, AbsoluteY, 7),
    op!(Nop, AbsoluteX, 4), op!(Eor, AbsoluteX, 4), op!(Lsr, AbsoluteX, 7), op!(Sre, AbsoluteX, 7),
    // 0x60
    op!(Rts, Implied, 6), op!(Adc, IndirectX, 6), op!(Jam, Implied, 2), op!(Rra, IndirectX, 8),
    op!(Nop, ZeroPage, 3), op!(Adc, ZeroPage, 3), op!(Ror, ZeroPage, 5), op!(Rra, ZeroPage, 5),
    op!(Pla, Implied, 4), op!(Adc, Immediate, 2), op!(Ror, Accumulator, 2), op!(Arr, Immediate, 2),
    op!(Jmp, Indirect, 5), op!(Adc, Absolute, 4), op!(Ror, Absolute, 6), op!(Rra, Absolute, 6),
    // 0x70
    op!(Bvs, Relative, 2), op!(Adc, IndirectY, 5), op!(Jam, Implied, 2), op!(Rra, IndirectY, 8),
    op!(Nop, ZeroPageX, 4), op!(Adc, ZeroPageX, 4), op!(Ror, ZeroPageX, 6), op!(Rra, ZeroPageX, 6),
    op!(Sei, Implied, 2), op!(Adc, AbsoluteY, 4), op!(Nop, Implied, 2), op!(Rra, AbsoluteY, 7),
    op!(Nop, AbsoluteX, 4), op!(Adc, AbsoluteX, 4), op!(Ror, AbsoluteX, 7), op!(Rra, AbsoluteX, 7),
    // 0x80
    op!(Nop, Immediate, 2), op!(Sta, IndirectX, 6), op!(Nop, Immediate, 2), op!(Sax, IndirectX, 6),
    op!(Sty, ZeroPage, 3), op!(Sta, ZeroPage, 3), op!(Stx, ZeroPage, 3), op!(Sax, ZeroPage, 3),
    op!(Dey, Implied, 2), op!(Nop, Immediate, 2), op!(Txa, Implied, 2), op!(Xaa, Immediate, 2),
    op!(Sty, Absolute, 4), op!(Sta, Absolute, 4), op!(Stx, Absolute, 4), op!(Sax, Absolute, 4),
    // 0x90
    op!(Bcc, Relative, 2), op!(Sta, IndirectY, 6), op!(Jam, Implied, 2), op!(Sha, IndirectY, 6),
    op!(Sty, ZeroPageX, 4), op!(Sta, ZeroPageX, 4), op!(Stx, ZeroPageY, 4), op!(Sax, ZeroPageY, 4),
    op!(Tya, Implied, 2), op!(Sta, AbsoluteY, 5), op!(Txs, Implied, 2), op!(Tas, AbsoluteY, 5),
    op!(Shy, AbsoluteX, 5), op!(Sta, AbsoluteX, 5), op!(Shx, AbsoluteY, 5), op!(Sha, AbsoluteY, 5),
    // 0xA0
    op!(Ldy, Immediate, 2), op!(Lda, IndirectX, 6), op!(Ldx, Immediate, 2), op!(Lax, IndirectX, 6),
    op!(Ldy, ZeroPage, 3), op!(Lda, ZeroPage, 3), op!(Ldx, ZeroPage, 3), op!(Lax, ZeroPage, 3),
    op!(Tay, Implied, 2), op!(Lda, Immediate, 2), op!(Tax, Implied, 2), op!(Lxa, Immediate, 2),
    op!(Ldy, Absolute, 4), op!(Lda, Absolute, 4), op!(Ldx, Absolute, 4), op!(Lax, Absolute, 4),
    // 0xB0
    op!(Bcs, Relative, 2), op!(Lda, IndirectY, 5), op!(Jam, Implied, 2), op!(Lax, IndirectY, 5),
    op!(Ldy, ZeroPageX, 4), op!(Lda, ZeroPageX, 4), op!(Ldx, ZeroPageY, 4), op!(Lax, ZeroPageY, 4),
    op!(Clv, Implied, 2), op!(Lda, AbsoluteY, 4), op!(Tsx, Implied, 2), op!(Las, AbsoluteY, 4),
    op!(Ldy, AbsoluteX, 4), op!(Lda, AbsoluteX, 4), op!(Ldx, AbsoluteY, 4), op!(Lax, AbsoluteY, 4),
    // 0xC0
    op!(Cpy, Immediate, 2), op!(Cmp, IndirectX, 6), op!(Nop, Immediate, 2), op!(Dcp, IndirectX, 8),
    op!(Cpy, ZeroPage, 3), op!(Cmp, ZeroPage, 3), op!(Dec, ZeroPage, 5), op!(Dcp, ZeroPage, 5),
    op!(Iny, Implied, 2), op!(Cmp, Immediate, 2), op!(Dex, Implied, 2), op!(Sbx, Immediate, 2),
    op!(Cpy, Absolute, 4), op!(Cmp, Absolute, 4), op!(Dec, Absolute, 6), op!(Dcp, Absolute, 6),
    // 0xD0
    op!(Bne, Relative, 2), op!(Cmp, IndirectY, 5), op!(Jam, Implied, 2), op!(Dcp, IndirectY, 8),
    op!(Nop, ZeroPageX, 4), op!(Cmp, ZeroPageX, 4), op!(Dec, ZeroPageX, 6), op!(Dcp, ZeroPageX, 6),
    op!(Cld, Implied, 2), op!(Cmp, AbsoluteY, 4), op!(Nop, Implied, 2), op!(Dcp, AbsoluteY, 7),
    op!(Nop, AbsoluteX, 4), op!(Cmp, AbsoluteX, 4), op!(Dec, AbsoluteX, 7), op!(Dcp, AbsoluteX, 7),
    // 0xE0
    op!(Cpx, Immediate, 2), op!(Sbc, IndirectX, 6), op!(Nop, Immediate, 2), op!(Isc, IndirectX, 8),
    op!(Cpx, ZeroPage, 3), op!(Sbc, ZeroPage, 3), op!(Inc, ZeroPage, 5), op!(Isc, ZeroPage, 5),
    op!(Inx, Implied, 2), op!(Sbc, Immediate, 2), op!(Nop, Implied, 2), op!(Sbc, Immediate, 2),
    op!(Cpx, Absolute, 4), op!(Sbc, Absolute, 4), op!(Inc, Absolute, 6), op!(Isc, Absolute, 6),
    // 0xF0
    op!(Beq, Relative, 2), op!(Sbc, IndirectY, 5), op!(Jam, Implied, 2), op!(Isc, IndirectY, 8),
    op!(Nop, ZeroPageX, 4), op!(Sbc, ZeroPageX, 4), op!(Inc, ZeroPageX, 6), op!(Isc, ZeroPageX, 6),
    op!(Sed, Implied, 2), op!(Sbc, AbsoluteY, 4), op!(Nop, Implied, 2), op!(Isc, AbsoluteY, 7),
    op!(Nop, AbsoluteX, 4), op!(Sbc, AbsoluteX, 4), op!(Inc, AbsoluteX, 7), op!(Isc, AbsoluteX, 7),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_has_256_entries() {
        assert_eq!(OPCODES.len(), 256);
    }

    #[test]
    fn brk_is_documented_seven_cycles() {
        let (mnemonic, mode, cycles) = OPCODES[0x00];
        assert_eq!(mnemonic, Mnemonic::Brk);
        assert_eq!(mode, A::Implied);
        assert_eq!(cycles, 7);
        assert!(!mnemonic.is_undocumented());
    }

    #[test]
    fn lax_is_undocumented_but_not_unstable() {
        let (mnemonic, ..) = OPCODES[0xA7];
        assert_eq!(mnemonic, Mnemonic::Lax);
        assert!(mnemonic.is_undocumented());
        assert!(!mnemonic.is_unstable());
    }

    #[test]
    fn sha_is_unstable() {
        let (mnemonic, ..) = OPCODES[0x93];
        assert_eq!(mnemonic, Mnemonic::Sha);
        assert!(mnemonic.is_unstable());
    }
}
