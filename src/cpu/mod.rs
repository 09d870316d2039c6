//! The 6502-derivative CPU (Ricoh 2A03): register file, instruction
//! dispatch, interrupt sequences, and OAM DMA stall accounting.
//!
//! Unlike the micro-op-per-cycle pipeline a faithful cycle simulator might
//! use, [`Cpu::step`] executes one whole instruction per call and returns
//! the number of CPU cycles it consumed, matching the system runner's
//! instruction-stepped contract (§4.7): the PPU is then advanced by three
//! times that many dots.

pub mod addressing;
pub mod opcode;
pub mod status;

use crate::bus::CpuBus;
use crate::config::Config;
use crate::error::RuntimeError;
use crate::memory::cpu as cpu_mem;
use addressing::{AddressMode, Operand};
use opcode::{Mnemonic, OPCODES};
use status::Status;

/// Number of CPU cycles an NMI or IRQ sequence takes.
const INTERRUPT_SEQUENCE_CYCLES: u16 = 7;

/// The 2A03's visible register file plus the bookkeeping needed to drive
/// instruction dispatch and interrupt sequencing.
#[derive(Debug, Clone)]
pub struct Cpu {
    pub a: u8,
    pub x: u8,
    pub y: u8,
    pub sp: u8,
    pub status: Status,
    pub pc: u16,
    /// Total CPU cycles executed since `reset`. Used for the PPU warm-up
    /// gate and to decide the 513/514-cycle OAM DMA stall parity.
    pub cycles: u64,
    halted: bool,
}

impl Cpu {
    pub fn new() -> Self {
        Self {
            a: 0,
            x: 0,
            y: 0,
            sp: 0xFD,
            status: Status::power_on(),
            pc: 0,
            cycles: 0,
            halted: false,
        }
    }

    pub fn halted(&self) -> bool {
        self.halted
    }

    /// Loads PC from the reset vector and sets the documented power-on
    /// register values.
    pub fn reset(&mut self, bus: &mut CpuBus) {
        self.a = 0;
        self.x = 0;
        self.y = 0;
        self.sp = 0xFD;
        self.status = Status::power_on();
        self.cycles = 0;
        self.halted = false;
        let lo = bus.read(cpu_mem::RESET_VECTOR_LO);
        let hi = bus.read(cpu_mem::RESET_VECTOR_HI);
        self.pc = u16::from_le_bytes([lo, hi]);
    }

    /// Number of cycles the CPU stalls for an OAM DMA transfer: 513, or 514
    /// if the current cycle count is odd. Advances `self.cycles` by the
    /// stall amount, same as a real instruction's cycles would.
    pub fn dma_stall(&mut self) -> u16 {
        let stall = if self.cycles % 2 == 1 { 514 } else { 513 };
        self.cycles = self.cycles.wrapping_add(stall as u64);
        stall
    }

    fn push(&mut self, bus: &mut CpuBus, value: u8, config: &Config) -> Result<(), RuntimeError> {
        if config.strict_stack && self.sp == 0x00 {
            return Err(RuntimeError::StackOverflow { pc: self.pc });
        }
        bus.write(cpu_mem::STACK_PAGE_START | self.sp as u16, value);
        self.sp = self.sp.wrapping_sub(1);
        Ok(())
    }

    fn pop(&mut self, bus: &mut CpuBus, config: &Config) -> Result<u8, RuntimeError> {
        if config.strict_stack && self.sp == 0xFF {
            return Err(RuntimeError::StackUnderflow { pc: self.pc });
        }
        self.sp = self.sp.wrapping_add(1);
        Ok(bus.read(cpu_mem::STACK_PAGE_START | self.sp as u16))
    }

    fn push_u16(&mut self, bus: &mut CpuBus, value: u16, config: &Config) -> Result<(), RuntimeError> {
        let [lo, hi] = value.to_le_bytes();
        self.push(bus, hi, config)?;
        self.push(bus, lo, config)
    }

    fn pop_u16(&mut self, bus: &mut CpuBus, config: &Config) -> Result<u16, RuntimeError> {
        let lo = self.pop(bus, config)?;
        let hi = self.pop(bus, config)?;
        Ok(u16::from_le_bytes([lo, hi]))
    }

    /// Executes the instruction at `pc`, returning the number of cycles it
    /// took. Returns `Err` only for a `strict_stack` violation or a `JAM`
    /// opcode (which halts the CPU).
    pub fn step(&mut self, bus: &mut CpuBus, config: &Config) -> Result<u16, RuntimeError> {
        if self.halted {
            return Err(RuntimeError::CpuHalted { pc: self.pc });
        }

        bus.cpu_cycle = self.cycles;
        let opcode = bus.read(self.pc);
        self.pc = self.pc.wrapping_add(1);
        let (mnemonic, mode, base_cycles) = OPCODES[opcode as usize];

        let allow_undocumented = config.undocumented_opcodes_enabled();
        let allow_unstable =
            config.unstable_undocumented_opcodes_enabled() && cfg!(feature = "undocumented_opcodes_all");

        let effective = if mnemonic == Mnemonic::Jam {
            Mnemonic::Jam
        } else if mnemonic.is_unstable() {
            if allow_unstable { mnemonic } else { Mnemonic::Nop }
        } else if mnemonic.is_undocumented() {
            if allow_undocumented { mnemonic } else { Mnemonic::Nop }
        } else {
            mnemonic
        };

        let (operand, _) = addressing::resolve(mode, &mut self.pc, self.a, self.x, self.y, bus);

        let mut cycles = base_cycles as u16;
        if operand.page_crossed() && opcode::reads_extra_cycle_on_page_cross(mnemonic) {
            cycles += 1;
        }

        cycles += self.execute(effective, operand, bus, config)? as u16;

        self.cycles = self.cycles.wrapping_add(cycles);
        Ok(cycles)
    }

    /// Runs the 7-cycle NMI sequence: push PC and status (with the B flag
    /// clear), set the interrupt-disable flag, and jump through the NMI
    /// vector.
    pub fn service_nmi(&mut self, bus: &mut CpuBus, config: &Config) -> Result<u16, RuntimeError> {
        self.push_u16(bus, self.pc, config)?;
        let pushed_status = (self.status & !Status::BREAK) | Status::UNUSED;
        self.push(bus, pushed_status.to_byte(), config)?;
        self.status.insert(Status::INTERRUPT);
        let lo = bus.read(cpu_mem::NMI_VECTOR_LO);
        let hi = bus.read(cpu_mem::NMI_VECTOR_HI);
        self.pc = u16::from_le_bytes([lo, hi]);
        Ok(INTERRUPT_SEQUENCE_CYCLES)
    }

    /// Runs the 7-cycle IRQ sequence, identical to NMI but vectoring
    /// through `$FFFE/$FFFF`. The caller is responsible for only invoking
    /// this when the interrupt-disable flag is clear.
    pub fn service_irq(&mut self, bus: &mut CpuBus, config: &Config) -> Result<u16, RuntimeError> {
        self.push_u16(bus, self.pc, config)?;
        let pushed_status = (self.status & !Status::BREAK) | Status::UNUSED;
        self.push(bus, pushed_status.to_byte(), config)?;
        self.status.insert(Status::INTERRUPT);
        let lo = bus.read(cpu_mem::IRQ_VECTOR_LO);
        let hi = bus.read(cpu_mem::IRQ_VECTOR_HI);
        self.pc = u16::from_le_bytes([lo, hi]);
        Ok(INTERRUPT_SEQUENCE_CYCLES)
    }

    fn read_operand(&self, operand: Operand, bus: &mut CpuBus) -> u8 {
        match operand {
            Operand::Accumulator => self.a,
            Operand::Address { addr, .. } => bus.read(addr),
            Operand::Implied => unreachable!("instruction with no operand tried to read one"),
        }
    }

    fn write_operand(&mut self, operand: Operand, value: u8, bus: &mut CpuBus) {
        match operand {
            Operand::Accumulator => self.a = value,
            Operand::Address { addr, .. } => bus.write(addr, value),
            Operand::Implied => unreachable!("instruction with no operand tried to write one"),
        }
    }

    fn adc(&mut self, value: u8) {
        let carry_in = self.status.contains(Status::CARRY) as u16;
        let sum = self.a as u16 + value as u16 + carry_in;
        let result = sum as u8;
        self.status.set(Status::CARRY, sum > 0xFF);
        self.status
            .set(Status::OVERFLOW, (!(self.a ^ value) & (self.a ^ result) & 0x80) != 0);
        self.a = result;
        self.status.update_zero_negative(self.a);
    }

    fn sbc(&mut self, value: u8) {
        self.adc(!value);
    }

    fn compare(&mut self, register: u8, value: u8) {
        let result = register.wrapping_sub(value);
        self.status.set(Status::CARRY, register >= value);
        self.status.update_zero_negative(result);
    }

    fn asl_value(&mut self, value: u8) -> u8 {
        self.status.set(Status::CARRY, value & 0x80 != 0);
        let result = value << 1;
        self.status.update_zero_negative(result);
        result
    }

    fn lsr_value(&mut self, value: u8) -> u8 {
        self.status.set(Status::CARRY, value & 0x01 != 0);
        let result = value >> 1;
        self.status.update_zero_negative(result);
        result
    }

    fn rol_value(&mut self, value: u8) -> u8 {
        let carry_in = self.status.contains(Status::CARRY) as u8;
        self.status.set(Status::CARRY, value & 0x80 != 0);
        let result = (value << 1) | carry_in;
        self.status.update_zero_negative(result);
        result
    }

    fn ror_value(&mut self, value: u8) -> u8 {
        let carry_in = self.status.contains(Status::CARRY) as u8;
        self.status.set(Status::CARRY, value & 0x01 != 0);
        let result = (value >> 1) | (carry_in << 7);
        self.status.update_zero_negative(result);
        result
    }

    fn branch(&mut self, operand: Operand, taken: bool) -> u8 {
        if !taken {
            return 0;
        }
        let mut extra = 1;
        if operand.page_crossed() {
            extra += 1;
        }
        self.pc = operand.address();
        extra
    }

    /// Executes `mnemonic`'s side effects, returning any cycles beyond the
    /// opcode table's base count (taken branches, page-crossed branches).
    #[allow(clippy::too_many_lines)]
    fn execute(
        &mut self,
        mnemonic: Mnemonic,
        operand: Operand,
        bus: &mut CpuBus,
        config: &Config,
    ) -> Result<u8, RuntimeError> {
        use Mnemonic::*;
        Ok(match mnemonic {
            Nop => {
                if !matches!(operand, Operand::Implied | Operand::Accumulator) {
                    self.read_operand(operand, bus);
                }
                0
            }
            Lda => {
                self.a = self.read_operand(operand, bus);
                self.status.update_zero_negative(self.a);
                0
            }
            Ldx => {
                self.x = self.read_operand(operand, bus);
                self.status.update_zero_negative(self.x);
                0
            }
            Ldy => {
                self.y = self.read_operand(operand, bus);
                self.status.update_zero_negative(self.y);
                0
            }
            Sta => {
                self.write_operand(operand, self.a, bus);
                0
            }
            Stx => {
                self.write_operand(operand, self.x, bus);
                0
            }
            Sty => {
                self.write_operand(operand, self.y, bus);
                0
            }
            Tax => {
                self.x = self.a;
                self.status.update_zero_negative(self.x);
                0
            }
            Tay => {
                self.y = self.a;
                self.status.update_zero_negative(self.y);
                0
            }
            Txa => {
                self.a = self.x;
                self.status.update_zero_negative(self.a);
                0
            }
            Tya => {
                self.a = self.y;
                self.status.update_zero_negative(self.a);
                0
            }
            Tsx => {
                self.x = self.sp;
                self.status.update_zero_negative(self.x);
                0
            }
            Txs => {
                self.sp = self.x;
                0
            }
            Adc => {
                let value = self.read_operand(operand, bus);
                self.adc(value);
                0
            }
            Sbc => {
                let value = self.read_operand(operand, bus);
                self.sbc(value);
                0
            }
            And => {
                let value = self.read_operand(operand, bus);
                self.a &= value;
                self.status.update_zero_negative(self.a);
                0
            }
            Ora => {
                let value = self.read_operand(operand, bus);
                self.a |= value;
                self.status.update_zero_negative(self.a);
                0
            }
            Eor => {
                let value = self.read_operand(operand, bus);
                self.a ^= value;
                self.status.update_zero_negative(self.a);
                0
            }
            Bit => {
                let value = self.read_operand(operand, bus);
                self.status.set(Status::ZERO, self.a & value == 0);
                self.status.set(Status::NEGATIVE, value & 0x80 != 0);
                self.status.set(Status::OVERFLOW, value & 0x40 != 0);
                0
            }
            Cmp => {
                let value = self.read_operand(operand, bus);
                self.compare(self.a, value);
                0
            }
            Cpx => {
                let value = self.read_operand(operand, bus);
                self.compare(self.x, value);
                0
            }
            Cpy => {
                let value = self.read_operand(operand, bus);
                self.compare(self.y, value);
                0
            }
            Asl => {
                let value = self.read_operand(operand, bus);
                let result = self.asl_value(value);
                self.write_operand(operand, result, bus);
                0
            }
            Lsr => {
                let value = self.read_operand(operand, bus);
                let result = self.lsr_value(value);
                self.write_operand(operand, result, bus);
                0
            }
            Rol => {
                let value = self.read_operand(operand, bus);
                let result = self.rol_value(value);
                self.write_operand(operand, result, bus);
                0
            }
            Ror => {
                let value = self.read_operand(operand, bus);
                let result = self.ror_value(value);
                self.write_operand(operand, result, bus);
                0
            }
            Inc => {
                let value = self.read_operand(operand, bus).wrapping_add(1);
                self.status.update_zero_negative(value);
                self.write_operand(operand, value, bus);
                0
            }
            Dec => {
                let value = self.read_operand(operand, bus).wrapping_sub(1);
                self.status.update_zero_negative(value);
                self.write_operand(operand, value, bus);
                0
            }
            Inx => {
                self.x = self.x.wrapping_add(1);
                self.status.update_zero_negative(self.x);
                0
            }
            Iny => {
                self.y = self.y.wrapping_add(1);
                self.status.update_zero_negative(self.y);
                0
            }
            Dex => {
                self.x = self.x.wrapping_sub(1);
                self.status.update_zero_negative(self.x);
                0
            }
            Dey => {
                self.y = self.y.wrapping_sub(1);
                self.status.update_zero_negative(self.y);
                0
            }
            Clc => {
                self.status.remove(Status::CARRY);
                0
            }
            Sec => {
                self.status.insert(Status::CARRY);
                0
            }
            Cli => {
                self.status.remove(Status::INTERRUPT);
                0
            }
            Sei => {
                self.status.insert(Status::INTERRUPT);
                0
            }
            Cld => {
                self.status.remove(Status::DECIMAL);
                0
            }
            Sed => {
                self.status.insert(Status::DECIMAL);
                0
            }
            Clv => {
                self.status.remove(Status::OVERFLOW);
                0
            }
            Jmp => {
                self.pc = operand.address();
                0
            }
            Jsr => {
                let return_addr = self.pc.wrapping_sub(1);
                self.push_u16(bus, return_addr, config)?;
                self.pc = operand.address();
                0
            }
            Rts => {
                let addr = self.pop_u16(bus, config)?;
                self.pc = addr.wrapping_add(1);
                0
            }
            Brk => {
                let return_addr = self.pc.wrapping_add(1);
                self.push_u16(bus, return_addr, config)?;
                self.push(bus, (self.status | Status::BREAK | Status::UNUSED).to_byte(), config)?;
                self.status.insert(Status::INTERRUPT);
                let lo = bus.read(cpu_mem::IRQ_VECTOR_LO);
                let hi = bus.read(cpu_mem::IRQ_VECTOR_HI);
                self.pc = u16::from_le_bytes([lo, hi]);
                0
            }
            Rti => {
                let status = self.pop(bus, config)?;
                self.status = Status::from_byte(status) | Status::UNUSED;
                self.pc = self.pop_u16(bus, config)?;
                0
            }
            Pha => {
                self.push(bus, self.a, config)?;
                0
            }
            Pla => {
                self.a = self.pop(bus, config)?;
                self.status.update_zero_negative(self.a);
                0
            }
            Php => {
                self.push(bus, (self.status | Status::BREAK | Status::UNUSED).to_byte(), config)?;
                0
            }
            Plp => {
                let value = self.pop(bus, config)?;
                self.status = Status::from_byte(value) | Status::UNUSED;
                0
            }
            Bcc => self.branch(operand, !self.status.contains(Status::CARRY)),
            Bcs => self.branch(operand, self.status.contains(Status::CARRY)),
            Beq => self.branch(operand, self.status.contains(Status::ZERO)),
            Bne => self.branch(operand, !self.status.contains(Status::ZERO)),
            Bmi => self.branch(operand, self.status.contains(Status::NEGATIVE)),
            Bpl => self.branch(operand, !self.status.contains(Status::NEGATIVE)),
            Bvc => self.branch(operand, !self.status.contains(Status::OVERFLOW)),
            Bvs => self.branch(operand, self.status.contains(Status::OVERFLOW)),

            // Undocumented, "Common" tier.
            Lax => {
                let value = self.read_operand(operand, bus);
                self.a = value;
                self.x = value;
                self.status.update_zero_negative(value);
                0
            }
            Sax => {
                self.write_operand(operand, self.a & self.x, bus);
                0
            }
            Dcp => {
                let value = self.read_operand(operand, bus).wrapping_sub(1);
                self.write_operand(operand, value, bus);
                self.compare(self.a, value);
                0
            }
            Isc => {
                let value = self.read_operand(operand, bus).wrapping_add(1);
                self.write_operand(operand, value, bus);
                self.sbc(value);
                0
            }
            Slo => {
                let value = self.read_operand(operand, bus);
                let shifted = self.asl_value(value);
                self.write_operand(operand, shifted, bus);
                self.a |= shifted;
                self.status.update_zero_negative(self.a);
                0
            }
            Rla => {
                let value = self.read_operand(operand, bus);
                let rotated = self.rol_value(value);
                self.write_operand(operand, rotated, bus);
                self.a &= rotated;
                self.status.update_zero_negative(self.a);
                0
            }
            Rra => {
                let value = self.read_operand(operand, bus);
                let rotated = self.ror_value(value);
                self.write_operand(operand, rotated, bus);
                self.adc(rotated);
                0
            }
            Sre => {
                let value = self.read_operand(operand, bus);
                let shifted = self.lsr_value(value);
                self.write_operand(operand, shifted, bus);
                self.a ^= shifted;
                self.status.update_zero_negative(self.a);
                0
            }
            Jam => {
                self.halted = true;
                return Err(RuntimeError::CpuHalted { pc: self.pc });
            }

            // Undocumented, "All" tier: chip-revision-dependent approximations.
            Anc => {
                let value = self.read_operand(operand, bus);
                self.a &= value;
                self.status.update_zero_negative(self.a);
                self.status.set(Status::CARRY, self.a & 0x80 != 0);
                0
            }
            Alr => {
                let value = self.read_operand(operand, bus);
                self.a &= value;
                self.a = self.lsr_value(self.a);
                0
            }
            Arr => {
                let value = self.read_operand(operand, bus);
                self.a &= value;
                self.a = self.ror_value(self.a);
                self.status.set(Status::CARRY, self.a & 0x40 != 0);
                self.status
                    .set(Status::OVERFLOW, (self.a & 0x40 != 0) ^ (self.a & 0x20 != 0));
                0
            }
            Xaa => {
                // Highly unstable (magic-constant-dependent); approximated
                // with the common magic=0xFF assumption.
                let value = self.read_operand(operand, bus);
                self.a = self.x & value;
                self.status.update_zero_negative(self.a);
                0
            }
            Lxa => {
                let value = self.read_operand(operand, bus);
                self.a = value;
                self.x = value;
                self.status.update_zero_negative(self.a);
                0
            }
            Las => {
                let value = self.read_operand(operand, bus) & self.sp;
                self.a = value;
                self.x = value;
                self.sp = value;
                self.status.update_zero_negative(value);
                0
            }
            Sbx => {
                let value = self.read_operand(operand, bus);
                let base = self.a & self.x;
                self.status.set(Status::CARRY, base >= value);
                self.x = base.wrapping_sub(value);
                self.status.update_zero_negative(self.x);
                0
            }
            Sha => {
                let high = ((operand.address() >> 8) as u8).wrapping_add(1);
                self.write_operand(operand, self.a & self.x & high, bus);
                0
            }
            Shx => {
                let high = ((operand.address() >> 8) as u8).wrapping_add(1);
                self.write_operand(operand, self.x & high, bus);
                0
            }
            Shy => {
                let high = ((operand.address() >> 8) as u8).wrapping_add(1);
                self.write_operand(operand, self.y & high, bus);
                0
            }
            Tas => {
                let high = ((operand.address() >> 8) as u8).wrapping_add(1);
                self.sp = self.a & self.x;
                self.write_operand(operand, self.sp & high, bus);
                0
            }
        })
    }
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cartridge::Cartridge;
    use crate::controller::Controller;
    use crate::interrupt_bus::InterruptBus;
    use crate::ppu::Ppu;

    fn rom_with_prg(mut prg: Vec<u8>) -> Cartridge {
        prg.resize(0x4000, 0);
        let mut bytes = vec![0u8; 16];
        bytes[0..4].copy_from_slice(b"NES\x1A");
        bytes[4] = 1;
        bytes[5] = 1;
        bytes.extend(prg);
        bytes.extend(vec![0u8; 0x2000]);
        Cartridge::from_ines(&bytes).unwrap()
    }

    struct Harness {
        ram: [u8; cpu_mem::INTERNAL_RAM_SIZE],
        ppu: Ppu,
        cartridge: Cartridge,
        controllers: [Controller; 2],
        interrupts: InterruptBus,
    }

    impl Harness {
        fn new(cartridge: Cartridge) -> Self {
            Self {
                ram: [0; cpu_mem::INTERNAL_RAM_SIZE],
                ppu: Ppu::new(),
                cartridge,
                controllers: [Controller::new(), Controller::new()],
                interrupts: InterruptBus::new(),
            }
        }

        fn bus(&mut self) -> CpuBus<'_> {
            CpuBus {
                ram: &mut self.ram,
                ppu: &mut self.ppu,
                cartridge: &mut self.cartridge,
                controllers: &mut self.controllers,
                interrupts: &mut self.interrupts,
                cpu_cycle: 0,
            }
        }
    }

    #[test]
    fn reset_loads_pc_from_vector() {
        let mut prg = vec![0u8; 0x4000];
        prg[0x3FFC] = 0x00;
        prg[0x3FFD] = 0x80;
        let cart = rom_with_prg(prg);
        let mut harness = Harness::new(cart);
        let mut cpu = Cpu::new();
        let mut bus = harness.bus();
        cpu.reset(&mut bus);
        assert_eq!(cpu.pc, 0x8000);
        assert_eq!(cpu.sp, 0xFD);
    }

    #[test]
    fn adc_sets_carry_and_overflow_on_signed_overflow() {
        let cart = rom_with_prg(vec![0; 0x4000]);
        let mut harness = Harness::new(cart);
        let mut cpu = Cpu::new();
        cpu.a = 0x7F;
        cpu.status.remove(Status::CARRY);
        cpu.adc(0x01);
        assert_eq!(cpu.a, 0x80);
        assert!(cpu.status.contains(Status::OVERFLOW));
        assert!(cpu.status.contains(Status::NEGATIVE));
        assert!(!cpu.status.contains(Status::CARRY));
        let _ = harness;
    }

    #[test]
    fn lda_immediate_updates_flags_and_consumes_two_bytes() {
        let mut prg = vec![0u8; 0x4000];
        prg[0] = 0xA9; // LDA #imm
        prg[1] = 0x00;
        let cart = rom_with_prg(prg);
        let mut harness = Harness::new(cart);
        let mut cpu = Cpu::new();
        cpu.pc = cpu_mem::PRG_ROM_START;
        let config = Config::default();
        let mut bus = harness.bus();
        let cycles = cpu.step(&mut bus, &config).unwrap();
        assert_eq!(cycles, 2);
        assert_eq!(cpu.a, 0);
        assert!(cpu.status.contains(Status::ZERO));
        assert_eq!(cpu.pc, cpu_mem::PRG_ROM_START + 2);
    }

    #[test]
    fn jam_halts_and_errors() {
        let mut prg = vec![0u8; 0x4000];
        prg[0] = 0x02; // JAM
        let cart = rom_with_prg(prg);
        let mut harness = Harness::new(cart);
        let mut cpu = Cpu::new();
        cpu.pc = cpu_mem::PRG_ROM_START;
        let config = Config::default();
        let mut bus = harness.bus();
        let err = cpu.step(&mut bus, &config).unwrap_err();
        assert_eq!(err, RuntimeError::CpuHalted { pc: cpu_mem::PRG_ROM_START + 1 });
        assert!(cpu.halted());
    }

    #[test]
    fn jsr_rts_round_trips_return_address() {
        let mut prg = vec![0u8; 0x4000];
        prg[0] = 0x20; // JSR $8010
        prg[1] = 0x10;
        prg[2] = 0x80;
        prg[0x10] = 0x60; // RTS
        let cart = rom_with_prg(prg);
        let mut harness = Harness::new(cart);
        let mut cpu = Cpu::new();
        cpu.pc = cpu_mem::PRG_ROM_START;
        cpu.sp = 0xFD;
        let config = Config::default();
        let mut bus = harness.bus();
        cpu.step(&mut bus, &config).unwrap();
        assert_eq!(cpu.pc, cpu_mem::PRG_ROM_START + 0x10);
        cpu.step(&mut bus, &config).unwrap();
        assert_eq!(cpu.pc, cpu_mem::PRG_ROM_START + 3);
        assert_eq!(cpu.sp, 0xFD);
    }

    #[test]
    fn undocumented_opcode_is_nop_when_level_off() {
        let mut prg = vec![0u8; 0x4000];
        prg[0] = 0xA7; // LAX zero page
        prg[1] = 0x00;
        let cart = rom_with_prg(prg);
        let mut harness = Harness::new(cart);
        let mut cpu = Cpu::new();
        cpu.pc = cpu_mem::PRG_ROM_START;
        cpu.a = 0x55;
        let config = Config {
            undocumented_opcode_level: crate::config::UndocumentedLevel::Off,
            ..Config::default()
        };
        let mut bus = harness.bus();
        cpu.step(&mut bus, &config).unwrap();
        assert_eq!(cpu.a, 0x55, "LAX should not have executed under Off");
    }

    #[test]
    fn dma_stall_is_514_on_odd_cycle() {
        let mut cpu = Cpu {
            cycles: 1,
            ..Cpu::new()
        };
        assert_eq!(cpu.dma_stall(), 514);
        assert_eq!(cpu.cycles, 1 + 514);
        let mut cpu = Cpu { cycles: 2, ..Cpu::new() };
        assert_eq!(cpu.dma_stall(), 513);
        assert_eq!(cpu.cycles, 2 + 513);
    }
}
