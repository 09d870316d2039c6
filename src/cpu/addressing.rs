//! Addressing-mode effective-address resolution.
//!
//! Each mode consumes the operand bytes that follow the opcode (advancing
//! `pc`) and yields either a bus address or nothing, plus whether resolving
//! it crossed a page boundary (relevant only to the "read" instruction class;
//! see [`crate::cpu::opcode::reads_extra_cycle_on_page_cross`]).

use crate::bus::CpuBus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressMode {
    Implied,
    Accumulator,
    Immediate,
    ZeroPage,
    ZeroPageX,
    ZeroPageY,
    Absolute,
    AbsoluteX,
    AbsoluteY,
    Indirect,
    IndirectX,
    IndirectY,
    Relative,
}

/// Where an instruction's operand lives, once addressing has resolved it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    /// No memory operand (e.g. `CLC`, `TAX`).
    Implied,
    /// Operates directly on the accumulator (e.g. `ASL A`).
    Accumulator,
    /// A resolved bus address, and whether computing it crossed a page.
    Address { addr: u16, page_crossed: bool },
}

impl Operand {
    pub fn address(self) -> u16 {
        match self {
            Operand::Address { addr, .. } => addr,
            _ => unreachable!("operand has no address"),
        }
    }

    pub fn page_crossed(self) -> bool {
        matches!(self, Operand::Address { page_crossed: true, .. })
    }
}

fn page_of(addr: u16) -> u16 {
    addr & 0xFF00
}

/// Resolves `mode`'s operand, reading any operand bytes from `bus` and
/// advancing `pc`. `pc` must already point at the byte following the opcode.
pub fn resolve(mode: AddressMode, pc: &mut u16, a: u8, x: u8, y: u8, bus: &mut CpuBus) -> (Operand, u8) {
    let _ = a;
    match mode {
        AddressMode::Implied => (Operand::Implied, 0),
        AddressMode::Accumulator => (Operand::Accumulator, 0),
        AddressMode::Immediate => {
            let addr = *pc;
            *pc = pc.wrapping_add(1);
            (Operand::Address { addr, page_crossed: false }, 1)
        }
        AddressMode::ZeroPage => {
            let addr = bus.read(*pc) as u16;
            *pc = pc.wrapping_add(1);
            (Operand::Address { addr, page_crossed: false }, 1)
        }
        AddressMode::ZeroPageX => {
            let base = bus.read(*pc);
            *pc = pc.wrapping_add(1);
            let addr = base.wrapping_add(x) as u16;
            (Operand::Address { addr, page_crossed: false }, 1)
        }
        AddressMode::ZeroPageY => {
            let base = bus.read(*pc);
            *pc = pc.wrapping_add(1);
            let addr = base.wrapping_add(y) as u16;
            (Operand::Address { addr, page_crossed: false }, 1)
        }
        AddressMode::Absolute => {
            let lo = bus.read(*pc);
            *pc = pc.wrapping_add(1);
            let hi = bus.read(*pc);
            *pc = pc.wrapping_add(1);
            let addr = u16::from_le_bytes([lo, hi]);
            (Operand::Address { addr, page_crossed: false }, 2)
        }
        AddressMode::AbsoluteX => {
            let lo = bus.read(*pc);
            *pc = pc.wrapping_add(1);
            let hi = bus.read(*pc);
            *pc = pc.wrapping_add(1);
            let base = u16::from_le_bytes([lo, hi]);
            let addr = base.wrapping_add(x as u16);
            (Operand::Address { addr, page_crossed: page_of(addr) != page_of(base) }, 2)
        }
        AddressMode::AbsoluteY => {
            let lo = bus.read(*pc);
            *pc = pc.wrapping_add(1);
            let hi = bus.read(*pc);
            *pc = pc.wrapping_add(1);
            let base = u16::from_le_bytes([lo, hi]);
            let addr = base.wrapping_add(y as u16);
            (Operand::Address { addr, page_crossed: page_of(addr) != page_of(base) }, 2)
        }
        AddressMode::Indirect => {
            let lo = bus.read(*pc);
            *pc = pc.wrapping_add(1);
            let hi = bus.read(*pc);
            *pc = pc.wrapping_add(1);
            let ptr = u16::from_le_bytes([lo, hi]);
            // Hardware bug: the high byte fetch wraps within the same page
            // instead of crossing into the next one when the low byte of
            // `ptr` is $FF.
            let ptr_hi = (ptr & 0xFF00) | (ptr.wrapping_add(1) & 0x00FF);
            let addr_lo = bus.read(ptr);
            let addr_hi = bus.read(ptr_hi);
            let addr = u16::from_le_bytes([addr_lo, addr_hi]);
            (Operand::Address { addr, page_crossed: false }, 2)
        }
        AddressMode::IndirectX => {
            let base = bus.read(*pc);
            *pc = pc.wrapping_add(1);
            let ptr = base.wrapping_add(x);
            let lo = bus.read(ptr as u16);
            let hi = bus.read(ptr.wrapping_add(1) as u16);
            let addr = u16::from_le_bytes([lo, hi]);
            (Operand::Address { addr, page_crossed: false }, 1)
        }
        AddressMode::IndirectY => {
            let ptr = bus.read(*pc);
            *pc = pc.wrapping_add(1);
            let lo = bus.read(ptr as u16);
            let hi = bus.read(ptr.wrapping_add(1) as u16);
            let base = u16::from_le_bytes([lo, hi]);
            let addr = base.wrapping_add(y as u16);
            (Operand::Address { addr, page_crossed: page_of(addr) != page_of(base) }, 1)
        }
        AddressMode::Relative => {
            let offset = bus.read(*pc) as i8;
            *pc = pc.wrapping_add(1);
            let addr = pc.wrapping_add(offset as u16);
            (Operand::Address { addr, page_crossed: page_of(addr) != page_of(*pc) }, 1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cartridge::Cartridge;
    use crate::controller::Controller;
    use crate::interrupt_bus::InterruptBus;
    use crate::memory::cpu as cpu_mem;
    use crate::ppu::Ppu;

    fn nrom_cartridge() -> Cartridge {
        let mut bytes = vec![0u8; 16];
        bytes[0..4].copy_from_slice(b"NES\x1A");
        bytes[4] = 1;
        bytes[5] = 1;
        bytes.extend(vec![0u8; 0x4000]);
        bytes.extend(vec![0u8; 0x2000]);
        Cartridge::from_ines(&bytes).unwrap()
    }

    fn with_bus<F: FnOnce(&mut CpuBus)>(f: F) {
        let mut ram = [0u8; cpu_mem::INTERNAL_RAM_SIZE];
        let mut ppu = Ppu::new();
        let mut cart = nrom_cartridge();
        let mut controllers = [Controller::new(), Controller::new()];
        let mut interrupts = InterruptBus::new();
        let mut bus = CpuBus {
            ram: &mut ram,
            ppu: &mut ppu,
            cartridge: &mut cart,
            controllers: &mut controllers,
            interrupts: &mut interrupts,
            cpu_cycle: 0,
        };
        f(&mut bus);
    }

    #[test]
    fn absolute_x_reports_page_cross() {
        with_bus(|bus| {
            bus.write(0x0010, 0xFF);
            bus.write(0x0011, 0x02);
            let mut pc = 0x0010;
            let (op, size) = resolve(AddressMode::AbsoluteX, &mut pc, 0, 0x01, 0, bus);
            assert_eq!(size, 2);
            assert!(op.page_crossed());
            assert_eq!(op.address(), 0x0300);
        });
    }

    #[test]
    fn zero_page_x_wraps_within_zero_page() {
        with_bus(|bus| {
            bus.write(0x0010, 0xFF);
            let mut pc = 0x0010;
            let (op, _) = resolve(AddressMode::ZeroPageX, &mut pc, 0, 0x02, 0, bus);
            assert_eq!(op.address(), 0x0001);
        });
    }

    #[test]
    fn indirect_jmp_bug_wraps_high_byte_fetch_within_page() {
        with_bus(|bus| {
            bus.write(0x0010, 0xFF);
            bus.write(0x0011, 0x02);
            bus.write(0x02FF, 0x34);
            bus.write(0x0200, 0x12); // would-be byte at $0300 if the bug weren't modeled
            let mut pc = 0x0010;
            let (op, _) = resolve(AddressMode::Indirect, &mut pc, 0, 0, 0, bus);
            assert_eq!(op.address(), 0x1234);
        });
    }
}
