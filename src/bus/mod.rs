//! The CPU's 16-bit address space: internal RAM, PPU register mirror, APU/IO
//! registers, controller ports, and the cartridge expansion/PRG window.
//!
//! [`CpuBus`] borrows every component it dispatches to rather than owning
//! them, so the system runner can hold `&mut Cpu` and `&mut CpuBus`
//! simultaneously without a `RefCell`.

use crate::cartridge::Cartridge;
use crate::controller::Controller;
use crate::interrupt_bus::InterruptBus;
use crate::memory::cpu as cpu_mem;
use crate::ppu::Ppu;

/// A short-lived view of the CPU's memory map, built fresh for each access
/// (or small run of accesses) from the system runner's owned components.
pub struct CpuBus<'a> {
    pub ram: &'a mut [u8; cpu_mem::INTERNAL_RAM_SIZE],
    pub ppu: &'a mut Ppu,
    pub cartridge: &'a mut Cartridge,
    pub controllers: &'a mut [Controller; 2],
    pub interrupts: &'a mut InterruptBus,
    /// Current CPU cycle count, for PPU power-up gating and mapper
    /// consecutive-write collapsing.
    pub cpu_cycle: u64,
}

impl<'a> CpuBus<'a> {
    pub fn read(&mut self, addr: u16) -> u8 {
        match addr {
            cpu_mem::INTERNAL_RAM_START..=cpu_mem::INTERNAL_RAM_MIRROR_END => {
                self.ram[(addr & cpu_mem::INTERNAL_RAM_MASK) as usize]
            }
            cpu_mem::PPU_REGISTER_BASE..=cpu_mem::PPU_REGISTER_END => {
                let reg = addr & cpu_mem::PPU_REGISTER_SELECT_MASK;
                self.ppu.read_register(reg, self.cartridge)
            }
            cpu_mem::CONTROLLER_PORT_1 => self.controllers[0].read(),
            cpu_mem::CONTROLLER_PORT_2 => self.controllers[1].read(),
            cpu_mem::APU_REGISTER_BASE..=cpu_mem::APU_REGISTER_END => {
                // No APU model; reads return open bus (0).
                0
            }
            cpu_mem::APU_STATUS => 0,
            cpu_mem::CARTRIDGE_SPACE_BASE..=cpu_mem::CPU_ADDR_END => self.cartridge.read_cpu(addr),
            _ => 0,
        }
    }

    pub fn write(&mut self, addr: u16, value: u8) {
        match addr {
            cpu_mem::INTERNAL_RAM_START..=cpu_mem::INTERNAL_RAM_MIRROR_END => {
                self.ram[(addr & cpu_mem::INTERNAL_RAM_MASK) as usize] = value;
            }
            cpu_mem::PPU_REGISTER_BASE..=cpu_mem::PPU_REGISTER_END => {
                let reg = addr & cpu_mem::PPU_REGISTER_SELECT_MASK;
                if reg == 7 {
                    self.ppu.write_data(value, self.cartridge);
                } else {
                    self.ppu.write_register(reg, value, self.cpu_cycle);
                }
            }
            cpu_mem::OAM_DMA => self.run_oam_dma(value),
            cpu_mem::CONTROLLER_PORT_1 => self.controllers[0].write_strobe(value),
            cpu_mem::CONTROLLER_PORT_2 => {
                // $4017 is the APU frame counter on the write side; no
                // second controller strobe latch exists on real hardware.
            }
            cpu_mem::APU_REGISTER_BASE..=cpu_mem::APU_REGISTER_END => {
                tracing::trace!(addr, value, "unmodeled APU register write");
            }
            cpu_mem::APU_STATUS => {}
            cpu_mem::CARTRIDGE_SPACE_BASE..=cpu_mem::CPU_ADDR_END => {
                self.cartridge.write_cpu(addr, value, self.cpu_cycle);
            }
            _ => {}
        }
    }

    /// Executes OAM DMA: copies the 256-byte page `value << 8` into PPU OAM
    /// and raises the DMA pause so the system runner can stall the CPU for
    /// the correct number of cycles.
    fn run_oam_dma(&mut self, value: u8) {
        let base = (value as u16) << 8;
        for offset in 0..=0xFFu16 {
            let byte = self.read(base + offset);
            self.ppu.dma_write_oam(byte);
        }
        self.interrupts.raise_dma_pause();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cartridge::Cartridge;

    fn nrom_cartridge() -> Cartridge {
        let mut bytes = vec![0u8; 16];
        bytes[0..4].copy_from_slice(b"NES\x1A");
        bytes[4] = 1;
        bytes[5] = 1;
        bytes.extend(vec![0u8; 0x4000]);
        bytes.extend(vec![0u8; 0x2000]);
        Cartridge::from_ines(&bytes).unwrap()
    }

    #[test]
    fn internal_ram_mirrors_every_0x800() {
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
        bus.write(0x0000, 0x42);
        assert_eq!(bus.read(0x0800), 0x42);
        assert_eq!(bus.read(0x1800), 0x42);
    }

    #[test]
    fn oam_dma_copies_256_bytes_and_raises_pause() {
        let mut ram = [0u8; cpu_mem::INTERNAL_RAM_SIZE];
        for (i, byte) in ram.iter_mut().enumerate().take(256) {
            *byte = i as u8;
        }
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
        bus.write(cpu_mem::OAM_DMA, 0x00);
        assert!(bus.interrupts.dma_pause_pending());
    }

    #[test]
    fn controller_strobe_routes_through_4016() {
        let mut ram = [0u8; cpu_mem::INTERNAL_RAM_SIZE];
        let mut ppu = Ppu::new();
        let mut cart = nrom_cartridge();
        let mut controllers = [Controller::new(), Controller::new()];
        controllers[0].set_state(0x01);
        let mut interrupts = InterruptBus::new();
        let mut bus = CpuBus {
            ram: &mut ram,
            ppu: &mut ppu,
            cartridge: &mut cart,
            controllers: &mut controllers,
            interrupts: &mut interrupts,
            cpu_cycle: 0,
        };
        bus.write(cpu_mem::CONTROLLER_PORT_1, 1);
        bus.write(cpu_mem::CONTROLLER_PORT_1, 0);
        assert_eq!(bus.read(cpu_mem::CONTROLLER_PORT_1) & 1, 1);
    }
}
