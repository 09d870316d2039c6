//! The system runner: owns every hardware component and drives them at the
//! fixed 1 CPU cycle : 3 PPU dot ratio real hardware runs at.
//!
//! Host concerns live entirely behind two small traits, [`InputSource`] and
//! [`FrameSink`]; this crate never touches a window or a gamepad driver
//! itself.

use crate::cartridge::Cartridge;
use crate::config::Config;
use crate::controller::Controller;
use crate::cpu::status::Status;
use crate::cpu::Cpu;
use crate::error::RuntimeError;
use crate::interrupt_bus::InterruptBus;
use crate::memory::cpu as cpu_mem;
use crate::memory::ppu as ppu_mem;
use crate::ppu::Ppu;
use crate::bus::CpuBus;

/// Polled once per frame for the live button state of each controller port.
/// Bit order matches [`crate::controller::Button`] (A is bit 0).
pub trait InputSource {
    fn poll(&mut self, port: usize) -> u8;
}

/// Receives one completed frame, as 8-bit indices into the active palette.
/// See [`System::palette`] to resolve indices to RGB.
pub trait FrameSink {
    fn present_frame(&mut self, frame: &[u8; ppu_mem::FRAME_WIDTH * ppu_mem::FRAME_HEIGHT]);
}

/// Owns the CPU, PPU, cartridge, controllers, and interrupt latch, and
/// drives them one frame at a time.
pub struct System {
    cpu: Cpu,
    ppu: Ppu,
    cartridge: Cartridge,
    controllers: [Controller; 2],
    interrupts: InterruptBus,
    ram: [u8; cpu_mem::INTERNAL_RAM_SIZE],
    config: Config,
}

impl System {
    /// Builds a system around a loaded cartridge and runs the CPU reset
    /// sequence immediately.
    pub fn new(cartridge: Cartridge, config: Config) -> Self {
        let mut system = Self {
            cpu: Cpu::new(),
            ppu: Ppu::new(),
            cartridge,
            controllers: [Controller::new(), Controller::new()],
            interrupts: InterruptBus::new(),
            ram: [0; cpu_mem::INTERNAL_RAM_SIZE],
            config,
        };
        {
            let mut bus = CpuBus {
                ram: &mut system.ram,
                ppu: &mut system.ppu,
                cartridge: &mut system.cartridge,
                controllers: &mut system.controllers,
                interrupts: &mut system.interrupts,
                cpu_cycle: 0,
            };
            system.cpu.reset(&mut bus);
        }
        system
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    pub fn cartridge(&self) -> &Cartridge {
        &self.cartridge
    }

    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    pub fn ppu(&self) -> &Ppu {
        &self.ppu
    }

    /// The 64-entry RGB palette in effect, per [`Config::palette`].
    pub fn palette(&self) -> &[[u8; 3]; 64] {
        match &self.config.palette {
            crate::config::PaletteSource::BuiltIn => &crate::ppu::palette::DEFAULT_PALETTE,
            crate::config::PaletteSource::Custom(table) => table,
        }
    }

    /// Re-runs the CPU reset sequence without disturbing PPU/cartridge state.
    pub fn reset(&mut self) {
        let mut bus = CpuBus {
            ram: &mut self.ram,
            ppu: &mut self.ppu,
            cartridge: &mut self.cartridge,
            controllers: &mut self.controllers,
            interrupts: &mut self.interrupts,
            cpu_cycle: self.cpu.cycles,
        };
        self.cpu.reset(&mut bus);
    }

    /// Runs CPU/PPU until a frame completes: services pending NMI, then
    /// cartridge IRQ, then a pending OAM DMA stall, else steps one
    /// instruction; advances the PPU by 3 dots per CPU cycle consumed.
    /// Polls input and presents the frame once it completes.
    ///
    /// Returns `Err` only when `Config::strict_stack` turns a stack
    /// under/overflow fatal, or the CPU executes a `JAM`/`KIL` opcode.
    pub fn run_frame(
        &mut self,
        input: &mut impl InputSource,
        sink: &mut impl FrameSink,
    ) -> Result<(), RuntimeError> {
        let config = self.config.clone();
        loop {
            let cycles = {
                let cpu_cycle = self.cpu.cycles;
                let mut bus = CpuBus {
                    ram: &mut self.ram,
                    ppu: &mut self.ppu,
                    cartridge: &mut self.cartridge,
                    controllers: &mut self.controllers,
                    interrupts: &mut self.interrupts,
                    cpu_cycle,
                };
                if bus.interrupts.nmi_pending() {
                    let taken = self.cpu.service_nmi(&mut bus, &config)?;
                    bus.interrupts.clear_nmi();
                    taken
                } else if bus.cartridge.irq_pending() && !self.cpu.status.contains(Status::INTERRUPT) {
                    self.cpu.service_irq(&mut bus, &config)?
                } else if bus.interrupts.dma_pause_pending() {
                    let taken = self.cpu.dma_stall();
                    bus.interrupts.clear_dma_pause();
                    taken
                } else {
                    self.cpu.step(&mut bus, &config)?
                }
            };

            let frame_complete = self
                .ppu
                .advance(cycles as u32 * 3, &mut self.cartridge, &mut self.interrupts);
            if frame_complete {
                break;
            }
        }

        for port in 0..self.controllers.len() {
            let state = input.poll(port);
            self.controllers[port].set_state(state);
        }
        sink.present_frame(self.ppu.frame_buffer());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nrom_cartridge_with_reset_vector(addr: u16) -> Cartridge {
        let mut prg = vec![0u8; 0x4000];
        let [lo, hi] = addr.to_le_bytes();
        prg[0x3FFC] = lo;
        prg[0x3FFD] = hi;
        let mut bytes = vec![0u8; 16];
        bytes[0..4].copy_from_slice(b"NES\x1A");
        bytes[4] = 1;
        bytes[5] = 1;
        bytes.extend(prg);
        bytes.extend(vec![0u8; 0x2000]);
        Cartridge::from_ines(&bytes).unwrap()
    }

    struct NullInput;
    impl InputSource for NullInput {
        fn poll(&mut self, _port: usize) -> u8 {
            0
        }
    }

    struct CountingSink {
        frames: u32,
    }
    impl FrameSink for CountingSink {
        fn present_frame(&mut self, _frame: &[u8; ppu_mem::FRAME_WIDTH * ppu_mem::FRAME_HEIGHT]) {
            self.frames += 1;
        }
    }

    #[test]
    fn new_system_runs_reset_sequence() {
        let cart = nrom_cartridge_with_reset_vector(0x8000);
        let system = System::new(cart, Config::default());
        assert_eq!(system.cpu().pc, 0x8000);
    }

    #[test]
    fn run_frame_presents_exactly_one_frame() {
        let cart = nrom_cartridge_with_reset_vector(cpu_mem::PRG_ROM_START);
        let mut system = System::new(cart, Config::default());
        let mut input = NullInput;
        let mut sink = CountingSink { frames: 0 };
        system.run_frame(&mut input, &mut sink).unwrap();
        assert_eq!(sink.frames, 1);
    }

    #[test]
    fn run_frame_halts_on_jam() {
        let mut prg = vec![0u8; 0x4000];
        prg[0] = 0x02; // JAM
        let mut bytes = vec![0u8; 16];
        bytes[0..4].copy_from_slice(b"NES\x1A");
        bytes[4] = 1;
        bytes[5] = 1;
        bytes.extend(prg);
        bytes.extend(vec![0u8; 0x2000]);
        let cart = Cartridge::from_ines(&bytes).unwrap();
        let mut system = System::new(cart, Config::default());
        let mut input = NullInput;
        let mut sink = CountingSink { frames: 0 };
        let err = system.run_frame(&mut input, &mut sink).unwrap_err();
        assert!(matches!(err, RuntimeError::CpuHalted { .. }));
    }
}
