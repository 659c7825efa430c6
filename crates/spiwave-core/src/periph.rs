use log::trace;

use crate::edge::{EdgeDetector, Edges};
use crate::gate::{gate, Gated};
use crate::shift::{RxRegister, TxRegister};
use crate::word::Width;

/// Line levels driven by the controller for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lines {
    /// Chip select, active-low.
    pub select_n: bool,
    pub clock: bool,
    pub data_in: bool,
}

impl Default for Lines {
    fn default() -> Self {
        Self {
            select_n: true,
            clock: false,
            data_in: false,
        }
    }
}

/// What one tick saw and did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    pub edges: Edges,
    pub gated: Gated,
    /// Output level exposed during the tick, before the commit.
    pub data_out: bool,
}

/// SPI Mode 0 peripheral that recovers SCK by oversampling it.
///
/// There is no transfer-complete flag. The owner decides when a word is done
/// by counting clock cycles between select assertions and reads
/// [`received`](Self::received) after deasserting select.
#[derive(Debug, Clone)]
pub struct SpiPeriph {
    width: Width,
    sck: EdgeDetector,
    rx: RxRegister,
    tx: TxRegister,
}

impl SpiPeriph {
    pub fn new(width: Width) -> Self {
        Self {
            width,
            sck: EdgeDetector::new(),
            rx: RxRegister::new(width),
            tx: TxRegister::new(width),
        }
    }

    /// Advances one internal tick.
    pub fn tick(&mut self, lines: Lines) -> TickReport {
        let data_out = self.data_out();
        let edges = self.sck.sample(lines.clock);
        let gated = gate(lines.select_n, edges);

        if gated.capture {
            self.rx.capture(lines.data_in);
            trace!("captured {} -> {:#x}", lines.data_in as u8, self.rx.value());
        }
        if gated.shift {
            self.tx.rotate();
            trace!("rotated -> {:#x}", self.tx.value());
        }

        TickReport { edges, gated, data_out }
    }

    pub fn data_out(&self) -> bool {
        self.tx.top_bit()
    }

    pub fn received(&self) -> u64 {
        self.rx.value()
    }

    pub fn to_send(&self) -> u64 {
        self.tx.value()
    }

    /// Overwrites the transmit register, including mid-transfer.
    pub fn load(&mut self, value: u64) {
        self.tx.load(value);
    }

    pub fn width(&self) -> Width {
        self.width
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(select_n: bool, clock: bool, data_in: bool) -> Lines {
        Lines { select_n, clock, data_in }
    }

    #[test]
    fn idle_ignores_clock_activity() {
        let mut p = SpiPeriph::new(Width::BYTE);
        p.load(0xC3);

        for i in 0..64 {
            let r = p.tick(lines(true, i % 3 == 0, i % 2 == 0));
            assert_eq!(r.gated, Gated::default());
        }
        assert_eq!(p.received(), 0);
        assert_eq!(p.to_send(), 0xC3);
    }

    #[test]
    fn one_capture_and_one_shift_per_cycle() {
        let mut p = SpiPeriph::new(Width::BYTE);
        p.load(0x80);

        let mut captures = 0;
        let mut shifts = 0;
        let wave = [false, true, true, true, false, false, false];
        for (i, &clk) in wave.iter().enumerate() {
            let r = p.tick(lines(false, clk, true));
            captures += r.gated.capture as u32;
            shifts += r.gated.shift as u32;
            if r.gated.capture {
                assert_eq!(i, 1);
            }
            if r.gated.shift {
                assert_eq!(i, 4);
            }
            assert!(!(r.gated.capture && r.gated.shift));
        }
        assert_eq!((captures, shifts), (1, 1));
        assert_eq!(p.received(), 1);
        assert_eq!(p.to_send(), 0x01);
    }

    #[test]
    fn edge_seen_while_deselected_is_not_replayed() {
        let mut p = SpiPeriph::new(Width::BYTE);
        p.tick(lines(true, false, true));
        // rising edge lands while select is still high
        let r = p.tick(lines(true, true, true));
        assert!(r.edges.rose);
        assert!(!r.gated.capture);
        // select asserts with clock already high
        let r = p.tick(lines(false, true, true));
        assert!(!r.edges.rose);
        assert!(!r.gated.capture);
        assert_eq!(p.received(), 0);
    }

    #[test]
    fn data_out_follows_top_bit_while_deselected() {
        let mut p = SpiPeriph::new(Width::BYTE);
        assert!(!p.data_out());
        p.load(0x80);
        assert!(p.data_out());
        let r = p.tick(Lines::default());
        assert!(r.data_out);
    }

    #[test]
    fn load_mid_transfer_overwrites() {
        let mut p = SpiPeriph::new(Width::BYTE);
        p.load(0xFF);
        p.tick(lines(false, true, false));
        p.tick(lines(false, false, false));
        assert_eq!(p.to_send(), 0xFF);
        p.load(0x01);
        assert!(!p.data_out());
        p.tick(lines(false, true, false));
        p.tick(lines(false, false, false));
        assert_eq!(p.to_send(), 0x02);
    }
}
