use log::debug;

use crate::bench::Bench;
use crate::{Error, Result};

/// SCK must run at least this many times slower than the sampling clock.
pub const MIN_OVERSAMPLE: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Exchange {
    /// Word shifted out on MOSI.
    pub sent: u64,
    /// Word the peripheral holds in its receive register afterwards.
    pub periph_received: u64,
    /// Word sampled from MISO before each rising edge.
    pub controller_received: u64,
}

/// Mode 0 controller that drives a [`Bench`] one word per select assertion.
///
/// A transfer deasserts select, loads the reply into the peripheral, asserts
/// select, runs `width` clock cycles MSB-first, deasserts select and reads the
/// receive register.
#[derive(Debug, Clone, Copy)]
pub struct Controller {
    ticks_per_half_period: u32,
}

impl Controller {
    pub fn new(ticks_per_half_period: u32) -> Result<Self> {
        let ratio = ticks_per_half_period.saturating_mul(2);
        if ratio < MIN_OVERSAMPLE {
            return Err(Error::Undersampled {
                ratio,
                min: MIN_OVERSAMPLE,
            });
        }
        Ok(Self {
            ticks_per_half_period,
        })
    }

    pub fn ticks_per_half_period(&self) -> u32 {
        self.ticks_per_half_period
    }

    pub fn exchange(&self, bench: &mut Bench, mosi: u64, reply: u64) -> Exchange {
        let width = bench.periph().width();
        let mosi = width.truncate(mosi);

        bench.set_select(false);
        bench.set_clock(false);
        bench.periph_mut().load(reply);
        bench.step_by(2);

        bench.set_select(true);
        bench.step();

        let mut miso = 0u64;
        for i in (0..width.bits()).rev() {
            miso = (miso << 1) | bench.data_out() as u64;
            bench.set_data_in((mosi >> i) & 1 == 1);
            bench.set_clock(true);
            bench.step_by(self.ticks_per_half_period);

            bench.set_clock(false);
            bench.step_by(self.ticks_per_half_period);
        }

        bench.set_select(false);
        bench.step();

        let exchange = Exchange {
            sent: mosi,
            periph_received: bench.periph().received(),
            controller_received: miso,
        };
        debug!(
            "exchange mosi={:#x} periph_rx={:#x} miso={:#x}",
            exchange.sent, exchange.periph_received, exchange.controller_received
        );
        exchange
    }

    /// One exchange per `mosi` word; replies past the end of `replies` are 0.
    pub fn transfer(&self, bench: &mut Bench, mosi: &[u64], replies: &[u64]) -> Vec<Exchange> {
        mosi.iter()
            .enumerate()
            .map(|(i, &word)| {
                let reply = replies.get(i).copied().unwrap_or(0);
                self.exchange(bench, word, reply)
            })
            .collect()
    }
}
