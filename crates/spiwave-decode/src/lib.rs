pub mod spi;

use serde::Serialize;

pub use spi::{decode_mode0, Sample, SpiFrame};

#[derive(Debug, Clone, Copy)]
pub struct SampleRate(pub f64); // Hz

impl SampleRate {
    pub fn seconds(&self, index: usize) -> f64 {
        index as f64 / self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimeSpan {
    pub start_s: f64,
    pub end_s: f64,
}
