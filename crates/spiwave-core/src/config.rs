use serde::Deserialize;

use crate::word::Width;
use crate::{Error, Result};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BenchConfig {
    pub width: Width,
    /// Internal ticks per half SCK period.
    pub ticks_per_half_period: u32,
    /// Trace entries kept, 0 disables tracing.
    pub trace_depth: usize,
    /// Internal sampling clock, only used to scale exported waveforms.
    pub sample_rate_hz: f64,
}

impl BenchConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.sample_rate_hz.is_finite() || self.sample_rate_hz <= 0.0 {
            return Err(Error::InvalidSampleRate(self.sample_rate_hz));
        }
        Ok(())
    }
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            width: Width::BYTE,
            ticks_per_half_period: 2,
            trace_depth: 100_000,
            sample_rate_hz: 10e6,
        }
    }
}
