//! Oversampled SPI Mode 0 peripheral: edge recovery, shift registers, bench and tracing.

pub mod bench;
pub mod config;
pub mod driver;
pub mod edge;
pub mod error;
pub mod gate;
pub mod periph;
pub mod radix;
pub mod service;
pub mod shift;
pub mod trace;
pub mod vcd;
pub mod word;

pub use bench::Bench;
pub use config::BenchConfig;
pub use driver::{Controller, Exchange};
pub use error::{Error, Result};
pub use periph::{Lines, SpiPeriph, TickReport};
pub use radix::Radix;
pub use service::{BenchEvent, BenchService};
pub use trace::{TraceEntry, TraceStore};
pub use vcd::write_vcd;
pub use word::Width;
