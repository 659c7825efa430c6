use crate::periph::{Lines, SpiPeriph, TickReport};
use crate::trace::{TraceEntry, TraceStore};
use crate::word::Width;

/// Tick source and line driver wrapped around one peripheral.
///
/// Line setters only change what the next [`step`](Self::step) sees; the
/// peripheral itself is touched once per step.
pub struct Bench {
    periph: SpiPeriph,
    lines: Lines,
    ticks: u64,
    trace: Option<TraceStore>,
}

impl Bench {
    pub fn new(width: Width) -> Self {
        Self {
            periph: SpiPeriph::new(width),
            lines: Lines::default(),
            ticks: 0,
            trace: None,
        }
    }

    pub fn with_trace(mut self, max_entries: usize) -> Self {
        self.trace = (max_entries > 0).then(|| TraceStore::new(max_entries));
        self
    }

    pub fn set_select(&mut self, asserted: bool) {
        self.lines.select_n = !asserted;
    }

    pub fn set_clock(&mut self, level: bool) {
        self.lines.clock = level;
    }

    pub fn set_data_in(&mut self, level: bool) {
        self.lines.data_in = level;
    }

    pub fn set_lines(&mut self, lines: Lines) {
        self.lines = lines;
    }

    pub fn lines(&self) -> Lines {
        self.lines
    }

    pub fn step(&mut self) -> TickReport {
        let report = self.periph.tick(self.lines);
        if let Some(trace) = self.trace.as_mut() {
            trace.push(TraceEntry {
                tick: self.ticks,
                select_n: self.lines.select_n,
                clock: self.lines.clock,
                data_in: self.lines.data_in,
                data_out: report.data_out,
                received: self.periph.received(),
                to_send: self.periph.to_send(),
            });
        }
        self.ticks += 1;
        report
    }

    pub fn step_by(&mut self, steps: u32) {
        for _ in 0..steps {
            self.step();
        }
    }

    pub fn data_out(&self) -> bool {
        self.periph.data_out()
    }

    pub fn tick_count(&self) -> u64 {
        self.ticks
    }

    pub fn periph(&self) -> &SpiPeriph {
        &self.periph
    }

    pub fn periph_mut(&mut self) -> &mut SpiPeriph {
        &mut self.periph
    }

    pub fn trace(&self) -> Option<&TraceStore> {
        self.trace.as_ref()
    }

    pub fn trace_mut(&mut self) -> Option<&mut TraceStore> {
        self.trace.as_mut()
    }
}
