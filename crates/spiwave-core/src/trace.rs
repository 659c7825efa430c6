use std::collections::VecDeque;

use log::warn;

use crate::radix::Radix;
use crate::word::Width;

/// Line levels and register contents for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceEntry {
    pub tick: u64,
    pub select_n: bool,
    pub clock: bool,
    pub data_in: bool,
    /// Level exposed on the output line during this tick.
    pub data_out: bool,
    /// Receive register after the tick committed.
    pub received: u64,
    /// Transmit register after the tick committed.
    pub to_send: u64,
}

pub struct TraceStore {
    entries: VecDeque<TraceEntry>,
    max_entries: usize,
    dropped: u64,
}

impl TraceStore {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            max_entries,
            dropped: 0,
        }
    }

    pub fn push(&mut self, entry: TraceEntry) {
        self.entries.push_back(entry);

        if self.entries.len() > self.max_entries {
            self.entries.pop_front();
            if self.dropped == 0 {
                warn!("trace full at {} entries, dropping oldest", self.max_entries);
            }
            self.dropped += 1;
        }
    }

    pub fn entries(&self) -> &VecDeque<TraceEntry> {
        &self.entries
    }

    pub fn drain(&mut self) -> std::collections::vec_deque::Drain<'_, TraceEntry> {
        self.entries.drain(..)
    }

    /// Entries discarded since the store filled up.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.dropped = 0;
    }

    pub fn to_text(&self, radix: Radix, width: Width) -> String {
        let mut result = String::new();
        for entry in &self.entries {
            result.push_str(&format!(
                "{:>8} cs={} sck={} sdi={} sdo={} rx={} tx={}\n",
                entry.tick,
                entry.select_n as u8,
                entry.clock as u8,
                entry.data_in as u8,
                entry.data_out as u8,
                radix.format(entry.received, width),
                radix.format(entry.to_send, width),
            ));
        }
        result
    }
}
