use crossbeam_channel::{unbounded, Receiver, Sender};
use log::debug;
use parking_lot::Mutex;
use std::sync::Arc;

use crate::bench::Bench;
use crate::config::BenchConfig;
use crate::driver::{Controller, Exchange};
use crate::periph::Lines;
use crate::trace::TraceStore;
use crate::{Error, Result};

#[derive(Debug, Clone)]
pub enum BenchEvent {
    Exchanged(Exchange),
    Stepped { tick: u64, data_out: bool, received: u64 },
    Closed,
}

enum Command {
    Exchange { mosi: u64, reply: u64 },
    SetLines(Lines),
    Step(u32),
    Close,
}

/// Runs a [`Bench`] on its own thread.
///
/// The worker is the only thing that ticks the peripheral, so register reads
/// and loads requested through the service never interleave with a commit.
pub struct BenchService {
    cfg: BenchConfig,
    tx_cmd: Sender<Command>,
    rx_evt: Receiver<BenchEvent>,
    trace: Arc<Mutex<TraceStore>>,
}

impl BenchService {
    pub fn spawn(cfg: BenchConfig) -> Result<Self> {
        cfg.validate()?;
        let controller = Controller::new(cfg.ticks_per_half_period)?;
        let (tx_cmd, rx_cmd) = unbounded::<Command>();
        let (tx_evt, rx_evt) = unbounded::<BenchEvent>();
        let trace = Arc::new(Mutex::new(TraceStore::new(cfg.trace_depth)));
        let shared = trace.clone();
        let width = cfg.width;
        let depth = cfg.trace_depth;

        std::thread::spawn(move || {
            debug!("bench worker started, width {}", width.bits());
            let mut bench = Bench::new(width).with_trace(depth);

            for cmd in rx_cmd.iter() {
                match cmd {
                    Command::Exchange { mosi, reply } => {
                        let x = controller.exchange(&mut bench, mosi, reply);
                        let _ = tx_evt.send(BenchEvent::Exchanged(x));
                    }
                    Command::SetLines(lines) => bench.set_lines(lines),
                    Command::Step(n) => {
                        bench.step_by(n);
                        let _ = tx_evt.send(BenchEvent::Stepped {
                            tick: bench.tick_count(),
                            data_out: bench.data_out(),
                            received: bench.periph().received(),
                        });
                    }
                    Command::Close => break,
                }
                if let Some(local) = bench.trace_mut() {
                    let mut store = shared.lock();
                    for entry in local.drain() {
                        store.push(entry);
                    }
                }
            }

            debug!("bench worker stopped after {} ticks", bench.tick_count());
            let _ = tx_evt.send(BenchEvent::Closed);
        });

        Ok(Self { cfg, tx_cmd, rx_evt, trace })
    }

    pub fn exchange(&self, mosi: u64, reply: u64) -> Result<()> {
        self.send(Command::Exchange { mosi, reply })
    }

    pub fn set_lines(&self, lines: Lines) -> Result<()> {
        self.send(Command::SetLines(lines))
    }

    pub fn step(&self, ticks: u32) -> Result<()> {
        self.send(Command::Step(ticks))
    }

    pub fn close(&self) {
        let _ = self.tx_cmd.send(Command::Close);
    }

    pub fn events(&self) -> &Receiver<BenchEvent> {
        &self.rx_evt
    }

    pub fn trace(&self) -> &Arc<Mutex<TraceStore>> {
        &self.trace
    }

    pub fn config(&self) -> &BenchConfig { &self.cfg }

    fn send(&self, cmd: Command) -> Result<()> {
        self.tx_cmd.send(cmd).map_err(|_| Error::ServiceClosed)
    }
}

impl Drop for BenchService {
    fn drop(&mut self) {
        self.close();
    }
}
