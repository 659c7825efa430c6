//! Value change dump export of a bench trace.

use std::io::Write;

use crate::trace::TraceEntry;
use crate::word::Width;
use crate::{Error, Result};

const SCALARS: [(&str, char); 4] = [("csn", '!'), ("sck", '"'), ("sdi", '#'), ("sdo", '$')];
const VECTORS: [(&str, char); 2] = [("din", '%'), ("dout", '&')];

fn scalars(e: &TraceEntry) -> [bool; 4] {
    [e.select_n, e.clock, e.data_in, e.data_out]
}

fn vectors(e: &TraceEntry) -> [u64; 2] {
    [e.received, e.to_send]
}

/// Writes `entries` as VCD with one timestep per tick of a `sample_rate_hz` clock.
pub fn write_vcd<'a, W, I>(mut w: W, entries: I, width: Width, sample_rate_hz: f64) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a TraceEntry>,
{
    if !sample_rate_hz.is_finite() || sample_rate_hz <= 0.0 {
        return Err(Error::InvalidSampleRate(sample_rate_hz));
    }
    let period_ps = (1e12 / sample_rate_hz).round().max(1.0) as u64;

    writeln!(w, "$timescale 1 ps $end")?;
    writeln!(w, "$scope module spi_periph $end")?;
    for (name, id) in SCALARS {
        writeln!(w, "$var wire 1 {id} {name} $end")?;
    }
    for (name, id) in VECTORS {
        writeln!(w, "$var reg {} {id} {name} $end", width.bits())?;
    }
    writeln!(w, "$upscope $end")?;
    writeln!(w, "$enddefinitions $end")?;

    let mut prev: Option<&TraceEntry> = None;
    for entry in entries {
        let s = scalars(entry);
        let v = vectors(entry);
        let ps = prev.map(scalars);
        let pv = prev.map(vectors);

        let changed = match (ps, pv) {
            (Some(ps), Some(pv)) => ps != s || pv != v,
            _ => true,
        };
        if !changed {
            continue;
        }

        writeln!(w, "#{}", entry.tick.saturating_mul(period_ps))?;
        for (i, (_, id)) in SCALARS.iter().enumerate() {
            if ps.map_or(true, |p| p[i] != s[i]) {
                writeln!(w, "{}{id}", s[i] as u8)?;
            }
        }
        for (i, (_, id)) in VECTORS.iter().enumerate() {
            if pv.map_or(true, |p| p[i] != v[i]) {
                writeln!(w, "b{:b} {id}", v[i])?;
            }
        }
        prev = Some(entry);
    }

    Ok(())
}
