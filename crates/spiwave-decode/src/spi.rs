//! SPI Mode 0 decoder over oversampled line levels.

use serde::Serialize;

use crate::{SampleRate, TimeSpan};

/// Line levels at one sample point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sample {
    pub select_n: bool,
    pub clock: bool,
    pub mosi: bool,
    pub miso: bool,
}

/// Words seen during one select assertion, MSB first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpiFrame {
    pub cpol: bool,
    pub cpha: bool,
    pub span: TimeSpan,
    pub mosi: Vec<u64>,
    pub miso: Vec<u64>,
    /// Bits clocked after the last complete word.
    pub trailing_bits: u32,
}

struct Partial {
    start: usize,
    mosi: Vec<u64>,
    miso: Vec<u64>,
    mosi_word: u64,
    miso_word: u64,
    bits: u32,
}

impl Partial {
    fn new(start: usize) -> Self {
        Self {
            start,
            mosi: Vec::new(),
            miso: Vec::new(),
            mosi_word: 0,
            miso_word: 0,
            bits: 0,
        }
    }

    fn finish(self, end: usize, rate: SampleRate) -> SpiFrame {
        SpiFrame {
            cpol: false,
            cpha: false,
            span: TimeSpan {
                start_s: rate.seconds(self.start),
                end_s: rate.seconds(end),
            },
            mosi: self.mosi,
            miso: self.miso,
            trailing_bits: self.bits,
        }
    }
}

/// Splits `samples` into frames at select edges and shifts in both data lines
/// on every rising clock edge while selected, emitting a word per `bits` bits.
///
/// An edge is taken from consecutive samples, so the clock must be sampled at
/// least twice per level to be seen.
pub fn decode_mode0(samples: &[Sample], rate: SampleRate, bits: u32) -> Vec<SpiFrame> {
    let bits = bits.clamp(1, 64);
    let mut frames = Vec::new();
    let mut current: Option<Partial> = None;
    let mut last_clock = false;

    for (i, s) in samples.iter().enumerate() {
        let rose = s.clock && !last_clock;
        last_clock = s.clock;

        if s.select_n {
            if let Some(partial) = current.take() {
                frames.push(partial.finish(i, rate));
            }
            continue;
        }

        let partial = current.get_or_insert_with(|| Partial::new(i));
        if rose {
            partial.mosi_word = (partial.mosi_word << 1) | s.mosi as u64;
            partial.miso_word = (partial.miso_word << 1) | s.miso as u64;
            partial.bits += 1;
            if partial.bits == bits {
                partial.mosi.push(partial.mosi_word);
                partial.miso.push(partial.miso_word);
                partial.mosi_word = 0;
                partial.miso_word = 0;
                partial.bits = 0;
            }
        }
    }

    if let Some(partial) = current.take() {
        frames.push(partial.finish(samples.len(), rate));
    }
    frames
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock_out(samples: &mut Vec<Sample>, mosi: u64, miso: u64, bits: u32) {
        for i in (0..bits).rev() {
            let m = (mosi >> i) & 1 == 1;
            let s = (miso >> i) & 1 == 1;
            for clock in [true, true, false, false] {
                samples.push(Sample { select_n: false, clock, mosi: m, miso: s });
            }
        }
    }

    fn idle(samples: &mut Vec<Sample>, n: usize) {
        for _ in 0..n {
            samples.push(Sample { select_n: true, ..Default::default() });
        }
    }

    #[test]
    fn decodes_two_frames() {
        let mut samples = Vec::new();
        idle(&mut samples, 2);
        clock_out(&mut samples, 0x55, 0xAB, 8);
        idle(&mut samples, 3);
        clock_out(&mut samples, 0x12, 0x34, 8);
        clock_out(&mut samples, 0x56, 0x78, 8);
        idle(&mut samples, 1);

        let frames = decode_mode0(&samples, SampleRate(10.0), 8);
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].mosi, [0x55]);
        assert_eq!(frames[0].miso, [0xAB]);
        assert_eq!(frames[0].span, TimeSpan { start_s: 0.2, end_s: 3.4 });
        assert_eq!(frames[1].mosi, [0x12, 0x56]);
        assert_eq!(frames[1].miso, [0x34, 0x78]);
        assert_eq!(frames[1].trailing_bits, 0);
    }

    #[test]
    fn reports_trailing_bits_and_unterminated_frame() {
        let mut samples = Vec::new();
        clock_out(&mut samples, 0b101, 0, 3);

        let frames = decode_mode0(&samples, SampleRate(1.0), 8);
        assert_eq!(frames.len(), 1);
        assert!(frames[0].mosi.is_empty());
        assert_eq!(frames[0].trailing_bits, 3);
        assert_eq!(frames[0].span.end_s, 12.0);
    }

    #[test]
    fn edge_before_select_is_ignored() {
        let samples = [
            Sample { select_n: true, clock: true, mosi: true, miso: true },
            Sample { select_n: false, clock: true, mosi: true, miso: true },
            Sample { select_n: false, clock: false, mosi: true, miso: true },
        ];
        let frames = decode_mode0(&samples, SampleRate(1.0), 1);
        assert_eq!(frames.len(), 1);
        assert!(frames[0].mosi.is_empty());
        assert_eq!(frames[0].trailing_bits, 0);
    }

    #[test]
    fn frame_serializes() {
        let frame = SpiFrame {
            cpol: false,
            cpha: false,
            span: TimeSpan { start_s: 0.0, end_s: 1.0 },
            mosi: vec![0x55],
            miso: vec![0xAB],
            trailing_bits: 0,
        };
        let json = serde_json::to_value(&frame).unwrap();
        assert_eq!(json["miso"][0], 0xAB);
        assert_eq!(json["span"]["end_s"], 1.0);
    }
}
