use anyhow::{bail, Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use log::{debug, info};
use spiwave_core::{BenchConfig, BenchEvent, BenchService, Radix, TraceEntry, Width};
use spiwave_decode::{decode_mode0, Sample, SampleRate};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::time::Duration;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = cli().get_matches();
    let config = load_config(&matches)?;
    debug!("config: {config:?}");

    let mosi = word_arg(&matches, "mosi", config.width)?;
    let miso = word_arg(&matches, "miso", config.width)?;
    if mosi.is_empty() {
        bail!("nothing to send, pass --mosi");
    }

    let service = BenchService::spawn(config.clone())?;
    for (i, &word) in mosi.iter().enumerate() {
        service.exchange(word, miso.get(i).copied().unwrap_or(0))?;
    }

    let mut exchanges = Vec::new();
    while exchanges.len() < mosi.len() {
        match service.events().recv_timeout(Duration::from_secs(10)) {
            Ok(BenchEvent::Exchanged(x)) => exchanges.push(x),
            Ok(BenchEvent::Closed) => bail!("bench closed early"),
            Ok(_) => {}
            Err(e) => return Err(e).context("waiting for bench"),
        }
    }
    service.close();
    while let Ok(event) = service.events().recv_timeout(Duration::from_secs(10)) {
        if matches!(event, BenchEvent::Closed) {
            break;
        }
    }

    let radix: Radix = matches
        .get_one::<String>("radix")
        .map(|s| s.parse().unwrap_or(Radix::Hex))
        .unwrap_or(Radix::Hex);
    let width = config.width;
    for x in &exchanges {
        println!(
            "mosi {} -> peripheral {} | miso {}",
            radix.format(x.sent, width),
            radix.format(x.periph_received, width),
            radix.format(x.controller_received, width),
        );
    }

    if width.bits() <= 8 {
        let received: Vec<u8> = exchanges.iter().map(|x| x.periph_received as u8).collect();
        let returned: Vec<u8> = exchanges.iter().map(|x| x.controller_received as u8).collect();
        info!("peripheral received {}", hex::encode_upper(&received));
        info!("controller received {}", hex::encode_upper(&returned));
    }

    let entries: Vec<TraceEntry> = {
        let trace = service.trace().lock();
        if matches.get_flag("dump") {
            print!("{}", trace.to_text(radix, width));
        }
        trace.entries().iter().copied().collect()
    };

    if let Some(path) = matches.get_one::<PathBuf>("vcd") {
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        let mut out = BufWriter::new(file);
        spiwave_core::write_vcd(&mut out, &entries, width, config.sample_rate_hz)?;
        out.flush()?;
        info!("wrote {} ticks to {}", entries.len(), path.display());
    }

    if matches.get_flag("json") {
        let frames = decode_trace(&entries, width, config.sample_rate_hz);
        println!("{}", serde_json::to_string_pretty(&frames)?);
    }

    Ok(())
}

fn cli() -> Command {
    Command::new("spiwave")
        .about("Drive SPI Mode 0 transfers through an oversampled peripheral")
        .arg(
            Arg::new("config")
                .long("config")
                .value_parser(clap::value_parser!(PathBuf))
                .help("JSON bench config, defaults to <config dir>/spiwave/config.json"),
        )
        .arg(
            Arg::new("width")
                .long("width")
                .value_parser(clap::value_parser!(u32))
                .help("Register width in bits"),
        )
        .arg(
            Arg::new("ticks-per-half")
                .long("ticks-per-half")
                .value_parser(clap::value_parser!(u32))
                .help("Sampling ticks per half SCK period"),
        )
        .arg(
            Arg::new("mosi")
                .long("mosi")
                .help("Words the controller sends: hex bytes, or space/comma separated hex words above 8 bits"),
        )
        .arg(
            Arg::new("miso")
                .long("miso")
                .help("Words the peripheral answers with, same format as --mosi"),
        )
        .arg(
            Arg::new("radix")
                .long("radix")
                .help("Output radix: hex, bin or dec"),
        )
        .arg(
            Arg::new("vcd")
                .long("vcd")
                .value_parser(clap::value_parser!(PathBuf))
                .help("Write the tick trace as a VCD file"),
        )
        .arg(
            Arg::new("dump")
                .long("dump")
                .action(ArgAction::SetTrue)
                .help("Print the tick trace"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .action(ArgAction::SetTrue)
                .help("Print decoded frames as JSON"),
        )
}

fn load_config(matches: &ArgMatches) -> Result<BenchConfig> {
    let path = matches
        .get_one::<PathBuf>("config")
        .cloned()
        .or_else(|| {
            dirs::config_dir()
                .map(|d| d.join("spiwave").join("config.json"))
                .filter(|p| p.exists())
        });

    let mut config = match path {
        Some(path) => {
            let file = File::open(&path).with_context(|| format!("opening {}", path.display()))?;
            serde_json::from_reader(file).with_context(|| format!("parsing {}", path.display()))?
        }
        None => BenchConfig::default(),
    };

    if let Some(&bits) = matches.get_one::<u32>("width") {
        config.width = Width::new(bits)?;
    }
    if let Some(&ticks) = matches.get_one::<u32>("ticks-per-half") {
        config.ticks_per_half_period = ticks;
    }
    config.validate()?;
    Ok(config)
}

/// Up to 8 bits wide the argument is a hex byte string, one word per byte.
/// Wider registers take one hex word per space or comma separated token.
fn word_arg(matches: &ArgMatches, name: &str, width: Width) -> Result<Vec<u64>> {
    let Some(s) = matches.get_one::<String>(name) else {
        return Ok(Vec::new());
    };

    let words: Vec<u64> = if width.bits() <= 8 {
        hex::decode(s.replace(' ', ""))
            .with_context(|| format!("--{name} is not hex"))?
            .into_iter()
            .map(u64::from)
            .collect()
    } else {
        s.split(|c: char| c == ',' || c.is_whitespace())
            .filter(|t| !t.is_empty())
            .map(|t| {
                let t = t.trim_start_matches("0x");
                u64::from_str_radix(t, 16).with_context(|| format!("--{name}: {t} is not a hex word"))
            })
            .collect::<Result<_>>()?
    };

    if let Some(&word) = words.iter().find(|&&w| w != width.truncate(w)) {
        bail!("--{name}: {word:#x} does not fit in {} bits", width.bits());
    }
    Ok(words)
}

fn decode_trace(entries: &[TraceEntry], width: Width, sample_rate_hz: f64) -> Vec<spiwave_decode::SpiFrame> {
    let samples: Vec<Sample> = entries
        .iter()
        .map(|e| Sample {
            select_n: e.select_n,
            clock: e.clock,
            mosi: e.data_in,
            miso: e.data_out,
        })
        .collect();
    decode_mode0(&samples, SampleRate(sample_rate_hz), width.bits())
}
