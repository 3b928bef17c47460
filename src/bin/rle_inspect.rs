//! Inspect the runs of a hybrid RLE / bit-packed stream.
//!
//! Lists every run with its offset, type and size, and optionally decodes
//! the first N values.

use clap::Parser;
use log::{Level, LevelFilter, Log, Metadata, Record};
use rlebp::{runs, Decoder, RunHeader, Runs};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rle-inspect")]
#[command(about = "List the runs of an RLE / bit-packing hybrid stream")]
struct Args {
    /// File holding the raw stream
    input: PathBuf,

    /// Bits per value (1-32)
    #[arg(short, long)]
    bit_width: u32,

    /// Decode and print this many values
    #[arg(short, long)]
    values: Option<usize>,

    /// Skip this many bytes before the stream starts
    #[arg(long, default_value = "0")]
    offset: usize,

    /// Log run headers as they are decoded
    #[arg(long)]
    verbose: bool,
}

struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let level = match record.level() {
                Level::Error => "ERROR",
                Level::Warn => "WARN",
                Level::Info => "INFO",
                Level::Debug => "DEBUG",
                Level::Trace => "TRACE",
            };
            eprintln!("{level}: {}", record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn print_runs(spans: Runs<'_>, total_bytes: usize) -> bool {
    println!("{:>10}  {:<10}  {:>12}  {:>10}", "offset", "kind", "values", "bytes");
    let mut total_values = 0u64;
    let mut run_count = 0usize;

    for span in spans {
        let span = match span {
            Ok(span) => span,
            Err(e) => {
                eprintln!("Error: {e}");
                return false;
            }
        };
        let detail = match span.header {
            RunHeader::Rle { .. } => {
                let mut le = [0u8; 4];
                le[..span.payload.len()].copy_from_slice(span.payload);
                format!("value={}", u32::from_le_bytes(le))
            }
            RunHeader::BitPacked { groups } => format!("groups={groups}"),
        };
        println!(
            "{:>10}  {:<10}  {:>12}  {:>10}  {detail}",
            span.offset,
            span.header.kind().to_string(),
            span.header.value_count(),
            span.header_len + span.payload.len(),
        );
        total_values += span.header.value_count();
        run_count += 1;
    }

    println!();
    println!("{run_count} runs, {total_values} values (including padding), {total_bytes} bytes");
    true
}

fn print_values(buf: &[u8], bit_width: u32, count: usize) -> bool {
    let mut dec = Decoder::new(bit_width);
    dec.init(buf);
    let mut values = vec![0; count];
    let decoded = dec.next_batch(&mut values).unwrap_or(0);
    for (i, chunk) in values[..decoded].chunks(16).enumerate() {
        let line: Vec<String> = chunk.iter().map(|v| v.cast_unsigned().to_string()).collect();
        println!("{:>8}: {}", i * 16, line.join(" "));
    }
    if decoded == count {
        return true;
    }
    // A short batch leaves the failing read to be repeated
    if let Err(e) = dec.next() {
        eprintln!("Error after {decoded} values ({} bytes): {e}", dec.position());
    }
    false
}

fn main() {
    let args = Args::parse();

    if args.verbose && log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Trace);
    }

    let data = match std::fs::read(&args.input) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("Error: failed to read {}: {e}", args.input.display());
            std::process::exit(1);
        }
    };
    let Some(buf) = data.get(args.offset..) else {
        eprintln!("Error: offset {} is past the end of the file ({} bytes)", args.offset, data.len());
        std::process::exit(1);
    };

    let spans = match runs(buf, args.bit_width) {
        Ok(spans) => spans,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let mut ok = print_runs(spans, buf.len());
    if let Some(count) = args.values {
        println!();
        ok &= print_values(buf, args.bit_width, count);
    }

    if !ok {
        std::process::exit(2);
    }
}
