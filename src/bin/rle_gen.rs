//! Generate sample hybrid RLE / bit-packed streams.

use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rlebp::Encoder;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rle-gen")]
#[command(about = "Generate a random RLE / bit-packing hybrid stream")]
#[command(after_help = "OUTPUT:\n  \
    The file holds the raw stream only. Decode it with the same --bit-width\n  \
    and --count, e.g. `rle-inspect <file> --bit-width W --values N`.")]
struct Args {
    /// Output file path
    output: PathBuf,

    /// Bits per value (1-32)
    #[arg(short, long, default_value = "3")]
    bit_width: u32,

    /// Number of values to generate
    #[arg(short, long, default_value = "1024")]
    count: usize,

    /// Percent chance (0-100) that a new segment is a long repeat
    #[arg(long, default_value = "30")]
    repeat_bias: u32,

    /// Seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,
}

/// Generate values alternating between repeats and noise
fn generate_values(args: &Args, rng: &mut impl Rng) -> Vec<u32> {
    let max = if args.bit_width >= 32 {
        u32::MAX
    } else {
        (1u32 << args.bit_width) - 1
    };
    let mut values = Vec::with_capacity(args.count);

    while values.len() < args.count {
        let left = args.count - values.len();
        if rng.random_range(0..100) < args.repeat_bias {
            let len = rng.random_range(8..=64).min(left);
            let v = rng.random_range(0..=max);
            values.extend(std::iter::repeat_n(v, len));
        } else {
            let len = rng.random_range(1..=24).min(left);
            values.extend((0..len).map(|_| rng.random_range(0..=max)));
        }
    }

    values
}

#[allow(clippy::cast_precision_loss)]
fn main() {
    let args = Args::parse();

    let mut enc = match Encoder::try_new(args.bit_width) {
        Ok(enc) => enc,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    };
    let values = generate_values(&args, &mut rng);

    // Values are masked to the bit width, so put() cannot fail
    if let Err(e) = enc.extend(values.iter().copied()) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
    let bytes = enc.finish();

    let result = File::create(&args.output).and_then(|mut file| file.write_all(&bytes));
    if let Err(e) = result {
        eprintln!("Error: failed to write {}: {e}", args.output.display());
        std::process::exit(1);
    }

    println!("Generated {} values at bit width {}", values.len(), args.bit_width);
    println!("Output: {} ({} bytes)", args.output.display(), bytes.len());
    let raw = values.len() * 4;
    if !bytes.is_empty() {
        println!("Compression vs i32: {:.1}x", raw as f64 / bytes.len() as f64);
    }
}
