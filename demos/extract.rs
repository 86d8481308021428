#![deny(unsafe_code, unsafe_op_in_unsafe_fn)]
#![warn(
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::todo,
    clippy::unimplemented,
    clippy::unneeded_field_pattern,
    clippy::rest_pat_in_fully_bound_structs,
    clippy::unnecessary_self_imports,
    clippy::str_to_string,
    clippy::string_to_string,
    clippy::string_slice
)]

use std::{fmt::Display, path::PathBuf};

use clap::{Parser, ValueEnum};
use swatchify::{
    format::ColorFormat, palette_from_path, ImageCache, KmeansOptions, PaletteSize, SampleOptions,
};

#[derive(Copy, Clone, ValueEnum)]
enum CliColorFormat {
    Hex,
    Rgb,
    Hsl,
}

impl From<CliColorFormat> for ColorFormat {
    fn from(value: CliColorFormat) -> Self {
        match value {
            CliColorFormat::Hex => ColorFormat::Hex,
            CliColorFormat::Rgb => ColorFormat::Rgb,
            CliColorFormat::Hsl => ColorFormat::Hsl,
        }
    }
}

impl Display for CliColorFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", ColorFormat::from(*self))
    }
}

#[derive(Parser)]
pub struct Options {
    #[arg(short, long, default_value_t = PaletteSize::default(), value_parser = parse_palette_size)]
    k: PaletteSize,

    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, default_value_t = SampleOptions::DEFAULT_STRIDE)]
    stride: u32,

    #[arg(long, default_value_t = SampleOptions::DEFAULT_MAX_EDGE)]
    max_edge: u32,

    #[arg(short, long, default_value_t = CliColorFormat::Hex)]
    format: CliColorFormat,

    /// Also extract the palette for these additional color counts, reusing the decoded image.
    #[arg(long, value_parser = parse_palette_size)]
    again: Vec<PaletteSize>,

    #[arg(long)]
    verbose: bool,

    input: PathBuf,
}

fn parse_palette_size(s: &str) -> Result<PaletteSize, String> {
    let value: u16 = s.parse().map_err(|e| format!("{e}"))?;
    value.try_into().map_err(|e| format!("{e}"))
}

fn main() {
    let Options {
        k,
        seed,
        stride,
        max_edge,
        format,
        again,
        verbose,
        input,
    } = Options::parse();

    macro_rules! log {
        ($name: literal, $val: expr) => {
            if verbose {
                let time = std::time::Instant::now();
                let value = $val;
                println!("{} took {}ms", $name, time.elapsed().as_millis());
                value
            } else {
                $val
            }
        };
    }

    let sample_options = SampleOptions::new().stride(stride).max_edge(max_edge);
    let kmeans_options = match seed {
        Some(seed) => KmeansOptions::new().seed(seed),
        None => KmeansOptions::new(),
    };
    let format = ColorFormat::from(format);

    let mut cache = ImageCache::new();

    for k in std::iter::once(k).chain(again) {
        let palette = log!(
            "palette extraction",
            palette_from_path(&mut cache, &input, k, &sample_options, &kmeans_options).unwrap()
        );

        println!("{k} colors:");
        for (&color, count) in palette.colors.iter().zip(&palette.counts) {
            println!("  {} ({count})", format.format(color));
        }
    }
}
