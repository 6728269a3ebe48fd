//Enable more cargo lint tests
#![warn(rust_2018_idioms)]
#![warn(clippy::disallowed_types)]

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use log::{error, info, warn, LevelFilter};
use simplelog::{Config, TermLogger, TerminalMode};

use bunzip2_rust::tools::cli::{bzopts_init, BzOpts};
use bunzip2_rust::{decompress, DecompressError};

fn main() {
    // Log to stderr so -c / --stdout never mixes messages into the data.
    TermLogger::init(
        LevelFilter::Trace,
        Config::default(),
        TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    )
    .unwrap();

    let options = bzopts_init();

    // No files means filter mode: stdin to stdout.
    if options.files.is_empty() {
        match decompress(io::stdin().lock(), io::stdout().lock()) {
            Ok(_) => info!("Done.\n"),
            Err(e) => {
                error!("stdin: {}", e);
                std::process::exit(e.status());
            }
        }
        return;
    }

    let mut status = 0;
    for file in &options.files {
        if let Err(code) = decompress_file(file, &options) {
            status = code;
        }
    }
    if status != 0 {
        std::process::exit(status);
    }
    info!("Done.\n");
}

/// Decompress one named file with the classic bunzip2 file handling. Returns
/// the status code on failure.
fn decompress_file(name: &str, options: &BzOpts) -> Result<(), i32> {
    let input = File::open(name).map_err(|e| {
        error!("Can't open {}: {}", name, e);
        1
    })?;

    let result = if options.test {
        decompress(input, io::sink())
    } else if options.stdout {
        decompress(input, io::stdout().lock())
    } else {
        let out_name = output_name(name);
        if !options.force && Path::new(&out_name).exists() {
            error!("Output file {} exists; use --force to overwrite.", out_name);
            return Err(1);
        }
        let f_out = File::create(&out_name).map_err(|e| {
            error!("Can't create {}: {}", out_name, e);
            1
        })?;
        let mut writer = BufWriter::new(f_out);
        decompress(input, &mut writer).and_then(|total| match writer.flush() {
            Ok(()) => Ok(total),
            Err(_) => Err(DecompressError::UnexpectedOutputEof),
        })
    };

    match result {
        Ok(total) => {
            info!("Decompressed {} into {} bytes.", name, total);
            // Like the original tool, the compressed file is consumed unless
            // told otherwise.
            if !options.keep && !options.stdout && !options.test {
                let _ = fs::remove_file(name);
            }
            Ok(())
        }
        Err(e) => {
            error!("{}: {}", name, e);
            Err(e.status())
        }
    }
}

/// Derive the output file name by stripping the .bz2 suffix.
fn output_name(input: &str) -> String {
    match input.strip_suffix(".bz2") {
        Some(stem) => stem.to_string(),
        None => {
            warn!("Can't guess original name for {} -- using {}.out", input, input);
            format!("{}.out", input)
        }
    }
}
