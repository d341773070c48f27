// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use anyhow::{Context, Result};
use clap::Parser;
use fw_metadata::stamp;
use log::info;
use std::path::PathBuf;

/// Prepends a metadata block (image size) and appends a CRC-32/JAMCRC to a
/// raw firmware binary
#[derive(Debug, Parser)]
#[clap(name = "add_metadata", max_term_width = 80)]
struct Args {
    /// source file (binary)
    src_bin: PathBuf,

    /// output file (binary); defaults to the source name with
    /// `WithMetadata` inserted before the extension
    #[clap(short = 'o', long = "out")]
    dest_bin: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let dest_bin = match args.dest_bin {
        Some(dest) => dest,
        None => stamp::output_path(&args.src_bin)?,
    };

    std::fs::metadata(&args.src_bin)
        .with_context(|| format!("could not stat {:?}", &args.src_bin))?;
    println!("Adding metadata to '{}'", args.src_bin.display());
    let image = stamp::add_metadata(&args.src_bin, &dest_bin)
        .with_context(|| format!("failed to stamp {:?} into {:?}", &args.src_bin, &dest_bin))?;
    println!(
        "  image size = {:6} B,  CRC-32 = 0x{:08X}",
        image.len(),
        image.checksum()
    );
    info!("image written to {:?}", &dest_bin);

    Ok(())
}
