// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use anyhow::{bail, Context, Result};
use clap::Parser;
use colored::Colorize;
use fw_metadata::verify;
use std::path::PathBuf;

/// Checks the size field and CRC-32 of an image produced by `add_metadata`
#[derive(Debug, Parser)]
#[clap(name = "check_metadata", max_term_width = 80)]
struct Args {
    /// image file (binary)
    src_img: PathBuf,

    /// also fail if the image does not fit in a partition of this many bytes
    #[arg(long, value_parser = parse_int::parse::<u32>)]
    partition_size: Option<u32>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let image = std::fs::read(&args.src_img)
        .with_context(|| format!("could not read {:?}", &args.src_img))?;

    let result = match args.partition_size {
        Some(limit) => verify::verify_image_within(&image, limit),
        None => verify::verify_image(&image),
    };

    match result {
        Ok(info) => {
            println!(
                "{}: {} firmware bytes, image size = {:6} B,  CRC-32 = 0x{:08X}",
                "OK".green(),
                info.firmware_size,
                image.len(),
                info.checksum
            );
            Ok(())
        }
        Err(e) => {
            println!("{}: {}", "FAIL".red(), args.src_img.display());
            bail!("image check failed: {e}")
        }
    }
}
