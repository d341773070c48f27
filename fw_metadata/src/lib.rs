// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

pub mod checksum;
pub mod layout;
pub mod stamp;
pub mod verify;

use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("could not fit total image length in a `u32` (firmware is {0} bytes)")]
    ImageSizeOverflow(usize),

    #[error("{0:?} has no file name to derive an output path from")]
    NoFileName(PathBuf),

    #[error("image is {0} bytes; need at least {min} for metadata and checksum", min = layout::MIN_IMAGE_LEN)]
    ImageTooShort(usize),

    #[error("header says image is {header} bytes, but {actual} bytes precede the checksum")]
    ImageSizeMismatch { header: u32, actual: usize },

    #[error("stored checksum {stored:#010x} does not match computed {computed:#010x}")]
    ChecksumMismatch { stored: u32, computed: u32 },

    #[error("image size {image_size:#x} exceeds partition size {limit:#x}")]
    ImageTooLarge { image_size: u32, limit: u32 },
}
