// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::checksum::Jamcrc;
use crate::layout::{MetadataBlock, CHECKSUM_SIZE, METADATA_SIZE};
use crate::Error;
use log::{debug, trace};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use zerocopy::AsBytes;

/// Inserted between the file stem and extension of the input to name the
/// output image
pub const OUTPUT_SUFFIX: &str = "WithMetadata";

/// A firmware image with metadata block and checksum trailer
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StampedImage {
    bytes: Vec<u8>,
    image_size: u32,
    checksum: u32,
}

impl StampedImage {
    /// The full output: metadata block, firmware and checksum
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Value of the header size field. Does not count the checksum trailer.
    pub fn image_size(&self) -> u32 {
        self.image_size
    }

    pub fn checksum(&self) -> u32 {
        self.checksum
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Prepends the metadata block to `firmware` and appends the CRC-32/JAMCRC
/// of both.
pub fn stamp_image(firmware: &[u8]) -> Result<StampedImage, Error> {
    let image_size = METADATA_SIZE
        .checked_add(firmware.len())
        .and_then(|size| u32::try_from(size).ok())
        .ok_or(Error::ImageSizeOverflow(firmware.len()))?;
    debug!(
        "firmware is {} bytes, image size {image_size:#x}",
        firmware.len()
    );

    let header = MetadataBlock::new(image_size);

    let mut crc = Jamcrc::new();
    crc.digest(header.as_bytes());
    crc.digest(firmware);
    let checksum = crc.get_crc();
    trace!("CRC-32/JAMCRC over {image_size} bytes: {checksum:#010x}");

    let mut bytes = Vec::with_capacity(METADATA_SIZE + firmware.len() + CHECKSUM_SIZE);
    bytes.extend_from_slice(header.as_bytes());
    bytes.extend_from_slice(firmware);
    bytes.extend_from_slice(&checksum.to_le_bytes());

    Ok(StampedImage {
        bytes,
        image_size,
        checksum,
    })
}

/// Derives the default output path: `dir/firmware.bin` becomes
/// `dir/firmwareWithMetadata.bin`.
///
/// A trailing dot is part of the stem, not an empty extension, so
/// `firmware.` becomes `firmware.WithMetadata`.
pub fn output_path(input: &Path) -> Result<PathBuf, Error> {
    let file_name = input
        .file_name()
        .ok_or_else(|| Error::NoFileName(input.to_path_buf()))?;

    let name = match (input.file_stem(), input.extension()) {
        (Some(stem), Some(extension)) if !extension.is_empty() => {
            let mut name = OsString::from(stem);
            name.push(OUTPUT_SUFFIX);
            name.push(".");
            name.push(extension);
            name
        }
        _ => {
            let mut name = OsString::from(file_name);
            name.push(OUTPUT_SUFFIX);
            name
        }
    };
    Ok(input.with_file_name(name))
}

/// Reads the firmware at `src` and writes the stamped image to `dest`,
/// replacing any existing file.
pub fn add_metadata(src: &Path, dest: &Path) -> Result<StampedImage, Error> {
    let firmware = std::fs::read(src)?;
    let image = stamp_image(&firmware)?;

    std::fs::write(dest, image.bytes())?;
    debug!("wrote {} bytes to {}", image.len(), dest.display());
    Ok(image)
}
