// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::checksum::jamcrc;
use crate::layout::{MetadataBlock, CHECKSUM_SIZE, METADATA_SIZE, MIN_IMAGE_LEN, PADDING_BYTE};
use crate::Error;
use byteorder::{ByteOrder, LittleEndian};
use log::{debug as okay, trace, warn};

/// Fields decoded from an image that passed verification
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ImageInfo {
    /// Header size field: metadata block plus firmware
    pub image_size: u32,
    pub firmware_size: usize,
    pub checksum: u32,
}

/// Checks an image produced by [`crate::stamp::stamp_image`]: the size field
/// must describe everything before the trailer and the trailer must be the
/// CRC-32/JAMCRC of those bytes.
pub fn verify_image(image: &[u8]) -> Result<ImageInfo, Error> {
    if image.len() < MIN_IMAGE_LEN {
        return Err(Error::ImageTooShort(image.len()));
    }
    let header = MetadataBlock::from_prefix(image).ok_or(Error::ImageTooShort(image.len()))?;

    let body_len = image.len() - CHECKSUM_SIZE;
    let image_size = header.image_size();
    trace!("image size field: {image_size:#x}");
    if image_size as usize != body_len {
        return Err(Error::ImageSizeMismatch {
            header: image_size,
            actual: body_len,
        });
    }
    okay!("image size field matches file length");

    // Reserved bytes are unused; only the CRC covers them
    if header.reserved().iter().any(|&b| b != PADDING_BYTE) {
        warn!("reserved metadata bytes are not all {PADDING_BYTE:#04x}");
    }

    let stored = LittleEndian::read_u32(&image[body_len..]);
    let computed = jamcrc(&image[..body_len]);
    if stored != computed {
        return Err(Error::ChecksumMismatch { stored, computed });
    }
    okay!("CRC-32 matches");

    Ok(ImageInfo {
        image_size,
        firmware_size: body_len - METADATA_SIZE,
        checksum: stored,
    })
}

/// Like [`verify_image`], and additionally requires the image to fit in a
/// partition of `partition_size` bytes
pub fn verify_image_within(image: &[u8], partition_size: u32) -> Result<ImageInfo, Error> {
    let info = verify_image(image)?;
    if info.image_size > partition_size {
        return Err(Error::ImageTooLarge {
            image_size: info.image_size,
            limit: partition_size,
        });
    }
    okay!("image fits in partition of {partition_size:#x} bytes");
    Ok(info)
}
