// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Byte layout of a firmware image with metadata.
//!
//! ```text
//! 0x000  image_size   u32 LE, METADATA_SIZE + firmware length
//! 0x004  reserved     0xFF padding up to METADATA_SIZE
//! 0x200  firmware     verbatim payload
//! ...    checksum     u32 LE, CRC-32/JAMCRC of everything before it
//! ```

use byteorder::LittleEndian;
use std::ops::Range;
use zerocopy::{AsBytes, FromBytes, LayoutVerified, Unaligned, U32};

/// Size of the metadata block that precedes the firmware
pub const METADATA_SIZE: usize = 0x200;

/// Size of the CRC-32 trailer that follows the firmware
pub const CHECKSUM_SIZE: usize = 4;

/// Location of the total image size inside the metadata block
pub const HEADER_IMAGE_SIZE: Range<usize> = 0..4;

/// Value of every unused metadata byte
pub const PADDING_BYTE: u8 = 0xFF;

/// Smallest valid image: metadata block and trailer around an empty payload
pub const MIN_IMAGE_LEN: usize = METADATA_SIZE + CHECKSUM_SIZE;

/// Size of a firmware partition on the flight computer. The on-board
/// integrity check rejects any image whose size field exceeds this.
pub const DEFAULT_PARTITION_SIZE: u32 = 0x2_0000;

const RESERVED_SIZE: usize = METADATA_SIZE - HEADER_IMAGE_SIZE.end;

#[derive(Clone, Debug, AsBytes, FromBytes, Unaligned)]
#[repr(C)]
pub struct MetadataBlock {
    image_size: U32<LittleEndian>,
    reserved: [u8; RESERVED_SIZE],
}

const _: () = assert!(std::mem::size_of::<MetadataBlock>() == METADATA_SIZE);

impl MetadataBlock {
    /// Builds the header for an image of `image_size` bytes (metadata block
    /// plus firmware, trailer excluded)
    pub fn new(image_size: u32) -> Self {
        Self {
            image_size: U32::new(image_size),
            reserved: [PADDING_BYTE; RESERVED_SIZE],
        }
    }

    /// Interprets the start of `image` as a metadata block. Returns `None`
    /// if the slice is shorter than [`METADATA_SIZE`].
    pub fn from_prefix(image: &[u8]) -> Option<&Self> {
        LayoutVerified::<_, Self>::new_unaligned_from_prefix(image)
            .map(|(header, _rest)| header.into_ref())
    }

    pub fn image_size(&self) -> u32 {
        self.image_size.get()
    }

    pub fn reserved(&self) -> &[u8] {
        &self.reserved
    }
}
