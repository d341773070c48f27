// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crc_any::CRCu32;

/// Running CRC-32/JAMCRC.
///
/// JAMCRC shares the polynomial, reflection and initial value of the zlib /
/// IEEE 802.3 CRC-32 but skips the final xor, so it is the complement of the
/// standard result:
/// poly: 0x04c11db7
/// initial: 0xffffffff
/// final xor: 0x00000000
/// reflected: yes
pub struct Jamcrc(CRCu32);

impl Jamcrc {
    pub fn new() -> Self {
        Self(CRCu32::crc32())
    }

    pub fn digest(&mut self, bytes: &[u8]) {
        self.0.digest(bytes);
    }

    pub fn get_crc(&mut self) -> u32 {
        !self.0.get_crc()
    }
}

impl Default for Jamcrc {
    fn default() -> Self {
        Self::new()
    }
}

pub fn jamcrc(bytes: &[u8]) -> u32 {
    let mut crc = Jamcrc::new();
    crc.digest(bytes);
    crc.get_crc()
}
