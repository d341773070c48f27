// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use assert_cmd::Command;
use byteorder::{ByteOrder, LittleEndian};
use crc_any::CRCu32;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn crc32(bytes: &[u8]) -> u32 {
    let mut crc = CRCu32::crc32();
    crc.digest(bytes);
    crc.get_crc()
}

fn write_firmware(dir: &TempDir, name: &str, contents: &[u8]) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn stamps_next_to_input() {
    let dir = TempDir::new().unwrap();
    let firmware = write_firmware(&dir, "firmware.bin", &[0x41]);

    let checksum = {
        let mut full = vec![0x01, 0x02, 0x00, 0x00];
        full.extend_from_slice(&[0xff; 508]);
        full.push(0x41);
        0xffff_ffff - crc32(&full)
    };

    Command::cargo_bin("add_metadata")
        .unwrap()
        .arg(&firmware)
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "Adding metadata to '{}'",
            firmware.display()
        )))
        .stdout(predicate::str::contains(format!(
            "  image size =    517 B,  CRC-32 = 0x{checksum:08X}"
        )));

    let image = fs::read(dir.path().join("firmwareWithMetadata.bin")).unwrap();
    assert_eq!(image.len(), 517);
    assert_eq!(LittleEndian::read_u32(&image[..4]), 513);
    assert!(image[4..512].iter().all(|&b| b == 0xff));
    assert_eq!(image[512], 0x41);
    assert_eq!(LittleEndian::read_u32(&image[513..]), checksum);
}

#[test]
fn empty_firmware() {
    let dir = TempDir::new().unwrap();
    let firmware = write_firmware(&dir, "empty.bin", &[]);

    Command::cargo_bin("add_metadata")
        .unwrap()
        .arg(&firmware)
        .assert()
        .success()
        .stdout(predicate::str::contains("image size =    516 B"));

    let image = fs::read(dir.path().join("emptyWithMetadata.bin")).unwrap();
    assert_eq!(image.len(), 516);
    assert_eq!(&image[..4], &[0x00, 0x02, 0x00, 0x00]);
}

#[test]
fn explicit_output_path() {
    let dir = TempDir::new().unwrap();
    let firmware = write_firmware(&dir, "firmware.bin", b"abc");
    let out = dir.path().join("flash.img");

    Command::cargo_bin("add_metadata")
        .unwrap()
        .arg(&firmware)
        .arg("-o")
        .arg(&out)
        .assert()
        .success();

    assert_eq!(fs::read(&out).unwrap().len(), 512 + 3 + 4);
    assert!(!dir.path().join("firmwareWithMetadata.bin").exists());
}

#[test]
fn repeated_runs_are_identical() {
    let dir = TempDir::new().unwrap();
    let firmware = write_firmware(&dir, "app.bin", &[0x5a; 4096]);
    let out = dir.path().join("appWithMetadata.bin");

    Command::cargo_bin("add_metadata")
        .unwrap()
        .arg(&firmware)
        .assert()
        .success();
    let first = fs::read(&out).unwrap();

    Command::cargo_bin("add_metadata")
        .unwrap()
        .arg(&firmware)
        .assert()
        .success();
    assert_eq!(fs::read(&out).unwrap(), first);
}

#[test]
fn missing_argument_fails_before_io() {
    Command::cargo_bin("add_metadata")
        .unwrap()
        .assert()
        .failure()
        .stdout(predicate::str::contains("Adding metadata").not());
}

#[test]
fn missing_input_fails() {
    let dir = TempDir::new().unwrap();

    Command::cargo_bin("add_metadata")
        .unwrap()
        .arg(dir.path().join("nope.bin"))
        .assert()
        .failure()
        .stdout(predicate::str::contains("Adding metadata").not())
        .stderr(predicate::str::contains("nope.bin"));

    assert!(!dir.path().join("nopeWithMetadata.bin").exists());
}

#[test]
fn unwritable_output_fails() {
    let dir = TempDir::new().unwrap();
    let firmware = write_firmware(&dir, "firmware.bin", b"abc");
    let out = dir.path().join("no_such_dir").join("x.bin");

    Command::cargo_bin("add_metadata")
        .unwrap()
        .arg(&firmware)
        .arg("-o")
        .arg(&out)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no_such_dir"));

    assert!(!out.exists());
}

#[test]
fn check_accepts_stamped_image() {
    let dir = TempDir::new().unwrap();
    let firmware = write_firmware(&dir, "firmware.bin", b"some firmware");

    Command::cargo_bin("add_metadata")
        .unwrap()
        .arg(&firmware)
        .assert()
        .success();

    Command::cargo_bin("check_metadata")
        .unwrap()
        .arg(dir.path().join("firmwareWithMetadata.bin"))
        .assert()
        .success()
        .stdout(predicate::str::contains("13 firmware bytes"));
}

#[test]
fn check_rejects_corrupt_image() {
    let dir = TempDir::new().unwrap();
    let firmware = write_firmware(&dir, "firmware.bin", b"some firmware");
    let image_path = dir.path().join("firmwareWithMetadata.bin");

    Command::cargo_bin("add_metadata")
        .unwrap()
        .arg(&firmware)
        .assert()
        .success();

    let mut image = fs::read(&image_path).unwrap();
    image[520] ^= 0xff;
    fs::write(&image_path, &image).unwrap();

    Command::cargo_bin("check_metadata")
        .unwrap()
        .arg(&image_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not match"));
}

#[test]
fn check_enforces_partition_size() {
    let dir = TempDir::new().unwrap();
    let firmware = write_firmware(&dir, "firmware.bin", &[0; 1024]);
    let image_path = dir.path().join("firmwareWithMetadata.bin");

    Command::cargo_bin("add_metadata")
        .unwrap()
        .arg(&firmware)
        .assert()
        .success();

    Command::cargo_bin("check_metadata")
        .unwrap()
        .arg(&image_path)
        .args(["--partition-size", "0x400"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("exceeds partition size"));

    Command::cargo_bin("check_metadata")
        .unwrap()
        .arg(&image_path)
        .args(["--partition-size", "0x20000"])
        .assert()
        .success();
}
