//! Content digests for artifact provenance
//!
//! CRC-32 goes into the file name; SHA-256 is reported alongside it. Both are
//! computed in one buffered pass and always from the current bytes.

use crate::core::error::{KeeperResult, ResultExt};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

const BUFFER_SIZE: usize = 64 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileDigest {
  /// CRC-32 as 8 lowercase hex digits
  pub crc32: String,
  /// SHA-256 as lowercase hex
  pub sha256: String,
  pub size: u64,
}

/// Digest a file's full content
pub fn digest_file(path: &Path) -> KeeperResult<FileDigest> {
  let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
  digest_reader(BufReader::with_capacity(BUFFER_SIZE, file), BUFFER_SIZE)
    .with_context(|| format!("Failed to read {}", path.display()))
}

/// Digest any reader in chunks of `chunk` bytes
pub fn digest_reader<R: Read>(mut reader: R, chunk: usize) -> KeeperResult<FileDigest> {
  let mut crc = crc32fast::Hasher::new();
  let mut sha = Sha256::new();
  let mut buffer = vec![0u8; chunk.max(1)];
  let mut size = 0u64;

  loop {
    let read = reader.read(&mut buffer)?;
    if read == 0 {
      break;
    }
    crc.update(&buffer[..read]);
    sha.update(&buffer[..read]);
    size += read as u64;
  }

  Ok(FileDigest {
    crc32: format!("{:08x}", crc.finalize()),
    sha256: format!("{:x}", sha.finalize()),
    size,
  })
}
