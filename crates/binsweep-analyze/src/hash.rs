//! Full-content file hashing.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use blake3::Hasher;

use binsweep_core::ContentHash;

const READ_BUF_SIZE: usize = 64 * 1024;

/// Compute the BLAKE3 hash of a file's full content.
///
/// Deterministic for identical byte content. Any open or read failure
/// is returned to the caller, which records it against the file and
/// continues with the rest of the inventory.
pub fn hash_file(path: &Path) -> io::Result<ContentHash> {
    let mut file = File::open(path)?;
    let mut hasher = Hasher::new();
    let mut buffer = vec![0u8; READ_BUF_SIZE];

    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(ContentHash::new(*hasher.finalize().as_bytes()))
}
