//! Content hashing for the hash-named fallback
//!
//! Files are hashed in fixed-size chunks so memory stays flat no matter how
//! large the file is.

use crate::types::FileDigest;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

pub const DEFAULT_CHUNK_SIZE: usize = 4096;

/// MD5 of everything `reader` yields, read `chunk_size` bytes at a time
pub fn digest_reader<R: Read>(mut reader: R, chunk_size: usize) -> io::Result<FileDigest> {
    let mut context = md5::Context::new();
    let mut buffer = vec![0u8; chunk_size.max(1)];

    loop {
        match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => context.consume(&buffer[..n]),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }

    Ok(FileDigest(format!("{:x}", context.compute())))
}

/// MD5 of a file's contents
pub fn digest_file(path: &Path, chunk_size: usize) -> io::Result<FileDigest> {
    let file = File::open(path)?;
    digest_reader(file, chunk_size)
}
