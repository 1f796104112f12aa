//! Streaming SHA-256 fingerprints.
//!
//! Content is pushed through the digest in fixed-size chunks, so memory use
//! stays constant no matter how large the document is.

use std::io::{self, Read};

use sha2::{Digest, Sha256};

use custody_contracts::error::{CustodyError, CustodyResult};

/// Identifier recorded next to every fingerprint this module produces.
pub const ALGORITHM: &str = "SHA-256";

/// Buffer size for streaming reads (8 KiB).
const BUFFER_SIZE: usize = 8192;

/// Fingerprint everything `reader` yields.
///
/// Returns a lowercase 64-character hex string. Fails with
/// `CustodyError::Io` if the source cannot be read to the end.
pub fn fingerprint<R: Read + ?Sized>(reader: &mut R) -> CustodyResult<String> {
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; BUFFER_SIZE];

    loop {
        let n = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                return Err(CustodyError::Io {
                    reason: format!("failed to read content for fingerprinting: {}", e),
                })
            }
        };
        hasher.update(&buffer[..n]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Fingerprint an in-memory byte slice.
pub fn fingerprint_bytes(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// A `Read` adapter that fingerprints bytes as they pass through.
///
/// Used at upload time: the content store consumes the reader while the
/// digest is computed on the same bytes, so the upload is read exactly once.
pub struct HashingReader<R> {
    inner: R,
    hasher: Sha256,
    bytes_read: u64,
}

impl<R: Read> HashingReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            hasher: Sha256::new(),
            bytes_read: 0,
        }
    }

    /// Number of bytes that have passed through so far.
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// Consume the adapter and return the hex fingerprint of everything read.
    pub fn finish(self) -> String {
        hex::encode(self.hasher.finalize())
    }
}

impl<R: Read> Read for HashingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.hasher.update(&buf[..n]);
        self.bytes_read += n as u64;
        Ok(n)
    }
}
