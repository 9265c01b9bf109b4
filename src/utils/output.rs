//! Bounded output collection.
//!
//! Each child stream gets its own reader thread that accumulates bytes up to
//! a fixed ceiling. Past the ceiling the reader keeps draining and discarding
//! so the child never blocks on a full pipe; the truncation is flagged in the
//! result instead of surfacing as an error.

use std::io::Read;
use std::thread::{self, JoinHandle};

/// Per-stream byte ceilings.
#[derive(Debug, Clone, Copy)]
pub struct OutputLimits {
    /// Stdout ceiling (bytes)
    pub stdout_limit: usize,
    /// Stderr ceiling (bytes)
    pub stderr_limit: usize,
}

impl Default for OutputLimits {
    fn default() -> Self {
        OutputLimits {
            stdout_limit: 8 * 1024 * 1024,
            stderr_limit: 2 * 1024 * 1024,
        }
    }
}

/// Bytes collected from one stream, with a flag when the ceiling was hit.
#[derive(Debug, Clone, Default)]
pub struct CollectedStream {
    pub data: Vec<u8>,
    pub truncated: bool,
}

/// Spawn a reader thread that drains `stream` to EOF, keeping at most
/// `limit` bytes. Read errors end collection with whatever was gathered.
pub fn spawn_collector<R: Read + Send + 'static>(
    stream: R,
    limit: usize,
) -> JoinHandle<CollectedStream> {
    thread::spawn(move || collect_stream(stream, limit))
}

fn collect_stream<R: Read>(mut stream: R, limit: usize) -> CollectedStream {
    let mut collected = CollectedStream::default();
    let mut chunk = [0u8; 8192];

    loop {
        match stream.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => {
                if collected.truncated {
                    // Keep draining so the child is never blocked on a full pipe.
                    continue;
                }
                if collected.data.len() + n > limit {
                    let remaining = limit - collected.data.len();
                    collected.data.extend_from_slice(&chunk[..remaining]);
                    collected.truncated = true;
                } else {
                    collected.data.extend_from_slice(&chunk[..n]);
                }
            }
            Err(e) => {
                log::debug!("output collection ended early: {}", e);
                break;
            }
        }
    }

    collected
}
