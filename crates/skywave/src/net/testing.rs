//! Scripted socket double for engine tests

use std::collections::VecDeque;
use std::io;
use std::net::Ipv4Addr;

use super::StreamSocket;

/// A socket that replays a script of reads and records the handshake.
///
/// Each queued chunk is served by one `read` call (clamped to the caller's
/// request size; the remainder stays queued). An empty queue reads as
/// `Ok(0)`, "no data right now", matching the non-blocking contract.
pub struct MockSocket {
    pub accept: bool,
    pub connected: bool,
    pub sent: Vec<u8>,
    pub connect_attempts: usize,
    chunks: VecDeque<Vec<u8>>,
}

impl MockSocket {
    pub fn new() -> Self {
        Self {
            accept: true,
            connected: false,
            sent: Vec::new(),
            connect_attempts: 0,
            chunks: VecDeque::new(),
        }
    }

    /// A socket whose connect attempts fail.
    pub fn refusing() -> Self {
        Self {
            accept: false,
            ..Self::new()
        }
    }

    /// Queue a chunk to be served by a later read.
    pub fn push(&mut self, chunk: &[u8]) {
        self.chunks.push_back(chunk.to_vec());
    }
}

impl StreamSocket for MockSocket {
    fn connect(&mut self, _host: &str, _fallback: Ipv4Addr, _port: u16) -> io::Result<()> {
        self.connect_attempts += 1;
        if self.accept {
            self.connected = true;
            Ok(())
        } else {
            Err(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                "scripted refusal",
            ))
        }
    }

    fn send(&mut self, data: &[u8]) -> io::Result<()> {
        self.sent.extend_from_slice(data);
        Ok(())
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let Some(chunk) = self.chunks.front_mut() else {
            return Ok(0);
        };
        let n = buf.len().min(chunk.len());
        buf[..n].copy_from_slice(&chunk[..n]);
        if n == chunk.len() {
            self.chunks.pop_front();
        } else {
            chunk.drain(..n);
        }
        Ok(n)
    }

    fn connected(&self) -> bool {
        self.connected
    }

    fn close(&mut self) {
        self.connected = false;
    }
}
