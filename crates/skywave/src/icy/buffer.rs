//! Receive buffer
//!
//! One fixed-capacity byte buffer per client, allocated once and reused for
//! every read. All parsing operates on slices of it; payloads may contain
//! arbitrary bytes, so nothing here assumes text.

use std::io;

use crate::net::StreamSocket;

/// Fixed-capacity byte buffer with explicit length tracking.
pub struct RecvBuffer {
    data: Box<[u8]>,
    len: usize,
}

impl RecvBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            data: vec![0u8; capacity].into_boxed_slice(),
            len: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == self.data.len()
    }

    /// Currently buffered bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.len]
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Append one non-blocking read at the tail, reading at most `max`
    /// bytes and never past capacity. Returns the number of bytes added
    /// (0 when no data was available or the buffer is full).
    pub fn fill_from<S: StreamSocket>(&mut self, socket: &mut S, max: usize) -> io::Result<usize> {
        let room = (self.data.len() - self.len).min(max);
        if room == 0 {
            return Ok(0);
        }
        let n = socket.read(&mut self.data[self.len..self.len + room])?;
        self.len += n;
        Ok(n)
    }

    /// Replace the contents with one fresh read of at most `max` bytes.
    pub fn refill_from<S: StreamSocket>(
        &mut self,
        socket: &mut S,
        max: usize,
    ) -> io::Result<usize> {
        self.clear();
        self.fill_from(socket, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::testing::MockSocket;

    #[test]
    fn starts_empty_with_capacity() {
        let buf = RecvBuffer::new(128);
        assert_eq!(buf.capacity(), 128);
        assert_eq!(buf.len(), 0);
        assert!(buf.is_empty());
        assert!(!buf.is_full());
    }

    #[test]
    fn fill_appends_at_tail() {
        let mut sock = MockSocket::new();
        sock.push(b"abc");
        sock.push(b"def");

        let mut buf = RecvBuffer::new(16);
        assert_eq!(buf.fill_from(&mut sock, 16).unwrap(), 3);
        assert_eq!(buf.fill_from(&mut sock, 16).unwrap(), 3);
        assert_eq!(buf.as_bytes(), b"abcdef");
    }

    #[test]
    fn fill_respects_max() {
        let mut sock = MockSocket::new();
        sock.push(b"abcdef");

        let mut buf = RecvBuffer::new(16);
        assert_eq!(buf.fill_from(&mut sock, 4).unwrap(), 4);
        assert_eq!(buf.as_bytes(), b"abcd");
        // the rest of the chunk stays queued on the socket
        assert_eq!(buf.fill_from(&mut sock, 4).unwrap(), 2);
        assert_eq!(buf.as_bytes(), b"abcdef");
    }

    #[test]
    fn fill_stops_at_capacity() {
        let mut sock = MockSocket::new();
        sock.push(&[7u8; 32]);

        let mut buf = RecvBuffer::new(8);
        assert_eq!(buf.fill_from(&mut sock, 100).unwrap(), 8);
        assert!(buf.is_full());
        assert_eq!(buf.fill_from(&mut sock, 100).unwrap(), 0);
    }

    #[test]
    fn empty_socket_reads_zero() {
        let mut sock = MockSocket::new();
        let mut buf = RecvBuffer::new(8);
        assert_eq!(buf.fill_from(&mut sock, 8).unwrap(), 0);
        assert!(buf.is_empty());
    }

    #[test]
    fn refill_replaces_contents() {
        let mut sock = MockSocket::new();
        sock.push(b"old");
        sock.push(b"new!");

        let mut buf = RecvBuffer::new(16);
        buf.fill_from(&mut sock, 16).unwrap();
        assert_eq!(buf.refill_from(&mut sock, 16).unwrap(), 4);
        assert_eq!(buf.as_bytes(), b"new!");
    }
}
