//! Stream socket abstraction and the TCP implementation

use std::io::{self, Read, Write};
use std::net::{Ipv4Addr, SocketAddr, TcpStream, ToSocketAddrs};

use log::{debug, warn};

use crate::config::net::CONNECT_TIMEOUT;

/// Non-blocking transport used by the ICY client.
///
/// `read` never blocks: it returns `Ok(0)` when no data is currently
/// available. A peer close flips `connected` to false on the next read.
pub trait StreamSocket {
    /// Connect to `host:port`, falling back to `fallback` when the host
    /// cannot be resolved.
    fn connect(&mut self, host: &str, fallback: Ipv4Addr, port: u16) -> io::Result<()>;

    /// Send raw bytes (the request handshake).
    fn send(&mut self, data: &[u8]) -> io::Result<()>;

    /// Read whatever is available, up to `buf.len()` bytes. `Ok(0)` means
    /// no data right now, not end of stream.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// True while the transport connection is up.
    fn connected(&self) -> bool;

    /// Close the connection. Safe to call when already closed.
    fn close(&mut self);
}

/// `std::net::TcpStream`-backed socket in non-blocking mode.
#[derive(Default)]
pub struct TcpSocket {
    stream: Option<TcpStream>,
}

impl TcpSocket {
    pub fn new() -> Self {
        Self { stream: None }
    }

    /// Resolve `host:port`, falling back to the preset's numeric address.
    fn resolve(host: &str, fallback: Ipv4Addr, port: u16) -> SocketAddr {
        match (host, port).to_socket_addrs() {
            Ok(mut addrs) => match addrs.next() {
                Some(addr) => addr,
                None => SocketAddr::from((fallback, port)),
            },
            Err(e) => {
                warn!("resolve {host} failed ({e}), using fallback {fallback}");
                SocketAddr::from((fallback, port))
            }
        }
    }
}

impl StreamSocket for TcpSocket {
    fn connect(&mut self, host: &str, fallback: Ipv4Addr, port: u16) -> io::Result<()> {
        self.close();

        let addr = Self::resolve(host, fallback, port);
        debug!("connecting to {host} at {addr}");

        let stream = TcpStream::connect_timeout(&addr, CONNECT_TIMEOUT)?;
        stream.set_nonblocking(true)?;
        stream.set_nodelay(true)?;
        self.stream = Some(stream);
        Ok(())
    }

    fn send(&mut self, data: &[u8]) -> io::Result<()> {
        match self.stream.as_mut() {
            Some(stream) => stream.write_all(data),
            None => Err(io::Error::new(io::ErrorKind::NotConnected, "socket closed")),
        }
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let Some(stream) = self.stream.as_mut() else {
            return Ok(0);
        };
        match stream.read(buf) {
            // a clean zero from TCP is the peer closing
            Ok(0) if !buf.is_empty() => {
                debug!("server closed the stream");
                self.stream = None;
                Ok(0)
            }
            Ok(n) => Ok(n),
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => Ok(0),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => Ok(0),
            Err(e) => {
                self.stream = None;
                Err(e)
            }
        }
    }

    fn connected(&self) -> bool {
        self.stream.is_some()
    }

    fn close(&mut self) {
        self.stream = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_socket_is_disconnected() {
        let sock = TcpSocket::new();
        assert!(!sock.connected());
    }

    #[test]
    fn read_on_closed_socket_yields_nothing() {
        let mut sock = TcpSocket::new();
        let mut buf = [0u8; 16];
        assert_eq!(sock.read(&mut buf).unwrap(), 0);
    }

    #[test]
    fn send_on_closed_socket_fails() {
        let mut sock = TcpSocket::new();
        assert!(sock.send(b"GET / HTTP/1.0\r\n\r\n").is_err());
    }

    #[test]
    fn close_is_idempotent() {
        let mut sock = TcpSocket::new();
        sock.close();
        sock.close();
        assert!(!sock.connected());
    }

    #[test]
    fn resolve_falls_back_to_numeric_address() {
        // a host name that cannot resolve ends up at the fallback
        let addr = TcpSocket::resolve("no-such-host.invalid", Ipv4Addr::new(10, 1, 2, 3), 8000);
        assert_eq!(addr, SocketAddr::from(([10, 1, 2, 3], 8000)));
    }
}
