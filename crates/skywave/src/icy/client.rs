//! ICY stream client
//!
//! The owning state machine for one stream session: `Closed → Header →
//! Streaming`, driven by repeated `poll` calls from a cooperative control
//! loop. Each poll performs at most one bounded non-blocking read and one
//! bounded processing step, so the client never stalls its caller.

use std::time::Instant;

use log::{debug, info, warn};

use crate::audio::AudioSink;
use crate::config::stream::{RECV_BUFFER_SIZE, STALL_TIMEOUT};
use crate::error::{RadioError, Result};
use crate::icy::buffer::RecvBuffer;
use crate::icy::{header, metadata};
use crate::net::StreamSocket;
use crate::preset::{split_url, PresetRecord};
use crate::station::StationInfo;

/// Connection lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientState {
    Closed,
    Header,
    Streaming,
}

/// ICY stream client.
///
/// Owns the receive buffer, the transport socket, and the per-session
/// demultiplexer counters. The audio sink is passed by reference into
/// `poll`/`stop` rather than owned, so the controller decides where audio
/// goes. Only one session is active at a time; `open` resets any in-flight
/// parse state from a previous session.
pub struct IcyClient<S: StreamSocket> {
    socket: S,
    buffer: RecvBuffer,
    station: StationInfo,
    state: ClientState,
    /// Audio bytes between inline metadata blocks; 0 = plain audio stream
    meta_interval: usize,
    /// Countdown of audio bytes until the next metadata block
    bytes_until_meta: usize,
    last_read: usize,
    last_rx: Instant,
}

impl<S: StreamSocket> IcyClient<S> {
    pub fn new(socket: S) -> Self {
        Self::with_capacity(socket, RECV_BUFFER_SIZE)
    }

    /// Client with an explicit receive buffer capacity.
    pub fn with_capacity(socket: S, capacity: usize) -> Self {
        Self {
            socket,
            buffer: RecvBuffer::new(capacity),
            station: StationInfo::new(),
            state: ClientState::Closed,
            meta_interval: 0,
            bytes_until_meta: 0,
            last_read: 0,
            last_rx: Instant::now(),
        }
    }

    /// Open a stream session for `preset`.
    ///
    /// Fails fast on an empty or separator-less URL without touching the
    /// transport. The preset is read-only: the host/path split borrows the
    /// URL, so repeated opens with the same preset are idempotent. On any
    /// failure the client stays `Closed` and the caller may simply call
    /// `open` again on a later iteration.
    pub fn open(&mut self, preset: &PresetRecord) -> Result<()> {
        if preset.url.is_empty() {
            return Err(RadioError::EmptyUrl);
        }
        let (host, path) =
            split_url(&preset.url).ok_or_else(|| RadioError::InvalidUrl(preset.url.clone()))?;

        self.reset_session();

        info!("opening stream {}:{}", preset.url, preset.port);
        self.socket
            .connect(host, preset.ip4, preset.port)
            .map_err(|source| RadioError::Connect {
                host: host.to_string(),
                source,
            })?;

        let request = format!(
            "GET /{path} HTTP/1.0\r\nHost: {host}\r\nIcy-MetaData: 1\r\nAccept: */*\r\n\r\n"
        );
        if let Err(e) = self.socket.send(request.as_bytes()) {
            self.socket.close();
            return Err(e.into());
        }

        self.state = ClientState::Header;
        self.last_rx = Instant::now();
        Ok(())
    }

    /// Stop the session: stop the sink, close the transport, go `Closed`.
    /// Valid from any state, including when already closed.
    pub fn stop(&mut self, sink: &mut dyn AudioSink) {
        sink.stop();
        self.socket.close();
        self.buffer.clear();
        self.bytes_until_meta = 0;
        self.last_read = 0;
        if self.state != ClientState::Closed {
            debug!("stream stopped");
        }
        self.state = ClientState::Closed;
    }

    /// One control-loop iteration: a bounded read plus a bounded processing
    /// step, dispatched by state. No-op while `Closed`.
    pub fn poll(&mut self, sink: &mut dyn AudioSink) -> Result<()> {
        match self.state {
            ClientState::Closed => Ok(()),
            ClientState::Header => self.handle_header(sink),
            ClientState::Streaming => self.handle_body(sink),
        }
    }

    pub fn state(&self) -> ClientState {
        self.state
    }

    /// True while the transport connection is up.
    pub fn connected(&self) -> bool {
        self.socket.connected()
    }

    /// True while data has arrived within the stall window. Going stale is
    /// advisory: the connection stays open and the next byte clears it.
    pub fn receiving(&self) -> bool {
        self.connected() && self.last_rx.elapsed() < STALL_TIMEOUT
    }

    pub fn station(&self) -> &StationInfo {
        &self.station
    }

    pub fn station_mut(&mut self) -> &mut StationInfo {
        &mut self.station
    }

    /// Server-declared metadata interval; 0 until the header is parsed, or
    /// for plain audio streams.
    pub fn meta_interval(&self) -> usize {
        self.meta_interval
    }

    /// Size of the most recent non-empty read.
    pub fn last_read(&self) -> usize {
        self.last_read
    }

    /// Access the underlying transport.
    pub fn socket(&self) -> &S {
        &self.socket
    }

    /// Mutable access to the underlying transport.
    pub fn socket_mut(&mut self) -> &mut S {
        &mut self.socket
    }

    fn reset_session(&mut self) {
        self.socket.close();
        self.buffer.clear();
        self.station.reset();
        self.state = ClientState::Closed;
        self.meta_interval = 0;
        self.bytes_until_meta = 0;
        self.last_read = 0;
    }

    /// HEADER state: accumulate response bytes and look for the header
    /// terminator. Audio that shares a read with the terminator is handed to
    /// the demultiplexer in the same pass.
    fn handle_header(&mut self, sink: &mut dyn AudioSink) -> Result<()> {
        let cap = self.buffer.capacity();
        let n = self.buffer.fill_from(&mut self.socket, cap)?;
        if n > 0 {
            self.last_rx = Instant::now();
            self.last_read = n;
        }

        let data = self.buffer.as_bytes();
        let Some(body_start) = header::end_of_header(data) else {
            if self.buffer.is_full() {
                // bounded recovery: fail the session instead of silently
                // overwriting an oversized header
                warn!("response header exceeded {cap} bytes, closing");
                self.socket.close();
                self.state = ClientState::Closed;
                return Err(RadioError::HeaderOverflow(cap));
            }
            return Ok(());
        };

        let head = &data[..body_start];
        let name = header::header_value(head, header::ICY_NAME).map(lossy);
        let genre = header::header_value(head, header::ICY_GENRE).map(lossy);
        let bitrate = header::header_value(head, header::ICY_BR).map(lossy);
        let meta_interval = header::meta_interval(head);

        if let Some(name) = name {
            self.station.set_name(&name);
        }
        if let Some(genre) = genre {
            self.station.set_genre(&genre);
        }
        if let Some(bitrate) = bitrate {
            self.station.set_bitrate(&bitrate);
        }
        self.station.mark_dirty();

        self.meta_interval = meta_interval;
        self.bytes_until_meta = meta_interval;
        self.state = ClientState::Streaming;
        info!(
            "station {:?} ({} kbit/s), metadata every {} bytes",
            self.station.name(),
            self.station.bitrate(),
            self.meta_interval
        );

        self.consume(body_start, sink)
    }

    /// STREAMING state: one bounded read, then demultiplex it.
    fn handle_body(&mut self, sink: &mut dyn AudioSink) -> Result<()> {
        let want = self.next_read_size();
        let n = self.buffer.refill_from(&mut self.socket, want)?;
        if n == 0 {
            // nothing available; counters untouched
            return Ok(());
        }
        self.last_rx = Instant::now();
        self.last_read = n;
        self.consume(0, sink)
    }

    /// Bound of the next read: stay within the remaining audio countdown so
    /// it reaches exactly zero at a chunk boundary, otherwise a full buffer
    /// whose first byte is the metadata length descriptor.
    fn next_read_size(&self) -> usize {
        if self.meta_interval == 0 || self.bytes_until_meta == 0 {
            self.buffer.capacity()
        } else {
            self.bytes_until_meta.min(self.buffer.capacity())
        }
    }

    /// Demultiplex buffered bytes from `pos` to the end: audio goes to the
    /// sink in this same iteration, metadata blocks update the station.
    ///
    /// A metadata block is bounded to the bytes that arrived in its read.
    /// When the declared length exceeds them (inconsistent descriptor), the
    /// block is clamped to the payload that actually parsed and the rest of
    /// the chunk is audio; a block with no parsable payload consumes the
    /// chunk and the unmatched-quote recovery keeps the previous title.
    fn consume(&mut self, mut pos: usize, sink: &mut dyn AudioSink) -> Result<()> {
        while pos < self.buffer.len() {
            let remaining = self.buffer.len() - pos;

            if self.meta_interval == 0 || self.bytes_until_meta > 0 {
                let take = if self.meta_interval == 0 {
                    remaining
                } else {
                    remaining.min(self.bytes_until_meta)
                };
                sink.play(&self.buffer.as_bytes()[pos..pos + take])?;
                if self.meta_interval != 0 {
                    self.bytes_until_meta -= take;
                }
                pos += take;
            } else {
                let data = self.buffer.as_bytes();
                let declared = data[pos] as usize * 16;
                let avail = remaining - 1;
                let mut block_len = declared.min(avail);

                if block_len > 0 {
                    let block = &data[pos + 1..pos + 1 + block_len];
                    let title = metadata::stream_title(block);
                    if declared > avail {
                        debug!(
                            "metadata descriptor declares {declared} bytes, {avail} buffered"
                        );
                        if let Some(end) = metadata::payload_end(block) {
                            block_len = end;
                        }
                    }
                    if let Some(title) = title {
                        self.station.set_now_playing(&title);
                    }
                }

                pos += 1 + block_len;
                self.bytes_until_meta = self.meta_interval;
            }
        }
        Ok(())
    }
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

#[cfg(test)]
impl<S: StreamSocket> IcyClient<S> {
    /// Pretend the last byte arrived `ago` in the past.
    fn backdate_rx(&mut self, ago: std::time::Duration) {
        self.last_rx = Instant::now() - ago;
    }
}
