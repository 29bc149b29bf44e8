//! Audio sinks
//!
//! Sinks accept raw audio byte chunks and a volume level; they know nothing
//! about ICY framing. Volume follows the decoder-chip convention: the byte
//! is an attenuation, higher = quieter.

use std::io::{self, Write};

/// Destination for demultiplexed audio bytes.
pub trait AudioSink {
    /// Accept one chunk of raw audio.
    fn play(&mut self, chunk: &[u8]) -> io::Result<()>;

    /// Stop current playback. Safe to call when nothing is playing.
    fn stop(&mut self);

    /// Set the attenuation level (0 = loudest).
    fn set_volume(&mut self, attenuation: u8);

    /// Current attenuation level.
    fn volume(&self) -> u8;
}

/// Sink that forwards chunks to any writer: a file, or a pipe feeding an
/// external decoder.
pub struct WriterSink<W: Write> {
    writer: W,
    attenuation: u8,
    bytes_played: u64,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            attenuation: 50,
            bytes_played: 0,
        }
    }

    /// Total bytes forwarded since creation.
    pub fn bytes_played(&self) -> u64 {
        self.bytes_played
    }
}

impl<W: Write> AudioSink for WriterSink<W> {
    fn play(&mut self, chunk: &[u8]) -> io::Result<()> {
        self.writer.write_all(chunk)?;
        self.bytes_played += chunk.len() as u64;
        Ok(())
    }

    fn stop(&mut self) {
        let _ = self.writer.flush();
    }

    fn set_volume(&mut self, attenuation: u8) {
        self.attenuation = attenuation;
    }

    fn volume(&self) -> u8 {
        self.attenuation
    }
}

/// Sink that discards audio. Used by tests and silent operation.
#[derive(Default)]
pub struct NullSink {
    attenuation: u8,
    bytes_played: u64,
}

impl NullSink {
    pub fn new() -> Self {
        Self {
            attenuation: 50,
            bytes_played: 0,
        }
    }

    pub fn bytes_played(&self) -> u64 {
        self.bytes_played
    }
}

impl AudioSink for NullSink {
    fn play(&mut self, chunk: &[u8]) -> io::Result<()> {
        self.bytes_played += chunk.len() as u64;
        Ok(())
    }

    fn stop(&mut self) {}

    fn set_volume(&mut self, attenuation: u8) {
        self.attenuation = attenuation;
    }

    fn volume(&self) -> u8 {
        self.attenuation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writer_sink_forwards_chunks() {
        let mut sink = WriterSink::new(Vec::new());
        sink.play(b"abc").unwrap();
        sink.play(b"def").unwrap();
        assert_eq!(sink.bytes_played(), 6);
        assert_eq!(sink.writer, b"abcdef");
    }

    #[test]
    fn null_sink_counts_but_discards() {
        let mut sink = NullSink::new();
        sink.play(&[0u8; 400]).unwrap();
        assert_eq!(sink.bytes_played(), 400);
    }

    #[test]
    fn volume_round_trips() {
        let mut sink = NullSink::new();
        sink.set_volume(70);
        assert_eq!(sink.volume(), 70);
    }

    #[test]
    fn stop_with_nothing_playing_is_fine() {
        let mut sink = NullSink::new();
        sink.stop();
        sink.stop();
    }
}
