//! Audio sink seam
//!
//! The engine forwards raw audio chunks to an [`AudioSink`]; decoding is the
//! sink's problem (an external decoder device, a pipe into one, or nothing).

pub mod sink;

pub use sink::{AudioSink, NullSink, WriterSink};
