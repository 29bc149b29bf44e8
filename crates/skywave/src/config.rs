//! Configuration constants for the skywave engine

/// Stream-related configuration
pub mod stream {
    use std::time::Duration;

    /// Receive buffer capacity in bytes. One buffer is allocated per client
    /// and reused for every read; it also bounds how much response header
    /// can accumulate before the session is failed.
    pub const RECV_BUFFER_SIZE: usize = 512;

    /// Time without receiving data before the stream is considered stalled
    pub const STALL_TIMEOUT: Duration = Duration::from_secs(5);
}

/// Network-related configuration
pub mod net {
    use std::time::Duration;

    /// Transport connect timeout
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
}

/// Bounded lengths of the display-facing station fields
pub mod station {
    /// Station name length
    pub const NAME_LEN: usize = 20;

    /// Station genre length
    pub const GENRE_LEN: usize = 20;

    /// Bit rate length ("320" plus slack)
    pub const RATE_LEN: usize = 4;

    /// Now-playing (inline metadata title) length
    pub const TITLE_LEN: usize = 64;
}

/// Preset record bounds
pub mod preset {
    /// Stream URL field size, terminator included
    pub const URL_LEN: usize = 64;
}
