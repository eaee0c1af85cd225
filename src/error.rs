// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The error type shared by every stage of a render.  Nothing in a
//! render is recoverable: every variant aborts the whole worker group.

use std::io;

/// Everything that can go wrong during a render.
#[derive(Debug, Fail)]
pub enum Error {
    /// Bounds, dimensions, iteration count or worker count were
    /// rejected before any round started.
    #[fail(display = "invalid configuration: {}", _0)]
    Configuration(String),

    /// A row transfer failed, timed out, or delivered a message that
    /// did not match what the receiver expected.
    #[fail(display = "transport failure: {}", _0)]
    Transport(String),

    /// The peer of the given rank went away mid-transfer.  This is
    /// usually a symptom; the peer's own error is the cause.
    #[fail(display = "transport failure: rank {} hung up", _0)]
    Disconnected(usize),

    /// A row write fell outside the image buffer or did not fit it.
    /// This means the partitioner and the row computer disagree.
    #[fail(display = "row {} rejected by image buffer: {}", row, reason)]
    BufferRange {
        /// The offending global row index.
        row: usize,
        /// What was wrong with the write.
        reason: String,
    },

    /// A worker thread panicked instead of returning.
    #[fail(display = "worker {} panicked", _0)]
    WorkerPanicked(usize),

    /// Writing the finished image failed.
    #[fail(display = "i/o failure: {}", _0)]
    Io(#[cause] io::Error),
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = ::std::result::Result<T, Error>;

impl Error {
    pub(crate) fn config<S: Into<String>>(msg: S) -> Self {
        Error::Configuration(msg.into())
    }

    pub(crate) fn transport<S: Into<String>>(msg: S) -> Self {
        Error::Transport(msg.into())
    }

    pub(crate) fn range<S: Into<String>>(row: usize, reason: S) -> Self {
        Error::BufferRange {
            row,
            reason: reason.into(),
        }
    }
}
