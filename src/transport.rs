// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Point-to-point row transfer between ranks.
//!
//! A `Transport` is one rank's endpoint.  Sends and receives block; a
//! receive names the rank it wants to hear from, so messages from
//! other ranks never get in the way.  `ChannelTransport` wires a whole
//! group together with one rendezvous channel per ordered pair of
//! ranks: a send completes only once the peer has taken the message.

use std::time::Duration;

use crossbeam::channel::{self, Receiver, RecvTimeoutError, SendTimeoutError, Sender};

use error::{Error, Result};
use row::PixelRow;

/// Tag carried by every image-row payload.
pub const IMAGE_ROW_TAG: u32 = 1;

/// One computed row on its way to the assembler.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RowMessage {
    /// Payload kind; always `IMAGE_ROW_TAG` for rows.
    pub tag: u32,
    /// The round the row was computed in.
    pub round: usize,
    /// The rank that computed it.
    pub rank: usize,
    /// The scanline itself.
    pub pixels: PixelRow,
}

impl RowMessage {
    /// Tag a freshly computed row.
    pub fn image_row(round: usize, rank: usize, pixels: PixelRow) -> Self {
        RowMessage {
            tag: IMAGE_ROW_TAG,
            round,
            rank,
            pixels,
        }
    }
}

/// One rank's view of the worker group's message fabric.
pub trait Transport {
    /// This endpoint's rank.
    fn rank(&self) -> usize;

    /// Number of ranks in the group.
    fn size(&self) -> usize;

    /// Block until `dest` has accepted `message`.
    fn send(&self, dest: usize, message: RowMessage) -> Result<()>;

    /// Block until a message from `source` arrives.
    fn receive(&self, source: usize) -> Result<RowMessage>;
}

/// In-process transport over crossbeam channels.
pub struct ChannelTransport {
    rank: usize,
    // Indexed by destination rank.
    outgoing: Vec<Sender<RowMessage>>,
    // Indexed by source rank.
    incoming: Vec<Receiver<RowMessage>>,
    timeout: Option<Duration>,
}

impl ChannelTransport {
    /// Build all `size` endpoints of a group; element `i` is rank `i`.
    /// With a `timeout`, sends and receives that wait longer than it
    /// fail instead of blocking forever.
    pub fn group(size: usize, timeout: Option<Duration>) -> Vec<ChannelTransport> {
        let mut outgoing: Vec<Vec<Sender<RowMessage>>> =
            (0..size).map(|_| Vec::with_capacity(size)).collect();
        let mut incoming: Vec<Vec<Receiver<RowMessage>>> =
            (0..size).map(|_| Vec::with_capacity(size)).collect();
        for source in 0..size {
            for dest in 0..size {
                let (tx, rx) = channel::bounded(0);
                outgoing[source].push(tx);
                incoming[dest].push(rx);
            }
        }
        outgoing
            .into_iter()
            .zip(incoming)
            .enumerate()
            .map(|(rank, (outgoing, incoming))| ChannelTransport {
                rank,
                outgoing,
                incoming,
                timeout,
            })
            .collect()
    }

    fn peer(&self, other: usize) -> Result<()> {
        if other >= self.outgoing.len() {
            return Err(Error::transport(format!(
                "rank {} is not in a group of {}",
                other,
                self.outgoing.len()
            )));
        }
        if other == self.rank {
            return Err(Error::transport(format!(
                "rank {} cannot exchange rows with itself",
                other
            )));
        }
        Ok(())
    }
}

impl Transport for ChannelTransport {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.outgoing.len()
    }

    fn send(&self, dest: usize, message: RowMessage) -> Result<()> {
        self.peer(dest)?;
        let tx = &self.outgoing[dest];
        match self.timeout {
            None => tx.send(message).map_err(|_| Error::Disconnected(dest)),
            Some(timeout) => tx.send_timeout(message, timeout).map_err(|e| match e {
                SendTimeoutError::Timeout(_) => Error::transport(format!(
                    "send to rank {} timed out after {:?}",
                    dest, timeout
                )),
                SendTimeoutError::Disconnected(_) => Error::Disconnected(dest),
            }),
        }
    }

    fn receive(&self, source: usize) -> Result<RowMessage> {
        self.peer(source)?;
        let rx = &self.incoming[source];
        match self.timeout {
            None => rx.recv().map_err(|_| Error::Disconnected(source)),
            Some(timeout) => rx.recv_timeout(timeout).map_err(|e| match e {
                RecvTimeoutError::Timeout => Error::transport(format!(
                    "receive from rank {} timed out after {:?}",
                    source, timeout
                )),
                RecvTimeoutError::Disconnected => Error::Disconnected(source),
            }),
        }
    }
}
