// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The per-round gather protocol every rank runs.
//!
//! Each round starts with every rank computing the row it owns.  A
//! worker then sends that row to the assembler and moves on.  The
//! assembler copies its own row straight into the image and then
//! receives one row from each other rank in ascending rank order,
//! whatever order they actually finish in, so the image layout never
//! depends on timing.  The blocking send/receive pairs are the only
//! synchronization between rounds.

use std::time::{Duration, Instant};

use buffer::{FinishedImage, ImageBuffer};
use config::RenderConfig;
use error::{Error, Result};
use partition::Partitioner;
use planes::PlaneMapper;
use row::{PixelRow, RowComputer};
use transport::{RowMessage, Transport, IMAGE_ROW_TAG};

/// Rank of the worker that owns the image.
pub const ASSEMBLER_RANK: usize = 0;

/// What a rank does with the rows it computes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Role {
    /// Owns the image buffer and collects every other rank's rows.
    Assembler,
    /// Sends its rows to the assembler.
    Worker,
}

impl Role {
    /// Roles are fixed by rank for the life of the group.
    pub fn for_rank(rank: usize) -> Role {
        if rank == ASSEMBLER_RANK {
            Role::Assembler
        } else {
            Role::Worker
        }
    }
}

/// How one rank spent its run.
#[derive(Clone, Debug, PartialEq)]
pub struct WorkerReport {
    /// The rank reporting.
    pub rank: usize,
    /// Its role.
    pub role: Role,
    /// Rows it computed, one per round.
    pub rows_computed: usize,
    /// Wall time from the first round to the last.
    pub elapsed: Duration,
}

/// What a rank hands back when the rounds are done.  Only the
/// assembler has an image.
#[derive(Debug)]
pub struct Outcome {
    /// The finished image, for the assembler only.
    pub image: Option<FinishedImage>,
    /// Timing for this rank.
    pub report: WorkerReport,
}

/// One rank's copy of the protocol.
#[derive(Debug)]
pub struct GatherProtocol {
    rank: usize,
    role: Role,
    partitioner: Partitioner,
    rows: RowComputer,
    config: RenderConfig,
}

impl GatherProtocol {
    /// Set up `rank` of a group of `group_size`.
    pub fn new(config: &RenderConfig, rank: usize, group_size: usize) -> Result<Self> {
        if group_size == 0 {
            return Err(Error::config("a worker group needs at least one worker"));
        }
        if rank >= group_size {
            return Err(Error::config(format!(
                "rank {} is outside a group of {}",
                rank, group_size
            )));
        }
        let plane = PlaneMapper::new(config.dimensions, config.window);
        Ok(GatherProtocol {
            rank,
            role: Role::for_rank(rank),
            partitioner: Partitioner::new(group_size, config.dimensions.height()),
            rows: RowComputer::new(plane, config.iterations.get()),
            config: config.clone(),
        })
    }

    /// This rank's role.
    pub fn role(&self) -> Role {
        self.role
    }

    /// The partitioner in use.
    pub fn partitioner(&self) -> &Partitioner {
        &self.partitioner
    }

    /// Run every round over `transport`, which must be this rank's
    /// endpoint of a group of the expected size.
    pub fn run<T: Transport>(&self, transport: &T) -> Result<Outcome> {
        if transport.rank() != self.rank || transport.size() != self.partitioner.group_size() {
            return Err(Error::transport(format!(
                "endpoint is rank {} of {}, expected rank {} of {}",
                transport.rank(),
                transport.size(),
                self.rank,
                self.partitioner.group_size()
            )));
        }
        let started = Instant::now();
        let image = match self.role {
            Role::Assembler => Some(self.assemble(transport)?),
            Role::Worker => {
                self.contribute(transport)?;
                None
            }
        };
        let report = WorkerReport {
            rank: self.rank,
            role: self.role,
            rows_computed: self.partitioner.round_plan(),
            elapsed: started.elapsed(),
        };
        debug!(
            "rank {} ({:?}) computed {} rows in {:?}",
            report.rank, report.role, report.rows_computed, report.elapsed
        );
        Ok(Outcome { image, report })
    }

    fn compute(&self, round: usize) -> PixelRow {
        trace!("rank {} computing round {}", self.rank, round);
        self.rows.compute_assigned(&self.partitioner, round, self.rank)
    }

    fn contribute<T: Transport>(&self, transport: &T) -> Result<()> {
        for round in 0..self.partitioner.round_plan() {
            let row = self.compute(round);
            transport.send(ASSEMBLER_RANK, RowMessage::image_row(round, self.rank, row))?;
        }
        Ok(())
    }

    fn assemble<T: Transport>(&self, transport: &T) -> Result<FinishedImage> {
        let mut buffer = ImageBuffer::allocate(self.config.dimensions);
        let group_size = self.partitioner.group_size();
        for round in 0..self.partitioner.round_plan() {
            let own = self.compute(round);
            buffer.write_row(self.partitioner.row_for(round, self.rank), &own)?;
            for source in (0..group_size).filter(|r| *r != ASSEMBLER_RANK) {
                let message = transport.receive(source)?;
                self.check(&message, round, source)?;
                buffer.write_row(self.partitioner.row_for(round, source), &message.pixels)?;
            }
            trace!("round {} assembled", round);
        }
        Ok(buffer.finalize())
    }

    fn check(&self, message: &RowMessage, round: usize, source: usize) -> Result<()> {
        if message.tag != IMAGE_ROW_TAG {
            return Err(Error::transport(format!(
                "rank {} sent tag {} where an image row was expected",
                source, message.tag
            )));
        }
        if message.rank != source || message.round != round {
            return Err(Error::transport(format!(
                "expected round {} from rank {}, got round {} from rank {}",
                round, source, message.round, message.rank
            )));
        }
        let width = self.config.dimensions.width();
        if message.pixels.len() != width {
            return Err(Error::transport(format!(
                "rank {} sent a {} byte row, expected {}",
                source,
                message.pixels.len(),
                width
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn config(width: usize, height: usize) -> RenderConfig {
        RenderConfig::from_raw((-2.0, 2.0, -2.0, 2.0), (width, height), 50, "t.ppm".into())
            .unwrap()
    }

    // A transport that records sends and replays canned receives.
    struct Scripted {
        rank: usize,
        size: usize,
        sent: RefCell<Vec<(usize, RowMessage)>>,
        inbox: RefCell<Vec<RowMessage>>,
    }

    impl Scripted {
        fn new(rank: usize, size: usize, inbox: Vec<RowMessage>) -> Self {
            Scripted {
                rank,
                size,
                sent: RefCell::new(vec![]),
                inbox: RefCell::new(inbox),
            }
        }
    }

    impl Transport for Scripted {
        fn rank(&self) -> usize {
            self.rank
        }
        fn size(&self) -> usize {
            self.size
        }
        fn send(&self, dest: usize, message: RowMessage) -> Result<()> {
            self.sent.borrow_mut().push((dest, message));
            Ok(())
        }
        fn receive(&self, _source: usize) -> Result<RowMessage> {
            let mut inbox = self.inbox.borrow_mut();
            if inbox.is_empty() {
                return Err(Error::transport("script exhausted"));
            }
            Ok(inbox.remove(0))
        }
    }

    #[test]
    fn roles_are_fixed_by_rank() {
        assert_eq!(Role::for_rank(0), Role::Assembler);
        assert_eq!(Role::for_rank(1), Role::Worker);
        assert_eq!(Role::for_rank(7), Role::Worker);
        let config = config(4, 4);
        let roles: Vec<Role> = (0..3)
            .map(|rank| GatherProtocol::new(&config, rank, 3).unwrap().role())
            .collect();
        assert_eq!(roles, vec![Role::Assembler, Role::Worker, Role::Worker]);
    }

    #[test]
    fn bad_ranks_are_configuration_errors() {
        assert!(GatherProtocol::new(&config(4, 4), 0, 0).is_err());
        assert!(GatherProtocol::new(&config(4, 4), 2, 2).is_err());
    }

    #[test]
    fn worker_sends_one_tagged_row_per_round() {
        let protocol = GatherProtocol::new(&config(4, 5), 1, 2).unwrap();
        let transport = Scripted::new(1, 2, vec![]);
        let outcome = protocol.run(&transport).unwrap();
        assert!(outcome.image.is_none());
        assert_eq!(outcome.report.rows_computed, 2);
        let sent = transport.sent.into_inner();
        assert_eq!(sent.len(), 2);
        for (round, (dest, message)) in sent.iter().enumerate() {
            assert_eq!(*dest, ASSEMBLER_RANK);
            assert_eq!(message.tag, IMAGE_ROW_TAG);
            assert_eq!(message.round, round);
            assert_eq!(message.rank, 1);
            assert_eq!(message.pixels.len(), 4);
        }
    }

    #[test]
    fn assembler_places_peer_rows_by_rank() {
        let row = |v: u8| PixelRow::from_vec(vec![v; 4]);
        let inbox = vec![
            RowMessage::image_row(0, 1, row(11)),
            RowMessage::image_row(1, 1, row(13)),
        ];
        let protocol = GatherProtocol::new(&config(4, 4), 0, 2).unwrap();
        let outcome = protocol.run(&Scripted::new(0, 2, inbox)).unwrap();
        let image = outcome.image.unwrap();
        assert_eq!(image.row(1), Some(&[11u8; 4][..]));
        assert_eq!(image.row(3), Some(&[13u8; 4][..]));
        assert_eq!(image.populated_rows(), 4);
    }

    #[test]
    fn short_row_is_a_transport_error() {
        let inbox = vec![RowMessage::image_row(0, 1, PixelRow::from_vec(vec![1, 2, 3]))];
        let protocol = GatherProtocol::new(&config(4, 4), 0, 2).unwrap();
        match protocol.run(&Scripted::new(0, 2, inbox)) {
            Err(Error::Transport(msg)) => assert!(msg.contains("3 byte row")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn out_of_order_round_is_a_transport_error() {
        let inbox = vec![RowMessage::image_row(1, 1, PixelRow::from_vec(vec![0; 4]))];
        let protocol = GatherProtocol::new(&config(4, 4), 0, 2).unwrap();
        assert!(protocol.run(&Scripted::new(0, 2, inbox)).is_err());
    }

    #[test]
    fn foreign_tag_is_a_transport_error() {
        let mut message = RowMessage::image_row(0, 1, PixelRow::from_vec(vec![0; 4]));
        message.tag = 99;
        let protocol = GatherProtocol::new(&config(4, 4), 0, 2).unwrap();
        match protocol.run(&Scripted::new(0, 2, vec![message])) {
            Err(Error::Transport(msg)) => assert!(msg.contains("tag 99")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn mismatched_endpoint_is_rejected() {
        let protocol = GatherProtocol::new(&config(4, 4), 0, 2).unwrap();
        assert!(protocol.run(&Scripted::new(0, 3, vec![])).is_err());
    }
}
