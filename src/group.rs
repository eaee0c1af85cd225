// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Starting and stopping a worker group.
//!
//! Each rank runs on its own scoped thread and owns exactly one
//! transport endpoint plus a copy of the configuration; nothing else is
//! shared.  When every thread has returned, the assembler's image and
//! every rank's report are handed back together.

use std::time::Duration;

use crossbeam;

use buffer::FinishedImage;
use config::RenderConfig;
use error::{Error, Result};
use gather::{GatherProtocol, Outcome, WorkerReport};
use kernel::pixel_value;
use planes::{Pixel, PlaneMapper};
use transport::{ChannelTransport, Transport};

/// The result of a successful group render.
#[derive(Debug)]
pub struct Rendering {
    /// The assembled image.
    pub image: FinishedImage,
    /// One report per rank, in rank order.
    pub reports: Vec<WorkerReport>,
}

/// Render with `workers` ranks over in-process channels.  `timeout`
/// bounds every send and receive; `None` blocks indefinitely.
pub fn render(
    config: &RenderConfig,
    workers: usize,
    timeout: Option<Duration>,
) -> Result<Rendering> {
    if workers == 0 {
        return Err(Error::config("a worker group needs at least one worker"));
    }
    run_with(config, ChannelTransport::group(workers, timeout))
}

/// Render over caller-supplied endpoints.  `endpoints[i]` must be rank
/// `i` of a group of `endpoints.len()`.
pub fn run_with<T>(config: &RenderConfig, endpoints: Vec<T>) -> Result<Rendering>
where
    T: Transport + Send,
{
    let workers = endpoints.len();
    if workers == 0 {
        return Err(Error::config("a worker group needs at least one worker"));
    }
    let protocols = (0..workers)
        .map(|rank| GatherProtocol::new(config, rank, workers))
        .collect::<Result<Vec<_>>>()?;

    let partitioner = *protocols[0].partitioner();
    if partitioner.round_plan() == 0 {
        warn!(
            "{} workers for {} rows: no rounds will run",
            workers,
            config.dimensions.height()
        );
    } else if partitioner.remainder_rows() > 0 {
        warn!(
            "{} rows do not divide among {} workers; the last {} rows stay empty",
            config.dimensions.height(),
            workers,
            partitioner.remainder_rows()
        );
    }

    let results: Vec<::std::thread::Result<Result<Outcome>>> = crossbeam::scope(|spawner| {
        let handles: Vec<_> = protocols
            .into_iter()
            .zip(endpoints)
            .map(|(protocol, endpoint)| spawner.spawn(move |_| protocol.run(&endpoint)))
            .collect();
        handles.into_iter().map(|handle| handle.join()).collect()
    })
    .map_err(|_| Error::WorkerPanicked(0))?;

    let mut outcomes = Vec::with_capacity(workers);
    let mut failures = Vec::new();
    for (rank, result) in results.into_iter().enumerate() {
        match result {
            Ok(Ok(outcome)) => outcomes.push(outcome),
            Ok(Err(e)) => failures.push((rank, e)),
            // A panic is the root cause of whatever its peers saw.
            Err(_) => return Err(Error::WorkerPanicked(rank)),
        }
    }
    if !failures.is_empty() {
        return Err(root_cause(failures));
    }

    let mut image = None;
    let mut reports = Vec::with_capacity(workers);
    for outcome in outcomes {
        if outcome.image.is_some() {
            image = outcome.image;
        }
        reports.push(outcome.report);
    }
    let image = image.ok_or_else(|| Error::transport("the assembler returned no image"))?;
    info!(
        "{} workers assembled {} of {} rows",
        workers,
        image.populated_rows(),
        image.height()
    );
    Ok(Rendering { image, reports })
}

/// Pick the error to report from every rank that failed, in rank
/// order.  A hang-up only says the peer went away, so follow it to the
/// peer when that peer has an error of its own; otherwise the lowest
/// rank's error wins.
fn root_cause(mut failures: Vec<(usize, Error)>) -> Error {
    let mut pick = 0;
    for _ in 0..failures.len() {
        let hung_up = match failures[pick].1 {
            Error::Disconnected(peer) => Some(peer),
            _ => None,
        };
        let peer = match hung_up {
            Some(peer) => peer,
            None => return failures.swap_remove(pick).1,
        };
        match failures.iter().position(|(rank, _)| *rank == peer) {
            Some(index) => pick = index,
            None => break,
        }
    }
    failures.swap_remove(0).1
}

/// Render every row on the calling thread, with no partitioning.  This
/// is the reference a group render is compared against, and the serial
/// baseline for speed-up figures.
pub fn render_direct(config: &RenderConfig) -> FinishedImage {
    let plane = PlaneMapper::new(config.dimensions, config.window);
    let limit = config.iterations.get();
    let width = config.dimensions.width();
    let mut pixels = vec![0 as u8; config.dimensions.len()];
    for (row, column) in iproduct!(0..config.dimensions.height(), 0..width) {
        pixels[row * width + column] = pixel_value(plane.pixel_to_point(&Pixel(column, row)), limit);
    }
    FinishedImage::from_pixels(config.dimensions, pixels)
}
