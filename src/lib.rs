#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Mandelbrot renderer over a worker group
//!
//! Every pixel is classified by its escape time: the point `c` is
//! iterated as `z = z * z + c` from zero, and the number of iterations
//! it survives inside the radius-two circle, scaled onto a byte, is its
//! gray level.  Points in the set never escape and come out white.
//!
//! The arithmetic is cheap; the interesting part is how the rows get
//! shared out.  A fixed group of ranks shares no memory and talks only
//! through blocking point-to-point transfers.  Rows are dealt out
//! round-robin, so in round `k` rank `r` computes row `k * N + r`.  Rank
//! 0, the assembler, owns the only full-size image buffer: each round it
//! stores its own row and then receives one row from every other rank,
//! always in ascending rank order, so the finished image is identical
//! from run to run no matter which rank finishes first.
//!
//! When the height is not a multiple of the group size, only
//! `floor(height / N)` rounds run and the trailing rows stay black.

extern crate crossbeam;
#[macro_use]
extern crate failure;
extern crate image;
#[macro_use]
extern crate itertools;
#[macro_use]
extern crate log;
extern crate num;

pub mod buffer;
pub mod config;
pub mod error;
pub mod gather;
pub mod group;
pub mod kernel;
pub mod partition;
pub mod planes;
pub mod ppm;
pub mod row;
pub mod transport;

pub use buffer::{FinishedImage, ImageBuffer};
pub use config::{IterationBound, PlaneWindow, RasterDimensions, RenderConfig};
pub use error::{Error, Result};
pub use gather::{GatherProtocol, Role, WorkerReport};
pub use group::{render, render_direct, run_with, Rendering};
pub use partition::Partitioner;
pub use ppm::write_ppm;
pub use row::{PixelRow, RowComputer};
pub use transport::{ChannelTransport, RowMessage, Transport};
