// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Scanlines and the loop that fills them.

use std::ops::Deref;

use kernel::pixel_value;
use partition::Partitioner;
use planes::{Pixel, PlaneMapper};

/// One horizontal scanline of byte intensities.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelRow(Vec<u8>);

impl PixelRow {
    /// Wrap raw intensities.  Length is checked by whoever consumes the
    /// row, not here, so that a bad transfer can be reported as such.
    pub fn from_vec(pixels: Vec<u8>) -> Self {
        PixelRow(pixels)
    }

    /// Hand back the intensities.
    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }
}

impl Deref for PixelRow {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

/// Computes single rows of the image.
#[derive(Copy, Clone, Debug)]
pub struct RowComputer {
    plane: PlaneMapper,
    limit: u32,
}

impl RowComputer {
    /// `limit` is the escape-time iteration cap.
    pub fn new(plane: PlaneMapper, limit: u32) -> Self {
        RowComputer { plane, limit }
    }

    /// Sample every column of global row `row` along the row's top edge.
    pub fn compute(&self, row: usize) -> PixelRow {
        let width = self.plane.dimensions.width();
        let pixels = (0..width)
            .map(|column| pixel_value(self.plane.pixel_to_point(&Pixel(column, row)), self.limit))
            .collect();
        PixelRow(pixels)
    }

    /// The row `rank` owns in `round`.
    pub fn compute_assigned(&self, partitioner: &Partitioner, round: usize, rank: usize) -> PixelRow {
        self.compute(partitioner.row_for(round, rank))
    }
}
