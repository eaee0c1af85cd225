// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The full-resolution image store.
//!
//! An `ImageBuffer` is allocated zeroed at full size, accepts each row
//! exactly once, and cannot be read.  Once the gather is over it is
//! consumed by `finalize` into a `FinishedImage`, which can only be
//! read.  Rows that no worker wrote stay zero (black).

use config::RasterDimensions;
use error::{Error, Result};
use row::PixelRow;

/// Write side of the image, owned by the assembler during a render.
#[derive(Debug)]
pub struct ImageBuffer {
    dimensions: RasterDimensions,
    pixels: Vec<u8>,
    written: Vec<bool>,
}

impl ImageBuffer {
    /// A zeroed `width x height` buffer.
    pub fn allocate(dimensions: RasterDimensions) -> Self {
        ImageBuffer {
            dimensions,
            pixels: vec![0 as u8; dimensions.len()],
            written: vec![false; dimensions.height()],
        }
    }

    /// Copy `row` into place.  Fails when the index is past the last
    /// row, when the row is not exactly one image width long, or when
    /// the row has already been written.
    pub fn write_row(&mut self, index: usize, row: &PixelRow) -> Result<()> {
        let (width, height) = (self.dimensions.width(), self.dimensions.height());
        if index >= height {
            return Err(Error::range(
                index,
                format!("index past the last row ({})", height - 1),
            ));
        }
        if row.len() != width {
            return Err(Error::range(
                index,
                format!("row length {} does not match width {}", row.len(), width),
            ));
        }
        if self.written[index] {
            return Err(Error::range(index, "row written twice"));
        }
        let start = index * width;
        self.pixels[start..start + width].copy_from_slice(row);
        self.written[index] = true;
        Ok(())
    }

    /// Close the buffer for writing and open it for reading.
    pub fn finalize(self) -> FinishedImage {
        FinishedImage {
            dimensions: self.dimensions,
            pixels: self.pixels,
            written: self.written,
        }
    }
}

/// Read side of the image, available once every round is done.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FinishedImage {
    dimensions: RasterDimensions,
    pixels: Vec<u8>,
    written: Vec<bool>,
}

impl FinishedImage {
    /// An image where every row is populated, used by the single
    /// threaded renderer.
    pub(crate) fn from_pixels(dimensions: RasterDimensions, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(pixels.len(), dimensions.len());
        FinishedImage {
            dimensions,
            pixels,
            written: vec![true; dimensions.height()],
        }
    }

    /// Pixels per row.
    pub fn width(&self) -> usize {
        self.dimensions.width()
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.dimensions.height()
    }

    /// All intensities, row-major.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// One row's intensities.
    pub fn row(&self, index: usize) -> Option<&[u8]> {
        if index >= self.height() {
            return None;
        }
        let width = self.width();
        Some(&self.pixels[index * width..(index + 1) * width])
    }

    /// Whether some worker delivered this row.
    pub fn is_populated(&self, index: usize) -> bool {
        self.written.get(index).cloned().unwrap_or(false)
    }

    /// Count of delivered rows.
    pub fn populated_rows(&self) -> usize {
        self.written.iter().filter(|w| **w).count()
    }
}
