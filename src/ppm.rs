// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Binary PPM output.  The image is single channel; each intensity is
//! written as an R=G=B triplet.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::iter;
use std::path::Path;

use image::pnm::{PNMEncoder, PNMSubtype, SampleEncoding};
use image::ColorType;

use buffer::FinishedImage;
use error::Result;

/// Expand gray intensities into RGB triplets, row-major.
pub fn gray_to_rgb(pixels: &[u8]) -> Vec<u8> {
    pixels
        .iter()
        .flat_map(|p| iter::repeat(*p).take(3))
        .collect()
}

/// Encode `image` as a `P6` pixmap onto `writer`.
pub fn encode_ppm<W: Write>(writer: W, image: &FinishedImage) -> Result<()> {
    let rgb = gray_to_rgb(image.pixels());
    let mut encoder =
        PNMEncoder::new(writer).with_subtype(PNMSubtype::Pixmap(SampleEncoding::Binary));
    encoder.encode(
        &rgb[..],
        image.width() as u32,
        image.height() as u32,
        ColorType::RGB(8),
    )?;
    Ok(())
}

/// Create (or truncate) `path` and write `image` into it.
pub fn write_ppm<P: AsRef<Path>>(path: P, image: &FinishedImage) -> Result<()> {
    let output = BufWriter::new(File::create(path)?);
    encode_ppm(output, image)
}
