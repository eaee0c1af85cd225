// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The escape-time kernel.  A point `c` on the complex plane is
//! iterated as `z = z * z + c`, starting from zero, until the orbit
//! leaves the circle of radius two or the iteration cap is reached.
//! The number of iterations the orbit survived is the pixel's value.

use num::{clamp, Complex};

/// Count the iterations `c` survives before `|z|^2 > 4`, up to `limit`.
/// Points that never escape return `limit` itself.
#[inline]
pub fn escape_time(c: Complex<f64>, limit: u32) -> u32 {
    let mut z: Complex<f64> = Complex { re: 0.0, im: 0.0 };
    let mut i = 0;
    while i < limit {
        z = z * z + c;
        if z.norm_sqr() > 4.0 {
            break;
        }
        i += 1;
    }
    i
}

/// Scale an escape time onto a byte, with `limit` mapping to 255.
#[inline]
pub fn intensity(escape: u32, limit: u32) -> u8 {
    let scaled = (f64::from(escape) / f64::from(limit) * 255.0).round();
    clamp(scaled, 0.0, 255.0) as u8
}

/// Escape time and scaling in one call.
#[inline]
pub fn pixel_value(c: Complex<f64>, limit: u32) -> u8 {
    intensity(escape_time(c, limit), limit)
}
