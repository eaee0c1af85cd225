// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Validated render configuration.  Every value here is checked once,
//! when it is built, and is read-only afterwards; the rest of the crate
//! assumes the invariants hold.

use std::path::PathBuf;

use error::{Error, Result};

/// Default bounds of the rendered window.
pub const DEFAULT_WINDOW: (f64, f64, f64, f64) = (-1.78, 0.78, -0.961, 0.961);
/// Default raster size, width by height.
pub const DEFAULT_DIMENSIONS: (usize, usize) = (1024, 768);
/// Default escape-time iteration cap.
pub const DEFAULT_ITERATIONS: u32 = 100;
/// Default output file.
pub const DEFAULT_OUTPUT: &str = "mandel.ppm";

/// The rectangle of the complex plane being rendered.  The real part
/// runs along x, the imaginary part along y.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PlaneWindow {
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
}

impl PlaneWindow {
    /// Fails unless every bound is finite, `x_min < x_max` and `y_min < y_max`.
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Result<Self> {
        if ![x_min, x_max, y_min, y_max].iter().all(|v| v.is_finite()) {
            return Err(Error::config("plane bounds must be finite numbers"));
        }
        if x_min >= x_max {
            return Err(Error::config(format!(
                "x_min ({}) must be less than x_max ({})",
                x_min, x_max
            )));
        }
        if y_min >= y_max {
            return Err(Error::config(format!(
                "y_min ({}) must be less than y_max ({})",
                y_min, y_max
            )));
        }
        Ok(PlaneWindow {
            x_min,
            x_max,
            y_min,
            y_max,
        })
    }

    /// Left edge.
    pub fn x_min(&self) -> f64 {
        self.x_min
    }

    /// Right edge.
    pub fn x_max(&self) -> f64 {
        self.x_max
    }

    /// Bottom edge.
    pub fn y_min(&self) -> f64 {
        self.y_min
    }

    /// Top edge.  Row 0 of the raster sits here.
    pub fn y_max(&self) -> f64 {
        self.y_max
    }
}

impl Default for PlaneWindow {
    fn default() -> Self {
        let (x_min, x_max, y_min, y_max) = DEFAULT_WINDOW;
        PlaneWindow {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }
}

/// Raster size in pixels.  Both sides are at least one.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RasterDimensions {
    width: usize,
    height: usize,
}

impl RasterDimensions {
    /// Fails on a zero side, a side that does not fit the image header's
    /// 32-bit fields, or a pixel count that overflows `usize`.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::config(format!(
                "image dimensions must be positive, got {}x{}",
                width, height
            )));
        }
        let side_limit = u32::max_value() as u64;
        if width as u64 > side_limit || height as u64 > side_limit {
            return Err(Error::config(format!(
                "image sides must not exceed {}, got {}x{}",
                side_limit, width, height
            )));
        }
        if width.checked_mul(height).is_none() {
            return Err(Error::config(format!(
                "image of {}x{} pixels is too large to address",
                width, height
            )));
        }
        Ok(RasterDimensions { width, height })
    }

    /// Pixels per row.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Rows in the image.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Total pixel count.
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    /// Always false for a validated value; present for symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for RasterDimensions {
    fn default() -> Self {
        RasterDimensions {
            width: DEFAULT_DIMENSIONS.0,
            height: DEFAULT_DIMENSIONS.1,
        }
    }
}

/// Positive cap on escape-time iterations.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct IterationBound(u32);

impl IterationBound {
    /// Fails on zero.
    pub fn new(limit: u32) -> Result<Self> {
        if limit == 0 {
            return Err(Error::config("iteration bound must be positive"));
        }
        Ok(IterationBound(limit))
    }

    /// The cap itself.
    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for IterationBound {
    fn default() -> Self {
        IterationBound(DEFAULT_ITERATIONS)
    }
}

/// Everything a render needs, validated.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderConfig {
    /// Region of the complex plane.
    pub window: PlaneWindow,
    /// Raster size.
    pub dimensions: RasterDimensions,
    /// Escape-time cap.
    pub iterations: IterationBound,
    /// Where the binary writes the image.  The library never touches it.
    pub output: PathBuf,
}

impl RenderConfig {
    /// Assemble a configuration from already-validated parts.
    pub fn new(
        window: PlaneWindow,
        dimensions: RasterDimensions,
        iterations: IterationBound,
        output: PathBuf,
    ) -> Self {
        RenderConfig {
            window,
            dimensions,
            iterations,
            output,
        }
    }

    /// Build and validate a configuration from raw values in one step.
    pub fn from_raw(
        bounds: (f64, f64, f64, f64),
        size: (usize, usize),
        iterations: u32,
        output: PathBuf,
    ) -> Result<Self> {
        Ok(RenderConfig::new(
            PlaneWindow::new(bounds.0, bounds.1, bounds.2, bounds.3)?,
            RasterDimensions::new(size.0, size.1)?,
            IterationBound::new(iterations)?,
            output,
        ))
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            window: PlaneWindow::default(),
            dimensions: RasterDimensions::default(),
            iterations: IterationBound::default(),
            output: PathBuf::from(DEFAULT_OUTPUT),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_rejects_inverted_bounds() {
        assert!(PlaneWindow::new(1.0, -1.0, -1.0, 1.0).is_err());
        assert!(PlaneWindow::new(-1.0, 1.0, 1.0, -1.0).is_err());
    }

    #[test]
    fn window_rejects_degenerate_and_nan_bounds() {
        assert!(PlaneWindow::new(0.5, 0.5, -1.0, 1.0).is_err());
        assert!(PlaneWindow::new(::std::f64::NAN, 1.0, -1.0, 1.0).is_err());
        assert!(PlaneWindow::new(-1.0, ::std::f64::INFINITY, -1.0, 1.0).is_err());
    }

    #[test]
    fn dimensions_reject_zero() {
        assert!(RasterDimensions::new(0, 10).is_err());
        assert!(RasterDimensions::new(10, 0).is_err());
        assert_eq!(RasterDimensions::new(4, 5).unwrap().len(), 20);
    }

    #[test]
    fn dimensions_reject_sides_too_wide_for_the_header() {
        let too_wide = u32::max_value() as u64 + 1;
        if too_wide <= usize::max_value() as u64 {
            let side = too_wide as usize;
            match RasterDimensions::new(side, 1) {
                Err(Error::Configuration(msg)) => assert!(msg.contains("must not exceed"), "{}", msg),
                other => panic!("unexpected {:?}", other),
            }
            assert!(RasterDimensions::new(1, side).is_err());
        }
        let widest = u32::max_value() as usize;
        assert_eq!(RasterDimensions::new(widest, 1).unwrap().width(), widest);
    }

    #[test]
    fn dimensions_reject_unaddressable_pixel_counts() {
        let side = u32::max_value() as usize;
        match side.checked_mul(side) {
            Some(_) => assert!(RasterDimensions::new(side, side).is_ok()),
            None => match RasterDimensions::new(side, side) {
                Err(Error::Configuration(msg)) => assert!(msg.contains("too large"), "{}", msg),
                other => panic!("unexpected {:?}", other),
            },
        }
    }

    #[test]
    fn iteration_bound_rejects_zero() {
        assert!(IterationBound::new(0).is_err());
        assert_eq!(IterationBound::new(50).unwrap().get(), 50);
    }

    #[test]
    fn defaults_match_the_classic_render() {
        let config = RenderConfig::default();
        assert_eq!(config.window.x_min(), -1.78);
        assert_eq!(config.window.y_max(), 0.961);
        assert_eq!(config.dimensions.width(), 1024);
        assert_eq!(config.dimensions.height(), 768);
        assert_eq!(config.iterations.get(), 100);
        assert_eq!(config.output, PathBuf::from("mandel.ppm"));
    }

    #[test]
    fn from_raw_reports_configuration_errors() {
        match RenderConfig::from_raw((-2.0, 2.0, -2.0, 2.0), (0, 4), 50, "x.ppm".into()) {
            Err(Error::Configuration(_)) => {}
            other => panic!("unexpected {:?}", other),
        }
    }
}
