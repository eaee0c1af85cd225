// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Contains the PlaneMapper struct, which describes a relationship
//! between the integral raster, with row 0 at the top, and the
//! rectangle of the complex plane being rendered.  Rows grow downward
//! while the imaginary axis grows upward, so row 0 sits at `y_max`.
use num::Complex;

use config::{PlaneWindow, RasterDimensions};

/// Describes the column, row of a pixel in the raster.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pixel(pub usize, pub usize);

/// Maps raster positions onto the complex plane.
#[derive(Copy, Clone, Debug)]
pub struct PlaneMapper {
    /// The raster being mapped.
    pub dimensions: RasterDimensions,
    /// The region of the complex plane being mapped onto.
    pub window: PlaneWindow,
    // Width and height of a single pixel on the complex plane.
    step: (f64, f64),
}

impl PlaneMapper {
    /// Both inputs are already validated, so construction cannot fail.
    pub fn new(dimensions: RasterDimensions, window: PlaneWindow) -> PlaneMapper {
        let step = (
            (window.x_max() - window.x_min()) / (dimensions.width() as f64),
            (window.y_max() - window.y_min()) / (dimensions.height() as f64),
        );
        PlaneMapper {
            dimensions,
            window,
            step,
        }
    }

    /// Horizontal size of one pixel, `dx`.
    pub fn dx(&self) -> f64 {
        self.step.0
    }

    /// Vertical size of one pixel, `dy`.
    pub fn dy(&self) -> f64 {
        self.step.1
    }

    /// The real coordinate of a column's left edge.
    pub fn column_to_x(&self, column: usize) -> f64 {
        self.window.x_min() + (column as f64) * self.step.0
    }

    /// The imaginary coordinate of a row's top edge.
    pub fn row_to_y(&self, row: usize) -> f64 {
        self.window.y_max() - (row as f64) * self.step.1
    }

    /// The top and bottom imaginary coordinates of a row.
    pub fn row_span(&self, row: usize) -> (f64, f64) {
        let top = self.row_to_y(row);
        (top, top - self.step.1)
    }

    /// Given a pixel in the raster, return the point on the complex
    /// plane at its upper-left corner.
    pub fn pixel_to_point(&self, pixel: &Pixel) -> Complex<f64> {
        Complex::new(self.column_to_x(pixel.0), self.row_to_y(pixel.1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapper(width: usize, height: usize, bounds: (f64, f64, f64, f64)) -> PlaneMapper {
        PlaneMapper::new(
            RasterDimensions::new(width, height).unwrap(),
            PlaneWindow::new(bounds.0, bounds.1, bounds.2, bounds.3).unwrap(),
        )
    }

    #[test]
    fn steps_divide_the_window_evenly() {
        let pm = mapper(4, 8, (-2.0, 2.0, -2.0, 2.0));
        assert_eq!(pm.dx(), 1.0);
        assert_eq!(pm.dy(), 0.5);
    }

    #[test]
    fn pixel_to_point_on_positive_planes() {
        let pm = mapper(5, 5, (0.0, 5.0, 0.0, 5.0));
        assert_eq!(pm.pixel_to_point(&Pixel(0, 0)), Complex::new(0.0, 5.0));
        assert_eq!(pm.pixel_to_point(&Pixel(2, 2)), Complex::new(2.0, 3.0));
        assert_eq!(pm.pixel_to_point(&Pixel(4, 4)), Complex::new(4.0, 1.0));
    }

    #[test]
    fn pixel_to_points_on_mixed_planes() {
        let pm = mapper(4, 4, (-2.0, 2.0, -2.0, 2.0));
        assert_eq!(pm.pixel_to_point(&Pixel(2, 2)), Complex::new(0.0, 0.0));
        assert_eq!(pm.pixel_to_point(&Pixel(0, 0)), Complex::new(-2.0, 2.0));
        assert_eq!(pm.pixel_to_point(&Pixel(4, 4)), Complex::new(2.0, -2.0));
    }

    #[test]
    fn row_span_covers_one_pixel() {
        let pm = mapper(4, 4, (-2.0, 2.0, -2.0, 2.0));
        assert_eq!(pm.row_span(0), (2.0, 1.0));
        assert_eq!(pm.row_span(3), (-1.0, -2.0));
    }
}
