//! Background raster: a per-pixel image behind the chart, such as a map of
//! Milky Way brightness. Every pixel is inverse-projected independently.

use rayon::prelude::*;

use crate::canvas::PagePoint;
use crate::chart::Chart;
use crate::coords::SkyPoint;
use crate::log::debug;

/// An 8-bit RGBA pixel
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba { r: 0, g: 0, b: 0, a: 0 };

    pub fn opaque(r: u8, g: u8, b: u8) -> Self {
        Rgba { r, g, b, a: 255 }
    }
}

/// Row-major image covering the plot area
#[derive(Clone, Debug, PartialEq)]
pub struct BackgroundImage {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<Rgba>,
}

impl BackgroundImage {
    pub fn get(&self, x: usize, y: usize) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(y * self.width + x).copied()
    }
}

/// Render a background image `width_px` wide over the plot area of
/// `chart`; the height follows the chart's aspect ratio.
///
/// `sampler` gets the sky position under each pixel centre, in the chart's
/// coordinate frame. Pixels off the projection, or below the horizon when
/// the chart clips it, are transparent.
pub fn render_background<F>(chart: &Chart, width_px: usize, sampler: F) -> BackgroundImage
where
    F: Fn(SkyPoint) -> Rgba + Sync,
{
    let aspect = chart.canvas().layout().aspect;
    let height = (width_px as f64 * aspect).round() as usize;
    debug!("rendering {}x{} background", width_px, height);

    let mut pixels = vec![Rgba::TRANSPARENT; width_px * height];
    if width_px == 0 || height == 0 {
        return BackgroundImage { width: width_px, height, pixels };
    }

    let canvas = chart.canvas();
    let projection = chart.projection();
    pixels
        .par_chunks_mut(width_px)
        .enumerate()
        .for_each(|(row, line)| {
            let v = (row as f64 + 0.5) / height as f64;
            for (col, px) in line.iter_mut().enumerate() {
                let u = (col as f64 + 0.5) / width_px as f64;
                let t = canvas.page_to_tangent(PagePoint::new(u, v));
                let sky = projection.inverse_project(t);
                if sky.is_finite() && projection.is_above_horizon(sky) {
                    *px = sampler(sky);
                }
            }
        });

    BackgroundImage { width: width_px, height, pixels }
}
