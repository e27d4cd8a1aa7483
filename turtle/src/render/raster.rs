// pathfinder/turtle/src/render/raster.rs
//
// Copyright © 2019 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Software raster targets and the platform surface seam.

use crate::error::RenderError;
use crate::render::geometry::Point2DF32;
use image::{Rgba, RgbaImage};

/// Something strokes can be drawn on, in device pixels.
pub trait Canvas {
    fn size(&self) -> (u32, u32);

    /// Strokes a round-capped, anti-aliased segment.
    fn stroke_line(&mut self, from: Point2DF32, to: Point2DF32, width: f32, color: Rgba<u8>);
}

/// What a surface thinks of a buffer it handed out earlier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BufferStatus {
    Ok,
    /// Still usable, but its pixels are gone.
    Restored,
    /// Must be replaced.
    Incompatible,
}

/// The destination of a paint call.
pub trait Surface: Canvas {
    fn allocate_buffer(&mut self, width: u32, height: u32) -> Result<RasterBuffer, RenderError> {
        RasterBuffer::new(width, height)
    }

    fn validate(&mut self, _buffer: &RasterBuffer) -> BufferStatus {
        BufferStatus::Ok
    }

    /// Copies `buffer` to the top left corner of the surface.
    fn blit(&mut self, buffer: &RasterBuffer);

    /// Whether the last blit was lost and has to be redone.
    fn contents_lost(&mut self) -> bool {
        false
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RasterBuffer {
    image: RgbaImage,
}

impl RasterBuffer {
    pub const MAX_DIMENSION: u32 = 16384;

    pub fn new(width: u32, height: u32) -> Result<RasterBuffer, RenderError> {
        if width == 0
            || height == 0
            || width > RasterBuffer::MAX_DIMENSION
            || height > RasterBuffer::MAX_DIMENSION
        {
            return Err(RenderError::BufferAllocation { width, height });
        }
        Ok(RasterBuffer {
            image: RgbaImage::new(width, height),
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        *self.image.get_pixel(x, y)
    }

    pub fn fill(&mut self, color: Rgba<u8>) {
        for pixel in self.image.pixels_mut() {
            *pixel = color;
        }
    }

    #[inline]
    pub fn as_image(&self) -> &RgbaImage {
        &self.image
    }

    fn blend(&mut self, x: u32, y: u32, color: Rgba<u8>, coverage: f32) {
        let alpha = coverage * color[3] as f32 / 255.0;
        let pixel = self.image.get_pixel_mut(x, y);
        for channel in 0..3 {
            let dest = pixel[channel] as f32;
            pixel[channel] = (dest + (color[channel] as f32 - dest) * alpha).round() as u8;
        }
        pixel[3] = 255;
    }
}

impl Canvas for RasterBuffer {
    #[inline]
    fn size(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    fn stroke_line(&mut self, from: Point2DF32, to: Point2DF32, width: f32, color: Rgba<u8>) {
        if !from.is_finite() || !to.is_finite() || !(width > 0.0) {
            return;
        }

        let radius = 0.5 * width;
        let reach = radius + 1.0;
        let x_range = pixel_range(from.x().min(to.x()) - reach, from.x().max(to.x()) + reach, self.width());
        let y_range = pixel_range(from.y().min(to.y()) - reach, from.y().max(to.y()) + reach, self.height());
        let (x_range, y_range) = match (x_range, y_range) {
            (Some(x_range), Some(y_range)) => (x_range, y_range),
            _ => return,
        };

        let (dx, dy) = (to.x() - from.x(), to.y() - from.y());
        let length_squared = dx * dx + dy * dy;

        for y in y_range.0..y_range.1 {
            for x in x_range.0..x_range.1 {
                let (px, py) = (x as f32 + 0.5, y as f32 + 0.5);
                let t = if length_squared > 0.0 {
                    (((px - from.x()) * dx + (py - from.y()) * dy) / length_squared)
                        .max(0.0)
                        .min(1.0)
                } else {
                    0.0
                };
                let distance = (px - (from.x() + t * dx)).hypot(py - (from.y() + t * dy));
                let coverage = (radius + 0.5 - distance).max(0.0).min(1.0);
                if coverage > 0.0 {
                    self.blend(x, y, color, coverage);
                }
            }
        }
    }
}

impl Surface for RasterBuffer {
    fn blit(&mut self, buffer: &RasterBuffer) {
        let width = self.width().min(buffer.width());
        let height = self.height().min(buffer.height());
        for y in 0..height {
            for x in 0..width {
                self.image.put_pixel(x, y, buffer.pixel(x, y));
            }
        }
    }
}

/// Pixels touched by `[min, max]`, clipped to `0..limit`.
fn pixel_range(min: f32, max: f32, limit: u32) -> Option<(u32, u32)> {
    let start = min.floor().max(0.0);
    let end = max.ceil().min(limit as f32);
    if start >= end {
        return None;
    }
    Some((start as u32, end as u32))
}
