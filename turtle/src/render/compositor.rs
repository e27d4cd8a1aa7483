// pathfinder/turtle/src/render/compositor.rs
//
// Copyright © 2019 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Incremental painting of the drawing.
//!
//! Path strokes accumulate in a persistent buffer; each paint only strokes the
//! steps recorded since the previous one. The turtle itself is drawn on the
//! destination after the buffer is copied there and never enters the buffer.

use crate::error::RenderError;
use crate::path::Drawing;
use crate::pose::{ColorPercent, TurtlePose};
use crate::render::geometry::{Point2DF32, Transform2DF32};
use crate::render::raster::{BufferStatus, Canvas, RasterBuffer, Surface};
use image::Rgba;

/// Turtle units across the shorter side of the canvas.
pub const SCALE_BASE: f32 = 1850.0;

pub const MAX_BLIT_ATTEMPTS: usize = 8;

const HAIRLINE_STROKE_WIDTH: f32 = 1.0;

const TURTLE_OUTLINE: [(f32, f32); 5] = [
    (-20.0, -15.0),
    (-5.0, -15.0),
    (20.0, 0.0),
    (-5.0, 15.0),
    (-20.0, 15.0),
];
// The arrow sits a little ahead of the turtle's position.
const TURTLE_OFFSET: f32 = 8.0;
const TURTLE_STROKE_WIDTH: f32 = 9.0;

#[derive(Debug)]
pub struct Compositor {
    buffer: Option<RasterBuffer>,
    /// Steps of the live path already stroked into `buffer`.
    cursor: usize,
    background: Rgba<u8>,
    turtle_color: Rgba<u8>,
}

impl Compositor {
    pub fn new(background: ColorPercent, turtle_color: ColorPercent) -> Compositor {
        Compositor {
            buffer: None,
            cursor: 0,
            background: background.to_rgba(),
            turtle_color: turtle_color.to_rgba(),
        }
    }

    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[inline]
    pub fn buffer(&self) -> Option<&RasterBuffer> {
        self.buffer.as_ref()
    }

    /// Drops the buffer; the next paint starts over.
    pub fn reset(&mut self) {
        self.buffer = None;
        self.cursor = 0;
    }

    pub fn paint(
        &mut self,
        drawing: &Drawing,
        pose: &TurtlePose,
        width: u32,
        height: u32,
        surface: &mut dyn Surface,
    ) -> Result<(), RenderError> {
        if width == 0 || height == 0 {
            return Ok(());
        }

        let transform = Transform2DF32::for_canvas(width, height, SCALE_BASE);
        let mut attempts = 0;
        loop {
            attempts += 1;
            self.validate_buffer(width, height, surface)?;
            self.composite(drawing, &transform);
            if let Some(ref buffer) = self.buffer {
                surface.blit(buffer);
            }
            if !surface.contents_lost() {
                break;
            }
            if attempts >= MAX_BLIT_ATTEMPTS {
                return Err(RenderError::ContentsLost { attempts });
            }
            warn!("surface contents lost, repainting (attempt {})", attempts);
        }

        self.paint_turtle(pose, &transform, surface);
        Ok(())
    }

    fn validate_buffer(
        &mut self,
        width: u32,
        height: u32,
        surface: &mut dyn Surface,
    ) -> Result<(), RenderError> {
        let status = match self.buffer {
            Some(ref buffer) if buffer.width() == width && buffer.height() == height => {
                surface.validate(buffer)
            }
            _ => BufferStatus::Incompatible,
        };

        match status {
            BufferStatus::Ok => return Ok(()),
            BufferStatus::Restored => debug!("drawing buffer restored, replaying"),
            BufferStatus::Incompatible => {
                debug!("allocating a {}x{} drawing buffer", width, height);
                self.reset();
                self.buffer = Some(surface.allocate_buffer(width, height)?);
            }
        }

        // In any case, start the image over again.
        self.cursor = 0;
        if let Some(ref mut buffer) = self.buffer {
            buffer.fill(self.background);
        }
        Ok(())
    }

    fn composite(&mut self, drawing: &Drawing, transform: &Transform2DF32) {
        let buffer = match self.buffer {
            Some(ref mut buffer) => buffer,
            None => return,
        };
        let path = match drawing.current_path() {
            Some(path) => path,
            None => {
                self.cursor = 0;
                return;
            }
        };

        let steps = path.steps();
        if self.cursor > steps.len() {
            // The drawing was replaced behind our back.
            buffer.fill(self.background);
            self.cursor = 0;
        }

        let stroke_width = (path.width * transform.scale_factor()).max(HAIRLINE_STROKE_WIDTH);
        while self.cursor < steps.len() {
            let step = &steps[self.cursor];
            if self.cursor > 0 && step.pen_down {
                let last_step = &steps[self.cursor - 1];
                let from = Point2DF32::new(last_step.x as f32, last_step.y as f32);
                let to = Point2DF32::new(step.x as f32, step.y as f32);
                let (from, to) = (transform.transform_point(from), transform.transform_point(to));
                buffer.stroke_line(from, to, stroke_width, step.color.to_rgba());
            }
            self.cursor += 1;
        }
    }

    fn paint_turtle(&self, pose: &TurtlePose, transform: &Transform2DF32, surface: &mut dyn Surface) {
        let transform = transform
            .translate(pose.x as f32, pose.y as f32)
            .rotate(pose.heading.to_radians() as f32)
            .translate(TURTLE_OFFSET, 0.0);
        let stroke_width = (TURTLE_STROKE_WIDTH * transform.scale_factor()).max(HAIRLINE_STROKE_WIDTH);

        let points: Vec<Point2DF32> = TURTLE_OUTLINE
            .iter()
            .map(|&(x, y)| transform.transform_point(Point2DF32::new(x, y)))
            .collect();
        for (index, &from) in points.iter().enumerate() {
            let to = points[(index + 1) % points.len()];
            surface.stroke_line(from, to, stroke_width, self.turtle_color);
        }
    }
}
