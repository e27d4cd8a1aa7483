// pathfinder/turtle/src/path.rs
//
// Copyright © 2019 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The recorded drawing: every sampled pose change, in order.

use crate::pose::ColorPercent;

/// Stroke width of new paths, in turtle units.
pub const DEFAULT_STROKE_WIDTH: f32 = 5.0;

/// A pose sample taken when a motion command ran.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Step {
    pub x: f64,
    pub y: f64,
    pub pen_down: bool,
    pub color: ColorPercent,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Path {
    pub width: f32,
    steps: Vec<Step>,
}

impl Path {
    pub fn new(width: f32) -> Path {
        Path {
            width,
            steps: Vec::new(),
        }
    }

    #[inline]
    pub fn push(&mut self, step: Step) {
        self.steps.push(step);
    }

    #[inline]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Drawing {
    paths: Vec<Path>,
    stroke_width: f32,
}

impl Drawing {
    pub fn new() -> Drawing {
        Drawing::with_stroke_width(DEFAULT_STROKE_WIDTH)
    }

    pub fn with_stroke_width(stroke_width: f32) -> Drawing {
        Drawing {
            paths: Vec::new(),
            stroke_width,
        }
    }

    #[inline]
    pub fn paths(&self) -> &[Path] {
        &self.paths
    }

    /// The path new steps go to, created on first use.
    pub fn live_path(&mut self) -> &mut Path {
        if self.paths.is_empty() {
            self.paths.push(Path::new(self.stroke_width));
        }
        let last = self.paths.len() - 1;
        &mut self.paths[last]
    }

    /// The path new steps go to, if anything has been recorded yet.
    #[inline]
    pub fn current_path(&self) -> Option<&Path> {
        self.paths.last()
    }

    #[inline]
    pub fn push(&mut self, step: Step) {
        self.live_path().push(step);
    }

    pub fn step_count(&self) -> usize {
        self.paths.iter().map(Path::len).sum()
    }

    #[inline]
    pub fn reset(&mut self) {
        self.paths.clear();
    }
}

impl Default for Drawing {
    fn default() -> Drawing {
        Drawing::new()
    }
}
