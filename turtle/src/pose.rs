// pathfinder/turtle/src/pose.rs
//
// Copyright © 2019 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Turtle kinematics.

use crate::error::CommandError;
use crate::path::Step;
use image::Rgba;

/// A stroke color, each channel a percentage in `0..=100`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorPercent {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl ColorPercent {
    pub const BLACK: ColorPercent = ColorPercent::new(0.0, 0.0, 0.0);
    pub const WHITE: ColorPercent = ColorPercent::new(100.0, 100.0, 100.0);

    #[inline]
    pub const fn new(r: f32, g: f32, b: f32) -> ColorPercent {
        ColorPercent { r, g, b }
    }

    /// Builds a color, rejecting channels outside `0..=100`.
    pub fn checked(r: f32, g: f32, b: f32) -> Result<ColorPercent, CommandError> {
        for &value in &[r, g, b] {
            if !(0.0..=100.0).contains(&value) {
                return Err(CommandError::ChannelOutOfRange { value });
            }
        }
        Ok(ColorPercent::new(r, g, b))
    }

    #[inline]
    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    pub fn to_rgba(self) -> Rgba<u8> {
        fn channel(percent: f32) -> u8 {
            (percent.max(0.0).min(100.0) / 100.0 * 255.0).round() as u8
        }
        Rgba([channel(self.r), channel(self.g), channel(self.b), 255])
    }
}

/// Position, heading, pen state and stroke color of the turtle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TurtlePose {
    pub x: f64,
    pub y: f64,
    /// Degrees counterclockwise from the positive x axis. Never normalized.
    pub heading: f64,
    pub pen_down: bool,
    pub color: ColorPercent,
}

impl TurtlePose {
    /// Facing up the y axis.
    pub const INITIAL_HEADING: f64 = 90.0;

    pub fn new() -> TurtlePose {
        TurtlePose {
            x: 0.0,
            y: 0.0,
            heading: TurtlePose::INITIAL_HEADING,
            pen_down: true,
            color: ColorPercent::BLACK,
        }
    }

    #[inline]
    pub fn reset(&mut self) {
        *self = TurtlePose::new();
    }

    #[inline]
    pub fn turn(&mut self, delta: f64) {
        self.heading += delta;
    }

    /// Moves along the heading and records a step with the current pen.
    pub fn walk(&mut self, distance: f64) -> Step {
        self.advance(distance);
        self.step(self.pen_down)
    }

    /// Moves along the heading and records a step that never draws.
    pub fn jump(&mut self, distance: f64) -> Step {
        self.advance(distance);
        self.step(false)
    }

    fn advance(&mut self, distance: f64) {
        let (s, c) = self.heading.to_radians().sin_cos();
        self.x += distance * c;
        self.y += distance * s;
    }

    fn step(&self, pen_down: bool) -> Step {
        Step {
            x: self.x,
            y: self.y,
            pen_down,
            color: self.color,
        }
    }
}

impl Default for TurtlePose {
    fn default() -> TurtlePose {
        TurtlePose::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELTA: f64 = 0.01;

    fn assert_at(step: &Step, x: f64, y: f64) {
        assert!((step.x - x).abs() < DELTA, "x: {} != {}", step.x, x);
        assert!((step.y - y).abs() < DELTA, "y: {} != {}", step.y, y);
    }

    #[test]
    fn walk_starts_up_the_y_axis() {
        let mut pose = TurtlePose::new();
        let step = pose.walk(100.0);
        assert_at(&step, 0.0, 100.0);
        assert!(step.pen_down);
        assert_eq!(step.color, ColorPercent::BLACK);
    }

    #[test]
    fn turns() {
        for &(angle, x, y) in &[(90.0, -100.0, 0.0), (-90.0, 100.0, 0.0), (180.0, 0.0, -100.0)] {
            let mut pose = TurtlePose::new();
            pose.turn(angle);
            assert_at(&pose.walk(100.0), x, y);
        }
    }

    #[test]
    fn heading_is_cumulative_and_unnormalized() {
        let mut pose = TurtlePose::new();
        pose.turn(30.0);
        pose.turn(40.0);
        assert_eq!(pose.heading, 160.0);

        for _ in 0..10 {
            pose.turn(360.0);
        }
        assert_eq!(pose.heading, 3760.0);
        pose.turn(-8000.0);
        assert_eq!(pose.heading, -4240.0);
    }

    #[test]
    fn steps_follow_the_heading() {
        let mut pose = TurtlePose::new();
        pose.turn(-45.0);
        let first = pose.walk(10.0);
        let second = pose.jump(20.0);
        let (s, c) = 45f64.to_radians().sin_cos();
        assert_at(&second, first.x + 20.0 * c, first.y + 20.0 * s);
        assert!(!second.pen_down);
        assert!(pose.pen_down);
    }

    #[test]
    fn reset_restores_initial_pose() {
        let mut pose = TurtlePose::new();
        pose.turn(12.0);
        pose.walk(3.0);
        pose.pen_down = false;
        pose.color = ColorPercent::WHITE;
        pose.reset();
        assert_eq!(pose, TurtlePose::new());
    }

    #[test]
    fn channels_are_percentages() {
        assert!(ColorPercent::checked(0.0, 50.0, 100.0).is_ok());
        assert_eq!(
            ColorPercent::checked(0.0, 101.0, 0.0),
            Err(CommandError::ChannelOutOfRange { value: 101.0 })
        );
        assert!(ColorPercent::checked(std::f32::NAN, 0.0, 0.0).is_err());
        assert_eq!(ColorPercent::new(100.0, 50.0, 0.0).to_rgba(), Rgba([255, 128, 0, 255]));
    }
}
