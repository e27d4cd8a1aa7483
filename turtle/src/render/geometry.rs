// pathfinder/turtle/src/render/geometry.rs
//
// Copyright © 2019 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Points and affine transforms in device space.

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point2DF32 {
    x: f32,
    y: f32,
}

impl Point2DF32 {
    #[inline]
    pub fn new(x: f32, y: f32) -> Point2DF32 {
        Point2DF32 { x, y }
    }

    #[inline]
    pub fn x(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn y(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// `| a c tx |`
/// `| b d ty |`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform2DF32 {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    tx: f32,
    ty: f32,
}

impl Transform2DF32 {
    #[inline]
    pub fn identity() -> Transform2DF32 {
        Transform2DF32::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    #[inline]
    fn new(a: f32, b: f32, c: f32, d: f32, tx: f32, ty: f32) -> Transform2DF32 {
        Transform2DF32 { a, b, c, d, tx, ty }
    }

    /// The turtle-to-device transform: origin at the canvas center, y up, and
    /// `scale_base` turtle units across the shorter side.
    pub fn for_canvas(width: u32, height: u32, scale_base: f32) -> Transform2DF32 {
        let base = width.min(height) as f32;
        Transform2DF32::identity()
            .translate(0.5 * width as f32, 0.5 * height as f32)
            .scale(base / scale_base, -base / scale_base)
    }

    /// `self * other`: `other` applies to points first.
    pub fn post_mul(&self, other: &Transform2DF32) -> Transform2DF32 {
        Transform2DF32::new(
            self.a * other.a + self.c * other.b,
            self.b * other.a + self.d * other.b,
            self.a * other.c + self.c * other.d,
            self.b * other.c + self.d * other.d,
            self.a * other.tx + self.c * other.ty + self.tx,
            self.b * other.tx + self.d * other.ty + self.ty,
        )
    }

    #[inline]
    pub fn translate(&self, x: f32, y: f32) -> Transform2DF32 {
        self.post_mul(&Transform2DF32::new(1.0, 0.0, 0.0, 1.0, x, y))
    }

    #[inline]
    pub fn scale(&self, x: f32, y: f32) -> Transform2DF32 {
        self.post_mul(&Transform2DF32::new(x, 0.0, 0.0, y, 0.0, 0.0))
    }

    #[inline]
    pub fn rotate(&self, radians: f32) -> Transform2DF32 {
        let (s, c) = radians.sin_cos();
        self.post_mul(&Transform2DF32::new(c, s, -s, c, 0.0, 0.0))
    }

    #[inline]
    pub fn transform_point(&self, point: Point2DF32) -> Point2DF32 {
        Point2DF32::new(
            self.a * point.x + self.c * point.y + self.tx,
            self.b * point.x + self.d * point.y + self.ty,
        )
    }

    /// How much lengths grow, assuming a uniform scale.
    #[inline]
    pub fn scale_factor(&self) -> f32 {
        (self.a * self.d - self.b * self.c).abs().sqrt()
    }
}
