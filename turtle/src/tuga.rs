// pathfinder/turtle/src/tuga.rs
//
// Copyright © 2019 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The seam between scripting languages and the engine.

use crate::error::{CommandError, RunOutcome};
use std::sync::Arc;

/// Commands a script can issue. Angles are in degrees, color channels are
/// percentages.
///
/// Every command except `pen` passes through the engine's suspension point, so
/// any of them may return `CommandError::Cancelled`; runners must unwind on it.
pub trait Tuga: Send + Sync {
    /// Sets the stroke color from exactly three channels.
    fn color(&self, channels: &[f32]) -> Result<[f32; 3], CommandError>;

    fn color3(&self, red: f32, green: f32, blue: f32) -> Result<[f32; 3], CommandError>;

    fn jump(&self, distance: f64) -> Result<(), CommandError>;

    fn pen(&self, down: bool);

    fn turn(&self, angle: f64) -> Result<(), CommandError>;

    fn walk(&self, distance: f64) -> Result<(), CommandError>;
}

/// A language runtime that drives a [`Tuga`].
pub trait ScriptRunner: Send {
    /// Binds the runner to the turtle. May finish in the background, but a
    /// following `execute` must wait for it.
    fn init(&mut self, tuga: Arc<dyn Tuga>);

    /// Runs a script, issuing turtle commands synchronously and in source order.
    fn execute(&mut self, name: &str, source: &str) -> RunOutcome;
}
