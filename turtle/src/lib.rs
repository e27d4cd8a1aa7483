// pathfinder/turtle/src/lib.rs
//
// Copyright © 2019 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Runs turtle scripts on a worker thread and paints the result incrementally.
//!
//! A [`TurtleEngine`] owns the turtle's pose and drawing. Scripts issue commands
//! through the [`Tuga`] interface; the host can pause, resume or stop a run at
//! any command boundary and paint the drawing onto a [`Surface`] at any time.

#[macro_use]
extern crate bitflags;
#[macro_use]
extern crate log;

pub mod colors;
pub mod controller;
pub mod engine;
pub mod error;
pub mod path;
pub mod pose;
pub mod render;
pub mod runner;
pub mod tuga;

pub use crate::controller::{ControlFlags, ExecutionController};
pub use crate::engine::{EngineOptions, StepListener, TurtleEngine, TurtleHandle};
pub use crate::error::{CommandError, Finish, RenderError, RunOutcome, ScriptFault};
pub use crate::path::{Drawing, Path, Step};
pub use crate::pose::{ColorPercent, TurtlePose};
pub use crate::render::compositor::Compositor;
pub use crate::render::raster::{BufferStatus, Canvas, RasterBuffer, Surface};
pub use crate::runner::UturtleRunner;
pub use crate::tuga::{ScriptRunner, Tuga};
