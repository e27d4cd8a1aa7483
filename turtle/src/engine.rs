// pathfinder/turtle/src/engine.rs
//
// Copyright © 2019 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The turtle engine: shared turtle state behind one lock, a script worker that
//! mutates it, and any number of paint calls that read it.

use crate::controller::{self, ControlFlags, ExecutionController};
use crate::error::{CommandError, Finish, RenderError, RunOutcome, ScriptFault};
use crate::path::{Drawing, DEFAULT_STROKE_WIDTH};
use crate::pose::{ColorPercent, TurtlePose};
use crate::render::compositor::Compositor;
use crate::render::raster::Surface;
use crate::runner::UturtleRunner;
use crate::tuga::{ScriptRunner, Tuga};
use parking_lot::{Condvar, Mutex};
use std::sync::Arc;
use std::time::Instant;

/// Called on the script worker after every command, with no lock held.
pub type StepListener = Arc<dyn Fn() + Send + Sync>;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EngineOptions {
    /// Stroke width of new paths, in turtle units.
    pub stroke_width: f32,
    pub background: ColorPercent,
    pub turtle_color: ColorPercent,
}

impl Default for EngineOptions {
    fn default() -> EngineOptions {
        EngineOptions {
            stroke_width: DEFAULT_STROKE_WIDTH,
            background: ColorPercent::WHITE,
            turtle_color: ColorPercent::new(0.0, 50.0, 0.0),
        }
    }
}

struct EngineState {
    pose: TurtlePose,
    drawing: Drawing,
    controller: ExecutionController,
    compositor: Compositor,
    listener: Option<StepListener>,
}

struct Shared {
    state: Mutex<EngineState>,
    resumed: Condvar,
}

/// The engine's command side, handed to script runners.
#[derive(Clone)]
pub struct TurtleHandle {
    shared: Arc<Shared>,
}

impl TurtleHandle {
    /// Applies `mutation` under the lock, then passes the suspension point and
    /// notifies the listener once the lock is released.
    fn command<T, F>(&self, mutation: F) -> Result<T, CommandError>
    where
        F: FnOnce(&mut EngineState) -> Result<T, CommandError>,
    {
        let (result, listener) = {
            let mut state = self.shared.state.lock();
            let result = mutation(&mut *state)?;
            controller::suspend(&mut state, &self.shared.resumed, |state| {
                &mut state.controller
            })?;
            (result, state.listener.clone())
        };

        if let Some(listener) = listener {
            listener();
        }
        Ok(result)
    }

    /// The suspension point without a mutation.
    fn checkpoint(&self) -> Result<(), CommandError> {
        self.command(|_| Ok(()))
    }
}

impl Tuga for TurtleHandle {
    fn color(&self, channels: &[f32]) -> Result<[f32; 3], CommandError> {
        match *channels {
            [red, green, blue] => self.color3(red, green, blue),
            _ => Err(CommandError::InvalidArity {
                expected: 3,
                actual: channels.len(),
            }),
        }
    }

    fn color3(&self, red: f32, green: f32, blue: f32) -> Result<[f32; 3], CommandError> {
        self.command(|state| {
            state.pose.color = ColorPercent::checked(red, green, blue)?;
            Ok([red, green, blue])
        })
    }

    fn jump(&self, distance: f64) -> Result<(), CommandError> {
        self.command(|state| {
            let step = state.pose.jump(distance);
            state.drawing.push(step);
            Ok(())
        })
    }

    fn pen(&self, down: bool) {
        self.shared.state.lock().pose.pen_down = down;
    }

    fn turn(&self, angle: f64) -> Result<(), CommandError> {
        self.command(|state| {
            state.pose.turn(angle);
            Ok(())
        })
    }

    fn walk(&self, distance: f64) -> Result<(), CommandError> {
        self.command(|state| {
            let step = state.pose.walk(distance);
            state.drawing.push(step);
            Ok(())
        })
    }
}

/// Runs scripts against a turtle and paints what it drew.
///
/// `execute` blocks its caller for the whole run, so it belongs on a worker
/// thread. Every other method may be called from any thread while a run is in
/// progress.
pub struct TurtleEngine {
    handle: TurtleHandle,
    runner: Mutex<Box<dyn ScriptRunner>>,
}

impl TurtleEngine {
    pub fn new() -> TurtleEngine {
        TurtleEngine::with_options(EngineOptions::default())
    }

    pub fn with_options(options: EngineOptions) -> TurtleEngine {
        TurtleEngine::with_runner(options, Box::new(UturtleRunner::new()))
    }

    pub fn with_runner(options: EngineOptions, runner: Box<dyn ScriptRunner>) -> TurtleEngine {
        let state = EngineState {
            pose: TurtlePose::new(),
            drawing: Drawing::with_stroke_width(options.stroke_width),
            controller: ExecutionController::new(),
            compositor: Compositor::new(options.background, options.turtle_color),
            listener: None,
        };
        TurtleEngine {
            handle: TurtleHandle {
                shared: Arc::new(Shared {
                    state: Mutex::new(state),
                    resumed: Condvar::new(),
                }),
            },
            runner: Mutex::new(runner),
        }
    }

    /// Binds the script runner to this turtle. Must precede `execute`.
    pub fn init(&self) {
        let tuga: Arc<dyn Tuga> = Arc::new(self.handle.clone());
        self.runner.lock().init(tuga);
    }

    /// Resets the turtle and runs `source` to the end, to a stop request or to
    /// the first fault. The turtle keeps whatever the script drew.
    ///
    /// A stop requested before the run starts cancels it at its first
    /// suspension point; flags are cleared when a run ends.
    pub fn execute(&self, name: &str, source: &str) -> Result<Finish, ScriptFault> {
        let mut runner = self.runner.lock();
        self.reset();

        let start = Instant::now();
        debug!("starting `{}`", name);
        let outcome = match self.handle.checkpoint() {
            Ok(()) => runner.execute(name, source),
            Err(_) => RunOutcome::Cancelled,
        };
        self.handle.shared.state.lock().controller.finish_run();

        match outcome {
            RunOutcome::Completed => {
                debug!("`{}` completed in {:?}", name, start.elapsed());
                Ok(Finish::Completed)
            }
            RunOutcome::Cancelled => {
                info!("`{}` cancelled after {:?}", name, start.elapsed());
                Ok(Finish::Cancelled)
            }
            RunOutcome::Faulted(fault) => {
                warn!("`{}` failed: {}", name, fault);
                Err(fault)
            }
        }
    }

    /// Brings the drawing buffer up to date and composites it, with the turtle
    /// on top, onto `surface`.
    pub fn paint_canvas(
        &self,
        width: u32,
        height: u32,
        surface: &mut dyn Surface,
    ) -> Result<(), RenderError> {
        let mut state = self.handle.shared.state.lock();
        let state = &mut *state;
        state
            .compositor
            .paint(&state.drawing, &state.pose, width, height, surface)
    }

    /// Empties the drawing, restores the initial pose and drops the buffer.
    pub fn reset(&self) {
        let mut state = self.handle.shared.state.lock();
        state.compositor.reset();
        state.pose.reset();
        state.drawing.reset();
    }

    /// Stops the running script at its next suspension point, even if paused.
    pub fn request_stop(&self) {
        self.handle.shared.state.lock().controller.request_stop();
        self.handle.shared.resumed.notify_all();
    }

    /// Pauses or resumes the running script. Returns whether it is now paused.
    pub fn toggle_pause(&self) -> bool {
        let paused = self.handle.shared.state.lock().controller.toggle_pause();
        if !paused {
            self.handle.shared.resumed.notify_all();
        }
        paused
    }

    pub fn set_step_listener<F>(&self, listener: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.handle.shared.state.lock().listener = Some(Arc::new(listener));
    }

    pub fn pose(&self) -> TurtlePose {
        self.handle.shared.state.lock().pose
    }

    pub fn drawing(&self) -> Drawing {
        self.handle.shared.state.lock().drawing.clone()
    }

    pub fn control_flags(&self) -> ControlFlags {
        self.handle.shared.state.lock().controller.flags()
    }

    pub fn compositing_cursor(&self) -> usize {
        self.handle.shared.state.lock().compositor.cursor()
    }

    /// The command interface of this engine's turtle.
    pub fn handle(&self) -> TurtleHandle {
        self.handle.clone()
    }
}

impl Default for TurtleEngine {
    fn default() -> TurtleEngine {
        TurtleEngine::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::Step;
    use crate::render::raster::RasterBuffer;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const DELTA: f64 = 0.01;

    fn engine() -> TurtleEngine {
        let engine = TurtleEngine::new();
        engine.init();
        engine
    }

    fn steps(engine: &TurtleEngine) -> Vec<Step> {
        engine
            .drawing()
            .current_path()
            .map(|path| path.steps().to_vec())
            .unwrap_or_default()
    }

    fn assert_step(step: &Step, x: f64, y: f64, pen_down: bool, color: ColorPercent) {
        assert!((step.x - x).abs() < DELTA, "x: {} != {}", step.x, x);
        assert!((step.y - y).abs() < DELTA, "y: {} != {}", step.y, y);
        assert_eq!(step.pen_down, pen_down);
        assert_eq!(step.color, color);
    }

    #[test]
    fn handle_commands_record_steps() {
        let engine = TurtleEngine::new();
        let turtle = engine.handle();
        turtle.walk(100.0).unwrap();
        turtle.pen(false);
        turtle.turn(-90.0).unwrap();
        turtle.walk(50.0).unwrap();

        let steps = steps(&engine);
        assert_eq!(steps.len(), 2);
        assert_step(&steps[0], 0.0, 100.0, true, ColorPercent::BLACK);
        assert_step(&steps[1], 50.0, 100.0, false, ColorPercent::BLACK);
        assert_eq!(engine.pose().heading, 0.0);
    }

    #[test]
    fn color_checks_its_channels() {
        let engine = TurtleEngine::new();
        let turtle = engine.handle();
        assert_eq!(turtle.color(&[10.0, 20.0, 30.0]), Ok([10.0, 20.0, 30.0]));
        assert_eq!(engine.pose().color, ColorPercent::new(10.0, 20.0, 30.0));

        assert_eq!(
            turtle.color(&[10.0, 20.0]),
            Err(CommandError::InvalidArity {
                expected: 3,
                actual: 2
            })
        );
        assert_eq!(
            turtle.color3(0.0, 0.0, -1.0),
            Err(CommandError::ChannelOutOfRange { value: -1.0 })
        );
        assert_eq!(engine.pose().color, ColorPercent::new(10.0, 20.0, 30.0));
    }

    #[test]
    fn scripts_run_from_a_reset_turtle() {
        let engine = engine();
        assert_eq!(engine.execute("first", "walk 100"), Ok(Finish::Completed));
        assert_eq!(engine.execute("second", "turn 90 walk 100"), Ok(Finish::Completed));

        let steps = steps(&engine);
        assert_eq!(steps.len(), 1);
        assert_step(&steps[0], -100.0, 0.0, true, ColorPercent::BLACK);
    }

    #[test]
    fn faults_keep_what_was_drawn() {
        let engine = engine();
        let fault = engine.execute("typo", "walk 10\nturn lft").unwrap_err();
        assert_eq!(fault.to_string(), "Error: unknown word `lft` on line 2");
        assert_eq!(steps(&engine).len(), 1);
        assert_eq!(engine.control_flags(), ControlFlags::empty());
    }

    #[test]
    fn stop_from_the_listener_cancels_the_next_command() {
        let engine = engine();
        let listener_calls = Arc::new(AtomicUsize::new(0));
        let counter = listener_calls.clone();
        let handle = engine.handle();
        engine.set_step_listener(move || {
            if counter.fetch_add(1, Ordering::SeqCst) == 2 {
                handle.shared.state.lock().controller.request_stop();
            }
        });

        assert_eq!(
            engine.execute("loop", "forever [ walk 1 ]"),
            Ok(Finish::Cancelled)
        );
        // The initial checkpoint, then two walks; the third walk is cancelled
        // after its step was recorded.
        assert_eq!(listener_calls.load(Ordering::SeqCst), 3);
        assert_eq!(steps(&engine).len(), 3);
        assert_eq!(engine.control_flags(), ControlFlags::empty());
    }

    #[test]
    fn listener_runs_without_the_lock() {
        let engine = Arc::new(engine());
        let observer = Arc::downgrade(&engine);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let record = seen.clone();
        engine.set_step_listener(move || {
            if let Some(engine) = observer.upgrade() {
                record.lock().push(engine.pose().y);
            }
        });

        assert_eq!(engine.execute("", "walk 10 walk 10"), Ok(Finish::Completed));
        assert_eq!(*seen.lock(), vec![0.0, 10.0, 20.0]);
    }

    #[test]
    fn reset_blanks_the_next_paint() {
        let engine = engine();
        engine.execute("", "walk 300").unwrap();
        let mut canvas = RasterBuffer::new(100, 100).unwrap();
        engine.paint_canvas(100, 100, &mut canvas).unwrap();
        assert_eq!(engine.compositing_cursor(), 1);

        engine.reset();
        assert_eq!(engine.pose(), TurtlePose::new());
        assert!(engine.drawing().paths().is_empty());
        engine.paint_canvas(100, 100, &mut canvas).unwrap();
        assert_eq!(engine.compositing_cursor(), 0);
        // Far from the turtle, only background is left.
        assert_eq!(canvas.pixel(50, 10), ColorPercent::WHITE.to_rgba());
    }
}
