// pathfinder/turtle/src/controller.rs
//
// Copyright © 2019 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Pause, resume and stop for a running script.
//!
//! The script worker calls [`suspend`] once before the script body and after
//! every mutating command. That is the only place a run can block or be
//! cancelled; a script that never issues a command runs to completion.

use crate::error::CommandError;
use parking_lot::{Condvar, MutexGuard};
use std::fmt::{Display, Formatter, Result as FormatResult};

bitflags! {
    // NB: If you change this, make sure to update the `Display`
    // implementation as well.
    pub struct ControlFlags: u8 {
        const PAUSED           = 0x01;
        const CANCEL_REQUESTED = 0x02;
    }
}

impl Display for ControlFlags {
    fn fmt(&self, formatter: &mut Formatter) -> FormatResult {
        if self.is_empty() {
            return formatter.write_str("running");
        }

        let mut first = true;
        for (bit, name) in NAMES.iter().enumerate() {
            if (self.bits() >> bit) & 1 == 0 {
                continue;
            }
            if !first {
                formatter.write_str(", ")?;
            } else {
                first = false;
            }
            formatter.write_str(name)?;
        }

        return Ok(());

        // Must match the order in `ControlFlags`.
        static NAMES: &'static [&'static str] = &["paused", "cancel requested"];
    }
}

#[derive(Debug, Default)]
pub struct ExecutionController {
    flags: ControlFlags,
}

impl Default for ControlFlags {
    fn default() -> ControlFlags {
        ControlFlags::empty()
    }
}

impl ExecutionController {
    pub fn new() -> ExecutionController {
        ExecutionController::default()
    }

    #[inline]
    pub fn flags(&self) -> ControlFlags {
        self.flags
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.flags.contains(ControlFlags::PAUSED)
    }

    /// Flips the paused flag and returns the new value. Waiters must be woken
    /// when it returns `false`.
    pub fn toggle_pause(&mut self) -> bool {
        self.flags.toggle(ControlFlags::PAUSED);
        self.is_paused()
    }

    /// Cancels the run at its next suspension point. Waiters must be woken.
    pub fn request_stop(&mut self) {
        self.flags.insert(ControlFlags::CANCEL_REQUESTED);
        self.flags.remove(ControlFlags::PAUSED);
    }

    /// Whether a thread at the suspension point has to keep waiting.
    #[inline]
    pub fn must_wait(&self) -> bool {
        self.flags == ControlFlags::PAUSED
    }

    /// Consumes a pending stop request.
    pub fn take_cancel(&mut self) -> bool {
        let requested = self.flags.contains(ControlFlags::CANCEL_REQUESTED);
        self.flags.remove(ControlFlags::CANCEL_REQUESTED);
        requested
    }

    #[inline]
    pub fn finish_run(&mut self) {
        self.flags = ControlFlags::empty();
    }
}

/// The suspension point. Blocks while paused, then reports a pending stop as
/// `CommandError::Cancelled`.
///
/// `controller` projects the controller out of the locked state; `resumed` must
/// be the condition variable paired with that lock.
pub fn suspend<T, F>(
    guard: &mut MutexGuard<'_, T>,
    resumed: &Condvar,
    controller: F,
) -> Result<(), CommandError>
where
    F: Fn(&mut T) -> &mut ExecutionController,
{
    while controller(&mut **guard).must_wait() {
        resumed.wait(guard);
    }
    if controller(&mut **guard).take_cancel() {
        return Err(CommandError::Cancelled);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    struct Shared {
        controller: Mutex<ExecutionController>,
        resumed: Condvar,
    }

    fn shared() -> Arc<Shared> {
        Arc::new(Shared {
            controller: Mutex::new(ExecutionController::new()),
            resumed: Condvar::new(),
        })
    }

    fn suspend_now(shared: &Shared) -> Result<(), CommandError> {
        let mut guard = shared.controller.lock();
        suspend(&mut guard, &shared.resumed, |controller| controller)
    }

    #[test]
    fn toggling_pause() {
        let mut controller = ExecutionController::new();
        assert!(controller.toggle_pause());
        assert!(controller.must_wait());
        assert!(!controller.toggle_pause());
        assert!(!controller.must_wait());
    }

    #[test]
    fn stop_is_one_shot() {
        let shared = shared();
        shared.controller.lock().request_stop();
        assert_eq!(suspend_now(&shared), Err(CommandError::Cancelled));
        assert_eq!(suspend_now(&shared), Ok(()));
    }

    #[test]
    fn stop_overrides_pause() {
        let mut controller = ExecutionController::new();
        controller.toggle_pause();
        controller.request_stop();
        assert_eq!(controller.flags(), ControlFlags::CANCEL_REQUESTED);
        assert!(!controller.must_wait());
    }

    #[test]
    fn runs_finish_clean() {
        let mut controller = ExecutionController::new();
        controller.toggle_pause();
        controller.request_stop();
        controller.finish_run();
        assert_eq!(controller.flags(), ControlFlags::empty());
    }

    #[test]
    fn paused_worker_blocks_until_resumed() {
        let shared = shared();
        shared.controller.lock().toggle_pause();

        let worker = {
            let shared = shared.clone();
            thread::spawn(move || suspend_now(&shared))
        };
        thread::sleep(Duration::from_millis(50));
        assert!(!worker.is_finished());

        assert!(!shared.controller.lock().toggle_pause());
        shared.resumed.notify_all();
        assert_eq!(worker.join().unwrap(), Ok(()));
    }

    #[test]
    fn stop_wakes_a_paused_worker() {
        let shared = shared();
        shared.controller.lock().toggle_pause();

        let worker = {
            let shared = shared.clone();
            thread::spawn(move || suspend_now(&shared))
        };
        thread::sleep(Duration::from_millis(50));
        shared.controller.lock().request_stop();
        shared.resumed.notify_all();
        assert_eq!(worker.join().unwrap(), Err(CommandError::Cancelled));
    }

    #[test]
    fn flags_display() {
        assert_eq!(ControlFlags::empty().to_string(), "running");
        assert_eq!(
            (ControlFlags::PAUSED | ControlFlags::CANCEL_REQUESTED).to_string(),
            "paused, cancel requested"
        );
    }
}
