// pathfinder/turtle/src/error.rs
//
// Copyright © 2019 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::fmt::{Display, Formatter, Result as FormatResult};
use thiserror::Error;

/// Returned by turtle commands.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum CommandError {
    /// A stop was requested. Not a fault; unwinds the running script.
    #[error("run cancelled")]
    Cancelled,
    #[error("expected {expected} color channels but got {actual}")]
    InvalidArity { expected: usize, actual: usize },
    #[error("color channel {value} is outside 0 to 100")]
    ChannelOutOfRange { value: f32 },
}

/// A script failed at runtime or did not parse.
#[derive(Clone, Debug, Error, PartialEq)]
pub struct ScriptFault {
    pub message: String,
    pub line: Option<usize>,
}

impl ScriptFault {
    pub fn new<M: Into<String>>(message: M, line: Option<usize>) -> ScriptFault {
        ScriptFault {
            message: message.into(),
            line,
        }
    }
}

impl Display for ScriptFault {
    fn fmt(&self, formatter: &mut Formatter) -> FormatResult {
        write!(formatter, "Error: {}", self.message)?;
        if let Some(line) = self.line {
            write!(formatter, " on line {}", line)?;
        }
        Ok(())
    }
}

impl From<uturtle::SyntaxError> for ScriptFault {
    fn from(error: uturtle::SyntaxError) -> ScriptFault {
        ScriptFault::new(error.message, Some(error.line))
    }
}

/// What a script runner reports back for one execution.
#[derive(Clone, Debug, PartialEq)]
pub enum RunOutcome {
    Completed,
    Cancelled,
    Faulted(ScriptFault),
}

/// How a run that did not fault ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Finish {
    Completed,
    Cancelled,
}

/// The platform could not provide a usable drawing buffer.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("cannot allocate a {width}x{height} drawing buffer")]
    BufferAllocation { width: u32, height: u32 },
    #[error("surface contents lost {attempts} times in a row")]
    ContentsLost { attempts: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn faults_format_with_lines() {
        assert_eq!(
            ScriptFault::new("unknown word `lft`", Some(3)).to_string(),
            "Error: unknown word `lft` on line 3"
        );
        assert_eq!(ScriptFault::new("boom", None).to_string(), "Error: boom");
    }

    #[test]
    fn syntax_errors_become_faults() {
        let fault = ScriptFault::from(uturtle::SyntaxError {
            message: "unexpected `]`".to_owned(),
            line: 7,
        });
        assert_eq!(fault, ScriptFault::new("unexpected `]`", Some(7)));
    }
}
