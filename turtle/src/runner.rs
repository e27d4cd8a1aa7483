// pathfinder/turtle/src/runner.rs
//
// Copyright © 2019 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Runs uturtle scripts against a [`Tuga`].

use crate::colors::NAMED_COLORS;
use crate::error::{CommandError, RunOutcome, ScriptFault};
use crate::pose::ColorPercent;
use crate::tuga::{ScriptRunner, Tuga};
use std::cell::Cell;
use std::collections::HashMap;
use std::mem;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;
use uturtle::ast::{Command, Statement, Value};

#[derive(Clone, Copy, Debug, PartialEq)]
enum Word {
    Number(f64),
    Flag(bool),
    Color(ColorPercent),
}

struct Bindings {
    tuga: Arc<dyn Tuga>,
    words: HashMap<&'static str, Word>,
}

impl Bindings {
    fn new(tuga: Arc<dyn Tuga>) -> Bindings {
        let mut words = HashMap::new();
        for &(name, color) in NAMED_COLORS {
            words.insert(name, Word::Color(color));
        }
        words.insert("around", Word::Number(180.0));
        words.insert("left", Word::Number(90.0));
        words.insert("right", Word::Number(-90.0));
        words.insert("down", Word::Flag(true));
        words.insert("up", Word::Flag(false));
        Bindings { tuga, words }
    }
}

enum State {
    Unbound,
    Starting(JoinHandle<Bindings>),
    Ready(Bindings),
}

pub struct UturtleRunner {
    state: State,
}

impl UturtleRunner {
    pub fn new() -> UturtleRunner {
        UturtleRunner {
            state: State::Unbound,
        }
    }

    fn bindings(&mut self) -> Result<&Bindings, ScriptFault> {
        if let State::Starting(_) = self.state {
            if let State::Starting(handle) = mem::replace(&mut self.state, State::Unbound) {
                let bindings = handle
                    .join()
                    .map_err(|_| ScriptFault::new("the turtle language failed to start", None))?;
                self.state = State::Ready(bindings);
            }
        }

        match self.state {
            State::Ready(ref bindings) => Ok(bindings),
            _ => Err(ScriptFault::new("the turtle language is not initialized", None)),
        }
    }
}

impl Default for UturtleRunner {
    fn default() -> UturtleRunner {
        UturtleRunner::new()
    }
}

impl ScriptRunner for UturtleRunner {
    fn init(&mut self, tuga: Arc<dyn Tuga>) {
        self.state = State::Starting(thread::spawn(move || {
            let start = Instant::now();
            let bindings = Bindings::new(tuga);
            debug!("uturtle initialized in {:?}", start.elapsed());
            bindings
        }));
    }

    fn execute(&mut self, name: &str, source: &str) -> RunOutcome {
        let bindings = match self.bindings() {
            Ok(bindings) => bindings,
            Err(fault) => return RunOutcome::Faulted(fault),
        };
        let turtle = match uturtle::parse(source) {
            Ok(turtle) => turtle,
            Err(error) => return RunOutcome::Faulted(error.into()),
        };

        debug!("running `{}` ({} statements)", name, turtle.len());
        let interpreter = Interpreter {
            bindings,
            source,
            commands: Cell::new(0),
        };
        match interpreter.run_block(&turtle) {
            Ok(()) => RunOutcome::Completed,
            Err(Interrupt::Cancelled) => RunOutcome::Cancelled,
            Err(Interrupt::Fault(fault)) => RunOutcome::Faulted(fault),
        }
    }
}

enum Interrupt {
    Cancelled,
    Fault(ScriptFault),
}

struct Interpreter<'a> {
    bindings: &'a Bindings,
    source: &'a str,
    /// Turtle commands that went through, each past a suspension point.
    commands: Cell<u64>,
}

impl<'a> Interpreter<'a> {
    fn run_block(&self, statements: &[Statement]) -> Result<(), Interrupt> {
        for statement in statements {
            self.run(statement)?;
        }
        Ok(())
    }

    fn run(&self, statement: &Statement) -> Result<(), Interrupt> {
        let line = uturtle::line_of(self.source, statement.offset);
        let fault = |message: String| Interrupt::Fault(ScriptFault::new(message, Some(line)));
        let command = |result: Result<(), CommandError>| -> Result<(), Interrupt> {
            result.map_err(|error| match error {
                CommandError::Cancelled => Interrupt::Cancelled,
                error => fault(error.to_string()),
            })?;
            self.commands.set(self.commands.get() + 1);
            Ok(())
        };
        let tuga = &*self.bindings.tuga;

        match statement.command {
            Command::Walk(ref distance) => command(tuga.walk(self.number(distance).map_err(fault)?)),
            Command::Jump(ref distance) => command(tuga.jump(self.number(distance).map_err(fault)?)),
            Command::Turn(ref angle) => command(tuga.turn(self.number(angle).map_err(fault)?)),
            Command::Pen(ref down) => {
                tuga.pen(self.flag(down).map_err(fault)?);
                Ok(())
            }
            Command::Color(ref value) => {
                let channels = self.channels(value).map_err(fault)?;
                command(tuga.color(&channels).map(drop))
            }
            Command::Color3(ref red, ref green, ref blue) => {
                let red = self.number(red).map_err(fault)? as f32;
                let green = self.number(green).map_err(fault)? as f32;
                let blue = self.number(blue).map_err(fault)? as f32;
                command(tuga.color3(red, green, blue).map(drop))
            }
            Command::Repeat(ref count, ref body) => {
                let count = self.number(count).map_err(fault)?;
                if count < 0.0 || count.fract() != 0.0 {
                    return Err(fault(format!("cannot repeat {} times", count)));
                }
                for _ in 0..count as u64 {
                    self.run_block(body)?;
                }
                Ok(())
            }
            Command::Forever(ref body) => loop {
                // A round without a turtle command could never be paused or stopped.
                let before = self.commands.get();
                self.run_block(body)?;
                if self.commands.get() == before {
                    return Err(fault(
                        "forever must walk, jump, turn or change color every time around".to_owned(),
                    ));
                }
            },
        }
    }

    fn word(&self, word: &str) -> Result<Word, String> {
        self.bindings
            .words
            .get(word)
            .cloned()
            .ok_or_else(|| format!("unknown word `{}`", word))
    }

    fn number(&self, value: &Value) -> Result<f64, String> {
        match *value {
            Value::Number(number) => Ok(number),
            Value::Word(ref word) => match self.word(word)? {
                Word::Number(number) => Ok(number),
                _ => Err(format!("expected a number but got `{}`", word)),
            },
            Value::List(_) => Err(format!("expected a number but got `{}`", value)),
        }
    }

    fn flag(&self, value: &Value) -> Result<bool, String> {
        if let Value::Word(ref word) = *value {
            if let Word::Flag(flag) = self.word(word)? {
                return Ok(flag);
            }
        }
        Err(format!("expected `up` or `down` but got `{}`", value))
    }

    fn channels(&self, value: &Value) -> Result<Vec<f32>, String> {
        match *value {
            Value::List(ref values) => values
                .iter()
                .map(|value| self.number(value).map(|number| number as f32))
                .collect(),
            Value::Word(ref word) => match self.word(word)? {
                Word::Color(color) => Ok(color.to_array().to_vec()),
                _ => Err(format!("expected a color but got `{}`", word)),
            },
            Value::Number(number) => Ok(vec![number as f32]),
        }
    }
}
