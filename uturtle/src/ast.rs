// pathfinder/uturtle/src/ast.rs
//
// Copyright © 2019 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::fmt::{Display, Formatter, Result as FormatResult};

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Number(f64),
    /// A bare word such as `left`, `up` or `red`, resolved by the runner.
    Word(String),
    List(Vec<Value>),
}

impl Display for Value {
    fn fmt(&self, formatter: &mut Formatter) -> FormatResult {
        match *self {
            Value::Number(number) => write!(formatter, "{}", number),
            Value::Word(ref word) => formatter.write_str(word),
            Value::List(ref values) => {
                formatter.write_str("[")?;
                for (index, value) in values.iter().enumerate() {
                    if index > 0 {
                        formatter.write_str(", ")?;
                    }
                    write!(formatter, "{}", value)?;
                }
                formatter.write_str("]")
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Walk(Value),
    Jump(Value),
    Turn(Value),
    Pen(Value),
    Color(Value),
    Color3(Value, Value, Value),
    Repeat(Value, Vec<Statement>),
    Forever(Vec<Statement>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Statement {
    /// Byte offset of the statement in the source text.
    pub offset: usize,
    pub command: Command,
}

impl Statement {
    #[inline]
    pub fn new(offset: usize, command: Command) -> Statement {
        Statement { offset, command }
    }
}

pub type Turtle = Vec<Statement>;
