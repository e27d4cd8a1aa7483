// pathfinder/uturtle/src/lib.rs
//
// Copyright © 2019 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The uturtle scripting language.
//!
//! A script is a sequence of commands, one keyword followed by its arguments:
//!
//! ```text
//! color red
//! repeat 4 [ walk 100 turn right ]
//! ```

#[macro_use]
extern crate lalrpop_util;

use lalrpop_util::ParseError;
use std::fmt::Display;
use thiserror::Error;

pub mod ast;

lalrpop_mod!(pub turtle); // synthesized by LALRPOP

pub type Parser = turtle::TopLevelParser;

/// A script that could not be parsed.
#[derive(Clone, Debug, Error, PartialEq)]
#[error("{message}")]
pub struct SyntaxError {
    pub message: String,
    /// 1-based line of the offending token.
    pub line: usize,
}

/// Parses a whole script.
pub fn parse(source: &str) -> Result<ast::Turtle, SyntaxError> {
    Parser::new()
        .parse(source)
        .map_err(|error| syntax_error(source, error))
}

/// Returns the 1-based line containing `offset`.
pub fn line_of(source: &str, offset: usize) -> usize {
    let end = offset.min(source.len());
    source.as_bytes()[..end].iter().filter(|&&byte| byte == b'\n').count() + 1
}

fn syntax_error<T, E>(source: &str, error: ParseError<usize, T, E>) -> SyntaxError
where
    T: Display,
    E: Display,
{
    let (offset, message) = match error {
        ParseError::InvalidToken { location } => (location, "unrecognized input".to_owned()),
        ParseError::UnrecognizedEof { location, expected } => (
            location,
            format!("unexpected end of script, expected {}", one_of(&expected)),
        ),
        ParseError::UnrecognizedToken {
            token: (start, token, _),
            expected,
        } => (
            start,
            format!("unexpected `{}`, expected {}", token, one_of(&expected)),
        ),
        ParseError::ExtraToken {
            token: (start, token, _),
        } => (start, format!("unexpected `{}`", token)),
        ParseError::User { error } => (source.len(), error.to_string()),
    };

    SyntaxError {
        message,
        line: line_of(source, offset),
    }
}

fn one_of(expected: &[String]) -> String {
    match expected.len() {
        0 => "something else".to_owned(),
        1 => expected[0].clone(),
        _ => format!("one of {}", expected.join(", ")),
    }
}

#[cfg(test)]
mod tests {
    use super::ast::{Command, Statement, Value};
    use super::*;

    #[test]
    fn turtle_command_parser() {
        assert!(turtle::CommandParser::new().parse("walk 100").is_ok());
        assert!(turtle::CommandParser::new().parse("jump -50.5").is_ok());
        assert!(turtle::CommandParser::new().parse("turn left").is_ok());
        assert!(turtle::CommandParser::new().parse("turn 22.7").is_ok());
        assert!(turtle::CommandParser::new().parse("pen up").is_ok());
        assert!(turtle::CommandParser::new().parse("pen down").is_ok());
        assert!(turtle::CommandParser::new().parse("color red").is_ok());
        assert!(turtle::CommandParser::new()
            .parse("color [100,50 ,    0]")
            .is_ok());
        assert!(turtle::CommandParser::new()
            .parse("color3 100, 0, 0")
            .is_ok());
        assert!(turtle::CommandParser::new()
            .parse("repeat 4 [ walk 100 turn right ]")
            .is_ok());
        assert!(turtle::CommandParser::new()
            .parse("forever [ walk 1 turn 1 ]")
            .is_ok());

        assert!(turtle::CommandParser::new().parse("bleh").is_err());
        assert!(turtle::CommandParser::new().parse("walk").is_err());
        assert!(turtle::CommandParser::new().parse("pen up down").is_err());
        assert!(turtle::CommandParser::new().parse("color3 100, 0").is_err());
        assert!(turtle::CommandParser::new().parse("repeat 4 walk 1").is_err());
    }

    #[test]
    fn turtle_program_parser() {
        assert!(Parser::new()
            .parse("turn right walk 100\n# a comment\nturn left walk 12.3")
            .is_ok());
        assert!(Parser::new().parse("").is_ok());
    }

    #[test]
    fn values() {
        let parser = turtle::ValueParser::new();
        assert_eq!(parser.parse("-90").unwrap(), Value::Number(-90.0));
        assert_eq!(parser.parse("silver").unwrap(), Value::Word("silver".to_owned()));
        assert_eq!(
            parser.parse("[1, 2, 3]").unwrap(),
            Value::List(vec![
                Value::Number(1.0),
                Value::Number(2.0),
                Value::Number(3.0)
            ])
        );
        assert_eq!(parser.parse("[]").unwrap(), Value::List(vec![]));
    }

    #[test]
    fn statements_keep_their_offsets() {
        let source = "walk 100\n  repeat 2 [\n    turn 90\n  ]";
        let turtle = parse(source).unwrap();
        assert_eq!(turtle.len(), 2);
        assert_eq!(turtle[0], Statement::new(0, Command::Walk(Value::Number(100.0))));
        assert_eq!(line_of(source, turtle[1].offset), 2);
        match turtle[1].command {
            Command::Repeat(Value::Number(count), ref body) => {
                assert_eq!(count, 2.0);
                assert_eq!(line_of(source, body[0].offset), 3);
            }
            ref other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn syntax_errors_report_lines() {
        let error = parse("walk 100\nturn left\nwalk walk").unwrap_err();
        assert_eq!(error.line, 3);
        assert!(error.message.starts_with("unexpected `walk`"), "{}", error.message);

        let error = parse("walk 10\nrepeat 3 [ walk 1").unwrap_err();
        assert_eq!(error.line, 2);
        assert!(error.message.starts_with("unexpected end of script"));

        let error = parse("walk 10 $").unwrap_err();
        assert_eq!(error.line, 1);
    }

    #[test]
    fn line_of_clamps_offsets() {
        assert_eq!(line_of("a\nb", 0), 1);
        assert_eq!(line_of("a\nb", 2), 2);
        assert_eq!(line_of("a\nb", 99), 2);
    }
}
