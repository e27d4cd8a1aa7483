// pathfinder/demo/native-turtle/src/main.rs
//
// Copyright © 2019 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Runs a turtle script headlessly and writes what it drew to a PNG.

#[macro_use]
extern crate log;

use clap::{value_t, App, Arg, ArgMatches};
use pathfinder_turtle::{Finish, RasterBuffer, RenderError, ScriptFault, TurtleEngine};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;

const FRAME_INTERVAL: Duration = Duration::from_millis(50);
const MAX_TIMEOUT_SECS: f64 = 1.0e9;

#[derive(Debug, Error)]
enum DemoError {
    #[error("cannot read `{path}`: {source}")]
    Script { path: String, source: io::Error },
    #[error("cannot create `{path}`: {source}")]
    Frames { path: PathBuf, source: io::Error },
    #[error("cannot write `{path}`: {source}")]
    Image {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Fault(#[from] ScriptFault),
    #[error("the script worker panicked")]
    WorkerPanicked,
}

struct Options {
    script: String,
    output: PathBuf,
    width: u32,
    height: u32,
    delay: Duration,
    timeout: Option<Duration>,
    frames: Option<PathBuf>,
}

impl Options {
    fn from_matches(matches: &ArgMatches) -> Options {
        let width = value_t!(matches, "width", u32).unwrap_or_else(|error| error.exit());
        let height = value_t!(matches, "height", u32).unwrap_or_else(|error| error.exit());
        let delay = value_t!(matches, "delay", u64).unwrap_or_else(|error| error.exit());
        let timeout = if matches.is_present("timeout") {
            let seconds = value_t!(matches, "timeout", f64).unwrap_or_else(|error| error.exit());
            Some(Duration::from_secs_f64(seconds.max(0.0).min(MAX_TIMEOUT_SECS)))
        } else {
            None
        };

        Options {
            script: matches.value_of("SCRIPT").unwrap_or_default().to_owned(),
            output: PathBuf::from(matches.value_of("output").unwrap_or("turtle.png")),
            width,
            height,
            delay: Duration::from_millis(delay),
            timeout,
            frames: matches.value_of("frames").map(PathBuf::from),
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = App::new("turtle-demo")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Runs a turtle script and saves the drawing as a PNG")
        .arg(
            Arg::with_name("SCRIPT")
                .help("The turtle script to run")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .takes_value(true)
                .default_value("turtle.png")
                .help("Where to write the final drawing"),
        )
        .arg(
            Arg::with_name("width")
                .long("width")
                .takes_value(true)
                .default_value("800")
                .help("Canvas width in pixels"),
        )
        .arg(
            Arg::with_name("height")
                .long("height")
                .takes_value(true)
                .default_value("600")
                .help("Canvas height in pixels"),
        )
        .arg(
            Arg::with_name("delay")
                .long("delay")
                .takes_value(true)
                .default_value("0")
                .help("Milliseconds to wait after every command"),
        )
        .arg(
            Arg::with_name("timeout")
                .long("timeout")
                .takes_value(true)
                .help("Stops the script after this many seconds"),
        )
        .arg(
            Arg::with_name("frames")
                .long("frames")
                .takes_value(true)
                .value_name("DIR")
                .help("Saves every intermediate paint into DIR"),
        )
        .get_matches();

    let options = Options::from_matches(&matches);
    if let Err(error) = run(&options) {
        error!("{}", error);
        process::exit(1);
    }
}

fn run(options: &Options) -> Result<(), DemoError> {
    let source = fs::read_to_string(&options.script).map_err(|source| DemoError::Script {
        path: options.script.clone(),
        source,
    })?;
    if let Some(ref frames) = options.frames {
        fs::create_dir_all(frames).map_err(|source| DemoError::Frames {
            path: frames.clone(),
            source,
        })?;
    }

    let engine = Arc::new(TurtleEngine::new());
    engine.init();
    if options.delay > Duration::from_millis(0) {
        let delay = options.delay;
        engine.set_step_listener(move || thread::sleep(delay));
    }

    let (sender, receiver) = mpsc::channel();
    let worker = {
        let engine = engine.clone();
        let name = options.script.clone();
        thread::spawn(move || {
            let _ = sender.send(engine.execute(&name, &source));
        })
    };

    let mut canvas = RasterBuffer::new(options.width, options.height)?;
    let deadline = options.timeout.map(|timeout| Instant::now() + timeout);
    let mut stop_requested = false;
    let mut frame = 0;
    let result = loop {
        match receiver.recv_timeout(FRAME_INTERVAL) {
            Ok(result) => break result,
            Err(RecvTimeoutError::Disconnected) => return Err(DemoError::WorkerPanicked),
            Err(RecvTimeoutError::Timeout) => {}
        }

        engine.paint_canvas(options.width, options.height, &mut canvas)?;
        if let Some(ref frames) = options.frames {
            save(&canvas, &frames.join(format!("frame-{:05}.png", frame)))?;
            frame += 1;
        }

        if let Some(deadline) = deadline {
            if !stop_requested && Instant::now() >= deadline {
                info!("timed out, stopping the script");
                engine.request_stop();
                stop_requested = true;
            }
        }
    };
    if worker.join().is_err() {
        return Err(DemoError::WorkerPanicked);
    }

    engine.paint_canvas(options.width, options.height, &mut canvas)?;
    save(&canvas, &options.output)?;
    match result? {
        Finish::Completed => info!("wrote {}", options.output.display()),
        Finish::Cancelled => info!("stopped early, wrote {}", options.output.display()),
    }
    Ok(())
}

fn save(canvas: &RasterBuffer, path: &Path) -> Result<(), DemoError> {
    canvas
        .as_image()
        .save(path)
        .map_err(|source| DemoError::Image {
            path: path.to_owned(),
            source,
        })
}
