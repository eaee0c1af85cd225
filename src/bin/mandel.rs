// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

extern crate clap;
extern crate env_logger;
#[macro_use]
extern crate log;
extern crate mandelgather;
extern crate num_cpus;

use clap::{App, Arg, ArgMatches};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use mandelgather::{render, write_ppm, Error, RenderConfig};

fn parse_pair<T>(s: &str, separator: char) -> Option<(T, T)>
where
    T: FromStr,
{
    match s.find(separator) {
        None => None,
        Some(index) => match (T::from_str(&s[..index]), T::from_str(&s[index + 1..])) {
            (Ok(l), Ok(r)) => Some((l, r)),
            _ => None,
        },
    }
}

fn parse_bounds(s: &str) -> Option<(f64, f64, f64, f64)> {
    let values: Vec<f64> = s
        .split(',')
        .map(|v| f64::from_str(v.trim()))
        .collect::<Result<_, _>>()
        .ok()?;
    match values.as_slice() {
        [x_min, x_max, y_min, y_max] => Some((*x_min, *x_max, *y_min, *y_max)),
        _ => None,
    }
}

fn validate_pair<T: FromStr>(s: &str, separator: char, err: &str) -> Result<(), String> {
    match parse_pair::<T>(s, separator) {
        Some(_) => Ok(()),
        None => Err(err.to_string()),
    }
}

fn validate_range<T: FromStr + Ord>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

const FILE: &str = "file";
const DIMENSIONS: &str = "dimensions";
const BOUNDS: &str = "bounds";
const WORKERS: &str = "workers";
const ITERATIONS: &str = "iterations";
const TIMEOUT: &str = "timeout";
const BASELINE: &str = "baseline";

fn args<'a>(cpus: &'a str) -> ArgMatches<'a> {
    App::new("mandel")
        .version("0.1.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Mandelbrot renderer over a row-interleaved worker group")
        .arg(
            Arg::with_name(FILE)
                .long(FILE)
                .short("f")
                .takes_value(true)
                .default_value("mandel.ppm")
                .help("Output file"),
        )
        .arg(
            Arg::with_name(DIMENSIONS)
                .long(DIMENSIONS)
                .short("d")
                .takes_value(true)
                .default_value("1024x768")
                .validator(|s| validate_pair::<usize>(&s, 'x', "Could not parse image dimensions"))
                .help("Size of output image, WIDTHxHEIGHT"),
        )
        .arg(
            Arg::with_name(BOUNDS)
                .long(BOUNDS)
                .short("b")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("-1.78,0.78,-0.961,0.961")
                .validator(|s| match parse_bounds(&s) {
                    Some(_) => Ok(()),
                    None => Err("Bounds must be XMIN,XMAX,YMIN,YMAX".to_string()),
                })
                .help("Region of the complex plane, XMIN,XMAX,YMIN,YMAX"),
        )
        .arg(
            Arg::with_name(WORKERS)
                .long(WORKERS)
                .short("w")
                .takes_value(true)
                .default_value(cpus)
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        4096,
                        "Could not parse worker count",
                        "Worker count must be between 1 and 4096",
                    )
                })
                .help("Number of workers in the group"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .long(ITERATIONS)
                .short("n")
                .takes_value(true)
                .default_value("100")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        1_000_000,
                        "Could not parse iteration count",
                        "Iteration count must be between 1 and 1000000",
                    )
                })
                .help("Escape-time iteration cap"),
        )
        .arg(
            Arg::with_name(TIMEOUT)
                .long(TIMEOUT)
                .short("t")
                .takes_value(true)
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        u64::max_value(),
                        "Could not parse timeout",
                        "Timeout must be positive",
                    )
                })
                .help("Give up on a row transfer after this many milliseconds"),
        )
        .arg(
            Arg::with_name(BASELINE)
                .long(BASELINE)
                .takes_value(true)
                .validator(|s| match f64::from_str(&s) {
                    Ok(v) if v > 0.0 => Ok(()),
                    _ => Err("Baseline must be a positive number of seconds".to_string()),
                })
                .help("Serial run time in seconds, used to report speed-up"),
        )
        .get_matches()
}

fn run(matches: &ArgMatches) -> Result<(), Error> {
    let dimensions = parse_pair::<usize>(matches.value_of(DIMENSIONS).unwrap_or(""), 'x')
        .ok_or_else(|| Error::Configuration("Could not parse image dimensions".to_string()))?;
    let bounds = parse_bounds(matches.value_of(BOUNDS).unwrap_or(""))
        .ok_or_else(|| Error::Configuration("Could not parse bounds".to_string()))?;
    let iterations = u32::from_str(matches.value_of(ITERATIONS).unwrap_or(""))
        .map_err(|_| Error::Configuration("Could not parse iteration count".to_string()))?;
    let workers = usize::from_str(matches.value_of(WORKERS).unwrap_or(""))
        .map_err(|_| Error::Configuration("Could not parse worker count".to_string()))?;
    let timeout = match matches.value_of(TIMEOUT) {
        Some(ms) => Some(Duration::from_millis(u64::from_str(ms).map_err(|_| {
            Error::Configuration("Could not parse timeout".to_string())
        })?)),
        None => None,
    };
    let output = PathBuf::from(matches.value_of(FILE).unwrap_or("mandel.ppm"));

    let config = RenderConfig::from_raw(bounds, dimensions, iterations, output)?;
    info!(
        "rendering {}x{} with {} workers, {} iterations",
        dimensions.0, dimensions.1, workers, iterations
    );

    let rendering = render(&config, workers, timeout)?;
    write_ppm(&config.output, &rendering.image)?;

    for report in &rendering.reports {
        let seconds = report.elapsed.as_secs_f64();
        println!("{:.6} seconds time in worker {}", seconds, report.rank);
        if let Some(baseline) = matches.value_of(BASELINE) {
            if let Ok(baseline) = f64::from_str(baseline) {
                if seconds > 0.0 {
                    println!("speed up: {:.6}", baseline / seconds);
                }
            }
        }
    }
    Ok(())
}

fn main() {
    env_logger::init();
    let cpus = num_cpus::get().to_string();
    let matches = args(&cpus);
    if let Err(e) = run(&matches) {
        eprintln!("Render failure: {}", e);
        std::process::exit(1);
    }
}
