//! Positional command line arguments for the benchmark binaries.
//!
//! Every `build` takes the arguments *after* the program name.

use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Trailing flag asking for the results file to be truncated and given a
/// fresh CSV header before any record is written.
pub const RESET_FLAG: &str = "--reset";

fn split_reset(args: &[String]) -> (&[String], bool) {
    match args.split_last() {
        Some((last, rest)) if last == RESET_FLAG => (rest, true),
        _ => (args, false),
    }
}

fn expect_args(args: &[String], expected: usize) -> Result<()> {
    if args.len() != expected {
        return Err(Error::Config(format!(
            "expected {expected} arguments, got {}",
            args.len()
        )));
    }
    Ok(())
}

fn parse_arg<T: FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| Error::Config(format!("{name} must be a number, got `{value}`")))
}

fn parse_count(name: &str, value: &str) -> Result<usize> {
    let count: usize = parse_arg(name, value)?;
    if count == 0 {
        return Err(Error::Config(format!("{name} must be positive")));
    }
    Ok(count)
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemoryConfig {
    pub testcase_path: PathBuf,
    pub results_path: PathBuf,
    pub array_size: usize,
    pub reset_results: bool,
}

impl MemoryConfig {
    pub const USAGE: &'static str = "\
Usage: (1) testcase file location
Usage: (2) results file location
Usage: (3) array_size
Usage: (4) optional --reset to rewrite the results file with a header";

    pub fn build(args: &[String]) -> Result<MemoryConfig> {
        let (args, reset_results) = split_reset(args);
        expect_args(args, 3)?;

        Ok(MemoryConfig {
            testcase_path: PathBuf::from(&args[0]),
            results_path: PathBuf::from(&args[1]),
            array_size: parse_arg("array_size", &args[2])?,
            reset_results,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ThreadConfig {
    pub creation_runs: usize,
    pub pipe_runs: usize,
    pub migration_runs: usize,
    pub results_path: PathBuf,
    pub reset_results: bool,
}

impl ThreadConfig {
    pub const USAGE: &'static str = "\
Usage: (1) Nr of thread runs
Usage: (2) Nr of pipe reads runs
Usage: (3) Nr of forced thread migrations
Usage: (4) results file location
Usage: (5) optional --reset to rewrite the results file with a header";

    pub fn build(args: &[String]) -> Result<ThreadConfig> {
        let (args, reset_results) = split_reset(args);
        expect_args(args, 4)?;

        Ok(ThreadConfig {
            creation_runs: parse_count("thread runs", &args[0])?,
            pipe_runs: parse_count("pipe runs", &args[1])?,
            migration_runs: parse_count("migration runs", &args[2])?,
            results_path: PathBuf::from(&args[3]),
            reset_results,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenConfig {
    pub output_path: PathBuf,
    pub length: usize,
    pub min: i32,
    pub max: i32,
}

impl GenConfig {
    pub const USAGE: &'static str = "\
Usage: (1) testcase file location
Usage: (2) number of values
Usage: (3) min value
Usage: (4) max value";

    pub fn build(args: &[String]) -> Result<GenConfig> {
        expect_args(args, 4)?;

        let min: i32 = parse_arg("min", &args[2])?;
        let max: i32 = parse_arg("max", &args[3])?;
        if min > max {
            return Err(Error::Config(format!("min ({min}) is greater than max ({max})")));
        }

        Ok(GenConfig {
            output_path: PathBuf::from(&args[0]),
            length: parse_arg("length", &args[1])?,
            min,
            max,
        })
    }
}
