//! Test data files: whitespace separated integers.

use std::fs;
use std::path::Path;

use rand::Rng;

use crate::error::{Error, Result};

pub fn parse(contents: &str) -> Result<Vec<i32>> {
    contents
        .split_whitespace()
        .map(|token| {
            token
                .parse::<i32>()
                .map_err(|e| Error::Parse(format!("`{token}`: {e}")))
        })
        .collect()
}

pub fn read(path: impl AsRef<Path>) -> Result<Vec<i32>> {
    let contents = fs::read_to_string(path)?;
    parse(&contents)
}

/// `len` random values drawn uniformly from `min..=max`.
pub fn generate<R: Rng>(rng: &mut R, len: usize, min: i32, max: i32) -> Vec<i32> {
    (0..len).map(|_| rng.gen_range(min..=max)).collect()
}

pub fn render(values: &[i32]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn write(path: impl AsRef<Path>, values: &[i32]) -> Result<()> {
    fs::write(path, render(values))?;
    Ok(())
}
