//! Measurement records and the CSV file they are appended to.
//!
//! Each line has the form `<Operation>,<Language>,<N>,<DurationNanoseconds>`.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::error::Result;

pub const LANGUAGE: &str = "Rust";

pub const HEADER: &str = "TestName,Language,Size,Duration";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    DynamicArrayCreation,
    LinkedListCreation,
    LinkedListTraversal,
    StaticMemory,
    ThreadCreation,
    ThreadContextSwitches,
    ThreadMigration,
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::DynamicArrayCreation => "Dynamic Array creation",
            Operation::LinkedListCreation => "LinkedList creation",
            Operation::LinkedListTraversal => "LinkedList traversal",
            Operation::StaticMemory => "Static Memory test",
            Operation::ThreadCreation => "ThreadCreation",
            Operation::ThreadContextSwitches => "ThreadContextSwitches",
            Operation::ThreadMigration => "ThreadMigration",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub operation: Operation,
    pub language: &'static str,
    pub size: usize,
    pub duration_ns: u128,
}

impl Record {
    pub fn new(operation: Operation, size: usize, duration: Duration) -> Self {
        Self::from_nanos(operation, size, duration.as_nanos())
    }

    pub fn from_nanos(operation: Operation, size: usize, duration_ns: u128) -> Self {
        Record {
            operation,
            language: LANGUAGE,
            size,
            duration_ns,
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{}",
            self.operation, self.language, self.size, self.duration_ns
        )
    }
}

/// Runs `f` once and returns its output together with the elapsed time.
pub fn measure<R>(f: impl FnOnce() -> R) -> (R, Duration) {
    let start = Instant::now();
    let out = f();
    (out, start.elapsed())
}

pub struct ResultSink<W: Write> {
    out: W,
}

impl ResultSink<BufWriter<File>> {
    /// Opens `path` for appending, creating it when missing.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path.as_ref())?;
        Ok(Self::new(BufWriter::new(file)))
    }

    /// Truncates `path` and writes the CSV header line.
    pub fn create_with_header(path: impl AsRef<Path>) -> Result<Self> {
        let mut sink = Self::new(BufWriter::new(File::create(path.as_ref())?));
        writeln!(sink.out, "{HEADER}")?;
        Ok(sink)
    }

    /// [`create_with_header`](Self::create_with_header) when `reset` is set,
    /// [`open`](Self::open) otherwise.
    pub fn open_results(path: impl AsRef<Path>, reset: bool) -> Result<Self> {
        if reset {
            Self::create_with_header(path)
        } else {
            Self::open(path)
        }
    }
}

impl<W: Write> ResultSink<W> {
    pub fn new(out: W) -> Self {
        ResultSink { out }
    }

    pub fn append(&mut self, record: &Record) -> Result<()> {
        debug!(%record, "appending measurement");
        writeln!(self.out, "{record}")?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
