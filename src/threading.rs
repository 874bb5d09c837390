//! Threading benchmark: spawn cost, pipe ping-pong context switches and
//! forced migrations between CPU 0 and CPU 1. Linux only.

use std::fs::File;
use std::hint::black_box;
use std::io::{self, Read, Write};
use std::thread;
use std::time::Duration;

use nix::sched::{CpuSet, sched_setaffinity, sched_yield};
use nix::unistd::{Pid, pipe};
use tracing::{debug, info};

use crate::config::ThreadConfig;
use crate::error::{Error, Result};
use crate::record::{Operation, Record, ResultSink, measure};

fn noop() {}

/// Average cost of spawning and joining a thread, minus the cost of calling
/// the same function directly.
pub fn thread_creation(runs: usize) -> Result<Record> {
    let (joined, threaded) = measure(|| {
        (0..runs).try_for_each(|_| thread::spawn(noop).join().map_err(|_| Error::ThreadPanicked))
    });
    joined?;

    let ((), direct) = measure(|| {
        for _ in 0..runs {
            black_box(noop)();
        }
    });

    info!(?threaded, ?direct, "thread creation");
    let per_run = threaded
        .saturating_sub(direct)
        .as_nanos()
        .checked_div(runs as u128)
        .unwrap_or(0);
    Ok(Record::from_nanos(Operation::ThreadCreation, runs, per_run))
}

fn pipe_files() -> Result<(File, File)> {
    let (read, write) = pipe().map_err(io::Error::from)?;
    Ok((File::from(read), File::from(write)))
}

/// Sends one byte to a child thread and waits for its answer, `runs` times.
/// The recorded duration is half of the total.
pub fn context_switches(runs: usize) -> Result<Record> {
    let (mut child_rx, mut parent_tx) = pipe_files()?;
    let (mut parent_rx, mut child_tx) = pipe_files()?;

    let child = thread::spawn(move || -> io::Result<()> {
        let mut buf = [0u8; 1];
        for _ in 0..runs {
            child_rx.read_exact(&mut buf)?;
            child_tx.write_all(b"A")?;
        }
        Ok(())
    });

    let (exchanged, elapsed) = measure(|| -> io::Result<()> {
        let mut buf = [0u8; 1];
        for _ in 0..runs {
            parent_tx.write_all(b"X")?;
            parent_rx.read_exact(&mut buf)?;
        }
        Ok(())
    });
    // 先关掉写端, 子线程出错时也能读到 EOF 退出
    drop(parent_tx);

    child.join().map_err(|_| Error::ThreadPanicked)??;
    exchanged?;

    info!(?elapsed, runs, "pipe ping-pong");
    Ok(Record::from_nanos(
        Operation::ThreadContextSwitches,
        runs,
        elapsed.as_nanos() / 2,
    ))
}

fn pin_to_cpu(cpu: usize) -> Result<()> {
    let mut set = CpuSet::new();
    set.set(cpu)?;
    sched_setaffinity(Pid::from_raw(0), &set)
        .map_err(|e| Error::Affinity(format!("cannot pin thread to cpu {cpu}: {e}")))
}

fn migrate_once() -> Result<Duration> {
    pin_to_cpu(0)?;
    sched_yield()?;

    pin_to_cpu(1)?;
    let (yielded, elapsed) = measure(sched_yield);
    yielded?;
    Ok(elapsed)
}

/// Total time of the first yield after moving a fresh thread from CPU 0 to
/// CPU 1, summed over `runs` threads.
pub fn migrations(runs: usize) -> Result<Record> {
    let mut total = Duration::ZERO;
    for run in 0..runs {
        let elapsed = thread::spawn(migrate_once)
            .join()
            .map_err(|_| Error::ThreadPanicked)??;
        debug!(run, ?elapsed, "migration");
        total += elapsed;
    }

    info!(?total, runs, "thread migrations");
    Ok(Record::new(Operation::ThreadMigration, runs, total))
}

pub fn run<W: Write>(config: &ThreadConfig, sink: &mut ResultSink<W>) -> Result<()> {
    sink.append(&thread_creation(config.creation_runs)?)?;
    sink.append(&context_switches(config.pipe_runs)?)?;
    sink.append(&migrations(config.migration_runs)?)?;
    sink.flush()
}
