use std::env;
use std::process;

use anyhow::Context;
use langbench::config::MemoryConfig;
use langbench::memory;
use langbench::record::ResultSink;

fn main() -> anyhow::Result<()> {
    langbench::logging::init();

    let args: Vec<String> = env::args().collect();
    let config = MemoryConfig::build(args.get(1..).unwrap_or_default()).unwrap_or_else(|err| {
        eprintln!("Wrong args: {err}");
        eprintln!("{}", MemoryConfig::USAGE);
        process::exit(1);
    });

    let mut sink = ResultSink::open_results(&config.results_path, config.reset_results)
        .with_context(|| format!("cannot open results file {:?}", config.results_path))?;

    memory::run(&config, &mut sink).context("memory benchmark failed")?;
    Ok(())
}
