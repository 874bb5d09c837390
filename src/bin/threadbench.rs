use std::env;
use std::process;

use anyhow::Context;
use langbench::config::ThreadConfig;
use langbench::record::ResultSink;
use langbench::threading;

fn main() -> anyhow::Result<()> {
    langbench::logging::init();

    let args: Vec<String> = env::args().collect();
    let config = ThreadConfig::build(args.get(1..).unwrap_or_default()).unwrap_or_else(|err| {
        eprintln!("Wrong args: {err}");
        eprintln!("{}", ThreadConfig::USAGE);
        process::exit(1);
    });

    let mut sink = ResultSink::open_results(&config.results_path, config.reset_results)
        .with_context(|| format!("cannot open results file {:?}", config.results_path))?;

    threading::run(&config, &mut sink).context("threading benchmark failed")?;
    Ok(())
}
