use std::env;
use std::process;

use anyhow::Context;
use langbench::config::GenConfig;
use langbench::testcase;
use tracing::info;

fn main() -> anyhow::Result<()> {
    langbench::logging::init();

    let args: Vec<String> = env::args().collect();
    let config = GenConfig::build(args.get(1..).unwrap_or_default()).unwrap_or_else(|err| {
        eprintln!("Wrong args: {err}");
        eprintln!("{}", GenConfig::USAGE);
        process::exit(1);
    });

    let values = testcase::generate(
        &mut rand::thread_rng(),
        config.length,
        config.min,
        config.max,
    );
    testcase::write(&config.output_path, &values)
        .with_context(|| format!("cannot write testcase {:?}", config.output_path))?;

    info!(path = ?config.output_path, len = values.len(), "testcase written");
    Ok(())
}
