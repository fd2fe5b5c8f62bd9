use anyhow::Context;
use numsort::config::{self, RunConfig};
use numsort::{driver, logging, FileProcessor};
use std::process::ExitCode;

fn main() -> ExitCode {
    let config = match RunConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("numsort: {e}");
            eprintln!("{}", config::usage());
            return ExitCode::from(2);
        }
    };

    if config.show_help {
        println!("{}", config::usage());
        return ExitCode::SUCCESS;
    }

    let logger = logging::install(driver::build_logger(&config));
    let processor = FileProcessor::with_logger(logger.clone()).with_options(config.processor);

    // 実行中のエラーはログに残すだけで、プロセスは正常終了させる
    match run_once(&config, &processor) {
        Ok(summary) => logger.info(summary),
        Err(e) => logger.error(format!("Run failed: {e:#}")),
    }

    ExitCode::SUCCESS
}

fn run_once(config: &RunConfig, processor: &FileProcessor) -> anyhow::Result<String> {
    let summary = driver::run(config, processor)
        .with_context(|| format!("processing {}", config.file_path().display()))?;

    Ok(format!(
        "Sorted {} numbers in {}",
        summary.count,
        summary.path.display()
    ))
}
