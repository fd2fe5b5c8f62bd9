//! ドライバ
//!
//! ディレクトリ作成 → 乱数ファイル生成 → ソートを1回だけ実行する。

use crate::config::RunConfig;
use crate::error::Result;
use crate::logging::Logger;
use crate::processor::{FileProcessor, LOGGER_NAME};
use std::path::PathBuf;

/// 1回の実行結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub path: PathBuf,
    pub count: usize,
}

/// 設定に従ってドライバ用ロガーを構築
pub fn build_logger(config: &RunConfig) -> Logger {
    let mut logger = Logger::new(LOGGER_NAME).with_level(config.log_level());
    if config.quiet {
        logger = logger.without_stderr();
    }
    if let Some(path) = &config.log_file {
        logger = logger.with_file_output(path);
    }
    logger
}

/// create → fill → sort を順に実行する
///
/// いずれかの段階で失敗した場合はその時点で中断し、エラーを返す。
pub fn run(config: &RunConfig, processor: &FileProcessor) -> Result<RunSummary> {
    let file_path = config.file_path();
    if let Ok(settings) = serde_json::to_string(config) {
        processor.logger().debug(format!("Run configuration: {settings}"));
    }

    processor.ensure_directory(&config.output_dir)?;
    processor.create_and_fill(&file_path)?;
    let report = processor.sort_in_place(&file_path)?;

    Ok(RunSummary {
        path: report.path,
        count: report.count,
    })
}
