//! numsort - ディレクトリを作成し、乱数を書き込んだファイルをその場でソートする
//!
//! モジュール構成

// コアモジュール
pub mod config;
pub mod error;
pub mod logging;

// データ層
pub mod numbers;

// 処理層
pub mod driver;
pub mod processor;

// 公開API
pub use config::{FillOptions, ProcessorOptions, RunConfig};
pub use error::{ConfigError, FileError, NumsortError, Result};
pub use logging::{LogLevel, LogRecord, Logger};
pub use processor::{FileProcessor, FillReport, SortReport};
