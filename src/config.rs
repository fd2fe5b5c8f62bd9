//! 設定
//!
//! 乱数生成のパラメータ、プロセッサのオプション、ドライバ実行時の設定を定義する。

use crate::error::ConfigError;
use crate::logging::LogLevel;
use serde::Serialize;
use std::ffi::OsString;
use std::path::PathBuf;

/// 既定の出力ディレクトリ
pub const DEFAULT_OUTPUT_DIR: &str = "./output";
/// ドライバが生成する既定のファイル名
pub const DEFAULT_FILE_NAME: &str = "random_numbers.txt";
/// デバッグログを有効化する環境変数
pub const DEBUG_ENV_VAR: &str = "NUMSORT_DEBUG";

/// 乱数ファイル生成のパラメータ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FillOptions {
    /// 書き込む値の個数
    pub count: usize,
    /// 下限（含む）
    pub lower_bound: i32,
    /// 上限（含む）
    pub upper_bound: i32,
}

impl Default for FillOptions {
    fn default() -> Self {
        Self {
            count: 100,
            lower_bound: 1,
            upper_bound: 1000,
        }
    }
}

impl FillOptions {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lower_bound > self.upper_bound {
            return Err(ConfigError::InvalidRange {
                lower: self.lower_bound,
                upper: self.upper_bound,
            });
        }
        Ok(())
    }

    pub fn contains(&self, value: i32) -> bool {
        (self.lower_bound..=self.upper_bound).contains(&value)
    }
}

/// `FileProcessor` のオプション
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ProcessorOptions {
    /// `create_and_fill` の既定パラメータ
    pub fill: FillOptions,
    /// ソート結果を一時ファイル経由で書き戻すか
    pub atomic_rewrite: bool,
}

/// ドライバ実行時の設定
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunConfig {
    pub output_dir: PathBuf,
    pub file_name: String,
    pub processor: ProcessorOptions,
    pub log_file: Option<PathBuf>,
    pub quiet: bool,
    pub debug: bool,
    pub show_help: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            file_name: DEFAULT_FILE_NAME.to_string(),
            processor: ProcessorOptions::default(),
            log_file: None,
            quiet: false,
            debug: false,
            show_help: false,
        }
    }
}

impl RunConfig {
    /// コマンドライン引数（プログラム名を除く）から設定を構築
    pub fn from_args<I>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut config = Self::default();
        let mut iter = args.into_iter();

        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--dir" => config.output_dir = PathBuf::from(take_value(&mut iter, "--dir")?),
                "--file" => config.file_name = take_value(&mut iter, "--file")?,
                "--count" => config.processor.fill.count = parse_value(&mut iter, "--count")?,
                "--min" => config.processor.fill.lower_bound = parse_value(&mut iter, "--min")?,
                "--max" => config.processor.fill.upper_bound = parse_value(&mut iter, "--max")?,
                "--atomic" => config.processor.atomic_rewrite = true,
                "--log-file" => {
                    config.log_file = Some(PathBuf::from(take_value(&mut iter, "--log-file")?))
                }
                "--quiet" => config.quiet = true,
                "--debug" => config.debug = true,
                "-h" | "--help" => config.show_help = true,
                _ => return Err(ConfigError::UnknownArgument { arg }),
            }
        }

        config.processor.fill.validate()?;
        Ok(config)
    }

    /// プロセスの引数と環境変数から設定を構築
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self::from_args(std::env::args().skip(1))?;
        Ok(config.apply_debug_env(std::env::var_os(DEBUG_ENV_VAR)))
    }

    /// `NUMSORT_DEBUG` の値（設定されていれば内容は問わない）を適用
    pub fn apply_debug_env(mut self, value: Option<OsString>) -> Self {
        if value.is_some() {
            self.debug = true;
        }
        self
    }

    /// 生成対象ファイルのパス
    pub fn file_path(&self) -> PathBuf {
        self.output_dir.join(&self.file_name)
    }

    /// ドライバのロガーに適用するログレベル
    pub fn log_level(&self) -> LogLevel {
        if self.debug {
            LogLevel::Debug
        } else {
            LogLevel::Info
        }
    }
}

fn take_value<I>(iter: &mut I, key: &str) -> Result<String, ConfigError>
where
    I: Iterator<Item = String>,
{
    match iter.next() {
        Some(value) if !value.starts_with("--") => Ok(value),
        _ => Err(ConfigError::MissingValue { key: key.to_string() }),
    }
}

fn parse_value<I, T>(iter: &mut I, key: &str) -> Result<T, ConfigError>
where
    I: Iterator<Item = String>,
    T: std::str::FromStr,
{
    let raw = take_value(iter, key)?;
    raw.parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: raw,
    })
}

/// `--help` で表示する使い方
pub fn usage() -> &'static str {
    "Usage: numsort [--dir DIR] [--file NAME] [--count N] [--min N] [--max N]\n\
     \x20              [--atomic] [--log-file PATH] [--quiet] [--debug]\n\
     \n\
     Creates DIR, fills DIR/NAME with N random integers in [min, max],\n\
     then sorts the file in place."
}
