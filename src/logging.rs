//! ロギングシステム
//!
//! 名前付きロガーと、プロセス内で共有するロガーのレジストリを提供する。
//! 出力先は stderr・JSON Lines ファイル・メモリ内キャプチャの3種類で、
//! すべてのレコードは `log` ファサードにも転送される。

use serde::Serialize;
use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, OnceLock};
use std::time::{SystemTime, UNIX_EPOCH};

/// ログレベル
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl LogLevel {
    fn tag(self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
        }
    }

    fn to_log_level(self) -> log::Level {
        match self {
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Info => log::Level::Info,
            LogLevel::Warning => log::Level::Warn,
            LogLevel::Error => log::Level::Error,
        }
    }
}

/// 記録された1件のログ
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogRecord {
    pub logger: String,
    pub level: LogLevel,
    pub message: String,
}

/// ロガー
///
/// * stderr へ `[name] TAG: message` 形式で出力
/// * ファイル出力は JSON Lines 形式で追記
/// * キャプチャを有効にするとレコードをメモリに保持する（テスト向け）
#[derive(Debug)]
pub struct Logger {
    name: String,
    level: LogLevel,
    output_stderr: bool,
    output_file: Option<PathBuf>,
    capture: Option<Mutex<Vec<LogRecord>>>,
}

impl Logger {
    /// デフォルト構築（Info レベル、stderr 出力）
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            level: LogLevel::Info,
            output_stderr: true,
            output_file: None,
            capture: None,
        }
    }

    /// ロガー名を取得
    pub fn name(&self) -> &str {
        &self.name
    }

    /// ログレベルを取得
    pub fn level(&self) -> LogLevel {
        self.level
    }

    /// ログレベルを変更
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// ファイル出力を設定
    pub fn with_file_output<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.output_file = Some(path.into());
        self
    }

    /// 標準エラー出力を無効化
    pub fn without_stderr(mut self) -> Self {
        self.output_stderr = false;
        self
    }

    /// メモリ内キャプチャを有効化
    pub fn with_capture(mut self) -> Self {
        self.capture = Some(Mutex::new(Vec::new()));
        self
    }

    /// キャプチャ済みレコードのスナップショット
    pub fn records(&self) -> Vec<LogRecord> {
        match &self.capture {
            Some(buffer) => buffer.lock().map(|records| records.clone()).unwrap_or_default(),
            None => Vec::new(),
        }
    }

    fn should_log(&self, level: LogLevel) -> bool {
        level >= self.level
    }

    fn append_to_file(&self, record: &LogRecord) {
        let Some(path) = &self.output_file else {
            return;
        };

        // ログ出力の失敗は呼び出し元の処理に影響させない
        if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) {
            let line = serde_json::json!({
                "logger": record.logger,
                "level": record.level,
                "ts": timestamp_ms(),
                "message": record.message,
            });
            let _ = writeln!(file, "{line}");
        }
    }

    /// 任意のログレベルでメッセージを出力
    pub fn log(&self, level: LogLevel, message: impl AsRef<str>) {
        if !self.should_log(level) {
            return;
        }

        let message = message.as_ref();
        log::log!(target: self.name.as_str(), level.to_log_level(), "{}", message);

        if self.output_stderr {
            eprintln!("[{}] {}: {}", self.name, level.tag(), message);
        }

        let record = LogRecord {
            logger: self.name.clone(),
            level,
            message: message.to_string(),
        };
        self.append_to_file(&record);

        if let Some(buffer) = &self.capture {
            if let Ok(mut records) = buffer.lock() {
                records.push(record);
            }
        }
    }

    /// デバッグログ
    pub fn debug(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Debug, message);
    }

    /// 情報ログ
    pub fn info(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Info, message);
    }

    /// 警告ログ
    pub fn warning(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Warning, message);
    }

    /// エラーログ
    pub fn error(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Error, message);
    }
}

fn registry() -> &'static Mutex<HashMap<String, Arc<Logger>>> {
    static REGISTRY: OnceLock<Mutex<HashMap<String, Arc<Logger>>>> = OnceLock::new();
    REGISTRY.get_or_init(|| Mutex::new(HashMap::new()))
}

/// 名前付き共有ロガーを取得する
///
/// 未登録の場合はデフォルト設定で作成して登録する。同じ名前に対しては
/// 常に同じインスタンスを返す。
pub fn shared(name: &str) -> Arc<Logger> {
    let mut loggers = registry().lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    loggers
        .entry(name.to_string())
        .or_insert_with(|| Arc::new(Logger::new(name)))
        .clone()
}

/// 設定済みロガーを共有レジストリに登録する
///
/// 同名のロガーが既に存在する場合は登録せず、既存のものを返す（先勝ち）。
pub fn install(logger: Logger) -> Arc<Logger> {
    let mut loggers = registry().lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    loggers
        .entry(logger.name().to_string())
        .or_insert_with(|| Arc::new(logger))
        .clone()
}

fn timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|dur| dur.as_millis() as u64)
        .unwrap_or_default()
}
