//! エラーハンドリング
//!
//! numsort 全体で使用するエラー型を定義する。
//! ファイル・ディレクトリ操作の失敗はすべて `FileError`（I/Oエラー）として扱う。

use std::io;
use std::path::Path;
use thiserror::Error;

/// クレート全体のエラー型
#[derive(Error, Debug)]
pub enum NumsortError {
    /// ファイル操作エラー
    #[error(transparent)]
    File(#[from] FileError),

    /// 設定エラー
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl NumsortError {
    /// I/O 起因のエラーかどうか
    pub fn is_io(&self) -> bool {
        matches!(self, NumsortError::File(_))
    }
}

/// ファイル・ディレクトリ操作のエラー
#[derive(Error, Debug)]
pub enum FileError {
    #[error("Failed to create directory: {path}")]
    CreateDirectory {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Path exists but is not a directory: {path}")]
    NotADirectory { path: String },

    #[error("Failed to create file: {path}")]
    Create {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to open file: {path}")]
    Open {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to open file for writing: {path}")]
    OpenForWrite {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read file: {path}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write file: {path}")]
    Write {
        path: String,
        #[source]
        source: io::Error,
    },
}

impl FileError {
    pub(crate) fn create_directory(path: &Path, source: io::Error) -> Self {
        FileError::CreateDirectory { path: path.display().to_string(), source }
    }

    pub(crate) fn create(path: &Path, source: io::Error) -> Self {
        FileError::Create { path: path.display().to_string(), source }
    }

    pub(crate) fn open(path: &Path, source: io::Error) -> Self {
        FileError::Open { path: path.display().to_string(), source }
    }

    pub(crate) fn open_for_write(path: &Path, source: io::Error) -> Self {
        FileError::OpenForWrite { path: path.display().to_string(), source }
    }

    pub(crate) fn read(path: &Path, source: io::Error) -> Self {
        FileError::Read { path: path.display().to_string(), source }
    }

    pub(crate) fn write(path: &Path, source: io::Error) -> Self {
        FileError::Write { path: path.display().to_string(), source }
    }

    /// 対象パス
    pub fn path(&self) -> &str {
        match self {
            FileError::CreateDirectory { path, .. }
            | FileError::NotADirectory { path }
            | FileError::Create { path, .. }
            | FileError::Open { path, .. }
            | FileError::OpenForWrite { path, .. }
            | FileError::Read { path, .. }
            | FileError::Write { path, .. } => path,
        }
    }

    /// 元になった `std::io::ErrorKind`（存在する場合）
    pub fn io_kind(&self) -> Option<io::ErrorKind> {
        match self {
            FileError::NotADirectory { .. } => None,
            FileError::CreateDirectory { source, .. }
            | FileError::Create { source, .. }
            | FileError::Open { source, .. }
            | FileError::OpenForWrite { source, .. }
            | FileError::Read { source, .. }
            | FileError::Write { source, .. } => Some(source.kind()),
        }
    }
}

/// 設定固有のエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid range: lower bound {lower} is greater than upper bound {upper}")]
    InvalidRange { lower: i32, upper: i32 },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Missing value for {key}")]
    MissingValue { key: String },

    #[error("Unknown argument: {arg}")]
    UnknownArgument { arg: String },
}

/// プロジェクト標準のResult型
pub type Result<T> = std::result::Result<T, NumsortError>;
