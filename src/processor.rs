//! ファイル処理コア機能
//!
//! ディレクトリ作成、乱数ファイルの生成、ファイル内容のソートを実装する。
//! すべての操作は同期的で、失敗時はログを出力してから即座にエラーを返す。

use crate::config::{FillOptions, ProcessorOptions};
use crate::error::{FileError, Result};
use crate::logging::{self, Logger};
use crate::numbers::parse_number_bytes;
use rand::Rng;
use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// 共有ロガーの名前
pub const LOGGER_NAME: &str = "file_processor_logger";

/// `create_and_fill` の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FillReport {
    pub path: PathBuf,
    /// 書き込んだ値（生成順）
    pub values: Vec<i32>,
}

/// `sort_in_place` の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortReport {
    pub path: PathBuf,
    pub count: usize,
}

/// ファイル処理
pub struct FileProcessor {
    logger: Arc<Logger>,
    options: ProcessorOptions,
}

impl FileProcessor {
    /// 共有ロガー（初回使用時に作成）を使って構築
    pub fn new() -> Self {
        Self::with_logger(logging::shared(LOGGER_NAME))
    }

    /// ロガーを指定して構築
    pub fn with_logger(logger: Arc<Logger>) -> Self {
        Self {
            logger,
            options: ProcessorOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ProcessorOptions) -> Self {
        self.options = options;
        self
    }

    pub fn logger(&self) -> &Arc<Logger> {
        &self.logger
    }

    pub fn options(&self) -> &ProcessorOptions {
        &self.options
    }

    /// ディレクトリが存在しなければ作成する（1階層のみ）
    pub fn ensure_directory<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        if path.exists() {
            if !path.is_dir() {
                return self.fail(FileError::NotADirectory {
                    path: path.display().to_string(),
                });
            }
            self.logger
                .info(format!("Directory already exists: {}", path.display()));
            return Ok(());
        }

        fs::create_dir(path).or_else(|e| self.fail(FileError::create_directory(path, e)))?;
        self.logger.info(format!("Directory created: {}", path.display()));
        Ok(())
    }

    /// 既定のパラメータで乱数ファイルを作成
    pub fn create_and_fill<P: AsRef<Path>>(&self, path: P) -> Result<FillReport> {
        let fill = self.options.fill;
        self.create_and_fill_with(path, &fill)
    }

    /// パラメータを指定して乱数ファイルを作成
    pub fn create_and_fill_with<P: AsRef<Path>>(
        &self,
        path: P,
        options: &FillOptions,
    ) -> Result<FillReport> {
        self.create_and_fill_with_rng(path, options, &mut rand::thread_rng())
    }

    /// 乱数生成器を指定して乱数ファイルを作成
    ///
    /// 既存の内容は切り詰められる。`options.count` 個の値を
    /// `[lower_bound, upper_bound]` から一様に生成し、生成順に1行ずつ書き込む。
    pub fn create_and_fill_with_rng<P, R>(
        &self,
        path: P,
        options: &FillOptions,
        rng: &mut R,
    ) -> Result<FillReport>
    where
        P: AsRef<Path>,
        R: Rng,
    {
        let path = path.as_ref();

        if let Err(e) = options.validate() {
            self.logger.error(e.to_string());
            return Err(e.into());
        }

        let file = File::create(path).or_else(|e| self.fail(FileError::create(path, e)))?;

        let values: Vec<i32> = (0..options.count)
            .map(|_| rng.gen_range(options.lower_bound..=options.upper_bound))
            .collect();
        self.write_values(file, path, &values, "Written number")?;

        self.logger.info(format!(
            "File created and filled with random numbers: {}",
            path.display()
        ));

        Ok(FillReport {
            path: path.to_path_buf(),
            values,
        })
    }

    /// ファイル内の整数を昇順に並べ替えて書き戻す
    pub fn sort_in_place<P: AsRef<Path>>(&self, path: P) -> Result<SortReport> {
        let path = path.as_ref();

        let mut numbers = {
            let mut file = File::open(path).or_else(|e| self.fail(FileError::open(path, e)))?;
            let mut content = Vec::new();
            file.read_to_end(&mut content)
                .or_else(|e| self.fail(FileError::read(path, e)))?;
            parse_number_bytes(&content)
        };
        self.logger.info("Read numbers from file.");

        numbers.sort_unstable();
        self.logger.info("Sorted the numbers.");

        if self.options.atomic_rewrite {
            self.atomic_rewrite(path, &numbers)?;
        } else {
            let file = File::create(path).or_else(|e| self.fail(FileError::open_for_write(path, e)))?;
            self.write_values(file, path, &numbers, "Written sorted number")?;
        }

        self.logger.info(format!(
            "Sorted numbers written back to file: {}",
            path.display()
        ));

        Ok(SortReport {
            path: path.to_path_buf(),
            count: numbers.len(),
        })
    }

    /// 一時ファイルに書き込んでから元のパスへリネーム
    fn atomic_rewrite(&self, path: &Path, numbers: &[i32]) -> Result<()> {
        let temp_path = temp_path_for(path);
        self.logger
            .debug(format!("Writing sorted numbers to temp file: {}", temp_path.display()));

        let file = File::create(&temp_path)
            .or_else(|e| self.fail(FileError::open_for_write(&temp_path, e)))?;
        if let Err(e) = self.write_values(file, &temp_path, numbers, "Written sorted number") {
            let _ = fs::remove_file(&temp_path);
            return Err(e);
        }

        if let Err(e) = fs::rename(&temp_path, path) {
            let _ = fs::remove_file(&temp_path);
            return self.fail(FileError::write(path, e));
        }
        Ok(())
    }

    fn write_values(&self, file: File, path: &Path, values: &[i32], label: &str) -> Result<()> {
        let mut writer = BufWriter::new(file);
        for value in values {
            writeln!(writer, "{value}").or_else(|e| self.fail(FileError::write(path, e)))?;
            self.logger.info(format!("{label}: {value}"));
        }
        writer.flush().or_else(|e| self.fail(FileError::write(path, e)))?;
        Ok(())
    }

    /// エラーをログに出力してから返す
    fn fail<T>(&self, error: FileError) -> Result<T> {
        self.logger.error(error.to_string());
        Err(error.into())
    }
}

impl Default for FileProcessor {
    fn default() -> Self {
        Self::new()
    }
}

/// 同じディレクトリ内の隠し一時ファイルのパス
fn temp_path_for(original: &Path) -> PathBuf {
    let file_name = original
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let temp_name = format!(".{}_{}.tmp", file_name, std::process::id());

    match original.parent() {
        Some(parent) => parent.join(temp_name),
        None => PathBuf::from(temp_name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NumsortError;
    use crate::logging::LogLevel;
    use crate::numbers::{is_sorted, parse_numbers};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tempfile::tempdir;

    fn quiet_processor() -> FileProcessor {
        FileProcessor::with_logger(Arc::new(Logger::new("test").without_stderr().with_capture()))
    }

    fn messages(processor: &FileProcessor) -> Vec<String> {
        processor.logger().records().into_iter().map(|r| r.message).collect()
    }

    #[test]
    fn test_ensure_directory_logs_created_then_existing() {
        let temp_dir = tempdir().unwrap();
        let dir = temp_dir.path().join("output");
        let processor = quiet_processor();

        processor.ensure_directory(&dir).unwrap();
        processor.ensure_directory(&dir).unwrap();

        assert!(dir.is_dir());
        let logged = messages(&processor);
        assert!(logged[0].starts_with("Directory created: "));
        assert!(logged[1].starts_with("Directory already exists: "));
    }

    #[test]
    fn test_ensure_directory_is_single_level() {
        let temp_dir = tempdir().unwrap();
        let nested = temp_dir.path().join("a").join("b");
        let processor = quiet_processor();

        let err = processor.ensure_directory(&nested).unwrap_err();
        assert!(err.is_io());
        assert!(!nested.exists());
    }

    #[test]
    fn test_ensure_directory_rejects_regular_file() {
        let temp_dir = tempdir().unwrap();
        let file_path = temp_dir.path().join("plain.txt");
        fs::write(&file_path, "1\n").unwrap();
        let processor = quiet_processor();

        let err = processor.ensure_directory(&file_path).unwrap_err();
        assert!(matches!(err, NumsortError::File(FileError::NotADirectory { .. })));
    }

    #[test]
    fn test_fill_with_seeded_rng_is_reproducible() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("seeded.txt");
        let processor = quiet_processor();
        let options = FillOptions { count: 20, lower_bound: -3, upper_bound: 3 };

        let first = processor
            .create_and_fill_with_rng(&path, &options, &mut StdRng::seed_from_u64(7))
            .unwrap();
        let second = processor
            .create_and_fill_with_rng(&path, &options, &mut StdRng::seed_from_u64(7))
            .unwrap();

        assert_eq!(first.values, second.values);
        assert!(first.values.iter().all(|v| options.contains(*v)));
        assert_eq!(parse_numbers(&fs::read_to_string(&path).unwrap()), first.values);
    }

    #[test]
    fn test_fill_logs_each_value_and_completion() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("logged.txt");
        let processor = quiet_processor();
        let options = FillOptions { count: 5, ..FillOptions::default() };

        let report = processor.create_and_fill_with(&path, &options).unwrap();

        let logged = messages(&processor);
        assert_eq!(logged.len(), 6);
        assert_eq!(logged[0], format!("Written number: {}", report.values[0]));
        assert!(logged[5].starts_with("File created and filled with random numbers: "));
    }

    #[test]
    fn test_fill_truncates_existing_content() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("existing.txt");
        fs::write(&path, "junk\n".repeat(500)).unwrap();
        let processor = quiet_processor();

        processor.create_and_fill(&path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 100);
    }

    #[test]
    fn test_fill_rejects_inverted_range_without_touching_file() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("never.txt");
        let processor = quiet_processor();
        let options = FillOptions { count: 3, lower_bound: 10, upper_bound: 1 };

        let err = processor.create_and_fill_with(&path, &options).unwrap_err();
        assert!(!err.is_io());
        assert!(!path.exists());
    }

    #[test]
    fn test_fill_fails_when_parent_missing() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("missing").join("numbers.txt");
        let processor = quiet_processor();

        let err = processor.create_and_fill(&path).unwrap_err();
        assert!(matches!(err, NumsortError::File(FileError::Create { .. })));

        let last = processor.logger().records().pop().unwrap();
        assert_eq!(last.level, LogLevel::Error);
        assert!(last.message.starts_with("Failed to create file: "));
    }

    #[test]
    fn test_sort_in_place_orders_values() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("unsorted.txt");
        fs::write(&path, "5\n3\n9\n1\n3\n").unwrap();
        let processor = quiet_processor();

        let report = processor.sort_in_place(&path).unwrap();

        assert_eq!(report.count, 5);
        assert_eq!(fs::read_to_string(&path).unwrap(), "1\n3\n3\n5\n9\n");
    }

    #[test]
    fn test_sort_drops_trailing_garbage() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("garbage.txt");
        fs::write(&path, "4\n2\nnot-a-number\n1\n").unwrap();
        let processor = quiet_processor();

        processor.sort_in_place(&path).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "2\n4\n");
    }

    #[test]
    fn test_sort_stops_at_invalid_utf8() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("binary_tail.txt");
        fs::write(&path, b"3\n1\n\xff\xfe\n").unwrap();
        let processor = quiet_processor();

        let report = processor.sort_in_place(&path).unwrap();

        assert_eq!(report.count, 2);
        assert_eq!(fs::read_to_string(&path).unwrap(), "1\n3\n");
    }

    #[test]
    fn test_sort_missing_file_creates_nothing() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("non_existent_file.txt");
        let processor = quiet_processor();

        let err = processor.sort_in_place(&path).unwrap_err();

        match err {
            NumsortError::File(ref file_err @ FileError::Open { .. }) => {
                assert_eq!(file_err.io_kind(), Some(std::io::ErrorKind::NotFound));
            }
            other => panic!("Expected Open error, got {other:?}"),
        }
        assert!(!path.exists());
    }

    #[test]
    fn test_atomic_sort_leaves_no_temp_file() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("atomic.txt");
        fs::write(&path, "8\n-1\n4\n").unwrap();
        let processor = quiet_processor().with_options(ProcessorOptions {
            atomic_rewrite: true,
            ..ProcessorOptions::default()
        });

        processor.sort_in_place(&path).unwrap();

        let values = parse_numbers(&fs::read_to_string(&path).unwrap());
        assert_eq!(values, vec![-1, 4, 8]);
        assert!(is_sorted(&values));
        let entries: Vec<_> = fs::read_dir(temp_dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_temp_path_is_hidden_sibling() {
        let temp = temp_path_for(Path::new("/data/out/numbers.txt"));
        assert_eq!(temp.parent(), Some(Path::new("/data/out")));
        let name = temp.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with(".numbers.txt_"));
        assert!(name.ends_with(".tmp"));
    }

    #[test]
    fn test_new_reuses_shared_logger() {
        let first = FileProcessor::new();
        let second = FileProcessor::default();
        assert!(Arc::ptr_eq(first.logger(), second.logger()));
        assert_eq!(first.logger().name(), LOGGER_NAME);
    }
}
