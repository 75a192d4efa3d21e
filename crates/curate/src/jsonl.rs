use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Append-only JSON Lines sink, opened once per run. Dropping it closes the
/// file; call `finish` to surface flush errors.
pub struct JsonlWriter {
    path: PathBuf,
    inner: BufWriter<File>,
    written: usize,
}

impl JsonlWriter {
    pub fn create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .context(format!("Failed to create output directory: {:?}", parent))?;
        }
        let file = File::create(path).context(format!("Failed to create output file: {:?}", path))?;

        Ok(Self {
            path: path.to_path_buf(),
            inner: BufWriter::new(file),
            written: 0,
        })
    }

    pub fn write<T: Serialize>(&mut self, record: &T) -> Result<()> {
        serde_json::to_writer(&mut self.inner, record).context("Failed to serialize record")?;
        self.inner
            .write_all(b"\n")
            .context(format!("Failed to write to {:?}", self.path))?;
        self.written += 1;
        Ok(())
    }

    /// Flush and close, returning the number of records written.
    pub fn finish(mut self) -> Result<usize> {
        self.inner
            .flush()
            .context(format!("Failed to flush {:?}", self.path))?;
        Ok(self.written)
    }
}

/// Read a whole JSON Lines file, skipping blank lines.
pub fn read_jsonl<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let file = File::open(path).context(format!("Failed to open file: {:?}", path))?;
    let mut records = Vec::new();

    for (line_no, line) in BufReader::new(file).lines().enumerate() {
        let line = line.context(format!("Failed to read file: {:?}", path))?;
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(&line)
            .context(format!("Invalid JSON on line {} of {:?}", line_no + 1, path))?;
        records.push(record);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.jsonl");

        let mut writer = JsonlWriter::create(&path).unwrap();
        writer.write(&json!({"a": 1})).unwrap();
        writer.write(&json!({"b": "two"})).unwrap();
        assert_eq!(writer.finish().unwrap(), 2);

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "{\"a\":1}\n{\"b\":\"two\"}\n");

        let records: Vec<Value> = read_jsonl(&path).unwrap();
        assert_eq!(records, vec![json!({"a": 1}), json!({"b": "two"})]);
    }

    #[test]
    fn test_read_reports_bad_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.jsonl");
        fs::write(&path, "{\"a\": 1}\n\n{oops\n").unwrap();

        let err = read_jsonl::<Value>(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("line 3"));
    }

    #[test]
    fn test_unwritable_sink_fails_fast() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "").unwrap();

        assert!(JsonlWriter::create(&blocker.join("out.jsonl")).is_err());
    }
}
