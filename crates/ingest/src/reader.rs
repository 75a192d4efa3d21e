use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// One line of the game pool
#[derive(Debug, Clone, PartialEq)]
pub struct PoolRow {
    pub game_idx: usize,
    /// `None` when the line is not valid JSON or carries no usable `text`
    pub text: Option<String>,
}

#[derive(Deserialize)]
struct RawRow {
    #[serde(default)]
    text: Option<String>,
}

/// Lazily streams rows from one `.jsonl` file or every `.jsonl` file below a
/// directory, in path order. Each non-blank line consumes one game index.
pub struct PoolReader {
    files: std::vec::IntoIter<PathBuf>,
    current: Option<(PathBuf, Lines<BufReader<File>>)>,
    next_idx: usize,
}

impl PoolReader {
    pub fn open(path: &Path) -> Result<Self> {
        let files = Self::discover(path)?;
        debug!(files = files.len(), path = %path.display(), "Discovered pool files");

        Ok(Self {
            files: files.into_iter(),
            current: None,
            next_idx: 0,
        })
    }

    pub fn discover(path: &Path) -> Result<Vec<PathBuf>> {
        if path.is_file() {
            return Ok(vec![path.to_path_buf()]);
        }
        if !path.is_dir() {
            anyhow::bail!("Game pool not found: {:?}", path);
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(path).sort_by_file_name() {
            let entry = entry.context(format!("Failed to walk directory: {:?}", path))?;
            let entry_path = entry.path();
            if entry_path.is_file() && entry_path.extension().is_some_and(|ext| ext == "jsonl") {
                files.push(entry_path.to_path_buf());
            }
        }
        Ok(files)
    }

    fn parse_line(&self, file: &Path, line: &str) -> Option<String> {
        match serde_json::from_str::<RawRow>(line) {
            Ok(row) => row.text.filter(|text| !text.trim().is_empty()),
            Err(e) => {
                debug!(file = %file.display(), game_idx = self.next_idx, error = %e, "Malformed pool row");
                None
            }
        }
    }
}

impl Iterator for PoolReader {
    type Item = Result<PoolRow>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.current.is_none() {
                let path = self.files.next()?;
                let file = match File::open(&path) {
                    Ok(file) => file,
                    Err(e) => {
                        return Some(Err(e).context(format!("Failed to open pool file: {:?}", path)));
                    }
                };
                self.current = Some((path, BufReader::new(file).lines()));
            }

            let (path, lines) = self.current.as_mut()?;
            match lines.next() {
                None => self.current = None,
                Some(Err(e)) => {
                    let path = path.clone();
                    self.current = None;
                    return Some(Err(e).context(format!("Failed to read pool file: {:?}", path)));
                }
                Some(Ok(line)) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    let path = path.clone();
                    let text = self.parse_line(&path, &line);
                    let row = PoolRow {
                        game_idx: self.next_idx,
                        text,
                    };
                    self.next_idx += 1;
                    return Some(Ok(row));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_reads_directory_in_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.jsonl"), "{\"text\": \"third\"}\n").unwrap();
        fs::write(
            dir.path().join("a.jsonl"),
            "{\"text\": \"first\"}\n\n{\"text\": \"second\"}\n",
        )
        .unwrap();
        fs::write(dir.path().join("notes.txt"), "{\"text\": \"ignored\"}\n").unwrap();

        let rows: Vec<PoolRow> = PoolReader::open(dir.path())
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();

        let texts: Vec<_> = rows.iter().map(|r| r.text.as_deref()).collect();
        assert_eq!(texts, vec![Some("first"), Some("second"), Some("third")]);
        assert_eq!(rows.iter().map(|r| r.game_idx).collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    #[test]
    fn test_malformed_rows_keep_their_index() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pool.jsonl");
        fs::write(
            &path,
            "not json\n{\"other\": 1}\n{\"text\": \"\"}\n{\"text\": 5}\n{\"text\": \"ok\"}\n",
        )
        .unwrap();

        let rows: Vec<PoolRow> = PoolReader::open(&path).unwrap().collect::<Result<_>>().unwrap();

        assert_eq!(rows.len(), 5);
        assert!(rows[..4].iter().all(|r| r.text.is_none()));
        assert_eq!(rows[4], PoolRow { game_idx: 4, text: Some("ok".to_string()) });
    }

    #[test]
    fn test_missing_pool_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(PoolReader::open(&dir.path().join("missing")).is_err());
    }
}
