//! JSON document storage.
//!
//! Match records are read one file per match; reports are written one
//! pretty-printed document per key.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tracing::{debug, info, warn};

use super::{StorageConfig, StorageError};
use crate::models::{BatchReport, BooleanStatistic, Match, QueryReport};

/// Read every cached match record, in file name order.
///
/// Files marking a match as not found are skipped silently; files that fail
/// to parse are skipped with a warning.
pub fn read_match_files(config: &StorageConfig) -> Result<Vec<Match>, StorageError> {
    let pattern = config.matches_dir().join("*.json");
    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in glob::glob(&pattern.to_string_lossy())? {
        match entry {
            Ok(path) => paths.push(path),
            Err(e) => warn!("Failed to read match file entry: {}", e),
        }
    }
    paths.sort();

    let mut matches = Vec::new();
    for path in &paths {
        let contents = fs::read_to_string(path)?;
        let value: serde_json::Value = match serde_json::from_str(&contents) {
            Ok(value) => value,
            Err(e) => {
                warn!("Failed to parse {:?}: {}", path, e);
                continue;
            }
        };
        if value.get("notFound").and_then(|v| v.as_bool()) == Some(true) {
            debug!("Skipping not-found match {:?}", path);
            continue;
        }
        match serde_json::from_value::<Match>(value) {
            Ok(m) => matches.push(m),
            Err(e) => warn!("Failed to parse match in {:?}: {}", path, e),
        }
    }

    info!("Read {} matches from {:?}", matches.len(), config.matches_dir());
    Ok(matches)
}

/// Write one document with 4-space indentation, replacing any existing file.
pub fn write_document<T: Serialize>(path: &Path, document: &T) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
    document.serialize(&mut serializer)?;
    writer.flush()?;

    debug!("Wrote {:?}", path);
    Ok(())
}

fn write_keyed<K, T>(dir: &Path, documents: &BTreeMap<K, T>) -> Result<usize, StorageError>
where
    K: std::fmt::Display,
    T: Serialize,
{
    for (key, document) in documents {
        write_document(&dir.join(format!("{}.json", key)), document)?;
    }
    Ok(documents.len())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Summary<'a> {
    computed_at: DateTime<Utc>,
    matches_folded: usize,
    players: usize,
    stacks: usize,
    duos: usize,
    group_win: &'a BooleanStatistic,
    query: Option<&'a QueryReport>,
}

/// Write every report of a batch.
///
/// Stack reports are also written to `atLeast<N>` for each threshold the
/// stack's game count reaches. Returns the number of documents written.
pub fn write_reports(
    config: &StorageConfig,
    report: &BatchReport,
    stack_thresholds: &[u32],
) -> Result<usize, StorageError> {
    let mut written = 0;
    written += write_keyed(&config.players_dir(), &report.players)?;
    written += write_keyed(&config.stacks_dir(), &report.stacks)?;
    written += write_keyed(&config.duos_dir(), &report.duos)?;
    written += write_keyed(&config.overall_players_dir(), &report.overall_players)?;
    written += write_keyed(&config.overall_stacks_dir(), &report.overall_stacks)?;

    for threshold in stack_thresholds {
        let dir = config.overall_stacks_at_least_dir(*threshold);
        for (key, stack) in &report.overall_stacks {
            if stack.based_on_stack.number_of_games >= *threshold {
                write_document(&dir.join(format!("{}.json", key)), stack)?;
                written += 1;
            }
        }
    }

    let summary = Summary {
        computed_at: report.computed_at,
        matches_folded: report.matches_folded,
        players: report.players.len(),
        stacks: report.stacks.len(),
        duos: report.duos.len(),
        group_win: &report.group_win,
        query: report.query.as_ref(),
    };
    write_document(&config.summary_file(), &summary)?;
    written += 1;

    info!("Wrote {} report documents to {:?}", written, config.statistics_dir());
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::match_between;
    use tempfile::TempDir;

    fn write_match(dir: &Path, m: &Match) {
        fs::create_dir_all(dir).unwrap();
        let path = dir.join(format!("{}.json", m.id()));
        fs::write(path, serde_json::to_string(m).unwrap()).unwrap();
    }

    #[test]
    fn test_read_match_files() {
        let temp_dir = TempDir::new().unwrap();
        let config = StorageConfig::new(temp_dir.path().to_path_buf());
        let dir = config.matches_dir();

        write_match(&dir, &match_between("NA1_2", &["a"], &["b"], true));
        write_match(&dir, &match_between("NA1_1", &["a"], &["b"], false));
        fs::write(dir.join("NA1_3.json"), r#"{"notFound": true}"#).unwrap();
        fs::write(dir.join("NA1_4.json"), "not json").unwrap();
        fs::write(dir.join("NA1_5.json"), r#"{"metadata": {}}"#).unwrap();
        fs::write(dir.join("notes.txt"), "ignored").unwrap();

        let matches = read_match_files(&config).unwrap();
        let ids: Vec<&str> = matches.iter().map(|m| m.id()).collect();
        assert_eq!(ids, vec!["NA1_1", "NA1_2"]);
    }

    #[test]
    fn test_read_match_files_missing_dir() {
        let temp_dir = TempDir::new().unwrap();
        let config = StorageConfig::new(temp_dir.path().join("nothing"));

        assert!(read_match_files(&config).unwrap().is_empty());
    }

    #[test]
    fn test_write_document_indentation() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("doc.json");

        let mut doc = BTreeMap::new();
        doc.insert("count", 1);
        write_document(&path, &doc).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "{\n    \"count\": 1\n}");
    }
}
