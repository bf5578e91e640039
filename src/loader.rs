//! This module provides the `TableLoader` struct, responsible for loading transition
//! tables from files and strings.

use crate::parser::parse;
use crate::table::TransitionTable;
use crate::types::{TurtabError, MAX_TABLE_SIZE};
use std::fs;
use std::path::Path;
use tracing::debug;

/// `TableLoader` is a utility struct for loading transition tables.
/// Loading fails fast: a table that cannot be read or is empty never reaches a machine.
pub struct TableLoader;

impl TableLoader {
    /// Loads a single transition table from the specified file path.
    ///
    /// # Returns
    ///
    /// * `Ok(TransitionTable)` if the file is successfully read and parsed.
    /// * `Err(TurtabError::FileError)` if the file does not exist, cannot be read, or is too large.
    /// * `Err(TurtabError::EmptyTable)` if the file has no header row.
    /// * `Err(TurtabError::ParseError)` if the grammar rejects the file.
    pub fn load_table(path: &Path) -> Result<TransitionTable, TurtabError> {
        if !path.exists() {
            return Err(TurtabError::FileError(format!(
                "File '{}' not found",
                path.display()
            )));
        }

        let content = fs::read_to_string(path).map_err(|e| {
            TurtabError::FileError(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        if content.len() > MAX_TABLE_SIZE {
            return Err(TurtabError::FileError(format!(
                "File {} exceeds the maximum table size of {} bytes",
                path.display(),
                MAX_TABLE_SIZE
            )));
        }

        let table = parse(&content)?;
        debug!(
            path = %path.display(),
            states = table.states().len(),
            transitions = table.len(),
            "loaded table"
        );

        Ok(table)
    }

    /// Loads a single transition table from the provided string content.
    pub fn load_table_from_string(content: &str) -> Result<TransitionTable, TurtabError> {
        parse(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    const TABLE: &str = ",_,1\nA,1 R B,\nB,1 L HALT,\n";

    #[test]
    fn test_load_valid_table() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("table.csv");

        let mut file = File::create(&file_path).unwrap();
        file.write_all(TABLE.as_bytes()).unwrap();

        let table = TableLoader::load_table(&file_path).unwrap();
        assert_eq!(table.len(), 2);
        assert!(table.lookup("A", "_").is_some());
        assert!(table.lookup("B", "_").is_some());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let result = TableLoader::load_table(&dir.path().join("missing.csv"));

        match result {
            Err(TurtabError::FileError(msg)) => assert!(msg.contains("not found")),
            other => panic!("Expected a file error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_oversized_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("huge.csv");
        fs::write(&file_path, ",_\n".repeat(MAX_TABLE_SIZE / 3 + 1)).unwrap();

        match TableLoader::load_table(&file_path) {
            Err(TurtabError::FileError(msg)) => assert!(msg.contains("maximum table size")),
            other => panic!("Expected a file error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_empty_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("empty.csv");
        File::create(&file_path).unwrap();

        let result = TableLoader::load_table(&file_path);
        assert!(matches!(result, Err(TurtabError::EmptyTable)));
    }

    #[test]
    fn test_load_twice_gives_identical_lookups() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("table.csv");
        fs::write(&file_path, TABLE).unwrap();

        let first = TableLoader::load_table(&file_path).unwrap();
        let second = TableLoader::load_table_from_string(TABLE).unwrap();

        assert_eq!(first, second);
        for state in ["A", "B", "HALT"] {
            for symbol in ["_", "1"] {
                assert_eq!(first.lookup(state, symbol), second.lookup(state, symbol));
            }
        }
    }
}
