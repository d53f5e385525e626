//! JSON persistence for the program graph
//!
//! The whole graph lives in one JSON document, written pretty-printed so the
//! file stays hand-editable. Loading validates the structural invariants and
//! rejects violating files instead of repairing them silently.

use crate::core::config::GradingConfig;
use crate::core::models::Program;
use crate::logger;
use serde_json::Error as SerdeJsonError;
use std::fmt;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

/// Failure while loading or saving the program graph
#[derive(Debug)]
pub enum StorageError {
    /// The file could not be read or written
    Io(io::Error),
    /// The file contents are not valid JSON for the program schema
    Parse(SerdeJsonError),
    /// The file parsed but violates a structural invariant
    InvalidData(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "io error: {err}"),
            Self::Parse(err) => write!(f, "parse error: {err}"),
            Self::InvalidData(msg) => write!(f, "invalid data: {msg}"),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<io::Error> for StorageError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<SerdeJsonError> for StorageError {
    fn from(value: SerdeJsonError) -> Self {
        Self::Parse(value)
    }
}

/// Result alias for store operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Interface for loading and saving the program graph
pub trait ProgramStore {
    /// Load the program from the backing store
    ///
    /// # Errors
    /// Returns an error when the store is unreadable, unparseable, or holds
    /// data that violates the structural invariants
    fn load(&self) -> StorageResult<Program>;

    /// Write the program to the backing store
    ///
    /// # Errors
    /// Returns an error when the program violates the structural invariants
    /// or the store cannot be written
    fn save(&self, program: &Program) -> StorageResult<()>;
}

/// Store backed by a single JSON file
pub struct JsonProgramStore {
    path: PathBuf,
    grading: GradingConfig,
}

impl JsonProgramStore {
    /// Create a store for the given file path and grading convention
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, grading: GradingConfig) -> Self {
        Self {
            path: path.into(),
            grading,
        }
    }

    /// The file this store reads and writes
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProgramStore for JsonProgramStore {
    fn load(&self) -> StorageResult<Program> {
        let file = File::open(&self.path)?;
        let program: Program = serde_json::from_reader(file)?;
        program.validate(&self.grading).map_err(StorageError::InvalidData)?;
        logger::debug!(
            "Loaded program '{}' with {} modules from {}",
            program.name,
            program.module_count(),
            self.path.display()
        );
        Ok(program)
    }

    fn save(&self, program: &Program) -> StorageResult<()> {
        program.validate(&self.grading).map_err(StorageError::InvalidData)?;
        let file = File::create(&self.path)?;
        serde_json::to_writer_pretty(file, program)?;
        logger::debug!("Saved program '{}' to {}", program.name, self.path.display());
        Ok(())
    }
}
