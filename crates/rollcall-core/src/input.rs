use std::fs;
use std::io;
use std::path::Path;

use rollcall_parser::{normalize, CanonicalTable, MalformedInputError, RawTable};

/// One export handed over by the caller, already read into memory.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub contents: Vec<u8>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            contents: contents.into(),
        }
    }

    pub fn read(path: &Path) -> io::Result<Self> {
        let contents = fs::read(path)?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self { name, contents })
    }

    pub fn raw_table(&self) -> Result<RawTable, MalformedInputError> {
        RawTable::from_csv_bytes(&self.contents)
    }

    pub fn normalize(&self) -> Result<CanonicalTable, MalformedInputError> {
        normalize(&self.raw_table()?)
    }
}
