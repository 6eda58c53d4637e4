//! Result types for generation operations

use std::path::PathBuf;

/// Result of generating the documents of one data source
#[derive(Debug, Clone)]
pub struct SourceResult {
    pub type_name: String,
    pub files_generated: Vec<PathBuf>,
    pub errors: Vec<String>,
}

impl SourceResult {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            files_generated: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Overall generation result
#[derive(Debug, Default)]
pub struct GenerationResult {
    pub results: Vec<SourceResult>,
    pub index_path: Option<PathBuf>,
    pub processing_time_ms: u64,
}

impl GenerationResult {
    pub fn files_generated(&self) -> usize {
        self.results.iter().map(|r| r.files_generated.len()).sum::<usize>()
            + usize::from(self.index_path.is_some())
    }

    pub fn error_count(&self) -> usize {
        self.results.iter().map(|r| r.errors.len()).sum()
    }
}
