//! Document backend: one JSON file per method

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use uuid::Uuid;

use crate::codec::document;
use crate::config::DocumentConfig;
use crate::error::{RubricError, Result};
use crate::gradable::GradingMethod;
use crate::store::repository::{sort_summaries, MethodFilter, MethodRepository, MethodSummary};

const EXTENSION: &str = "json";

/// Directory of method documents
#[derive(Debug)]
pub struct DocumentStore {
    dir: PathBuf,
    config: DocumentConfig,
}

impl DocumentStore {
    /// Open (creating if needed) a document directory
    pub fn open(dir: &Path, config: DocumentConfig) -> Result<Self> {
        fs::create_dir_all(dir)?;
        Ok(DocumentStore {
            dir: dir.to_path_buf(),
            config,
        })
    }

    /// File holding the method with the given id
    pub fn path_for(&self, id: Uuid) -> PathBuf {
        self.dir.join(format!("{}.{}", id, EXTENSION))
    }

    /// Write a method's document, replacing the previous one.
    ///
    /// Each save writes its own temp file in the same directory and renames
    /// it over the target. Readers never see a partial file, and overlapping
    /// saves of one method resolve as last writer wins.
    #[tracing::instrument(skip(self, method), fields(method_id = %method.id()))]
    pub fn save_method(&self, method: &GradingMethod) -> Result<()> {
        method.validate()?;
        let json = document::to_json(&document::encode(method), self.config.pretty)?;

        let target = self.path_for(method.id());
        let mut temp = NamedTempFile::new_in(&self.dir)?;
        temp.write_all(json.as_bytes())?;
        temp.write_all(b"\n")?;
        temp.as_file().sync_all()?;
        temp.persist(&target).map_err(|e| RubricError::from(e.error))?;

        tracing::debug!(path = %target.display(), "document saved");
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub fn load_method(&self, id: Uuid) -> Result<GradingMethod> {
        let content = self.read(id)?;
        let doc = document::from_json(&content)?;
        if doc.id != id {
            return Err(RubricError::integrity(format!(
                "document {} holds method {}",
                self.path_for(id).display(),
                doc.id
            )));
        }
        document::decode(&doc)
    }

    #[tracing::instrument(skip(self))]
    pub fn delete_method(&self, id: Uuid) -> Result<()> {
        match fs::remove_file(self.path_for(id)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(RubricError::not_found("grading method", id))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Summaries of every readable document.
    ///
    /// Files that fail to parse are skipped with a warning so one damaged
    /// document does not hide the rest.
    pub fn list_methods(&self, filter: &MethodFilter) -> Result<Vec<MethodSummary>> {
        let mut summaries = Vec::new();

        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if !is_document(&path) {
                continue;
            }

            let parsed = fs::read_to_string(&path)
                .map_err(RubricError::from)
                .and_then(|content| document::from_json(&content));
            match parsed {
                Ok(doc) => {
                    let summary = MethodSummary::from(&doc);
                    if filter.matches(&summary) {
                        summaries.push(summary);
                    }
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping unreadable document");
                }
            }
        }

        sort_summaries(&mut summaries);
        Ok(summaries)
    }

    /// Raw document text of a stored method
    pub fn read(&self, id: Uuid) -> Result<String> {
        match fs::read_to_string(self.path_for(id)) {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(RubricError::not_found("grading method", id))
            }
            Err(e) => Err(e.into()),
        }
    }
}

fn is_document(path: &Path) -> bool {
    let hidden = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.'));
    !hidden && path.extension().and_then(|e| e.to_str()) == Some(EXTENSION)
}

impl MethodRepository for DocumentStore {
    fn save(&self, method: &GradingMethod) -> Result<()> {
        self.save_method(method)
    }

    fn load(&self, id: Uuid) -> Result<GradingMethod> {
        self.load_method(id)
    }

    fn delete(&self, id: Uuid) -> Result<()> {
        self.delete_method(id)
    }

    fn list(&self, filter: &MethodFilter) -> Result<Vec<MethodSummary>> {
        self.list_methods(filter)
    }
}
