//! Store management for rubric
//!
//! The store is the directory holding a rubric project's configuration and
//! persisted grading methods. Default location: `.rubric/`.
//!
//! The configured backend decides how methods are persisted: the relational
//! backend keeps them in `rubric.db`, the document backend keeps one JSON
//! file per method under `methods/`.

pub mod documents;
pub mod paths;
pub mod repository;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use uuid::Uuid;

use crate::builder::{build_method, rebuild_method, CreateMethodRequest};
use crate::config::{Backend, StoreConfig};
use crate::db::Database;
use crate::error::{RubricError, Result};
use crate::gradable::GradingMethod;
use crate::grader::{self, GradeRequest, GradingOutcome};
use crate::trace_time;
pub use documents::DocumentStore;
pub use paths::{CONFIG_FILE, DEFAULT_STORE_DIR, METHODS_DIR};
pub use repository::{MethodFilter, MethodRepository, MethodSummary};

/// Options for store initialization
#[derive(Debug, Clone, Default)]
pub struct InitOptions {
    /// Backend for a new store; ignored when the store already has a config
    pub backend: Option<Backend>,
}

#[derive(Debug)]
enum Repository {
    Relational(Database),
    Document(DocumentStore),
}

/// The rubric store
#[derive(Debug)]
pub struct Store {
    /// Root path of the store
    root: PathBuf,
    /// Store configuration
    config: StoreConfig,
    /// Backend selected by the configuration
    repo: Repository,
}

impl Store {
    /// Discover a store by walking up from the given directory
    pub fn discover(start: &Path) -> Result<Self> {
        let store_path = paths::discover_store(start)?;
        Self::open(&store_path)
    }

    /// Open an existing store at the given path
    #[tracing::instrument(skip(path), fields(path = %path.display()))]
    pub fn open(path: &Path) -> Result<Self> {
        if !path.is_dir() {
            return Err(RubricError::StoreNotFound {
                search_root: path.to_path_buf(),
            });
        }

        let config = StoreConfig::load_or_default(&path.join(CONFIG_FILE))?;
        let repo = open_repository(path, &config)?;
        tracing::debug!(backend = %config.backend, "store opened");

        Ok(Store {
            root: path.to_path_buf(),
            config,
            repo,
        })
    }

    /// Initialize a new store under the given project root
    pub fn init(project_root: &Path, options: InitOptions) -> Result<Self> {
        Self::init_at(&project_root.join(DEFAULT_STORE_DIR), options)
    }

    /// Initialize a store at an explicit store root path.
    ///
    /// Idempotent: an existing config is kept as is.
    pub fn init_at(store_root: &Path, options: InitOptions) -> Result<Self> {
        fs::create_dir_all(store_root)?;

        let config_path = store_root.join(CONFIG_FILE);
        let config = if config_path.exists() {
            let config = StoreConfig::load(&config_path)?;
            if let Some(requested) = options.backend {
                if requested != config.backend {
                    tracing::warn!(
                        configured = %config.backend,
                        requested = %requested,
                        "store already initialized; keeping configured backend"
                    );
                }
            }
            config
        } else {
            let config = StoreConfig {
                backend: options.backend.unwrap_or_default(),
                ..StoreConfig::default()
            };
            config.save(&config_path)?;
            config
        };

        let repo = open_repository(store_root, &config)?;
        tracing::info!(root = %store_root.display(), backend = %config.backend, "store initialized");

        Ok(Store {
            root: store_root.to_path_buf(),
            config,
            repo,
        })
    }

    /// Get the store root path
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the config
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// The configured persistence backend
    pub fn methods(&self) -> &dyn MethodRepository {
        match &self.repo {
            Repository::Relational(db) => db as &dyn MethodRepository,
            Repository::Document(docs) => docs as &dyn MethodRepository,
        }
    }

    /// The SQLite database, when the store uses the relational backend
    pub fn db(&self) -> Option<&Database> {
        match &self.repo {
            Repository::Relational(db) => Some(db),
            Repository::Document(_) => None,
        }
    }

    /// Build a method from a request and persist it
    #[tracing::instrument(skip(self, request), fields(name = %request.name))]
    pub fn create_method(&self, request: &CreateMethodRequest) -> Result<GradingMethod> {
        let method = build_method(request)?;
        self.methods().save(&method)?;
        tracing::info!(method_id = %method.id(), "method created");
        Ok(method)
    }

    /// Replace a stored method's tree, keeping its identity and creator
    #[tracing::instrument(skip(self, request))]
    pub fn update_method(&self, id: Uuid, request: &CreateMethodRequest) -> Result<GradingMethod> {
        let existing = self.methods().load(id)?;
        let method = rebuild_method(&existing, request)?;
        self.methods().save(&method)?;
        tracing::info!(method_id = %id, "method updated");
        Ok(method)
    }

    /// Load a method, apply the request's values and persist the result.
    ///
    /// Not atomic: accepted values are persisted even when the outcome
    /// reports unmatched leaves, unconsumed inputs or rejected values.
    #[tracing::instrument(skip(self, request), fields(method_id = %request.grading_method_id))]
    pub fn apply_grades(&self, request: &GradeRequest) -> Result<(GradingMethod, GradingOutcome)> {
        let start = Instant::now();
        let mut method = self.methods().load(request.grading_method_id)?;
        let outcome = grader::apply_grades(&mut method, &request.inputs)?;
        self.methods().save(&method)?;

        tracing::info!(
            applied = outcome.applied.len(),
            unmatched = outcome.unmatched_leaves.len(),
            unconsumed = outcome.unconsumed_inputs.len(),
            failed = outcome.failures.len(),
            success = outcome.success(),
            "grades applied"
        );
        trace_time!(start, "apply_grades");
        Ok((method, outcome))
    }

    pub fn get_method(&self, id: Uuid) -> Result<GradingMethod> {
        self.methods().load(id)
    }

    #[tracing::instrument(skip(self))]
    pub fn delete_method(&self, id: Uuid) -> Result<()> {
        self.methods().delete(id)?;
        tracing::info!(method_id = %id, "method deleted");
        Ok(())
    }

    pub fn list_methods(&self, filter: &MethodFilter) -> Result<Vec<MethodSummary>> {
        self.methods().list(filter)
    }
}

fn open_repository(root: &Path, config: &StoreConfig) -> Result<Repository> {
    let repo = match config.backend {
        Backend::Relational => Repository::Relational(Database::open(root)?),
        Backend::Document => {
            Repository::Document(DocumentStore::open(&root.join(METHODS_DIR), config.document)?)
        }
    };
    Ok(repo)
}
