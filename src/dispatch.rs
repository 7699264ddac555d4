//! Routes each path to the built-in trash store or to a platform adapter.
//!
//! The strategy name is handed in once at construction. It is resolved per request,
//! before anything on disk is touched, so a bad name fails every path and mutates nothing.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::adapters::{default_adapters, PlatformTrash};
use crate::errors::{ResolutionError, TrashError, TrashcanError};
use crate::shutdown;
use crate::strategy::{resolve, Strategy};
use crate::trash::{absolute_path, TrashEntry, TrashStore};

/// One input path with its resolved strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrashRequest {
    path: PathBuf,
    strategy: Strategy,
}

impl TrashRequest {
    pub fn new(path: impl Into<PathBuf>, strategy_name: &str) -> Result<Self, ResolutionError> {
        Ok(Self {
            strategy: resolve(strategy_name)?,
            path: path.into(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Built-in store: bytes under `files/`, sidecar under `info/`.
    Indexed(TrashEntry),
    /// Handed to a platform adapter.
    Moved { strategy: Strategy, original: PathBuf },
    /// Dry run. `destination` is known only for the built-in store.
    Planned {
        strategy: Strategy,
        original: PathBuf,
        destination: Option<PathBuf>,
    },
}

impl Outcome {
    /// Where the path ended up (or would), when that is known.
    pub fn destination(&self) -> Option<&Path> {
        match self {
            Outcome::Indexed(e) => Some(&e.trashed_file_path),
            Outcome::Moved { .. } => None,
            Outcome::Planned { destination, .. } => destination.as_deref(),
        }
    }
}

/// Per-path results of a batch, in input order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub succeeded: Vec<(PathBuf, Outcome)>,
    pub failed: Vec<(PathBuf, TrashcanError)>,
}

impl BatchReport {
    pub fn success(&self) -> bool {
        self.failed.is_empty()
    }
}

pub struct Dispatcher {
    strategy_name: String,
    store: TrashStore,
    adapters: HashMap<Strategy, Box<dyn PlatformTrash>>,
    dry_run: bool,
}

impl Dispatcher {
    pub fn new(strategy_name: impl Into<String>, store: TrashStore) -> Self {
        Self {
            strategy_name: strategy_name.into(),
            store,
            adapters: HashMap::new(),
            dry_run: false,
        }
    }

    /// Register (or replace) the adapter for its strategy.
    pub fn with_adapter(mut self, adapter: Box<dyn PlatformTrash>) -> Self {
        self.adapters.insert(adapter.strategy(), adapter);
        self
    }

    pub fn with_default_adapters(self, home: &Path) -> Self {
        default_adapters(home)
            .into_iter()
            .fold(self, |d, a| d.with_adapter(a))
    }

    pub fn dry_run(mut self, yes: bool) -> Self {
        self.dry_run = yes;
        self
    }

    pub fn store(&self) -> &TrashStore {
        &self.store
    }

    pub fn dispatch(&self, path: &Path) -> Result<Outcome, TrashcanError> {
        let request = TrashRequest::new(path, &self.strategy_name)?;
        let outcome = match request.strategy() {
            Strategy::Freedesktop if self.dry_run => {
                let plan = self.store.plan(request.path())?;
                Outcome::Planned {
                    strategy: Strategy::Freedesktop,
                    original: plan.original_absolute_path,
                    destination: Some(plan.trashed_file_path),
                }
            }
            Strategy::Freedesktop => Outcome::Indexed(self.store.trash(request.path())?),
            strategy => {
                let adapter = self
                    .adapters
                    .get(&strategy)
                    .ok_or(TrashError::Unsupported(strategy))?;
                let original = absolute_path(request.path())?;
                fs::symlink_metadata(&original).map_err(|e| TrashError::from_io("stat", request.path(), e))?;
                if self.dry_run {
                    Outcome::Planned {
                        strategy,
                        original,
                        destination: None,
                    }
                } else {
                    adapter.move_to_platform_trash(&original)?;
                    info!(strategy = %strategy, src = %original.display(), "trashed via platform adapter");
                    Outcome::Moved { strategy, original }
                }
            }
        };
        Ok(outcome)
    }

    /// Trash every path in order. A failing path never stops the batch; a shutdown
    /// request does, and the remaining paths are reported as interrupted.
    pub fn trash_all<P: AsRef<Path>>(&self, paths: &[P]) -> BatchReport {
        let mut report = BatchReport::default();
        for (i, p) in paths.iter().enumerate() {
            if shutdown::is_requested() {
                warn!(remaining = paths.len() - i, "shutdown requested; skipping remaining paths");
                for rest in &paths[i..] {
                    report
                        .failed
                        .push((rest.as_ref().to_path_buf(), TrashError::Interrupted.into()));
                }
                break;
            }
            let p = p.as_ref();
            match self.dispatch(p) {
                Ok(outcome) => report.succeeded.push((p.to_path_buf(), outcome)),
                Err(e) => {
                    warn!(path = %p.display(), code = e.code(), kind = e.kind(), error = %e, "trash failed");
                    report.failed.push((p.to_path_buf(), e));
                }
            }
        }
        report
    }
}
