//! Process-wide citation store.
//!
//! One `CitationStore` is created at startup and handed by reference to every consumer.
//! The corpus is read lazily on first use and shared as an immutable `Arc` snapshot, so
//! concurrent requests never contend on anything but the snapshot pointer.

use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::corpus::{self, Corpus, CorpusLoadReport, CorpusSource};
use crate::error::AppError;

pub type CorpusHandle = Arc<Corpus>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReloadOutcome {
    pub changed: bool,
    pub report: CorpusLoadReport,
}

#[derive(Debug)]
pub struct CitationStore {
    source: CorpusSource,
    current: RwLock<Option<CorpusHandle>>,
}

fn poisoned() -> AppError {
    AppError::new(
        "CITATION_STORE_LOCK_POISONED",
        "Citation store lock was poisoned by a panicking thread",
    )
}

impl CitationStore {
    /// Create a store that loads `source` on first use.
    pub fn new(source: CorpusSource) -> Self {
        Self {
            source,
            current: RwLock::new(None),
        }
    }

    /// Create a store around an already loaded corpus; `reload` re-reads `source`.
    pub fn preloaded(source: CorpusSource, corpus: Corpus) -> Self {
        Self {
            source,
            current: RwLock::new(Some(Arc::new(corpus))),
        }
    }

    pub fn source(&self) -> &CorpusSource {
        &self.source
    }

    pub fn is_loaded(&self) -> bool {
        self.current.read().map(|c| c.is_some()).unwrap_or(false)
    }

    /// Current corpus snapshot, loading it if nothing has been loaded yet.
    ///
    /// A failed load is not remembered; the next call tries again.
    pub fn corpus(&self) -> Result<CorpusHandle, AppError> {
        if let Some(handle) = self.current.read().map_err(|_| poisoned())?.as_ref() {
            return Ok(Arc::clone(handle));
        }

        let loaded = Arc::new(corpus::load(&self.source)?);
        let mut guard = self.current.write().map_err(|_| poisoned())?;
        // Another caller may have finished loading while we were parsing.
        let handle = guard.get_or_insert(loaded);
        Ok(Arc::clone(handle))
    }

    /// Re-read the source and swap the snapshot.
    ///
    /// On failure the previous snapshot stays in place. Callers holding an older
    /// snapshot keep using it until they ask again.
    pub fn reload(&self) -> Result<ReloadOutcome, AppError> {
        let fresh = match corpus::load(&self.source) {
            Ok(c) => c,
            Err(e) => {
                warn!(
                    source = %self.source.describe(),
                    code = %e.code,
                    "citation corpus reload failed; keeping previous snapshot"
                );
                return Err(e);
            }
        };

        let report = fresh.report().clone();
        let mut guard = self.current.write().map_err(|_| poisoned())?;
        let changed = guard
            .as_ref()
            .map(|old| old.fingerprint() != fresh.fingerprint())
            .unwrap_or(true);
        *guard = Some(Arc::new(fresh));

        info!(
            source = %self.source.describe(),
            changed,
            accepted = report.accepted,
            "citation corpus reloaded"
        );
        Ok(ReloadOutcome { changed, report })
    }
}
