//! Shared snapshot of the code list and binding table.
//!
//! One `CodeRepository` is handed to every widget on a page. Validation always
//! goes through [`CodeRepository::snapshot_fresh`]; the re-check right before a
//! bind uses [`CodeRepository::snapshot_cached`] and tolerates a little
//! staleness.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use tokio::sync::RwLock;

use crate::dto::CodesDocument;
use crate::services::api_client::CodeApi;
use crate::utils::Code;

/// Read-only view of the server's data as of one fetch.
#[derive(Debug, Clone)]
pub struct Snapshot {
    codes: HashSet<Code>,
    bindings: HashMap<Code, String>,
    fetched_at: DateTime<Utc>,
}

impl Snapshot {
    /// Nothing is valid.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            codes: HashSet::new(),
            bindings: HashMap::new(),
            fetched_at: Utc::now(),
        }
    }

    /// Normalize a raw document. Entries that normalize to nothing are dropped.
    #[must_use]
    pub fn from_document(document: &CodesDocument) -> Self {
        let codes = document
            .codes
            .iter()
            .filter_map(|raw| Code::parse(raw))
            .collect();

        let bindings = document
            .bindings
            .iter()
            .filter_map(|(raw, game)| Code::parse(raw).map(|code| (code, game.clone())))
            .collect();

        Self {
            codes,
            bindings,
            fetched_at: Utc::now(),
        }
    }

    /// A code is valid if it is listed or already bound.
    #[must_use]
    pub fn is_valid(&self, code: &Code) -> bool {
        self.codes.contains(code) || self.bindings.contains_key(code)
    }

    #[must_use]
    pub fn is_listed(&self, code: &Code) -> bool {
        self.codes.contains(code)
    }

    /// The game a code is permanently bound to, if any.
    #[must_use]
    pub fn bound_game(&self, code: &Code) -> Option<&str> {
        self.bindings.get(code).map(String::as_str)
    }

    #[must_use]
    pub fn code_count(&self) -> usize {
        self.codes.len()
    }

    #[must_use]
    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }

    #[must_use]
    pub const fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    /// How long ago this snapshot was fetched.
    #[must_use]
    pub fn age(&self) -> TimeDelta {
        Utc::now() - self.fetched_at
    }
}

/// Snapshot cache in front of a [`CodeApi`].
pub struct CodeRepository {
    api: Arc<dyn CodeApi>,
    cache: RwLock<Option<Arc<Snapshot>>>,
}

impl CodeRepository {
    #[must_use]
    pub fn new(api: Arc<dyn CodeApi>) -> Self {
        Self {
            api,
            cache: RwLock::new(None),
        }
    }

    /// The underlying API, for the write calls the repository does not wrap.
    #[must_use]
    pub fn api(&self) -> &dyn CodeApi {
        self.api.as_ref()
    }

    /// Fetch and normalize without touching the cache.
    ///
    /// Never fails: any transport or parse error yields an empty snapshot, so
    /// nothing validates while the server is unreachable.
    pub async fn fetch_snapshot(&self) -> Snapshot {
        match self.api.fetch_codes().await {
            Ok(document) => {
                let snapshot = Snapshot::from_document(&document);
                tracing::debug!(
                    codes = snapshot.code_count(),
                    bindings = snapshot.binding_count(),
                    "Loaded code snapshot"
                );
                snapshot
            }
            Err(err) => {
                tracing::error!("Failed to load code document: {err}");
                Snapshot::empty()
            }
        }
    }

    /// Always re-fetch and replace the cached snapshot.
    pub async fn snapshot_fresh(&self) -> Arc<Snapshot> {
        let snapshot = Arc::new(self.fetch_snapshot().await);
        *self.cache.write().await = Some(Arc::clone(&snapshot));
        snapshot
    }

    /// The last snapshot, fetching once if there is none yet.
    pub async fn snapshot_cached(&self) -> Arc<Snapshot> {
        if let Some(snapshot) = self.cache.read().await.as_ref() {
            tracing::debug!(
                fetched_at = %snapshot.fetched_at(),
                age_ms = snapshot.age().num_milliseconds(),
                "Serving cached code snapshot"
            );
            return Arc::clone(snapshot);
        }
        self.snapshot_fresh().await
    }

    /// Forget the cached snapshot; the next cached read will fetch.
    pub async fn clear(&self) {
        *self.cache.write().await = None;
    }
}

impl std::fmt::Debug for CodeRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodeRepository").finish_non_exhaustive()
    }
}
