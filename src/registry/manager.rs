use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::{Mutex, RwLock};
use tracing::{info, warn};

use super::{BundleStore, LoadOutcome, ModelBundle, RegistryError, TrainingCorpus};

/// Cached bundle for one path plus the lock that serialises its initialisation.
#[derive(Default)]
struct BundleSlot {
    bundle: RwLock<Option<Arc<ModelBundle>>>,
    init: tokio::sync::Mutex<()>,
}

impl BundleSlot {
    fn current(&self) -> Option<Arc<ModelBundle>> {
        self.bundle.read().clone()
    }
}

/// Lazily loads, trains and caches model bundles, one per file path.
///
/// Lifecycle: init on first use, live for the process, replaced on explicit retrain.
/// Concurrent cold-start callers for the same path share a single load/train run.
pub struct ModelRegistry {
    corpus: Arc<TrainingCorpus>,
    slots: Mutex<HashMap<PathBuf, Arc<BundleSlot>>>,
    training_runs: Arc<AtomicU64>,
}

impl std::fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelRegistry")
            .field("corpus_version", &self.corpus.version())
            .field("corpus_samples", &self.corpus.len())
            .field("slots", &self.slots.lock().len())
            .field("training_runs", &self.training_runs())
            .finish()
    }
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelRegistry {
    /// Registry training from the built-in corpus.
    pub fn new() -> Self {
        Self::with_corpus(TrainingCorpus::builtin())
    }

    pub fn with_corpus(corpus: TrainingCorpus) -> Self {
        Self {
            corpus: Arc::new(corpus),
            slots: Mutex::new(HashMap::new()),
            training_runs: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn corpus(&self) -> &TrainingCorpus {
        &self.corpus
    }

    /// Number of training runs since construction.
    pub fn training_runs(&self) -> u64 {
        self.training_runs.load(Ordering::SeqCst)
    }

    /// Bundle currently cached for `path`, without loading.
    pub fn cached(&self, path: &Path) -> Option<Arc<ModelBundle>> {
        self.slots.lock().get(path).and_then(|slot| slot.current())
    }

    pub fn is_loaded(&self, path: &Path) -> bool {
        self.cached(path).is_some()
    }

    /// Returns the bundle for `path`, reading the cache file or training a new one.
    ///
    /// A corrupted, unreadable, version-mismatched or stale-corpus file is treated as
    /// absent. Failures are not cached; the next call tries again. The run is detached
    /// from the caller, so a cancelled caller still leaves its bundle in the slot.
    pub async fn load_or_train(&self, path: &Path) -> Result<Arc<ModelBundle>, RegistryError> {
        let slot = self.slot(path);
        if let Some(bundle) = slot.current() {
            return Ok(bundle);
        }

        let (bundle, _) = self.initialise(slot, path, false).await?;
        Ok(bundle)
    }

    /// Trains a fresh bundle and atomically replaces the cached one.
    ///
    /// Readers holding the previous `Arc` keep using it until they drop it.
    pub async fn retrain(&self, path: &Path) -> Result<Arc<ModelBundle>, RegistryError> {
        let (bundle, previous) = self.initialise(self.slot(path), path, true).await?;

        info!(
            path = ?path,
            bundle_id = %bundle.bundle_id,
            previous = ?previous.map(|b| b.bundle_id.clone()),
            "Model bundle replaced"
        );
        Ok(bundle)
    }

    /// Drops the cached bundle; the next call reloads from disk.
    pub fn invalidate(&self, path: &Path) -> bool {
        let removed = self
            .slots
            .lock()
            .get(path)
            .and_then(|slot| slot.bundle.write().take());
        removed.is_some()
    }

    fn slot(&self, path: &Path) -> Arc<BundleSlot> {
        let mut slots = self.slots.lock();
        Arc::clone(slots.entry(path.to_path_buf()).or_default())
    }

    /// Runs [`initialise_slot`] on its own task, so a cancelled caller never discards a
    /// finished run and later callers find it in the slot.
    async fn initialise(
        &self,
        slot: Arc<BundleSlot>,
        path: &Path,
        force_train: bool,
    ) -> Result<SlotUpdate, RegistryError> {
        let task = tokio::spawn(initialise_slot(
            slot,
            path.to_path_buf(),
            Arc::clone(&self.corpus),
            Arc::clone(&self.training_runs),
            force_train,
        ));

        task.await.map_err(|e| RegistryError::TaskFailed {
            reason: e.to_string(),
        })?
    }
}

/// The bundle now in the slot and the one it replaced.
type SlotUpdate = (Arc<ModelBundle>, Option<Arc<ModelBundle>>);

async fn initialise_slot(
    slot: Arc<BundleSlot>,
    path: PathBuf,
    corpus: Arc<TrainingCorpus>,
    training_runs: Arc<AtomicU64>,
    force_train: bool,
) -> Result<SlotUpdate, RegistryError> {
    let _init = slot.init.lock().await;
    // Another run may have finished while we waited.
    if !force_train && let Some(bundle) = slot.current() {
        return Ok((bundle, None));
    }

    let bundle = tokio::task::spawn_blocking(move || {
        load_or_train_blocking(&path, &corpus, &training_runs, force_train)
    })
    .await
    .map_err(|e| RegistryError::TaskFailed {
        reason: e.to_string(),
    })??;

    let bundle = Arc::new(bundle);
    let previous = slot.bundle.write().replace(Arc::clone(&bundle));
    Ok((bundle, previous))
}

fn load_or_train_blocking(
    path: &Path,
    corpus: &TrainingCorpus,
    training_runs: &AtomicU64,
    force_train: bool,
) -> Result<ModelBundle, RegistryError> {
    let store = BundleStore::new(path);

    if !force_train {
        match store.load() {
            LoadOutcome::Loaded(bundle) if bundle.matches_corpus(corpus) => {
                info!(path = ?path, bundle_id = %bundle.bundle_id, "Model bundle loaded");
                return Ok(bundle);
            }
            LoadOutcome::Loaded(bundle) => {
                warn!(
                    path = ?path,
                    cached_corpus = bundle.corpus_version,
                    current_corpus = corpus.version(),
                    "Cached bundle was trained on a different corpus, retraining"
                );
            }
            LoadOutcome::Missing => {
                info!(path = ?path, "No cached bundle, training");
            }
            LoadOutcome::Rejected(e) => {
                warn!(path = ?path, error = %e, "Cached bundle unusable, retraining");
            }
        }
    }

    training_runs.fetch_add(1, Ordering::SeqCst);
    let bundle = ModelBundle::train(corpus)?;

    // An unwritable cache only costs a retrain on the next cold start.
    if let Err(e) = store.persist(&bundle) {
        warn!(path = ?path, error = %e, "Failed to persist model bundle");
    }

    Ok(bundle)
}
