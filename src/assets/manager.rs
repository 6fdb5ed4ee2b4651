//! Loading manager
//!
//! Tracks every registered asset from request to settlement. Reads run as
//! async tasks (a shared tokio runtime on native, `spawn_local` on wasm) and
//! report back over a `flume` channel; [`LoadingManager::poll`] drains that
//! channel on the frame thread and turns raw events into [`LoadUpdate`]s.
//!
//! `AllSettled` is emitted exactly once, in the poll that observes the last
//! registered asset settle (loaded, or failed after its retries).
//!
//! Every registered asset carries the same weight in the combined progress,
//! whether or not it has reported yet, and no asset's share ever shrinks.

use crate::assets::io::AssetReader;
use crate::assets::loaders::{load_gltf, load_hdr};
use crate::assets::prefab::Prefab;
use crate::assets::progress::LoadProgress;
use crate::errors::{Result, SceneError};
use crate::scene::environment::EnvironmentMap;

use std::future::Future;

#[cfg(not(target_arch = "wasm32"))]
use std::sync::OnceLock;
#[cfg(not(target_arch = "wasm32"))]
use tokio::runtime::Runtime;

#[cfg(not(target_arch = "wasm32"))]
fn get_asset_runtime() -> &'static Runtime {
    static RUNTIME: OnceLock<Runtime> = OnceLock::new();
    RUNTIME.get_or_init(|| Runtime::new().expect("Failed to create asset loader runtime"))
}

/// Progress units one asset contributes once complete.
pub const ASSET_PROGRESS_UNITS: u64 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AssetId(usize);

impl AssetId {
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    /// Binary glTF decoded into a [`Prefab`].
    Model,
    /// Radiance HDR decoded into an [`EnvironmentMap`].
    Environment,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRequest {
    pub uri: String,
    pub kind: AssetKind,
    /// Whether the scene can be revealed without this asset.
    pub required: bool,
}

impl AssetRequest {
    pub fn model(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            kind: AssetKind::Model,
            required: true,
        }
    }

    pub fn environment(uri: impl Into<String>, required: bool) -> Self {
        Self {
            uri: uri.into(),
            kind: AssetKind::Environment,
            required,
        }
    }
}

#[derive(Debug, Clone)]
pub enum LoadedAsset {
    Model(Prefab),
    Environment(EnvironmentMap),
}

/// Raw event posted by a loader task.
#[derive(Debug)]
pub enum LoadEvent {
    Progress { id: AssetId, progress: LoadProgress },
    Loaded { id: AssetId, asset: LoadedAsset },
    /// Sent once the retries are exhausted.
    Failed { id: AssetId, reason: String },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub loaded: usize,
    pub failed: usize,
    /// At least one required asset failed.
    pub required_failed: bool,
}

impl LoadSummary {
    #[must_use]
    pub fn can_reveal(&self) -> bool {
        !self.required_failed
    }
}

/// What the frame routine reacts to.
#[derive(Debug)]
pub enum LoadUpdate {
    /// Combined progress over every registered asset, in
    /// [`ASSET_PROGRESS_UNITS`] per asset.
    Progress(LoadProgress),
    Loaded {
        id: AssetId,
        asset: LoadedAsset,
    },
    Failed {
        id: AssetId,
        uri: String,
        required: bool,
        error: SceneError,
    },
    AllSettled(LoadSummary),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AssetStatus {
    Pending,
    Loaded,
    Failed,
}

#[derive(Debug)]
struct AssetEntry {
    request: AssetRequest,
    status: AssetStatus,
    /// Highest share reported so far, out of [`ASSET_PROGRESS_UNITS`].
    units: u64,
}

impl AssetEntry {
    /// Raises the share to `progress`. Returns whether it grew.
    fn advance(&mut self, progress: LoadProgress) -> bool {
        let units = progress.scaled(ASSET_PROGRESS_UNITS);
        if units > self.units {
            self.units = units;
            true
        } else {
            false
        }
    }

    fn settle(&mut self, status: AssetStatus) {
        self.status = status;
        self.units = ASSET_PROGRESS_UNITS;
    }
}

pub struct LoadingManager {
    entries: Vec<AssetEntry>,
    sender: flume::Sender<LoadEvent>,
    receiver: flume::Receiver<LoadEvent>,
    max_retries: u32,
    started: bool,
    settled: bool,
}

impl LoadingManager {
    #[must_use]
    pub fn new(max_retries: u32) -> Self {
        let (sender, receiver) = flume::unbounded();
        Self {
            entries: Vec::new(),
            sender,
            receiver,
            max_retries,
            started: false,
            settled: false,
        }
    }

    pub fn register(&mut self, request: AssetRequest) -> AssetId {
        let id = AssetId(self.entries.len());
        log::debug!("Registered asset {:?} as {id:?}", request.uri);
        self.entries.push(AssetEntry {
            request,
            status: AssetStatus::Pending,
            units: 0,
        });
        id
    }

    #[must_use]
    pub fn request(&self, id: AssetId) -> Option<&AssetRequest> {
        self.entries.get(id.0).map(|e| &e.request)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.settled
    }

    /// Channel end the loader tasks post to.
    #[must_use]
    pub fn sender(&self) -> flume::Sender<LoadEvent> {
        self.sender.clone()
    }

    /// Spawns one loader task per registered asset. Calling it again is a
    /// no-op.
    pub fn start(&mut self, reader: &AssetReader) {
        if self.started {
            log::warn!("Loading already started");
            return;
        }
        self.started = true;
        log::info!("Loading {} assets", self.entries.len());

        for (index, entry) in self.entries.iter().enumerate() {
            let task = load_with_retries(
                reader.clone(),
                AssetId(index),
                entry.request.clone(),
                self.max_retries,
                self.sender.clone(),
            );

            #[cfg(not(target_arch = "wasm32"))]
            drop(get_asset_runtime().spawn(task));

            #[cfg(target_arch = "wasm32")]
            wasm_bindgen_futures::spawn_local(task);
        }
    }

    /// Drains pending events without blocking.
    pub fn poll(&mut self) -> Vec<LoadUpdate> {
        let events: Vec<LoadEvent> = self.receiver.try_iter().collect();
        self.process(events)
    }

    /// Waits up to `timeout` for the next event, then drains the rest.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn poll_blocking(&mut self, timeout: std::time::Duration) -> Vec<LoadUpdate> {
        let mut events = Vec::new();
        if let Ok(first) = self.receiver.recv_timeout(timeout) {
            events.push(first);
            events.extend(self.receiver.try_iter());
        }
        self.process(events)
    }

    fn process(&mut self, events: Vec<LoadEvent>) -> Vec<LoadUpdate> {
        let mut updates = Vec::new();
        if self.settled {
            if !events.is_empty() {
                log::debug!("Dropping {} load events after settlement", events.len());
            }
            return updates;
        }

        let mut progress_changed = false;
        for event in events {
            match event {
                LoadEvent::Progress { id, progress } => {
                    let Some(entry) = self.pending_entry(id) else { continue };
                    progress_changed |= entry.advance(progress);
                }
                LoadEvent::Loaded { id, asset } => {
                    let Some(entry) = self.pending_entry(id) else { continue };
                    entry.settle(AssetStatus::Loaded);
                    progress_changed = true;
                    log::info!("Loaded {}", entry.request.uri);
                    updates.push(LoadUpdate::Loaded { id, asset });
                }
                LoadEvent::Failed { id, reason } => {
                    let Some(entry) = self.pending_entry(id) else { continue };
                    entry.settle(AssetStatus::Failed);
                    progress_changed = true;
                    let uri = entry.request.uri.clone();
                    let required = entry.request.required;
                    if required {
                        log::error!("Failed to load required asset {uri}: {reason}");
                    } else {
                        log::warn!("Failed to load optional asset {uri}: {reason}");
                    }
                    updates.push(LoadUpdate::Failed {
                        id,
                        error: SceneError::AssetLoad {
                            asset: uri.clone(),
                            reason,
                        },
                        uri,
                        required,
                    });
                }
            }
        }

        if progress_changed {
            updates.push(LoadUpdate::Progress(self.combined_progress()));
        }

        if self.all_settled() {
            self.settled = true;
            let summary = self.summary();
            log::info!(
                "All assets settled: {} loaded, {} failed",
                summary.loaded,
                summary.failed
            );
            updates.push(LoadUpdate::AllSettled(summary));
        }

        updates
    }

    fn pending_entry(&mut self, id: AssetId) -> Option<&mut AssetEntry> {
        match self.entries.get_mut(id.0) {
            Some(entry) if entry.status == AssetStatus::Pending => Some(entry),
            Some(_) => {
                log::warn!("Ignoring event for already settled asset {id:?}");
                None
            }
            None => {
                log::warn!("Ignoring event for unknown asset {id:?}");
                None
            }
        }
    }

    /// Each asset's share summed over all registered assets. Assets that
    /// have not reported count as zero; settled ones count as full.
    #[must_use]
    pub fn combined_progress(&self) -> LoadProgress {
        LoadProgress::new(
            self.entries.iter().map(|e| e.units).sum(),
            self.entries.len() as u64 * ASSET_PROGRESS_UNITS,
        )
    }

    fn all_settled(&self) -> bool {
        let every_settled = self.entries.iter().all(|e| e.status != AssetStatus::Pending);
        if self.entries.is_empty() {
            self.started
        } else {
            every_settled
        }
    }

    fn summary(&self) -> LoadSummary {
        let mut summary = LoadSummary::default();
        for entry in &self.entries {
            match entry.status {
                AssetStatus::Loaded => summary.loaded += 1,
                AssetStatus::Failed => {
                    summary.failed += 1;
                    summary.required_failed |= entry.request.required;
                }
                AssetStatus::Pending => {}
            }
        }
        summary
    }
}

async fn load_with_retries(
    reader: AssetReader,
    id: AssetId,
    request: AssetRequest,
    max_retries: u32,
    sender: flume::Sender<LoadEvent>,
) {
    let outcome = with_retries(&request.uri, max_retries, || {
        load_once(&reader, id, &request, &sender)
    })
    .await;
    report(id, outcome, &sender);
}

/// Runs `attempt` until it succeeds, giving up after `max_retries` extra
/// attempts.
async fn with_retries<T, F, Fut>(label: &str, max_retries: u32, mut attempt: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut retries = 0;
    loop {
        match attempt().await {
            Ok(value) => return Ok(value),
            Err(err) if retries < max_retries => {
                retries += 1;
                log::warn!("Loading {label} failed ({err}), retry {retries}/{max_retries}");
            }
            Err(err) => return Err(err),
        }
    }
}

fn report(id: AssetId, outcome: Result<LoadedAsset>, sender: &flume::Sender<LoadEvent>) {
    let event = match outcome {
        Ok(asset) => LoadEvent::Loaded { id, asset },
        Err(err) => LoadEvent::Failed {
            id,
            reason: err.to_string(),
        },
    };
    if sender.send(event).is_err() {
        log::debug!("Loading manager dropped before {id:?} settled");
    }
}

async fn load_once(
    reader: &AssetReader,
    id: AssetId,
    request: &AssetRequest,
    sender: &flume::Sender<LoadEvent>,
) -> Result<LoadedAsset> {
    let progress_sender = sender.clone();
    let bytes = reader
        .read_bytes(&request.uri, move |progress| {
            let _ = progress_sender.send(LoadEvent::Progress { id, progress });
        })
        .await?;
    decode_async(request.kind, request.uri.clone(), bytes).await
}

/// Decodes off the async workers on native.
async fn decode_async(kind: AssetKind, label: String, bytes: Vec<u8>) -> Result<LoadedAsset> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        let context = label.clone();
        tokio::task::spawn_blocking(move || decode(kind, &label, &bytes))
            .await
            .map_err(|e| SceneError::asset_load(context, e))?
    }
    #[cfg(target_arch = "wasm32")]
    {
        decode(kind, &label, &bytes)
    }
}

/// Decodes raw bytes according to the asset kind.
pub fn decode(kind: AssetKind, label: &str, bytes: &[u8]) -> Result<LoadedAsset> {
    match kind {
        AssetKind::Model => load_gltf(label, bytes).map(LoadedAsset::Model),
        AssetKind::Environment => load_hdr(label, bytes).map(LoadedAsset::Environment),
    }
}
