//! Asset loading
//!
//! Readers fetch bytes, loaders decode them, and the [`LoadingManager`]
//! tracks settlement and combined progress.

pub mod io;
pub mod loaders;
pub mod manager;
pub mod prefab;
pub mod progress;

pub use io::AssetReader;
pub use manager::{
    ASSET_PROGRESS_UNITS, AssetId, AssetKind, AssetRequest, LoadEvent, LoadSummary, LoadUpdate,
    LoadedAsset, LoadingManager,
};
pub use prefab::{Prefab, PrefabNode};
pub use progress::LoadProgress;
