//! Asset loading for Vitrine: glTF showcase models and bitmap fonts.
//!
//! Loading is best-effort at the call site. The app logs a warning and keeps
//! running with the features that depend on the missing asset left inert.

pub mod font;
pub mod model;

pub use font::GlyphFactory;
pub use model::{AnimationClip, ChannelProperty, CpuModel, ModelMesh, ModelNode};

/// Error type for asset loading.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("Failed to load glTF file: {0}")]
    Gltf(#[from] gltf::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse font file: {0}")]
    Font(#[from] serde_json::Error),

    #[error("Missing position data for mesh: {0}")]
    MissingPositions(String),
}
