pub mod session;

pub use session::{ArtifactEntry, ArtifactHandle, SessionStore, StoreConfig};
