//! Cobalt State
//!
//! Persists the mapping from declared resources to real cloud state: the
//! canonical identifier of each resource plus its flattened attributes.
//! Backends own storage and locking; the local file backend is the default.

pub mod backend;
pub mod backends;
pub mod lock;
pub mod state;

pub use backend::{BackendConfig, BackendError, BackendResult, StateBackend};
pub use backends::{LocalBackend, create_backend};
pub use lock::LockInfo;
pub use state::{ResourceState, StateFile};
