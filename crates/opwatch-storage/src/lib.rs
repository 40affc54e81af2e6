//! opwatch Storage
//!
//! Same-origin storage shared by the relay frame and the prompt-none redirect
//! target. Holds two pieces of cross-frame state:
//! - the "prompt-none request in flight" gate
//! - the "silent sign-in initializing" flag

mod error;
mod flags;
mod session_storage;

pub use error::StorageError;
pub use flags::{PromptNoneGate, SilentSignInFlag};
pub use session_storage::SessionStorage;

pub type Result<T> = std::result::Result<T, StorageError>;
