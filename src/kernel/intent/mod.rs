pub mod registry;
pub mod types;

pub use registry::{IntentRegistry, RegistryError};
pub use types::{Intent, IntentId, IntentKind, IntentStatus};
