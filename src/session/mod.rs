pub mod supervisor;

pub use supervisor::{SessionError, SessionSupervisor};
