//! Observability for the call kernel.
//!
//! # SAFETY INVARIANT
//! Telemetry is a read-only side-effect layer. It must **NEVER** be read
//! inside decision logic (Coordinator, Suggestion Engine, Menu Engine).
//!
//! # PRIVACY INVARIANT
//! Telemetry events must **NEVER** contain caller content (utterance text,
//! inferred goals, menu labels). Only internal ids, counts, and enums.

pub mod event;
pub mod metrics;
pub mod recorder;

pub use event::{MenuDecisionKind, TelemetryEvent};
pub use metrics::TelemetrySnapshot;
pub use recorder::TelemetryRecorder;
