//! # raffle-state: persisted collaborators
//!
//! Settings and draw history, each stored as one JSON document under a fixed
//! key of a [`KeyValueStore`]. Stored documents are replaced wholesale on
//! every save.
//!
//! ```text
//!  SettingsStore ──┐                 ┌── MemoryStore
//!                  ├── KeyValueStore ┤
//!  HistoryLog ─────┘                 └── FileStore (<dir>/<key>.json)
//!       │
//!       └── export: share message / HTML report
//! ```

pub mod error;
pub mod export;
pub mod history;
pub mod settings;
pub mod store;

pub use error::*;
pub use export::*;
pub use history::*;
pub use settings::*;
pub use store::*;
