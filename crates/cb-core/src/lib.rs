//! Content Blocking Core Library
//!
//! Typed content blocking configuration for an external filtering engine,
//! and classification of the engine's per-load reports.
//!
//! # Architecture
//!
//! Hosts describe policy as category flag sets on a [`Settings`] node. The
//! node stores them the way the engine consumes them: comma-separated list
//! identifiers and scalar preferences, produced by the [`codec`]. When the
//! engine reports a load, [`BlockEvent::from_notification`] decodes the raw
//! status bits, error code and matched lists back into categories.
//!
//! # Modules
//!
//! - `types`: category flag sets, cookie behavior and mode enums
//! - `codec`: list string encoding and decoding
//! - `taxonomy`: the anti-tracking token tables
//! - `classify`: Safe Browsing, error and cookie status classification
//! - `event`: engine notifications and classified block events
//! - `provider`: Safe Browsing provider records
//! - `prefs`: preference keys and storage
//! - `settings`: settings nodes and overrides
//! - `tree`: parent/child arrangement of settings nodes

pub mod classify;
pub mod codec;
pub mod event;
pub mod prefs;
pub mod provider;
pub mod settings;
pub mod taxonomy;
pub mod tree;
pub mod types;

// Re-export commonly used types
pub use codec::{CodecError, TokenTable};
pub use event::{BlockEvent, LoadNotification};
pub use prefs::{MemoryPrefStore, PrefStore, PrefValue};
pub use provider::SafeBrowsingProvider;
pub use settings::{Settings, SettingsError, SettingsOverrides};
pub use taxonomy::Taxonomy;
pub use tree::{NodeId, SettingsTree};
pub use types::{
    AntiTracking, BounceTrackingProtectionMode, CookieBannerMode, CookieBehavior, EtpCategory,
    EtpLevel, SafeBrowsing, StatusFlags,
};
