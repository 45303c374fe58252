//! Block and load events
//!
//! The engine reports every tracked load as a [`LoadNotification`]. Each one
//! is classified into exactly one immutable [`BlockEvent`].

use serde::{Deserialize, Serialize};

use crate::classify::{classify_cookie_status, classify_engine_error, is_blocking};
use crate::codec::SEPARATOR;
use crate::taxonomy::Taxonomy;
use crate::types::{AntiTracking, CookieBehavior, SafeBrowsing, StatusFlags};

/// Raw per-load report from the filtering engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoadNotification {
    pub uri: String,
    /// List that caused the block, if any
    pub blocked_list: Option<String>,
    /// Lists that matched without blocking
    pub loaded_lists: Vec<String>,
    /// Engine error code, 0 if none
    pub error: u64,
    /// Raw status bits
    pub category: u64,
}

/// A classified block or load event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockEvent {
    uri: String,
    anti_tracking: AntiTracking,
    safe_browsing: SafeBrowsing,
    cookie_behavior: CookieBehavior,
    blocking: bool,
}

impl BlockEvent {
    pub fn new(
        uri: impl Into<String>,
        anti_tracking: AntiTracking,
        safe_browsing: SafeBrowsing,
        cookie_behavior: CookieBehavior,
        blocking: bool,
    ) -> Self {
        Self {
            uri: uri.into(),
            anti_tracking,
            safe_browsing,
            cookie_behavior,
            blocking,
        }
    }

    /// Classify one engine notification.
    pub fn from_notification(taxonomy: &Taxonomy, notification: &LoadNotification) -> Self {
        let matched = match &notification.blocked_list {
            Some(list) => list.clone(),
            None => notification
                .loaded_lists
                .join(SEPARATOR.to_string().as_str()),
        };
        let status = StatusFlags::from_raw(notification.category);

        let event = Self::new(
            notification.uri.as_str(),
            taxonomy.classify_anti_tracking(Some(matched.as_str())),
            classify_engine_error(notification.error),
            classify_cookie_status(status),
            is_blocking(
                status,
                notification.blocked_list.is_some(),
                notification.error != 0,
            ),
        );
        log::trace!("classified {event:?}");
        event
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn anti_tracking_category(&self) -> AntiTracking {
        self.anti_tracking
    }

    pub fn safe_browsing_category(&self) -> SafeBrowsing {
        self.safe_browsing
    }

    pub fn cookie_behavior_category(&self) -> CookieBehavior {
        self.cookie_behavior
    }

    pub fn is_blocking(&self) -> bool {
        self.blocking
    }
}
