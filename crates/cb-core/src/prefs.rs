//! Preference keys and storage
//!
//! Settings reach the engine as plain key/value preferences. Storage itself
//! belongs to the embedder; [`PrefStore`] is the only contract.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// =============================================================================
// Preference Keys
// =============================================================================

pub mod keys {
    pub const TRACKING_TABLE: &str = "urlclassifier.trackingTable";
    pub const CRYPTOMINING_ENABLED: &str = "privacy.trackingprotection.cryptomining.enabled";
    pub const CRYPTOMINING_TABLES: &str = "urlclassifier.features.cryptomining.blacklistTables";
    pub const FINGERPRINTING_ENABLED: &str = "privacy.trackingprotection.fingerprinting.enabled";
    pub const FINGERPRINTING_TABLES: &str =
        "urlclassifier.features.fingerprinting.blacklistTables";
    pub const SOCIAL_TRACKING_COOKIES: &str = "privacy.socialtracking.block_cookies.enabled";
    pub const SOCIAL_TRACKING_STRICT: &str = "privacy.trackingprotection.socialtracking.enabled";
    pub const SOCIAL_TRACKING_TABLES: &str =
        "urlclassifier.features.socialtracking.annotate.blacklistTables";
    pub const EMAIL_TRACKING_ENABLED: &str = "privacy.trackingprotection.emailtracking.enabled";
    pub const EMAIL_TRACKING_PRIVATE: &str =
        "privacy.trackingprotection.emailtracking.pbmode.enabled";
    pub const EMAIL_TRACKING_TABLES: &str = "urlclassifier.features.emailtracking.blocklistTables";

    pub const SAFE_BROWSING_MALWARE: &str = "browser.safebrowsing.malware.enabled";
    pub const SAFE_BROWSING_PHISHING: &str = "browser.safebrowsing.phishing.enabled";
    pub const MALWARE_TABLE: &str = "urlclassifier.malwareTable";
    pub const PHISHING_TABLE: &str = "urlclassifier.phishTable";

    pub const COOKIE_BEHAVIOR: &str = "network.cookie.cookieBehavior";
    pub const COOKIE_BEHAVIOR_PRIVATE: &str = "network.cookie.cookieBehavior.pbmode";
    pub const COOKIE_PURGING: &str = "privacy.purge_trackers.enabled";

    pub const ETP_ENABLED: &str = "privacy.trackingprotection.annotate_channels";
    pub const ETP_STRICT: &str = "privacy.annotate_channels.strict_list.enabled";
    pub const ETP_CATEGORY: &str = "browser.contentblocking.category";
    pub const ALLOW_LIST_BASELINE: &str = "privacy.trackingprotection.allow_list.baseline.enabled";
    pub const ALLOW_LIST_CONVENIENCE: &str =
        "privacy.trackingprotection.allow_list.convenience.enabled";

    pub const COOKIE_BANNER_MODE: &str = "cookiebanners.service.mode";
    pub const COOKIE_BANNER_MODE_PRIVATE: &str = "cookiebanners.service.mode.privateBrowsing";
    pub const COOKIE_BANNER_DETECT_ONLY: &str = "cookiebanners.service.detectOnly";
    pub const COOKIE_BANNER_GLOBAL_RULES: &str = "cookiebanners.service.enableGlobalRules";
    pub const COOKIE_BANNER_GLOBAL_RULES_SUB_FRAMES: &str =
        "cookiebanners.service.enableGlobalRules.subFrames";

    pub const QUERY_STRIPPING: &str = "privacy.query_stripping.enabled";
    pub const QUERY_STRIPPING_PRIVATE: &str = "privacy.query_stripping.enabled.pbmode";
    pub const QUERY_STRIPPING_ALLOW_LIST: &str = "privacy.query_stripping.allow_list";
    pub const QUERY_STRIPPING_STRIP_LIST: &str = "privacy.query_stripping.strip_list";

    pub const BOUNCE_TRACKING_MODE: &str = "privacy.bounceTrackingProtection.mode";

    /// Prefix for per-provider Safe Browsing keys.
    pub const PROVIDER_ROOT: &str = "browser.safebrowsing.provider.";
}

// =============================================================================
// Values & Storage
// =============================================================================

/// A single preference value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrefValue {
    Bool(bool),
    Int(i32),
    Str(String),
}

impl PrefValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(v) => Some(v),
            _ => None,
        }
    }
}

impl From<bool> for PrefValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for PrefValue {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<String> for PrefValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<&str> for PrefValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

/// Key/value preference storage provided by the embedder.
pub trait PrefStore {
    fn get(&self, key: &str) -> Option<PrefValue>;
    fn set(&mut self, key: &str, value: PrefValue);
}

/// In-memory preference store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemoryPrefStore {
    values: BTreeMap<String, PrefValue>,
}

impl MemoryPrefStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PrefValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn into_inner(self) -> BTreeMap<String, PrefValue> {
        self.values
    }
}

impl PrefStore for MemoryPrefStore {
    fn get(&self, key: &str) -> Option<PrefValue> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: PrefValue) {
        self.values.insert(key.to_string(), value);
    }
}
