//! Safe Browsing provider records
//!
//! A provider describes one third-party Safe Browsing server: its protocol
//! version, the lists it serves and its endpoints. Records are plain data;
//! nothing in this crate contacts the endpoints.

use std::collections::BTreeMap;

use crate::codec::{lists_to_pref, pref_to_lists};
use crate::prefs::{keys, PrefValue};
use crate::settings::SettingsError;

/// Name reserved for the engine's built-in provider.
pub const RESERVED_PROVIDER_NAME: &str = "mozilla";

/// Configuration of one Safe Browsing provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafeBrowsingProvider {
    name: String,
    version: Option<String>,
    lists: Option<String>,
    update_url: Option<String>,
    get_hash_url: Option<String>,
    report_url: Option<String>,
    report_phishing_mistake_url: Option<String>,
    report_malware_mistake_url: Option<String>,
    advisory_url: Option<String>,
    advisory_name: Option<String>,
    data_sharing_url: Option<String>,
    data_sharing_enabled: bool,
}

impl SafeBrowsingProvider {
    /// Create an empty provider record.
    pub fn new(name: impl Into<String>) -> Result<Self, SettingsError> {
        let name = name.into();
        if name.is_empty() {
            return Err(SettingsError::EmptyProviderName);
        }
        if name == RESERVED_PROVIDER_NAME {
            return Err(SettingsError::ReservedProviderName(name));
        }
        Ok(Self {
            name,
            version: None,
            lists: None,
            update_url: None,
            get_hash_url: None,
            report_url: None,
            report_phishing_mistake_url: None,
            report_malware_mistake_url: None,
            advisory_url: None,
            advisory_name: None,
            data_sharing_url: None,
            data_sharing_enabled: false,
        })
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Set the lists served by this provider.
    pub fn with_lists<S: AsRef<str>>(mut self, lists: &[S]) -> Result<Self, SettingsError> {
        self.lists = Some(lists_to_pref(lists)?);
        Ok(self)
    }

    pub fn with_update_url(mut self, url: impl Into<String>) -> Self {
        self.update_url = Some(url.into());
        self
    }

    pub fn with_get_hash_url(mut self, url: impl Into<String>) -> Self {
        self.get_hash_url = Some(url.into());
        self
    }

    pub fn with_report_url(mut self, url: impl Into<String>) -> Self {
        self.report_url = Some(url.into());
        self
    }

    pub fn with_report_phishing_mistake_url(mut self, url: impl Into<String>) -> Self {
        self.report_phishing_mistake_url = Some(url.into());
        self
    }

    pub fn with_report_malware_mistake_url(mut self, url: impl Into<String>) -> Self {
        self.report_malware_mistake_url = Some(url.into());
        self
    }

    pub fn with_advisory_url(mut self, url: impl Into<String>) -> Self {
        self.advisory_url = Some(url.into());
        self
    }

    pub fn with_advisory_name(mut self, name: impl Into<String>) -> Self {
        self.advisory_name = Some(name.into());
        self
    }

    pub fn with_data_sharing_url(mut self, url: impl Into<String>) -> Self {
        self.data_sharing_url = Some(url.into());
        self
    }

    pub fn with_data_sharing_enabled(mut self, enabled: bool) -> Self {
        self.data_sharing_enabled = enabled;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn lists(&self) -> Vec<String> {
        pref_to_lists(self.lists.as_deref())
    }

    pub fn update_url(&self) -> Option<&str> {
        self.update_url.as_deref()
    }

    pub fn get_hash_url(&self) -> Option<&str> {
        self.get_hash_url.as_deref()
    }

    pub fn report_url(&self) -> Option<&str> {
        self.report_url.as_deref()
    }

    pub fn report_phishing_mistake_url(&self) -> Option<&str> {
        self.report_phishing_mistake_url.as_deref()
    }

    pub fn report_malware_mistake_url(&self) -> Option<&str> {
        self.report_malware_mistake_url.as_deref()
    }

    pub fn advisory_url(&self) -> Option<&str> {
        self.advisory_url.as_deref()
    }

    pub fn advisory_name(&self) -> Option<&str> {
        self.advisory_name.as_deref()
    }

    pub fn data_sharing_url(&self) -> Option<&str> {
        self.data_sharing_url.as_deref()
    }

    pub fn data_sharing_enabled(&self) -> bool {
        self.data_sharing_enabled
    }

    /// Preferences for this provider. Unset values are omitted.
    pub fn prefs(&self) -> BTreeMap<String, PrefValue> {
        let root = format!("{}{}.", keys::PROVIDER_ROOT, self.name);
        let mut prefs = BTreeMap::new();

        let strings = [
            ("pver", &self.version),
            ("lists", &self.lists),
            ("updateURL", &self.update_url),
            ("gethashURL", &self.get_hash_url),
            ("reportURL", &self.report_url),
            ("reportPhishMistakeURL", &self.report_phishing_mistake_url),
            ("reportMalwareMistakeURL", &self.report_malware_mistake_url),
            ("advisoryURL", &self.advisory_url),
            ("advisoryName", &self.advisory_name),
            ("dataSharingURL", &self.data_sharing_url),
        ];
        for (suffix, value) in strings {
            if let Some(value) = value {
                prefs.insert(format!("{root}{suffix}"), PrefValue::Str(value.clone()));
            }
        }
        prefs.insert(
            format!("{root}dataSharing.enabled"),
            PrefValue::Bool(self.data_sharing_enabled),
        );

        prefs
    }
}

// =============================================================================
// Default Providers
// =============================================================================

const MISTAKE_PHISHING_URL: &str = "https://%LOCALE%.phish-error.mozilla.com/?url=";
const MISTAKE_MALWARE_URL: &str = "https://%LOCALE%.malware-error.mozilla.com/?url=";
const DIAGNOSTIC_URL: &str = "https://safebrowsing.google.com/safebrowsing/diagnostic?site=";
const ADVISORY_URL: &str = "https://developers.google.com/safe-browsing/v4/advisory";
const ADVISORY_NAME: &str = "Google Safe Browsing";

const GOOGLE_LEGACY_LISTS: [&str; 6] = [
    "goog-badbinurl-shavar",
    "goog-downloadwhite-digest256",
    "goog-phish-shavar",
    "googpub-phish-shavar",
    "goog-malware-shavar",
    "goog-unwanted-shavar",
];

const GOOGLE_V4_LISTS: [&str; 7] = [
    "goog-badbinurl-proto",
    "goog-downloadwhite-proto",
    "goog-phish-proto",
    "googpub-phish-proto",
    "goog-malware-proto",
    "goog-unwanted-proto",
    "goog-harmful-proto",
];

impl SafeBrowsingProvider {
    // Built-in records skip validation; tests cover their constants.
    fn builtin(name: &str, version: &str, lists: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            version: Some(version.to_string()),
            lists: Some(lists.join(",")),
            update_url: None,
            get_hash_url: None,
            report_url: Some(DIAGNOSTIC_URL.to_string()),
            report_phishing_mistake_url: Some(MISTAKE_PHISHING_URL.to_string()),
            report_malware_mistake_url: Some(MISTAKE_MALWARE_URL.to_string()),
            advisory_url: Some(ADVISORY_URL.to_string()),
            advisory_name: Some(ADVISORY_NAME.to_string()),
            data_sharing_url: None,
            data_sharing_enabled: false,
        }
    }
}

/// Google's legacy (v2.2) Safe Browsing server.
pub fn google_legacy() -> SafeBrowsingProvider {
    SafeBrowsingProvider::builtin("google", "2.2", &GOOGLE_LEGACY_LISTS)
        .with_update_url(
            "https://safebrowsing.google.com/safebrowsing/downloads?client=SAFEBROWSING_ID&appver=%MAJOR_VERSION%&pver=2.2&key=%GOOGLE_SAFEBROWSING_API_KEY%",
        )
        .with_get_hash_url(
            "https://safebrowsing.google.com/safebrowsing/gethash?client=SAFEBROWSING_ID&appver=%MAJOR_VERSION%&pver=2.2",
        )
}

/// Google's v4 Safe Browsing server.
pub fn google_v4() -> SafeBrowsingProvider {
    SafeBrowsingProvider::builtin("google4", "4", &GOOGLE_V4_LISTS)
        .with_update_url(
            "https://safebrowsing.googleapis.com/v4/threatListUpdates:fetch?$ct=application/x-protobuf&key=%GOOGLE_SAFEBROWSING_API_KEY%&$httpMethod=POST",
        )
        .with_get_hash_url(
            "https://safebrowsing.googleapis.com/v4/fullHashes:find?$ct=application/x-protobuf&key=%GOOGLE_SAFEBROWSING_API_KEY%&$httpMethod=POST",
        )
        .with_data_sharing_url(
            "https://safebrowsing.googleapis.com/v4/threatHits?$ct=application/x-protobuf&key=%GOOGLE_SAFEBROWSING_API_KEY%&$httpMethod=POST",
        )
}

/// The providers every root settings node starts with.
pub fn default_providers() -> Vec<SafeBrowsingProvider> {
    vec![google_legacy(), google_v4()]
}
