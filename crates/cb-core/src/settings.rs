//! Content blocking settings
//!
//! A [`Settings`] value is one node of configuration. Nodes are derived by
//! copying: a node built from a source takes a snapshot of every field and
//! keeps no link to it afterwards, so later changes on either side stay
//! local.
//!
//! Hosts change a node either through the typed setters or by applying a
//! [`SettingsOverrides`] document.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Deserialize;

use crate::classify::{classify_safe_browsing, malware_enabled, phishing_enabled};
use crate::codec::{lists_to_pref, pref_to_lists, CodecError};
use crate::prefs::{keys, PrefStore, PrefValue};
use crate::provider::{default_providers, SafeBrowsingProvider};
use crate::taxonomy::Taxonomy;
use crate::types::{
    AntiTracking, BounceTrackingProtectionMode, CookieBannerMode, CookieBehavior, EtpCategory,
    EtpLevel, SafeBrowsing,
};

/// Error type for settings construction and mutation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("Provider name {0:?} is reserved for internal use")]
    ReservedProviderName(String),
    #[error("Provider name must not be empty")]
    EmptyProviderName,
    #[error("Invalid list: {0}")]
    InvalidList(#[from] CodecError),
}

const DEFAULT_MALWARE_TABLE: &str = "goog-malware-proto,goog-unwanted-proto,moztest-harmful-simple,moztest-malware-simple,moztest-unwanted-simple";

#[cfg(feature = "official-build")]
const DEFAULT_PHISHING_TABLE: &str = "goog-phish-proto,moztest-phish-simple";
#[cfg(not(feature = "official-build"))]
const DEFAULT_PHISHING_TABLE: &str = "googpub-phish-proto,moztest-phish-simple";

/// One node of content blocking configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    taxonomy: Arc<Taxonomy>,

    // Anti-tracking, one toggle and list per engine feature
    tracking_table: String,
    cryptomining: bool,
    cryptomining_tables: String,
    fingerprinting: bool,
    fingerprinting_tables: String,
    social_tracking_cookies: bool,
    social_tracking_strict: bool,
    social_tracking_tables: String,
    email_tracking: bool,
    email_tracking_private: bool,
    email_tracking_tables: String,

    // Safe Browsing
    safe_browsing_malware: bool,
    safe_browsing_phishing: bool,
    malware_table: String,
    phishing_table: String,
    providers: BTreeMap<String, SafeBrowsingProvider>,

    // Cookies
    cookie_behavior: CookieBehavior,
    cookie_behavior_private: CookieBehavior,
    cookie_purging: bool,

    // Enhanced Tracking Protection
    etp_enabled: bool,
    etp_strict: bool,
    etp_category: String,
    allow_list_baseline: bool,
    allow_list_convenience: bool,

    // Cookie banner handling
    cookie_banner_mode: CookieBannerMode,
    cookie_banner_mode_private: CookieBannerMode,
    cookie_banner_detect_only: bool,
    cookie_banner_global_rules: bool,
    cookie_banner_global_rules_sub_frames: bool,

    // Query parameter stripping
    query_stripping: bool,
    query_stripping_private: bool,
    query_stripping_allow_list: String,
    query_stripping_strip_list: String,

    bounce_tracking_mode: BounceTrackingProtectionMode,
}

impl Settings {
    /// Root settings with default values.
    pub fn new(taxonomy: Arc<Taxonomy>) -> Self {
        let tracking_table = taxonomy.encode_core(AntiTracking::DEFAULT);
        let none = AntiTracking::empty();
        let cryptomining_tables = taxonomy.encode_cryptomining(none);
        let fingerprinting_tables = taxonomy.encode_fingerprinting(none);
        let social_tracking_tables = taxonomy.encode_social_tracking(none);
        let email_tracking_tables = taxonomy.encode_email(none);

        let mut settings = Self {
            taxonomy,
            tracking_table,
            cryptomining: false,
            cryptomining_tables,
            fingerprinting: false,
            fingerprinting_tables,
            social_tracking_cookies: false,
            social_tracking_strict: false,
            social_tracking_tables,
            email_tracking: false,
            email_tracking_private: false,
            email_tracking_tables,
            safe_browsing_malware: true,
            safe_browsing_phishing: true,
            malware_table: DEFAULT_MALWARE_TABLE.to_string(),
            phishing_table: DEFAULT_PHISHING_TABLE.to_string(),
            providers: BTreeMap::new(),
            cookie_behavior: CookieBehavior::AcceptFirstPartyAndIsolateOthers,
            cookie_behavior_private: CookieBehavior::AcceptFirstPartyAndIsolateOthers,
            cookie_purging: false,
            etp_enabled: false,
            etp_strict: false,
            etp_category: EtpCategory::Standard.as_pref_str().to_string(),
            allow_list_baseline: true,
            allow_list_convenience: true,
            cookie_banner_mode: CookieBannerMode::Disabled,
            cookie_banner_mode_private: CookieBannerMode::Reject,
            cookie_banner_detect_only: false,
            cookie_banner_global_rules: false,
            cookie_banner_global_rules_sub_frames: false,
            query_stripping: false,
            query_stripping_private: false,
            query_stripping_allow_list: String::new(),
            query_stripping_strip_list: String::new(),
            bounce_tracking_mode: BounceTrackingProtectionMode::Disabled,
        };
        settings.set_safe_browsing_providers(default_providers());

        log::debug!("created default content blocking settings");
        settings
    }

    /// Snapshot every field of `source` into a new node.
    pub fn derive_from(source: &Settings) -> Self {
        log::debug!("deriving settings from source snapshot");
        source.clone()
    }

    /// Derive from `self` and apply `overrides` to the copy.
    ///
    /// `self` is left untouched, also when the overrides are rejected.
    pub fn with_overrides(&self, overrides: &SettingsOverrides) -> Result<Self, SettingsError> {
        let mut next = Self::derive_from(self);
        overrides.apply_to(&mut next)?;
        Ok(next)
    }

    /// Apply `overrides` in place. On error nothing is changed.
    pub fn apply_overrides(&mut self, overrides: &SettingsOverrides) -> Result<(), SettingsError> {
        *self = self.with_overrides(overrides)?;
        Ok(())
    }

    pub fn taxonomy(&self) -> &Arc<Taxonomy> {
        &self.taxonomy
    }

    // =========================================================================
    // Anti-tracking
    // =========================================================================

    /// Set the anti-tracking categories to block.
    ///
    /// Updates the toggles and lists of every anti-tracking feature.
    pub fn set_anti_tracking(&mut self, cat: AntiTracking) -> &mut Self {
        self.tracking_table = self.taxonomy.encode_core(cat);

        self.cryptomining = cat.contains(AntiTracking::CRYPTOMINING);
        self.cryptomining_tables = self.taxonomy.encode_cryptomining(cat);

        self.fingerprinting = cat.contains(AntiTracking::FINGERPRINTING);
        self.fingerprinting_tables = self.taxonomy.encode_fingerprinting(cat);

        self.social_tracking_cookies = cat.contains(AntiTracking::STP);
        self.social_tracking_tables = self.taxonomy.encode_social_tracking(cat);

        self.email_tracking = cat.contains(AntiTracking::EMAIL);
        self.email_tracking_tables = self.taxonomy.encode_email(cat);
        self
    }

    /// The anti-tracking categories currently blocked.
    pub fn anti_tracking_categories(&self) -> AntiTracking {
        self.taxonomy.decode_lists(
            Some(self.tracking_table.as_str()),
            Some(self.cryptomining_tables.as_str()),
            Some(self.fingerprinting_tables.as_str()),
            Some(self.social_tracking_tables.as_str()),
            Some(self.email_tracking_tables.as_str()),
        )
    }

    pub fn set_strict_social_tracking_protection(&mut self, enabled: bool) -> &mut Self {
        self.social_tracking_strict = enabled;
        self
    }

    pub fn strict_social_tracking_protection(&self) -> bool {
        self.social_tracking_strict
    }

    pub fn set_email_tracker_blocking_private_browsing(&mut self, enabled: bool) -> &mut Self {
        self.email_tracking_private = enabled;
        self
    }

    pub fn email_tracker_blocking_private_browsing(&self) -> bool {
        self.email_tracking_private
    }

    // =========================================================================
    // Enhanced Tracking Protection
    // =========================================================================

    pub fn set_enhanced_tracking_protection_level(&mut self, level: EtpLevel) -> &mut Self {
        self.etp_enabled = matches!(level, EtpLevel::Default | EtpLevel::Strict);
        self.etp_strict = level == EtpLevel::Strict;
        self
    }

    pub fn enhanced_tracking_protection_level(&self) -> EtpLevel {
        if self.etp_strict {
            EtpLevel::Strict
        } else if self.etp_enabled {
            EtpLevel::Default
        } else {
            EtpLevel::None
        }
    }

    pub fn set_enhanced_tracking_protection_category(&mut self, category: EtpCategory) -> &mut Self {
        self.etp_category = category.as_pref_str().to_string();
        self
    }

    pub fn enhanced_tracking_protection_category(&self) -> EtpCategory {
        EtpCategory::from_pref_str(&self.etp_category)
    }

    pub fn set_allow_list_baseline_tracking_protection(&mut self, enabled: bool) -> &mut Self {
        self.allow_list_baseline = enabled;
        self
    }

    pub fn allow_list_baseline_tracking_protection(&self) -> bool {
        self.allow_list_baseline
    }

    pub fn set_allow_list_convenience_tracking_protection(&mut self, enabled: bool) -> &mut Self {
        self.allow_list_convenience = enabled;
        self
    }

    pub fn allow_list_convenience_tracking_protection(&self) -> bool {
        self.allow_list_convenience
    }

    // =========================================================================
    // Safe Browsing
    // =========================================================================

    pub fn set_safe_browsing(&mut self, cat: SafeBrowsing) -> &mut Self {
        self.safe_browsing_malware = malware_enabled(cat);
        self.safe_browsing_phishing = phishing_enabled(cat);
        self
    }

    pub fn safe_browsing_categories(&self) -> SafeBrowsing {
        classify_safe_browsing(self.safe_browsing_malware, self.safe_browsing_phishing)
    }

    pub fn set_safe_browsing_malware_table<S: AsRef<str>>(
        &mut self,
        table: &[S],
    ) -> Result<&mut Self, SettingsError> {
        self.malware_table = lists_to_pref(table)?;
        Ok(self)
    }

    pub fn safe_browsing_malware_table(&self) -> Vec<String> {
        pref_to_lists(Some(self.malware_table.as_str()))
    }

    pub fn set_safe_browsing_phishing_table<S: AsRef<str>>(
        &mut self,
        table: &[S],
    ) -> Result<&mut Self, SettingsError> {
        self.phishing_table = lists_to_pref(table)?;
        Ok(self)
    }

    pub fn safe_browsing_phishing_table(&self) -> Vec<String> {
        pref_to_lists(Some(self.phishing_table.as_str()))
    }

    /// Replace the whole provider collection.
    pub fn set_safe_browsing_providers<I>(&mut self, providers: I) -> &mut Self
    where
        I: IntoIterator<Item = SafeBrowsingProvider>,
    {
        self.providers = providers
            .into_iter()
            .map(|p| (p.name().to_string(), p))
            .collect();
        self
    }

    /// Providers ordered by name.
    pub fn safe_browsing_providers(&self) -> impl Iterator<Item = &SafeBrowsingProvider> {
        self.providers.values()
    }

    pub fn safe_browsing_provider(&self, name: &str) -> Option<&SafeBrowsingProvider> {
        self.providers.get(name)
    }

    // =========================================================================
    // Cookies
    // =========================================================================

    pub fn set_cookie_behavior(&mut self, behavior: CookieBehavior) -> &mut Self {
        self.cookie_behavior = behavior;
        self
    }

    pub fn cookie_behavior(&self) -> CookieBehavior {
        self.cookie_behavior
    }

    pub fn set_cookie_behavior_private_mode(&mut self, behavior: CookieBehavior) -> &mut Self {
        self.cookie_behavior_private = behavior;
        self
    }

    pub fn cookie_behavior_private_mode(&self) -> CookieBehavior {
        self.cookie_behavior_private
    }

    pub fn set_cookie_purging(&mut self, enabled: bool) -> &mut Self {
        self.cookie_purging = enabled;
        self
    }

    pub fn cookie_purging(&self) -> bool {
        self.cookie_purging
    }

    // =========================================================================
    // Cookie Banner Handling
    // =========================================================================

    pub fn set_cookie_banner_mode(&mut self, mode: CookieBannerMode) -> &mut Self {
        self.cookie_banner_mode = mode;
        self
    }

    pub fn cookie_banner_mode(&self) -> CookieBannerMode {
        self.cookie_banner_mode
    }

    pub fn set_cookie_banner_mode_private_browsing(&mut self, mode: CookieBannerMode) -> &mut Self {
        self.cookie_banner_mode_private = mode;
        self
    }

    pub fn cookie_banner_mode_private_browsing(&self) -> CookieBannerMode {
        self.cookie_banner_mode_private
    }

    pub fn set_cookie_banner_detect_only_mode(&mut self, enabled: bool) -> &mut Self {
        self.cookie_banner_detect_only = enabled;
        self
    }

    pub fn cookie_banner_detect_only_mode(&self) -> bool {
        self.cookie_banner_detect_only
    }

    pub fn set_cookie_banner_global_rules_enabled(&mut self, enabled: bool) -> &mut Self {
        self.cookie_banner_global_rules = enabled;
        self
    }

    pub fn cookie_banner_global_rules_enabled(&self) -> bool {
        self.cookie_banner_global_rules
    }

    pub fn set_cookie_banner_global_rules_sub_frames_enabled(&mut self, enabled: bool) -> &mut Self {
        self.cookie_banner_global_rules_sub_frames = enabled;
        self
    }

    pub fn cookie_banner_global_rules_sub_frames_enabled(&self) -> bool {
        self.cookie_banner_global_rules_sub_frames
    }

    // =========================================================================
    // Query Parameter Stripping
    // =========================================================================

    pub fn set_query_parameter_stripping_enabled(&mut self, enabled: bool) -> &mut Self {
        self.query_stripping = enabled;
        self
    }

    pub fn query_parameter_stripping_enabled(&self) -> bool {
        self.query_stripping
    }

    pub fn set_query_parameter_stripping_private_browsing_enabled(
        &mut self,
        enabled: bool,
    ) -> &mut Self {
        self.query_stripping_private = enabled;
        self
    }

    pub fn query_parameter_stripping_private_browsing_enabled(&self) -> bool {
        self.query_stripping_private
    }

    pub fn set_query_parameter_stripping_allow_list<S: AsRef<str>>(
        &mut self,
        list: &[S],
    ) -> Result<&mut Self, SettingsError> {
        self.query_stripping_allow_list = lists_to_pref(list)?;
        Ok(self)
    }

    pub fn query_parameter_stripping_allow_list(&self) -> Vec<String> {
        pref_to_lists(Some(self.query_stripping_allow_list.as_str()))
    }

    pub fn set_query_parameter_stripping_strip_list<S: AsRef<str>>(
        &mut self,
        list: &[S],
    ) -> Result<&mut Self, SettingsError> {
        self.query_stripping_strip_list = lists_to_pref(list)?;
        Ok(self)
    }

    pub fn query_parameter_stripping_strip_list(&self) -> Vec<String> {
        pref_to_lists(Some(self.query_stripping_strip_list.as_str()))
    }

    // =========================================================================
    // Bounce Tracking Protection
    // =========================================================================

    pub fn set_bounce_tracking_protection_mode(
        &mut self,
        mode: BounceTrackingProtectionMode,
    ) -> &mut Self {
        self.bounce_tracking_mode = mode;
        self
    }

    pub fn bounce_tracking_protection_mode(&self) -> BounceTrackingProtectionMode {
        self.bounce_tracking_mode
    }

    // =========================================================================
    // Preferences
    // =========================================================================

    /// Every preference this node maps to, provider keys included.
    pub fn to_prefs(&self) -> BTreeMap<String, PrefValue> {
        let mut prefs = BTreeMap::new();
        let mut put = |key: &str, value: PrefValue| {
            prefs.insert(key.to_string(), value);
        };

        put(keys::TRACKING_TABLE, self.tracking_table.as_str().into());
        put(keys::CRYPTOMINING_ENABLED, self.cryptomining.into());
        put(keys::CRYPTOMINING_TABLES, self.cryptomining_tables.as_str().into());
        put(keys::FINGERPRINTING_ENABLED, self.fingerprinting.into());
        put(keys::FINGERPRINTING_TABLES, self.fingerprinting_tables.as_str().into());
        put(keys::SOCIAL_TRACKING_COOKIES, self.social_tracking_cookies.into());
        put(keys::SOCIAL_TRACKING_STRICT, self.social_tracking_strict.into());
        put(keys::SOCIAL_TRACKING_TABLES, self.social_tracking_tables.as_str().into());
        put(keys::EMAIL_TRACKING_ENABLED, self.email_tracking.into());
        put(keys::EMAIL_TRACKING_PRIVATE, self.email_tracking_private.into());
        put(keys::EMAIL_TRACKING_TABLES, self.email_tracking_tables.as_str().into());

        put(keys::SAFE_BROWSING_MALWARE, self.safe_browsing_malware.into());
        put(keys::SAFE_BROWSING_PHISHING, self.safe_browsing_phishing.into());
        put(keys::MALWARE_TABLE, self.malware_table.as_str().into());
        put(keys::PHISHING_TABLE, self.phishing_table.as_str().into());

        put(keys::COOKIE_BEHAVIOR, self.cookie_behavior.as_raw().into());
        put(keys::COOKIE_BEHAVIOR_PRIVATE, self.cookie_behavior_private.as_raw().into());
        put(keys::COOKIE_PURGING, self.cookie_purging.into());

        put(keys::ETP_ENABLED, self.etp_enabled.into());
        put(keys::ETP_STRICT, self.etp_strict.into());
        put(keys::ETP_CATEGORY, self.etp_category.as_str().into());
        put(keys::ALLOW_LIST_BASELINE, self.allow_list_baseline.into());
        put(keys::ALLOW_LIST_CONVENIENCE, self.allow_list_convenience.into());

        put(keys::COOKIE_BANNER_MODE, self.cookie_banner_mode.as_raw().into());
        put(keys::COOKIE_BANNER_MODE_PRIVATE, self.cookie_banner_mode_private.as_raw().into());
        put(keys::COOKIE_BANNER_DETECT_ONLY, self.cookie_banner_detect_only.into());
        put(keys::COOKIE_BANNER_GLOBAL_RULES, self.cookie_banner_global_rules.into());
        put(
            keys::COOKIE_BANNER_GLOBAL_RULES_SUB_FRAMES,
            self.cookie_banner_global_rules_sub_frames.into(),
        );

        put(keys::QUERY_STRIPPING, self.query_stripping.into());
        put(keys::QUERY_STRIPPING_PRIVATE, self.query_stripping_private.into());
        put(keys::QUERY_STRIPPING_ALLOW_LIST, self.query_stripping_allow_list.as_str().into());
        put(keys::QUERY_STRIPPING_STRIP_LIST, self.query_stripping_strip_list.as_str().into());

        put(keys::BOUNCE_TRACKING_MODE, self.bounce_tracking_mode.as_raw().into());

        for provider in self.providers.values() {
            prefs.extend(provider.prefs());
        }
        prefs
    }

    /// Write every preference into `store`.
    pub fn write_prefs(&self, store: &mut impl PrefStore) {
        for (key, value) in self.to_prefs() {
            store.set(&key, value);
        }
    }

    /// Load values from `store`.
    ///
    /// Missing keys and values of the wrong type keep the current value.
    /// Unknown mode integers degrade to their disabled mode. Provider
    /// records are not read back.
    pub fn read_prefs(&mut self, store: &impl PrefStore) {
        read_string(store, keys::TRACKING_TABLE, &mut self.tracking_table);
        read_bool(store, keys::CRYPTOMINING_ENABLED, &mut self.cryptomining);
        read_string(store, keys::CRYPTOMINING_TABLES, &mut self.cryptomining_tables);
        read_bool(store, keys::FINGERPRINTING_ENABLED, &mut self.fingerprinting);
        read_string(store, keys::FINGERPRINTING_TABLES, &mut self.fingerprinting_tables);
        read_bool(store, keys::SOCIAL_TRACKING_COOKIES, &mut self.social_tracking_cookies);
        read_bool(store, keys::SOCIAL_TRACKING_STRICT, &mut self.social_tracking_strict);
        read_string(store, keys::SOCIAL_TRACKING_TABLES, &mut self.social_tracking_tables);
        read_bool(store, keys::EMAIL_TRACKING_ENABLED, &mut self.email_tracking);
        read_bool(store, keys::EMAIL_TRACKING_PRIVATE, &mut self.email_tracking_private);
        read_string(store, keys::EMAIL_TRACKING_TABLES, &mut self.email_tracking_tables);

        read_bool(store, keys::SAFE_BROWSING_MALWARE, &mut self.safe_browsing_malware);
        read_bool(store, keys::SAFE_BROWSING_PHISHING, &mut self.safe_browsing_phishing);
        read_string(store, keys::MALWARE_TABLE, &mut self.malware_table);
        read_string(store, keys::PHISHING_TABLE, &mut self.phishing_table);

        read_cookie_behavior(store, keys::COOKIE_BEHAVIOR, &mut self.cookie_behavior);
        read_cookie_behavior(store, keys::COOKIE_BEHAVIOR_PRIVATE, &mut self.cookie_behavior_private);
        read_bool(store, keys::COOKIE_PURGING, &mut self.cookie_purging);

        read_bool(store, keys::ETP_ENABLED, &mut self.etp_enabled);
        read_bool(store, keys::ETP_STRICT, &mut self.etp_strict);
        read_string(store, keys::ETP_CATEGORY, &mut self.etp_category);
        read_bool(store, keys::ALLOW_LIST_BASELINE, &mut self.allow_list_baseline);
        read_bool(store, keys::ALLOW_LIST_CONVENIENCE, &mut self.allow_list_convenience);

        if let Some(raw) = read_int(store, keys::COOKIE_BANNER_MODE) {
            self.cookie_banner_mode = CookieBannerMode::from_raw(raw);
        }
        if let Some(raw) = read_int(store, keys::COOKIE_BANNER_MODE_PRIVATE) {
            self.cookie_banner_mode_private = CookieBannerMode::from_raw(raw);
        }
        read_bool(store, keys::COOKIE_BANNER_DETECT_ONLY, &mut self.cookie_banner_detect_only);
        read_bool(store, keys::COOKIE_BANNER_GLOBAL_RULES, &mut self.cookie_banner_global_rules);
        read_bool(
            store,
            keys::COOKIE_BANNER_GLOBAL_RULES_SUB_FRAMES,
            &mut self.cookie_banner_global_rules_sub_frames,
        );

        read_bool(store, keys::QUERY_STRIPPING, &mut self.query_stripping);
        read_bool(store, keys::QUERY_STRIPPING_PRIVATE, &mut self.query_stripping_private);
        read_string(store, keys::QUERY_STRIPPING_ALLOW_LIST, &mut self.query_stripping_allow_list);
        read_string(store, keys::QUERY_STRIPPING_STRIP_LIST, &mut self.query_stripping_strip_list);

        if let Some(raw) = read_int(store, keys::BOUNCE_TRACKING_MODE) {
            self.bounce_tracking_mode = BounceTrackingProtectionMode::from_raw(raw);
        }
    }
}

fn read_bool(store: &impl PrefStore, key: &str, field: &mut bool) {
    if let Some(value) = store.get(key).and_then(|v| v.as_bool()) {
        *field = value;
    }
}

fn read_string(store: &impl PrefStore, key: &str, field: &mut String) {
    if let Some(PrefValue::Str(value)) = store.get(key) {
        *field = value;
    }
}

fn read_int(store: &impl PrefStore, key: &str) -> Option<i32> {
    store.get(key).and_then(|v| v.as_int())
}

fn read_cookie_behavior(store: &impl PrefStore, key: &str, field: &mut CookieBehavior) {
    if let Some(raw) = read_int(store, key) {
        match CookieBehavior::try_from(raw) {
            Ok(behavior) => *field = behavior,
            Err(()) => log::warn!("ignoring unknown cookie behavior {raw} for {key}"),
        }
    }
}

// =============================================================================
// Overrides
// =============================================================================

/// Provider record as it appears in an overrides document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProviderOverride {
    pub name: String,
    pub version: Option<String>,
    pub lists: Vec<String>,
    pub update_url: Option<String>,
    pub get_hash_url: Option<String>,
    pub report_url: Option<String>,
    pub report_phishing_mistake_url: Option<String>,
    pub report_malware_mistake_url: Option<String>,
    pub advisory_url: Option<String>,
    pub advisory_name: Option<String>,
    pub data_sharing_url: Option<String>,
    pub data_sharing_enabled: bool,
}

impl ProviderOverride {
    /// Validate into a provider record.
    pub fn to_provider(&self) -> Result<SafeBrowsingProvider, SettingsError> {
        let mut provider = SafeBrowsingProvider::new(self.name.as_str())?
            .with_lists(&self.lists)?
            .with_data_sharing_enabled(self.data_sharing_enabled);

        if let Some(v) = &self.version {
            provider = provider.with_version(v.as_str());
        }
        if let Some(v) = &self.update_url {
            provider = provider.with_update_url(v.as_str());
        }
        if let Some(v) = &self.get_hash_url {
            provider = provider.with_get_hash_url(v.as_str());
        }
        if let Some(v) = &self.report_url {
            provider = provider.with_report_url(v.as_str());
        }
        if let Some(v) = &self.report_phishing_mistake_url {
            provider = provider.with_report_phishing_mistake_url(v.as_str());
        }
        if let Some(v) = &self.report_malware_mistake_url {
            provider = provider.with_report_malware_mistake_url(v.as_str());
        }
        if let Some(v) = &self.advisory_url {
            provider = provider.with_advisory_url(v.as_str());
        }
        if let Some(v) = &self.advisory_name {
            provider = provider.with_advisory_name(v.as_str());
        }
        if let Some(v) = &self.data_sharing_url {
            provider = provider.with_data_sharing_url(v.as_str());
        }
        Ok(provider)
    }
}

/// A set of field overrides. Unset fields leave the target unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SettingsOverrides {
    pub anti_tracking: Option<AntiTracking>,
    pub strict_social_tracking_protection: Option<bool>,
    pub email_tracker_blocking_private_browsing: Option<bool>,
    pub enhanced_tracking_protection_level: Option<EtpLevel>,
    pub enhanced_tracking_protection_category: Option<EtpCategory>,
    pub allow_list_baseline_tracking_protection: Option<bool>,
    pub allow_list_convenience_tracking_protection: Option<bool>,
    pub safe_browsing: Option<SafeBrowsing>,
    pub safe_browsing_malware_table: Option<Vec<String>>,
    pub safe_browsing_phishing_table: Option<Vec<String>>,
    pub safe_browsing_providers: Option<Vec<ProviderOverride>>,
    pub cookie_behavior: Option<CookieBehavior>,
    pub cookie_behavior_private_mode: Option<CookieBehavior>,
    pub cookie_purging: Option<bool>,
    pub cookie_banner_mode: Option<CookieBannerMode>,
    pub cookie_banner_mode_private_browsing: Option<CookieBannerMode>,
    pub cookie_banner_detect_only_mode: Option<bool>,
    pub cookie_banner_global_rules_enabled: Option<bool>,
    pub cookie_banner_global_rules_sub_frames_enabled: Option<bool>,
    pub query_parameter_stripping_enabled: Option<bool>,
    pub query_parameter_stripping_private_browsing_enabled: Option<bool>,
    pub query_parameter_stripping_allow_list: Option<Vec<String>>,
    pub query_parameter_stripping_strip_list: Option<Vec<String>>,
    pub bounce_tracking_protection_mode: Option<BounceTrackingProtectionMode>,
}

impl SettingsOverrides {
    fn apply_to(&self, s: &mut Settings) -> Result<(), SettingsError> {
        if let Some(cat) = self.anti_tracking {
            s.set_anti_tracking(cat);
        }
        if let Some(v) = self.strict_social_tracking_protection {
            s.set_strict_social_tracking_protection(v);
        }
        if let Some(v) = self.email_tracker_blocking_private_browsing {
            s.set_email_tracker_blocking_private_browsing(v);
        }
        if let Some(level) = self.enhanced_tracking_protection_level {
            s.set_enhanced_tracking_protection_level(level);
        }
        if let Some(category) = self.enhanced_tracking_protection_category {
            s.set_enhanced_tracking_protection_category(category);
        }
        if let Some(v) = self.allow_list_baseline_tracking_protection {
            s.set_allow_list_baseline_tracking_protection(v);
        }
        if let Some(v) = self.allow_list_convenience_tracking_protection {
            s.set_allow_list_convenience_tracking_protection(v);
        }
        if let Some(cat) = self.safe_browsing {
            s.set_safe_browsing(cat);
        }
        if let Some(table) = &self.safe_browsing_malware_table {
            s.set_safe_browsing_malware_table(table)?;
        }
        if let Some(table) = &self.safe_browsing_phishing_table {
            s.set_safe_browsing_phishing_table(table)?;
        }
        if let Some(providers) = &self.safe_browsing_providers {
            let providers = providers
                .iter()
                .map(ProviderOverride::to_provider)
                .collect::<Result<Vec<_>, _>>()?;
            s.set_safe_browsing_providers(providers);
        }
        if let Some(behavior) = self.cookie_behavior {
            s.set_cookie_behavior(behavior);
        }
        if let Some(behavior) = self.cookie_behavior_private_mode {
            s.set_cookie_behavior_private_mode(behavior);
        }
        if let Some(v) = self.cookie_purging {
            s.set_cookie_purging(v);
        }
        if let Some(mode) = self.cookie_banner_mode {
            s.set_cookie_banner_mode(mode);
        }
        if let Some(mode) = self.cookie_banner_mode_private_browsing {
            s.set_cookie_banner_mode_private_browsing(mode);
        }
        if let Some(v) = self.cookie_banner_detect_only_mode {
            s.set_cookie_banner_detect_only_mode(v);
        }
        if let Some(v) = self.cookie_banner_global_rules_enabled {
            s.set_cookie_banner_global_rules_enabled(v);
        }
        if let Some(v) = self.cookie_banner_global_rules_sub_frames_enabled {
            s.set_cookie_banner_global_rules_sub_frames_enabled(v);
        }
        if let Some(v) = self.query_parameter_stripping_enabled {
            s.set_query_parameter_stripping_enabled(v);
        }
        if let Some(v) = self.query_parameter_stripping_private_browsing_enabled {
            s.set_query_parameter_stripping_private_browsing_enabled(v);
        }
        if let Some(list) = &self.query_parameter_stripping_allow_list {
            s.set_query_parameter_stripping_allow_list(list)?;
        }
        if let Some(list) = &self.query_parameter_stripping_strip_list {
            s.set_query_parameter_stripping_strip_list(list)?;
        }
        if let Some(mode) = self.bounce_tracking_protection_mode {
            s.set_bounce_tracking_protection_mode(mode);
        }

        log::debug!("applied settings overrides");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefs::MemoryPrefStore;

    fn root() -> Settings {
        Settings::new(Arc::new(Taxonomy::standard().expect("standard taxonomy")))
    }

    #[test]
    fn defaults() {
        let settings = root();
        assert_eq!(settings.anti_tracking_categories(), AntiTracking::DEFAULT);
        assert_eq!(settings.safe_browsing_categories(), SafeBrowsing::DEFAULT);
        assert_eq!(
            settings.cookie_behavior(),
            CookieBehavior::AcceptFirstPartyAndIsolateOthers
        );
        assert_eq!(settings.enhanced_tracking_protection_level(), EtpLevel::None);
        assert_eq!(
            settings.enhanced_tracking_protection_category(),
            EtpCategory::Standard
        );
        assert_eq!(settings.cookie_banner_mode(), CookieBannerMode::Disabled);
        assert_eq!(
            settings.cookie_banner_mode_private_browsing(),
            CookieBannerMode::Reject
        );
        assert!(settings.allow_list_baseline_tracking_protection());
        assert!(!settings.cookie_purging());
        assert!(settings.query_parameter_stripping_allow_list().is_empty());

        let names: Vec<&str> = settings.safe_browsing_providers().map(|p| p.name()).collect();
        assert_eq!(names, ["google", "google4"]);
    }

    #[test]
    fn derived_child_does_not_see_later_source_changes() {
        let mut root = root();
        root.set_cookie_purging(false);
        let child = Settings::derive_from(&root);

        root.set_cookie_purging(true);
        assert!(!child.cookie_purging());
        assert!(root.cookie_purging());
    }

    #[test]
    fn derived_child_mutation_stays_local() {
        let root = root();
        let mut child = Settings::derive_from(&root);
        child
            .set_anti_tracking(AntiTracking::STRICT)
            .set_cookie_behavior(CookieBehavior::AcceptNone)
            .set_safe_browsing_providers(Vec::new());

        assert_eq!(root.anti_tracking_categories(), AntiTracking::DEFAULT);
        assert_eq!(
            root.cookie_behavior(),
            CookieBehavior::AcceptFirstPartyAndIsolateOthers
        );
        assert_eq!(root.safe_browsing_providers().count(), 2);
        assert_eq!(child.safe_browsing_providers().count(), 0);
    }

    #[test]
    fn derive_copies_every_field() {
        let mut source = root();
        source
            .set_anti_tracking(AntiTracking::STRICT | AntiTracking::STP)
            .set_cookie_banner_mode(CookieBannerMode::RejectOrAccept)
            .set_bounce_tracking_protection_mode(BounceTrackingProtectionMode::EnabledDryRun)
            .set_enhanced_tracking_protection_level(EtpLevel::Strict);
        source
            .set_query_parameter_stripping_strip_list(&["utm_source", "fbclid"])
            .expect("valid list");

        let child = Settings::derive_from(&source);
        assert_eq!(child, source);
        assert_eq!(child.to_prefs(), source.to_prefs());
    }

    #[test]
    fn independent_roots_do_not_alias() {
        let mut a = root();
        let b = root();
        a.set_safe_browsing(SafeBrowsing::empty())
            .set_query_parameter_stripping_enabled(true);
        assert_eq!(b.safe_browsing_categories(), SafeBrowsing::DEFAULT);
        assert!(!b.query_parameter_stripping_enabled());
    }

    #[test]
    fn anti_tracking_updates_feature_toggles() {
        let mut settings = root();
        settings.set_anti_tracking(AntiTracking::AD | AntiTracking::CRYPTOMINING | AntiTracking::EMAIL);
        let prefs = settings.to_prefs();

        assert_eq!(
            prefs[keys::TRACKING_TABLE],
            PrefValue::Str("ads-track-digest256".to_string())
        );
        assert_eq!(prefs[keys::CRYPTOMINING_ENABLED], PrefValue::Bool(true));
        assert_eq!(prefs[keys::FINGERPRINTING_ENABLED], PrefValue::Bool(false));
        assert_eq!(prefs[keys::EMAIL_TRACKING_ENABLED], PrefValue::Bool(true));
        assert_eq!(prefs[keys::FINGERPRINTING_TABLES], PrefValue::Str(String::new()));
        assert_eq!(
            settings.anti_tracking_categories(),
            AntiTracking::AD | AntiTracking::CRYPTOMINING | AntiTracking::EMAIL
        );

        settings.set_anti_tracking(AntiTracking::empty());
        assert_eq!(settings.anti_tracking_categories(), AntiTracking::empty());
    }

    #[test]
    fn safe_browsing_round_trip() {
        let mut settings = root();
        settings.set_safe_browsing(SafeBrowsing::UNWANTED);
        assert_eq!(
            settings.safe_browsing_categories(),
            SafeBrowsing::MALWARE | SafeBrowsing::UNWANTED | SafeBrowsing::HARMFUL
        );
        settings.set_safe_browsing(SafeBrowsing::PHISHING);
        assert_eq!(settings.safe_browsing_categories(), SafeBrowsing::PHISHING);
    }

    #[test]
    fn etp_level_prefers_strict() {
        let mut settings = root();
        settings.set_enhanced_tracking_protection_level(EtpLevel::Default);
        assert_eq!(settings.enhanced_tracking_protection_level(), EtpLevel::Default);
        settings.set_enhanced_tracking_protection_level(EtpLevel::Strict);
        assert_eq!(settings.enhanced_tracking_protection_level(), EtpLevel::Strict);
        let prefs = settings.to_prefs();
        assert_eq!(prefs[keys::ETP_ENABLED], PrefValue::Bool(true));
        assert_eq!(prefs[keys::ETP_STRICT], PrefValue::Bool(true));
        settings.set_enhanced_tracking_protection_level(EtpLevel::None);
        assert_eq!(settings.enhanced_tracking_protection_level(), EtpLevel::None);
    }

    #[test]
    fn list_setters_reject_separator() {
        let mut settings = root();
        let before = settings.clone();
        let err = settings
            .set_safe_browsing_phishing_table(&["a,b"])
            .unwrap_err();
        assert!(matches!(err, SettingsError::InvalidList(CodecError::InvalidToken(_))));
        assert_eq!(settings, before);
    }

    #[test]
    fn providers_are_replaced_not_merged() {
        let mut settings = root();
        let corp = SafeBrowsingProvider::new("corp").expect("name is free");
        settings.set_safe_browsing_providers([corp]);
        let names: Vec<&str> = settings.safe_browsing_providers().map(|p| p.name()).collect();
        assert_eq!(names, ["corp"]);
        assert!(settings.safe_browsing_provider("google").is_none());
    }

    #[test]
    fn overrides_from_json() {
        let overrides: SettingsOverrides = serde_json::from_str(
            r#"{
                "anti_tracking": "AD | SOCIAL",
                "cookie_behavior": "accept_non_trackers",
                "cookie_banner_mode": "reject_or_accept",
                "enhanced_tracking_protection_category": "strict",
                "query_parameter_stripping_strip_list": ["utm_source", "gclid"],
                "safe_browsing_providers": [{ "name": "corp", "version": "4", "lists": ["corp-phish"] }]
            }"#,
        )
        .expect("valid overrides");

        let root = root();
        let child = root.with_overrides(&overrides).expect("overrides apply");

        assert_eq!(
            child.anti_tracking_categories(),
            AntiTracking::AD | AntiTracking::SOCIAL
        );
        assert_eq!(child.cookie_behavior(), CookieBehavior::AcceptNonTrackers);
        assert_eq!(child.cookie_banner_mode(), CookieBannerMode::RejectOrAccept);
        assert_eq!(
            child.enhanced_tracking_protection_category(),
            EtpCategory::Strict
        );
        assert_eq!(
            child.query_parameter_stripping_strip_list(),
            ["utm_source", "gclid"]
        );
        assert_eq!(
            child.safe_browsing_provider("corp").and_then(|p| p.version()),
            Some("4")
        );
        // Untouched fields keep the source values.
        assert_eq!(child.safe_browsing_categories(), SafeBrowsing::DEFAULT);
        assert_eq!(root.anti_tracking_categories(), AntiTracking::DEFAULT);
    }

    #[test]
    fn rejected_overrides_leave_settings_unchanged() {
        let overrides: SettingsOverrides = serde_json::from_str(
            r#"{ "cookie_purging": true, "safe_browsing_providers": [{ "name": "mozilla" }] }"#,
        )
        .expect("valid document");

        let mut settings = root();
        let before = settings.clone();
        let err = settings.apply_overrides(&overrides).unwrap_err();
        assert_eq!(err, SettingsError::ReservedProviderName("mozilla".to_string()));
        assert_eq!(settings, before);
    }

    #[test]
    fn unknown_override_fields_are_rejected() {
        let result: Result<SettingsOverrides, _> = serde_json::from_str(r#"{ "cookie_purge": true }"#);
        assert!(result.is_err());
    }

    #[test]
    fn prefs_round_trip_through_store() {
        let mut source = root();
        source
            .set_anti_tracking(AntiTracking::STRICT)
            .set_cookie_behavior_private_mode(CookieBehavior::AcceptNone)
            .set_cookie_banner_global_rules_enabled(true)
            .set_bounce_tracking_protection_mode(BounceTrackingProtectionMode::Enabled);

        let mut store = MemoryPrefStore::new();
        source.write_prefs(&mut store);
        assert!(store.get("browser.safebrowsing.provider.google4.pver").is_some());

        let mut loaded = root();
        loaded.read_prefs(&store);
        assert_eq!(loaded, source);
    }

    #[test]
    fn read_prefs_degrades_bad_values() {
        let mut store = MemoryPrefStore::new();
        store.set(keys::COOKIE_BANNER_MODE, PrefValue::Int(42));
        store.set(keys::BOUNCE_TRACKING_MODE, PrefValue::Int(-1));
        store.set(keys::COOKIE_BEHAVIOR, PrefValue::Int(9));
        store.set(keys::COOKIE_PURGING, PrefValue::Str("yes".to_string()));
        store.set(keys::ETP_CATEGORY, PrefValue::Str("experimental".to_string()));

        let mut settings = root();
        settings.set_cookie_banner_mode(CookieBannerMode::Reject);
        settings.read_prefs(&store);

        assert_eq!(settings.cookie_banner_mode(), CookieBannerMode::Disabled);
        assert_eq!(
            settings.bounce_tracking_protection_mode(),
            BounceTrackingProtectionMode::Disabled
        );
        assert_eq!(
            settings.cookie_behavior(),
            CookieBehavior::AcceptFirstPartyAndIsolateOthers
        );
        assert!(!settings.cookie_purging());
        assert_eq!(
            settings.enhanced_tracking_protection_category(),
            EtpCategory::Custom
        );
    }
}
