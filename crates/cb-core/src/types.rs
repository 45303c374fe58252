//! Core type definitions for content blocking
//!
//! Category flag sets, cookie behaviors and the mode enums stored in
//! preferences. Bit and integer values match the ones the filtering engine
//! and existing host integrations already use.

use serde::{Deserialize, Serialize};

// =============================================================================
// Anti-Tracking Categories
// =============================================================================

bitflags::bitflags! {
    /// Anti-tracking categories.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct AntiTracking: u32 {
        /// Block advertisement trackers
        const AD = 1 << 1;
        /// Block analytics trackers
        const ANALYTIC = 1 << 2;
        /// Block social trackers (third-party social media widgets)
        const SOCIAL = 1 << 3;
        /// Block content trackers (may cause page breakage)
        const CONTENT = 1 << 4;
        /// Block the test tracker list
        const TEST = 1 << 5;
        /// Block cryptocurrency miners
        const CRYPTOMINING = 1 << 6;
        /// Block fingerprinting trackers
        const FINGERPRINTING = 1 << 7;
        /// Block social tracking cookies (social-tracking protection)
        const STP = 1 << 8;
        /// Block email trackers
        const EMAIL = 1 << 9;

        /// Default set: ads, analytics, social and test trackers
        const DEFAULT = Self::AD.bits()
            | Self::ANALYTIC.bits()
            | Self::SOCIAL.bits()
            | Self::TEST.bits();
        /// Strict set: default plus content, cryptomining, fingerprinting and email
        const STRICT = Self::DEFAULT.bits()
            | Self::CONTENT.bits()
            | Self::CRYPTOMINING.bits()
            | Self::FINGERPRINTING.bits()
            | Self::EMAIL.bits();
    }
}

// =============================================================================
// Safe Browsing Categories
// =============================================================================

bitflags::bitflags! {
    /// Safe Browsing categories.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct SafeBrowsing: u32 {
        /// Block malware sites
        const MALWARE = 1 << 10;
        /// Block unwanted software sites
        const UNWANTED = 1 << 11;
        /// Block harmful sites
        const HARMFUL = 1 << 12;
        /// Block phishing sites
        const PHISHING = 1 << 13;

        /// All Safe Browsing categories
        const DEFAULT = Self::MALWARE.bits()
            | Self::UNWANTED.bits()
            | Self::HARMFUL.bits()
            | Self::PHISHING.bits();
    }
}

// =============================================================================
// Raw Engine Status (nsIWebProgressListener state bits)
// =============================================================================

bitflags::bitflags! {
    /// Raw per-load status bits reported by the filtering engine.
    ///
    /// Several bits may be set for a single load. Unknown bits are retained.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct StatusFlags: u64 {
        const COOKIES_BLOCKED_FOREIGN = 0x80;
        const COOKIES_LOADED = 0x8000;
        const COOKIES_LOADED_TRACKER = 0x40000;
        const COOKIES_LOADED_SOCIALTRACKER = 0x80000;
        const COOKIES_BLOCKED_SOCIALTRACKER = 0x0100_0000;
        const COOKIES_BLOCKED_TRACKER = 0x2000_0000;
        const COOKIES_BLOCKED_ALL = 0x4000_0000;
    }
}

impl StatusFlags {
    /// Wrap a raw status code, keeping bits this crate has no name for.
    pub fn from_raw(code: u64) -> Self {
        Self::from_bits_retain(code)
    }
}

// =============================================================================
// Cookie Behavior
// =============================================================================

/// Cookie behavior (values synced with the engine's cookie service).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(i32)]
pub enum CookieBehavior {
    /// Accept first-party and third-party cookies and site data
    AcceptAll = 0,
    /// Accept only first-party cookies and site data
    AcceptFirstParty = 1,
    /// Do not store any cookies and site data
    AcceptNone = 2,
    /// Accept first-party cookies; third-party only from visited sites
    AcceptVisited = 3,
    /// Accept all cookies except those from known trackers
    AcceptNonTrackers = 4,
    /// Non-tracker behavior plus dynamic first-party isolation
    AcceptFirstPartyAndIsolateOthers = 5,
}

impl CookieBehavior {
    pub fn as_raw(self) -> i32 {
        self as i32
    }
}

impl TryFrom<i32> for CookieBehavior {
    type Error = ();

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::AcceptAll),
            1 => Ok(Self::AcceptFirstParty),
            2 => Ok(Self::AcceptNone),
            3 => Ok(Self::AcceptVisited),
            4 => Ok(Self::AcceptNonTrackers),
            5 => Ok(Self::AcceptFirstPartyAndIsolateOthers),
            _ => Err(()),
        }
    }
}

// =============================================================================
// Enhanced Tracking Protection
// =============================================================================

/// Enhanced Tracking Protection level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(i32)]
pub enum EtpLevel {
    None = 0,
    /// Channel annotation with the default list
    Default = 1,
    /// Channel annotation with the strict list
    Strict = 2,
}

/// Enhanced Tracking Protection category, as selected in the host UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(i32)]
pub enum EtpCategory {
    Standard = 0,
    Strict = 1,
    Custom = 2,
}

impl EtpCategory {
    /// Preference string for this category.
    pub fn as_pref_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Strict => "strict",
            Self::Custom => "custom",
        }
    }

    /// Parse a stored preference string. Anything unrecognized is `Custom`.
    pub fn from_pref_str(s: &str) -> Self {
        match s {
            "standard" => Self::Standard,
            "strict" => Self::Strict,
            _ => Self::Custom,
        }
    }
}

// =============================================================================
// Cookie Banner Handling
// =============================================================================

/// Cookie banner handling mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(i32)]
pub enum CookieBannerMode {
    /// Feature is off
    Disabled = 0,
    /// Only reject banners
    Reject = 1,
    /// Reject when possible, accept otherwise
    RejectOrAccept = 2,
}

impl CookieBannerMode {
    pub fn as_raw(self) -> i32 {
        self as i32
    }

    /// Decode a stored mode. Out-of-range values degrade to `Disabled`.
    pub fn from_raw(value: i32) -> Self {
        match value {
            1 => Self::Reject,
            2 => Self::RejectOrAccept,
            0 => Self::Disabled,
            other => {
                log::warn!("unknown cookie banner mode {other}, using disabled");
                Self::Disabled
            }
        }
    }
}

// =============================================================================
// Bounce Tracking Protection
// =============================================================================

/// Bounce tracking protection mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(i32)]
pub enum BounceTrackingProtectionMode {
    Disabled = 0,
    Enabled = 1,
    /// Collects candidates but never purges
    EnabledStandby = 2,
    /// Runs the full classification without purging
    EnabledDryRun = 3,
}

impl BounceTrackingProtectionMode {
    pub fn as_raw(self) -> i32 {
        self as i32
    }

    /// Decode a stored mode. Out-of-range values degrade to `Disabled`.
    pub fn from_raw(value: i32) -> Self {
        match value {
            1 => Self::Enabled,
            2 => Self::EnabledStandby,
            3 => Self::EnabledDryRun,
            0 => Self::Disabled,
            other => {
                log::warn!("unknown bounce tracking protection mode {other}, using disabled");
                Self::Disabled
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_is_superset_of_default() {
        assert!(AntiTracking::STRICT.contains(AntiTracking::DEFAULT));
        assert!(!AntiTracking::DEFAULT.contains(AntiTracking::CONTENT));
        assert!(!AntiTracking::STRICT.contains(AntiTracking::STP));
    }

    #[test]
    fn category_bits_do_not_overlap() {
        assert_eq!(AntiTracking::all().bits() & SafeBrowsing::all().bits(), 0);
    }

    #[test]
    fn cookie_behavior_raw_values() {
        for raw in 0..=5 {
            let behavior = CookieBehavior::try_from(raw).expect("known behavior");
            assert_eq!(behavior.as_raw(), raw);
        }
        assert_eq!(CookieBehavior::try_from(6), Err(()));
        assert_eq!(CookieBehavior::try_from(-1), Err(()));
    }

    #[test]
    fn unknown_modes_degrade_to_disabled() {
        assert_eq!(CookieBannerMode::from_raw(2), CookieBannerMode::RejectOrAccept);
        assert_eq!(CookieBannerMode::from_raw(7), CookieBannerMode::Disabled);
        assert_eq!(
            BounceTrackingProtectionMode::from_raw(3),
            BounceTrackingProtectionMode::EnabledDryRun
        );
        assert_eq!(
            BounceTrackingProtectionMode::from_raw(-4),
            BounceTrackingProtectionMode::Disabled
        );
    }

    #[test]
    fn etp_category_pref_strings() {
        assert_eq!(EtpCategory::from_pref_str("strict"), EtpCategory::Strict);
        assert_eq!(EtpCategory::from_pref_str("standard"), EtpCategory::Standard);
        assert_eq!(EtpCategory::from_pref_str("whatever"), EtpCategory::Custom);
        assert_eq!(EtpCategory::Custom.as_pref_str(), "custom");
    }

    #[test]
    fn status_flags_retain_unknown_bits() {
        let status = StatusFlags::from_raw(0x8000 | 0x1);
        assert!(status.contains(StatusFlags::COOKIES_LOADED));
        assert_eq!(status.bits(), 0x8001);
    }
}
