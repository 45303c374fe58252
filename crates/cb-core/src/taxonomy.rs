//! Anti-tracking list taxonomy
//!
//! The engine persists each anti-tracking feature under its own preference
//! with its own toggle, so the categories are split over five disjoint
//! token tables. [`Taxonomy`] bundles them; it is built once and shared
//! read-only by settings and the event classifier.

use crate::codec::{CodecError, TokenTable};
use crate::types::AntiTracking;

// =============================================================================
// Standard List Identifiers
// =============================================================================

pub const TEST_LIST: &str = "moztest-track-simple";
pub const AD_LIST: &str = "ads-track-digest256";
pub const ANALYTIC_LIST: &str = "analytics-track-digest256";
pub const SOCIAL_LIST: &str = "social-track-digest256";
pub const CONTENT_LIST: &str = "content-track-digest256";
pub const CRYPTOMINING_LIST: &str = "base-cryptomining-track-digest256";
pub const FINGERPRINTING_LIST: &str = "base-fingerprinting-track-digest256";
pub const STP_LISTS: [&str; 3] = [
    "social-tracking-protection-facebook-digest256",
    "social-tracking-protection-linkedin-digest256",
    "social-tracking-protection-twitter-digest256",
];
pub const EMAIL_LIST: &str = "base-email-track-digest256";

/// The five anti-tracking token tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Taxonomy {
    core: TokenTable<AntiTracking>,
    cryptomining: TokenTable<AntiTracking>,
    fingerprinting: TokenTable<AntiTracking>,
    social_tracking: TokenTable<AntiTracking>,
    email: TokenTable<AntiTracking>,
}

impl Taxonomy {
    /// Assemble a taxonomy from caller-provided tables.
    pub fn new(
        core: TokenTable<AntiTracking>,
        cryptomining: TokenTable<AntiTracking>,
        fingerprinting: TokenTable<AntiTracking>,
        social_tracking: TokenTable<AntiTracking>,
        email: TokenTable<AntiTracking>,
    ) -> Self {
        Self {
            core,
            cryptomining,
            fingerprinting,
            social_tracking,
            email,
        }
    }

    /// Taxonomy with the engine's standard list identifiers.
    pub fn standard() -> Result<Self, CodecError> {
        Ok(Self::new(
            TokenTable::single([
                (AntiTracking::TEST, TEST_LIST),
                (AntiTracking::AD, AD_LIST),
                (AntiTracking::ANALYTIC, ANALYTIC_LIST),
                (AntiTracking::SOCIAL, SOCIAL_LIST),
                (AntiTracking::CONTENT, CONTENT_LIST),
            ])?,
            TokenTable::single([(AntiTracking::CRYPTOMINING, CRYPTOMINING_LIST)])?,
            TokenTable::single([(AntiTracking::FINGERPRINTING, FINGERPRINTING_LIST)])?,
            TokenTable::new([(AntiTracking::STP, STP_LISTS)])?,
            TokenTable::single([(AntiTracking::EMAIL, EMAIL_LIST)])?,
        ))
    }

    pub fn encode_core(&self, cat: AntiTracking) -> String {
        self.core.encode(cat)
    }

    pub fn encode_cryptomining(&self, cat: AntiTracking) -> String {
        self.cryptomining.encode(cat)
    }

    pub fn encode_fingerprinting(&self, cat: AntiTracking) -> String {
        self.fingerprinting.encode(cat)
    }

    pub fn encode_social_tracking(&self, cat: AntiTracking) -> String {
        self.social_tracking.encode(cat)
    }

    pub fn encode_email(&self, cat: AntiTracking) -> String {
        self.email.encode(cat)
    }

    /// Decode the five per-feature lists and union the results.
    pub fn decode_lists(
        &self,
        core: Option<&str>,
        cryptomining: Option<&str>,
        fingerprinting: Option<&str>,
        social_tracking: Option<&str>,
        email: Option<&str>,
    ) -> AntiTracking {
        self.core.decode(core)
            | self.cryptomining.decode(cryptomining)
            | self.fingerprinting.decode(fingerprinting)
            | self.social_tracking.decode(social_tracking)
            | self.email.decode(email)
    }

    /// Classify a matched list string reported by the engine.
    ///
    /// Each table decodes the same input independently.
    pub fn classify_anti_tracking(&self, matched: Option<&str>) -> AntiTracking {
        self.decode_lists(matched, matched, matched, matched, matched)
    }
}
