//! Category classification for engine reports
//!
//! Maps Safe Browsing toggles, engine error codes and raw cookie status bits
//! onto the public category types. Every function here is total: unknown
//! input classifies as the empty category (or `AcceptAll`), never an error.

use crate::types::{CookieBehavior, SafeBrowsing, StatusFlags};

// Error codes as defined by the engine's XPCOM error list.
pub const ERROR_PHISHING_URI: u64 = 0x805D_001F;
pub const ERROR_MALWARE_URI: u64 = 0x805D_001E;
pub const ERROR_UNWANTED_URI: u64 = 0x805D_0023;
pub const ERROR_HARMFUL_URI: u64 = 0x805D_0026;

const MALWARE_GROUP: SafeBrowsing = SafeBrowsing::MALWARE
    .union(SafeBrowsing::UNWANTED)
    .union(SafeBrowsing::HARMFUL);

const TRACKER_COOKIE_BITS: StatusFlags = StatusFlags::COOKIES_BLOCKED_TRACKER
    .union(StatusFlags::COOKIES_BLOCKED_SOCIALTRACKER)
    .union(StatusFlags::COOKIES_LOADED_TRACKER)
    .union(StatusFlags::COOKIES_LOADED_SOCIALTRACKER);

const BLOCKED_COOKIE_BITS: StatusFlags = StatusFlags::COOKIES_BLOCKED_TRACKER
    .union(StatusFlags::COOKIES_BLOCKED_SOCIALTRACKER)
    .union(StatusFlags::COOKIES_BLOCKED_ALL)
    .union(StatusFlags::COOKIES_BLOCKED_FOREIGN);

/// Categories covered by the two Safe Browsing toggles.
///
/// The malware toggle covers malware, unwanted and harmful together.
pub fn classify_safe_browsing(malware: bool, phishing: bool) -> SafeBrowsing {
    let mut cat = SafeBrowsing::empty();
    if malware {
        cat |= MALWARE_GROUP;
    }
    if phishing {
        cat |= SafeBrowsing::PHISHING;
    }
    cat
}

/// Whether `cat` requires the malware toggle.
pub fn malware_enabled(cat: SafeBrowsing) -> bool {
    cat.intersects(MALWARE_GROUP)
}

/// Whether `cat` requires the phishing toggle.
pub fn phishing_enabled(cat: SafeBrowsing) -> bool {
    cat.contains(SafeBrowsing::PHISHING)
}

/// Safe Browsing category for an engine error code.
pub fn classify_engine_error(error: u64) -> SafeBrowsing {
    match error {
        ERROR_PHISHING_URI => SafeBrowsing::PHISHING,
        ERROR_MALWARE_URI => SafeBrowsing::MALWARE,
        ERROR_UNWANTED_URI => SafeBrowsing::UNWANTED,
        ERROR_HARMFUL_URI => SafeBrowsing::HARMFUL,
        _ => SafeBrowsing::empty(),
    }
}

/// Cookie behavior responsible for a raw status report.
///
/// Rules are checked in order and the first match wins. The bits come
/// from several independent mechanisms, so with more than one set the
/// result leans towards the stricter behavior.
pub fn classify_cookie_status(status: StatusFlags) -> CookieBehavior {
    if status.contains(StatusFlags::COOKIES_LOADED) {
        // The policy that would have blocked this cookie is unknown.
        return CookieBehavior::AcceptNone;
    }
    if status.contains(StatusFlags::COOKIES_BLOCKED_FOREIGN) {
        return CookieBehavior::AcceptFirstParty;
    }
    if status.intersects(TRACKER_COOKIE_BITS) {
        return CookieBehavior::AcceptNonTrackers;
    }
    if status.contains(StatusFlags::COOKIES_BLOCKED_ALL) {
        return CookieBehavior::AcceptNone;
    }
    CookieBehavior::AcceptAll
}

/// Whether a report describes a blocked load.
///
/// Loaded-list matches alone do not make a report non-blocking.
pub fn is_blocking(status: StatusFlags, blocked_list_match: bool, had_error: bool) -> bool {
    blocked_list_match || had_error || status.intersects(BLOCKED_COOKIE_BITS)
}
