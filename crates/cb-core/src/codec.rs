//! List-string codec
//!
//! The filtering engine takes its list configuration as comma-separated
//! list identifiers. A [`TokenTable`] maps each category of a flag set to
//! the token that names it in such a list, and converts in both directions.

use bitflags::Flags;

/// Separator between list identifiers in a list string.
pub const SEPARATOR: char = ',';

/// Error type for token table construction and list encoding.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    #[error("Invalid list token: {0:?}")]
    InvalidToken(String),
    #[error("Token {0:?} is mapped to more than one category")]
    DuplicateToken(String),
}

/// One category and its token string.
#[derive(Debug, Clone, PartialEq, Eq)]
struct TokenEntry<F> {
    category: F,
    token: String,
}

/// Validated category to token mapping.
///
/// Entry order is the canonical encoding order. A category may be backed by
/// several list identifiers; they are joined into one token string and
/// matched as a whole when decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenTable<F> {
    entries: Vec<TokenEntry<F>>,
}

impl<F: Flags + Copy> TokenTable<F> {
    /// Build a table from `(category, list ids)` pairs.
    pub fn new<I, L, S>(entries: I) -> Result<Self, CodecError>
    where
        I: IntoIterator<Item = (F, L)>,
        L: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut table = Vec::new();

        for (category, ids) in entries {
            let ids: Vec<S> = ids.into_iter().collect();
            let token = lists_to_pref(&ids)?;
            if token.is_empty() {
                return Err(CodecError::InvalidToken(token));
            }
            if table.iter().any(|e: &TokenEntry<F>| e.token == token) {
                return Err(CodecError::DuplicateToken(token));
            }
            table.push(TokenEntry { category, token });
        }

        log::debug!("built token table with {} entries", table.len());
        Ok(Self { entries: table })
    }

    /// Table with no entries; encodes to `""` and decodes to nothing.
    pub fn empty() -> Self {
        Self { entries: Vec::new() }
    }

    /// Build a table where every category has exactly one list id.
    pub fn single<I, S>(entries: I) -> Result<Self, CodecError>
    where
        I: IntoIterator<Item = (F, S)>,
        S: AsRef<str>,
    {
        Self::new(entries.into_iter().map(|(category, id)| (category, [id])))
    }

    /// Encode the categories of `flags` that this table knows about.
    pub fn encode(&self, flags: F) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            if flags.contains(entry.category) {
                if !out.is_empty() {
                    out.push(SEPARATOR);
                }
                out.push_str(&entry.token);
            }
        }
        out
    }

    /// Decode a list string.
    ///
    /// A category is set when its whole token string occurs anywhere in
    /// `list`. Unrecognized identifiers are ignored.
    pub fn decode(&self, list: Option<&str>) -> F {
        let mut flags = F::empty();
        let Some(list) = list else {
            return flags;
        };
        for entry in &self.entries {
            if list.contains(entry.token.as_str()) {
                flags.insert(entry.category);
            }
        }
        flags
    }

    /// Union of every category in the table.
    pub fn categories(&self) -> F {
        let mut flags = F::empty();
        for entry in &self.entries {
            flags.insert(entry.category);
        }
        flags
    }

    /// Token string for `category`, if the table maps it.
    pub fn token(&self, category: F) -> Option<&str>
    where
        F: PartialEq,
    {
        self.entries
            .iter()
            .find(|e| e.category == category)
            .map(|e| e.token.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Join free-form list identifiers into a list string.
pub fn lists_to_pref<S: AsRef<str>>(lists: &[S]) -> Result<String, CodecError> {
    let mut out = String::new();
    for (i, list) in lists.iter().enumerate() {
        let list = list.as_ref();
        if list.is_empty() || list.contains(SEPARATOR) {
            return Err(CodecError::InvalidToken(list.to_string()));
        }
        if i > 0 {
            out.push(SEPARATOR);
        }
        out.push_str(list);
    }
    Ok(out)
}

/// Split a stored list string into identifiers. Empty items are skipped.
pub fn pref_to_lists(pref: Option<&str>) -> Vec<String> {
    match pref {
        Some(pref) => pref
            .split(SEPARATOR)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AntiTracking;

    fn scenario_table() -> TokenTable<AntiTracking> {
        TokenTable::single([
            (AntiTracking::AD, "ads-track"),
            (AntiTracking::ANALYTIC, "analytics-track"),
            (AntiTracking::SOCIAL, "social-track"),
        ])
        .expect("valid table")
    }

    #[test]
    fn encodes_in_table_order() {
        let table = scenario_table();
        let flags = AntiTracking::SOCIAL | AntiTracking::AD;
        let encoded = table.encode(flags);
        assert_eq!(encoded, "ads-track,social-track");
        assert_eq!(table.decode(Some(encoded.as_str())), flags);
    }

    #[test]
    fn empty_flags_encode_to_empty_string() {
        assert_eq!(scenario_table().encode(AntiTracking::empty()), "");
    }

    #[test]
    fn categories_outside_table_are_ignored() {
        let table = scenario_table();
        assert_eq!(table.encode(AntiTracking::CONTENT | AntiTracking::AD), "ads-track");
    }

    #[test]
    fn unknown_tokens_decode_to_empty() {
        let table = scenario_table();
        assert_eq!(table.decode(Some("unknown-token-xyz")), AntiTracking::empty());
        assert_eq!(table.decode(Some("")), AntiTracking::empty());
        assert_eq!(table.decode(None), AntiTracking::empty());
    }

    #[test]
    fn decode_ignores_order_and_foreign_tokens() {
        let table = scenario_table();
        let decoded = table.decode(Some("vendor-list,social-track,ads-track"));
        assert_eq!(decoded, AntiTracking::AD | AntiTracking::SOCIAL);
        // Not an inverse: the foreign token is gone after re-encoding.
        assert_eq!(table.encode(decoded), "ads-track,social-track");
    }

    #[test]
    fn multi_id_entry_matches_only_as_a_whole() {
        let table = TokenTable::new([(AntiTracking::STP, ["stp-a", "stp-b"])]).expect("valid table");
        assert_eq!(table.token(AntiTracking::STP), Some("stp-a,stp-b"));
        assert_eq!(table.encode(AntiTracking::STP), "stp-a,stp-b");
        assert_eq!(table.decode(Some("x,stp-a,stp-b")), AntiTracking::STP);
        assert_eq!(table.decode(Some("stp-a")), AntiTracking::empty());
    }

    #[test]
    fn rejects_separator_in_token() {
        let err = TokenTable::single([(AntiTracking::AD, "ads,track")]).unwrap_err();
        assert_eq!(err, CodecError::InvalidToken("ads,track".to_string()));
    }

    #[test]
    fn rejects_empty_token() {
        let err = TokenTable::single([(AntiTracking::AD, "")]).unwrap_err();
        assert!(matches!(err, CodecError::InvalidToken(_)));

        let no_ids: [&str; 0] = [];
        let err = TokenTable::new([(AntiTracking::AD, no_ids)]).unwrap_err();
        assert!(matches!(err, CodecError::InvalidToken(_)));
    }

    #[test]
    fn rejects_token_shared_between_categories() {
        let err = TokenTable::single([(AntiTracking::AD, "same"), (AntiTracking::SOCIAL, "same")])
            .unwrap_err();
        assert_eq!(err, CodecError::DuplicateToken("same".to_string()));
    }

    #[test]
    fn table_categories_union() {
        let table = scenario_table();
        assert_eq!(
            table.categories(),
            AntiTracking::AD | AntiTracking::ANALYTIC | AntiTracking::SOCIAL
        );
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn lists_round_trip_through_pref() {
        let pref = lists_to_pref(&["goog-phish-proto", "moztest-phish-simple"]).expect("valid lists");
        assert_eq!(pref, "goog-phish-proto,moztest-phish-simple");
        assert_eq!(pref_to_lists(Some(pref.as_str())), vec!["goog-phish-proto", "moztest-phish-simple"]);
        assert_eq!(lists_to_pref::<&str>(&[]).expect("empty is fine"), "");
        assert!(pref_to_lists(Some("")).is_empty());
        assert!(pref_to_lists(None).is_empty());
    }

    #[test]
    fn lists_to_pref_rejects_separator() {
        assert!(matches!(
            lists_to_pref(&["ok", "bad,list"]),
            Err(CodecError::InvalidToken(t)) if t == "bad,list"
        ));
    }
}
