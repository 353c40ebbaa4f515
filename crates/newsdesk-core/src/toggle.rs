//! Disabled-source state carried in list addresses.
//!
//! The token is the sorted, comma-joined list of disabled source indices:
//! `/?disabled=0,2`. An empty set has no token and maps to the bare `/`.

use std::collections::BTreeSet;

use url::form_urlencoded;

/// Query parameter holding the toggle token
pub const DISABLED_PARAM: &str = "disabled";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToggleState {
    disabled: BTreeSet<usize>,
}

impl ToggleState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a toggle token. Components that are not non-negative integers
    /// are dropped; decoding itself never fails.
    pub fn decode(token: Option<&str>) -> Self {
        let disabled = token
            .unwrap_or("")
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit()))
            .filter_map(|part| part.parse::<usize>().ok())
            .collect();

        Self { disabled }
    }

    /// Read the `disabled` parameter from a raw query string (with or without the leading `?`)
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let token = form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == DISABLED_PARAM)
            .map(|(_, value)| value.into_owned());

        Self::decode(token.as_deref())
    }

    /// Sorted comma-joined indices, or `None` when nothing is disabled
    pub fn encode(&self) -> Option<String> {
        if self.disabled.is_empty() {
            return None;
        }

        let token = self
            .disabled
            .iter()
            .map(|index| index.to_string())
            .collect::<Vec<_>>()
            .join(",");

        Some(token)
    }

    /// List address for this state
    pub fn address(&self) -> String {
        match self.encode() {
            Some(token) => format!("/?{}={}", DISABLED_PARAM, token),
            None => "/".to_string(),
        }
    }

    /// Address of the state with `index` flipped
    pub fn toggle_link(&self, index: usize) -> String {
        self.toggled(index).address()
    }

    pub fn toggled(&self, index: usize) -> Self {
        let mut next = self.clone();
        if !next.disabled.remove(&index) {
            next.disabled.insert(index);
        }
        next
    }

    pub fn is_enabled(&self, index: usize) -> bool {
        !self.disabled.contains(&index)
    }

    pub fn disabled(&self) -> &BTreeSet<usize> {
        &self.disabled
    }

    pub fn is_empty(&self) -> bool {
        self.disabled.is_empty()
    }
}

impl FromIterator<usize> for ToggleState {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self {
            disabled: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_encode_symmetry() {
        let sets: [&[usize]; 4] = [&[], &[0], &[3, 1, 2], &[10, 0, 7, 7]];
        for set in sets {
            let state: ToggleState = set.iter().copied().collect();
            assert_eq!(ToggleState::decode(state.encode().as_deref()), state);
        }
    }

    #[test]
    fn test_encode_is_sorted_and_deduplicated() {
        let state: ToggleState = [5, 1, 5, 3].into_iter().collect();
        assert_eq!(state.encode().as_deref(), Some("1,3,5"));
    }

    #[test]
    fn test_empty_set_has_no_token() {
        let state = ToggleState::new();
        assert_eq!(state.encode(), None);
        assert_eq!(state.address(), "/");
        assert_eq!(ToggleState::decode(None), state);
        assert_eq!(ToggleState::decode(Some("")), state);
    }

    #[test]
    fn test_decode_discards_malformed_components() {
        let state = ToggleState::decode(Some("2,abc,-1,,+4, 0 ,1.5,3"));
        assert_eq!(state.encode().as_deref(), Some("0,2,3"));
    }

    #[test]
    fn test_toggle_link_round_trip() {
        let all_enabled = ToggleState::new();
        assert_eq!(all_enabled.toggle_link(0), "/?disabled=0");

        let zero_disabled = ToggleState::decode(Some("0"));
        assert_eq!(zero_disabled.toggle_link(0), "/");
        assert_eq!(zero_disabled.toggle_link(1), "/?disabled=0,1");
    }

    #[test]
    fn test_from_query() {
        assert_eq!(ToggleState::from_query("?disabled=1,0").encode().as_deref(), Some("0,1"));
        assert_eq!(ToggleState::from_query("disabled=2%2C4&x=1").encode().as_deref(), Some("2,4"));
        assert!(ToggleState::from_query("").is_empty());
        assert!(ToggleState::from_query("other=1").is_empty());
    }

    #[test]
    fn test_is_enabled() {
        let state = ToggleState::decode(Some("1"));
        assert!(state.is_enabled(0));
        assert!(!state.is_enabled(1));
    }
}
