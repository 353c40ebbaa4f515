//! Narrowing of the list view by category and keyword.
//!
//! Both travel next to the toggle token: `/?disabled=1&cat=tech&q=rust`.
//! Without them a list address is exactly the toggle address.

use url::form_urlencoded;

use crate::feed::RawEntry;
use crate::toggle::{ToggleState, DISABLED_PARAM};

pub const CATEGORY_PARAM: &str = "cat";
pub const SEARCH_PARAM: &str = "q";

/// Entry predicate. An empty filter keeps everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryFilter {
    category: Option<String>,
    search: Option<String>,
}

impl EntryFilter {
    /// Blank values count as absent
    pub fn new(category: Option<&str>, search: Option<&str>) -> Self {
        let clean = |value: Option<&str>| {
            value
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        Self {
            category: clean(category),
            search: clean(search),
        }
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.category.is_none() && self.search.is_none()
    }

    /// Category: case-insensitive equality with any of the entry's terms.
    /// Search: case-insensitive substring of the title or the summary.
    pub fn matches(&self, entry: &RawEntry) -> bool {
        if let Some(category) = &self.category {
            let category = category.to_lowercase();
            if !entry.categories.iter().any(|term| term.trim().to_lowercase() == category) {
                return false;
            }
        }

        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let in_title = entry.title.to_lowercase().contains(&needle);
            let in_summary = entry
                .summary
                .as_deref()
                .is_some_and(|s| s.to_lowercase().contains(&needle));
            if !in_title && !in_summary {
                return false;
            }
        }

        true
    }

    fn append_to(&self, serializer: &mut form_urlencoded::Serializer<'_, String>) {
        if let Some(category) = &self.category {
            serializer.append_pair(CATEGORY_PARAM, category);
        }
        if let Some(search) = &self.search {
            serializer.append_pair(SEARCH_PARAM, search);
        }
    }
}

/// Everything a list address carries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub toggles: ToggleState,
    pub filter: EntryFilter,
}

impl ListQuery {
    pub fn new(toggles: ToggleState, filter: EntryFilter) -> Self {
        Self { toggles, filter }
    }

    /// Read `disabled`, `cat` and `q` from a raw query string. The first
    /// occurrence of each key wins.
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut category = None;
        let mut search = None;

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                CATEGORY_PARAM if category.is_none() => category = Some(value.into_owned()),
                SEARCH_PARAM if search.is_none() => search = Some(value.into_owned()),
                _ => {}
            }
        }

        Self {
            toggles: ToggleState::from_query(query),
            filter: EntryFilter::new(category.as_deref(), search.as_deref()),
        }
    }

    /// List address: the toggle address, plus `cat`/`q` when set
    pub fn address(&self) -> String {
        if self.filter.is_empty() {
            return self.toggles.address();
        }

        // The toggle token is digits and commas; it stays unescaped
        let mut query = match self.toggles.encode() {
            Some(token) => format!("{}={}&", DISABLED_PARAM, token),
            None => String::new(),
        };
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        self.filter.append_to(&mut serializer);
        query.push_str(&serializer.finish());

        format!("/?{}", query)
    }

    /// Address with source `index` flipped; the filter is carried over
    pub fn toggle_link(&self, index: usize) -> String {
        Self {
            toggles: self.toggles.toggled(index),
            filter: self.filter.clone(),
        }
        .address()
    }
}

impl From<ToggleState> for ListQuery {
    fn from(toggles: ToggleState) -> Self {
        Self {
            toggles,
            filter: EntryFilter::default(),
        }
    }
}
