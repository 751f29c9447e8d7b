//! List query value and its transition function.

use serde::{Deserialize, Serialize};

use crate::models::JobStatus;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// Status filter of the list view. `All` is sent to the API as `status=all`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(JobStatus),
}

impl StatusFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Only(status) => status.as_str(),
        }
    }
}

/// How a transition should reach the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Page-only change: fetch now.
    Immediate,
    /// Search, status or sort changed: fetch after the quiet period.
    Debounced,
}

/// The (page, search, status, sort) tuple of the list view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page: u32,
    pub search: String,
    pub status: StatusFilter,
    pub sort: SortDirection,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            search: String::new(),
            status: StatusFilter::All,
            sort: SortDirection::Desc,
        }
    }
}

/// Partial change to a [`ListQuery`]. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryPatch {
    pub page: Option<u32>,
    pub search: Option<String>,
    pub status: Option<StatusFilter>,
    pub sort: Option<SortDirection>,
}

impl QueryPatch {
    pub fn page(page: u32) -> Self {
        Self {
            page: Some(page),
            ..Default::default()
        }
    }

    pub fn search(text: impl Into<String>) -> Self {
        Self {
            search: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn status(status: StatusFilter) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn sort(sort: SortDirection) -> Self {
        Self {
            sort: Some(sort),
            ..Default::default()
        }
    }

    fn touches_result_set(&self) -> bool {
        self.search.is_some() || self.status.is_some() || self.sort.is_some()
    }
}

impl ListQuery {
    /// Merges `patch` into a new query.
    ///
    /// Any explicit search, status or sort resets the page to 1, even if the
    /// patch also names a page. Pages below 1 are clamped.
    pub fn apply(&self, patch: &QueryPatch) -> (ListQuery, Transition) {
        let mut next = self.clone();

        if let Some(search) = &patch.search {
            next.search = search.clone();
        }
        if let Some(status) = patch.status {
            next.status = status;
        }
        if let Some(sort) = patch.sort {
            next.sort = sort;
        }

        if patch.touches_result_set() {
            next.page = 1;
            (next, Transition::Debounced)
        } else {
            if let Some(page) = patch.page {
                next.page = page.max(1);
            }
            (next, Transition::Immediate)
        }
    }

    /// Query parameters for `GET /api/jobs`. Empty search is dropped by the
    /// client.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("page", self.page.to_string()),
            ("search", self.search.clone()),
            ("status", self.status.as_str().to_string()),
            ("sort", self.sort.as_str().to_string()),
        ]
    }
}
