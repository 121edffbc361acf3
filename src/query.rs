//! Request builder for the paged ticket collection.

use std::fmt;

use url::form_urlencoded;

use crate::error::{HelpdeskError, Result};
use crate::types::{Facet, FilterSet};

/// A single page request against the ticket collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketQuery {
    page: u32,
    filters: FilterSet,
}

impl TicketQuery {
    pub fn new(page: u32, filters: FilterSet) -> Result<Self> {
        if page == 0 {
            return Err(HelpdeskError::InvalidPage(page));
        }
        Ok(Self { page, filters })
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    /// Query parameters in wire order: `page` first, then one pair per
    /// present facet.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("page", self.page.to_string())];
        params.extend(
            self.filters
                .constraints()
                .map(|(facet, value)| (facet.taxonomy(), value.to_string())),
        );
        params
    }

    /// Facet constraint carried by this query, if any
    pub fn constraint(&self, facet: Facet) -> Option<&str> {
        self.filters.get(facet)
    }

    /// The url-encoded query string
    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in self.params() {
            serializer.append_pair(key, &value);
        }
        serializer.finish()
    }
}

impl fmt::Display for TicketQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_query_string())
    }
}
