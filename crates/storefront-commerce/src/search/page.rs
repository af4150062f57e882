//! Paged query results.

use serde::{Deserialize, Serialize};

/// A bounded slice of results plus the total count before slicing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items on this page, in result order.
    pub items: Vec<T>,
    /// Number of matches before pagination.
    pub total_matching: usize,
    /// Page number (1-indexed).
    pub page: usize,
    /// Requested page size.
    pub page_size: usize,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total_matching: usize, page: usize, page_size: usize) -> Self {
        Self {
            items,
            total_matching,
            page,
            page_size,
        }
    }

    /// Number of pages needed to cover every match.
    pub fn total_pages(&self) -> usize {
        if self.page_size == 0 {
            return 0;
        }
        self.total_matching.div_ceil(self.page_size)
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Get start item number (1-indexed), or 0 for an empty page.
    pub fn start_item(&self) -> usize {
        if self.items.is_empty() {
            0
        } else {
            (self.page - 1) * self.page_size + 1
        }
    }

    /// Get end item number.
    pub fn end_item(&self) -> usize {
        if self.items.is_empty() {
            0
        } else {
            self.start_item() + self.items.len() - 1
        }
    }
}
