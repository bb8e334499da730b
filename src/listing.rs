//! Client-side search and pagination for resource listings

use crate::model::{Chemical, Equipment, InventoryTransaction, ResourceRef, Supplier};
use crate::status::AnnotatedRecord;
use serde::Serialize;

/// Texts a search term is matched against
pub trait Searchable {
    fn search_fields(&self) -> Vec<&str>;
}

impl Searchable for Chemical {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str()]
    }
}

impl Searchable for Equipment {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str()]
    }
}

impl Searchable for Supplier {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str()]
    }
}

impl Searchable for InventoryTransaction {
    /// Names of the referenced chemical, equipment and supplier, when expanded
    fn search_fields(&self) -> Vec<&str> {
        [&self.chemical, &self.equipment, &self.supplier]
            .into_iter()
            .filter_map(|reference| reference.as_ref().and_then(ResourceRef::name))
            .collect()
    }
}

impl Searchable for AnnotatedRecord {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.record.name.as_str()]
    }
}

impl<T: Searchable> Searchable for &T {
    fn search_fields(&self) -> Vec<&str> {
        (**self).search_fields()
    }
}

/// Items with any search field containing `term`, ignoring case.
///
/// A blank term keeps everything. Input order is preserved.
#[must_use]
pub fn search<'a, T: Searchable>(items: &'a [T], term: &str) -> Vec<&'a T> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return items.iter().collect();
    }
    items
        .iter()
        .filter(|item| {
            item.search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
        })
        .collect()
}

/// One page of a listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number
    pub page: usize,
    pub per_page: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    #[must_use]
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Slice `items` into the requested 1-based page.
///
/// Page 0 is read as page 1. With `per_page == 0` the page is empty and
/// reports no pages. Pages past the end are empty but keep the totals.
#[must_use]
pub fn paginate<T: Clone>(items: &[T], page: usize, per_page: usize) -> Page<T> {
    let page = page.max(1);
    let total_items = items.len();
    let total_pages = if per_page == 0 {
        0
    } else {
        total_items.div_ceil(per_page)
    };

    let start = (page - 1).saturating_mul(per_page);
    let page_items = items.iter().skip(start).take(per_page).cloned().collect();

    Page {
        items: page_items,
        page,
        per_page,
        total_items,
        total_pages,
    }
}
