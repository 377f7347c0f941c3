use serde::Serialize;

pub const DEFAULT_PER_PAGE: u64 = 10;
pub const MAX_PER_PAGE: u64 = 100;

/// One page of an already-counted result set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T: Serialize> {
    pub data: Vec<T>,
    /// Size of the whole result set, not of this page.
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
    pub total_pages: u64,
}

impl<T: Serialize> Page<T> {
    /// Slice `items` to 1-based `page`. Pages past the end are empty but still
    /// report the full `total`.
    pub fn slice(items: Vec<T>, page: u64, per_page: u64) -> Self {
        let page = page.max(1);
        let per_page = per_page.clamp(1, MAX_PER_PAGE);
        let total = items.len() as u64;
        let start = ((page - 1) * per_page).min(total) as usize;

        let data = items
            .into_iter()
            .skip(start)
            .take(per_page as usize)
            .collect();

        Self {
            data,
            total,
            page,
            per_page,
            total_pages: total.div_ceil(per_page),
        }
    }

    pub fn map<U: Serialize>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            data: self.data.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            per_page: self.per_page,
            total_pages: self.total_pages,
        }
    }
}
