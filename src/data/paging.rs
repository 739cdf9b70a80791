use std::ops::Range;

/// Page size of the browse view.
pub const DEFAULT_ITEMS_PER_PAGE: usize = 20;

/// Number of pages needed for `total` items. Zero items → zero pages.
pub fn page_count(total: usize, per_page: usize) -> usize {
    if per_page == 0 {
        return 0;
    }
    total.div_ceil(per_page)
}

/// Item index range shown on 0-based `page`. Out-of-range pages are empty.
pub fn page_bounds(total: usize, per_page: usize, page: usize) -> Range<usize> {
    let start = page.saturating_mul(per_page).min(total);
    let end = start.saturating_add(per_page).min(total);
    start..end
}
