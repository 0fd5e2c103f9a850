use serde::Serialize;

/// Page-number controls rendered around the current page.
pub const WINDOW_SIZE: usize = 5;

/// Number of pages needed to show `total_count` rows.
pub fn total_pages(total_count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total_count.div_ceil(page_size)
}

/// Builds the pagination control bar. `Some(n)` is a link to page `n`, `None`
/// an ellipsis.
///
/// Up to [`WINDOW_SIZE`] consecutive pages centred on `current_page`, clamped
/// to `[1, total_pages]`. A window starting after page 1 is preceded by page 1
/// and an ellipsis. A window ending before the last page is followed by the
/// last page, with an ellipsis only when pages are skipped in between.
pub fn get_pages(total_pages: usize, current_page: usize) -> Vec<Option<usize>> {
    if total_pages == 0 {
        return vec![];
    }

    let current = current_page.clamp(1, total_pages);
    let width = WINDOW_SIZE.min(total_pages);

    let mut start = current.saturating_sub(WINDOW_SIZE / 2).max(1);
    let mut end = start + width - 1;
    if end > total_pages {
        end = total_pages;
        start = end + 1 - width;
    }

    let mut pages = Vec::with_capacity(width + 4);

    if start > 1 {
        pages.push(Some(1));
        pages.push(None);
    }
    pages.extend((start..=end).map(Some));
    if end < total_pages {
        if end + 1 < total_pages {
            pages.push(None);
        }
        pages.push(Some(total_pages));
    }

    pages
}

#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub pages: Vec<Option<usize>>,
    pub page: usize,
    pub total_pages: usize,
    pub total_count: usize,
    pub previous: Option<usize>,
    pub next: Option<usize>,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, current_page: usize, total_count: usize, page_size: usize) -> Self {
        let current_page = if current_page == 0 { 1 } else { current_page };
        let total_pages = total_pages(total_count, page_size);

        let pages = get_pages(total_pages, current_page);

        Self {
            items,
            pages,
            page: current_page,
            total_pages,
            total_count,
            previous: (current_page > 1).then(|| (current_page - 1).min(total_pages.max(1))),
            next: (current_page < total_pages).then(|| current_page + 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_is_centred_with_both_edges() {
        let pages = get_pages(total_pages(95, 10), 5);
        assert_eq!(
            pages,
            vec![
                Some(1),
                None,
                Some(3),
                Some(4),
                Some(5),
                Some(6),
                Some(7),
                None,
                Some(10)
            ]
        );
    }

    #[test]
    fn no_controls_without_rows() {
        assert!(get_pages(total_pages(0, 10), 1).is_empty());
        let empty: Paginated<u8> = Paginated::new(vec![], 1, 0, 10);
        assert!(empty.pages.is_empty());
        assert_eq!(empty.next, None);
        assert_eq!(empty.previous, None);
    }

    #[test]
    fn window_is_clamped_at_the_start() {
        assert_eq!(
            get_pages(10, 1),
            vec![Some(1), Some(2), Some(3), Some(4), Some(5), None, Some(10)]
        );
    }

    #[test]
    fn window_is_clamped_at_the_end() {
        assert_eq!(
            get_pages(10, 10),
            vec![Some(1), None, Some(6), Some(7), Some(8), Some(9), Some(10)]
        );
    }

    #[test]
    fn short_listings_show_every_page() {
        assert_eq!(get_pages(3, 2), vec![Some(1), Some(2), Some(3)]);
        assert_eq!(get_pages(1, 1), vec![Some(1)]);
    }

    #[test]
    fn window_next_to_the_last_page_links_it_without_ellipsis() {
        assert_eq!(
            get_pages(10, 7),
            vec![Some(1), None, Some(5), Some(6), Some(7), Some(8), Some(9), Some(10)]
        );
        assert_eq!(
            get_pages(10, 4),
            vec![Some(1), Some(2), Some(3), Some(4), Some(5), Some(6), None, Some(10)]
        );
    }

    #[test]
    fn neighbours_follow_the_current_page() {
        let page: Paginated<u8> = Paginated::new(vec![], 2, 25, 10);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.previous, Some(1));
        assert_eq!(page.next, Some(3));
    }

    #[test]
    fn page_past_the_end_links_back_to_the_last_page() {
        let page: Paginated<u8> = Paginated::new(vec![], usize::MAX, 25, 10);
        assert_eq!(page.previous, Some(3));
        assert_eq!(page.next, None);
        assert_eq!(page.pages.last(), Some(&Some(3)));
    }
}
