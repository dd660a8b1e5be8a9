//! Generic "fetch every page" driver.

use std::future::Future;

use tracing::{debug, warn};

use crate::client::{MAX_PAGE_SIZE, Page};

/// Upper bound on pages fetched by one call, independent of the reported
/// total.
pub const MAX_PAGES: usize = 1_000;

/// Options for [`fetch_all`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchAllOptions {
    /// Stop after this many items. Unbounded when `None`.
    pub max_items: Option<usize>,
    /// Requested page size; clamped to `1..=MAX_PAGE_SIZE`. Defaults to the
    /// maximum.
    pub page_size: Option<usize>,
}

impl FetchAllOptions {
    pub fn effective_page_size(&self) -> usize {
        self.page_size
            .unwrap_or(MAX_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }
}

/// Drive `fetch_page(offset, page_size)` until the collection is exhausted.
///
/// `offset` is the 1-indexed position of the first item of the page and
/// advances by `page_size` after every page. Pages are fetched strictly in
/// sequence. Stops when the latest page's `total` is reached, `max_items` is
/// reached, a page comes back empty, or [`MAX_PAGES`] pages were fetched.
/// The first failure is returned and everything accumulated is dropped.
pub async fn fetch_all<T, E, F, Fut>(
    mut fetch_page: F,
    options: FetchAllOptions,
) -> Result<Vec<T>, E>
where
    F: FnMut(usize, usize) -> Fut,
    Fut: Future<Output = Result<Page<T>, E>>,
{
    let page_size = options.effective_page_size();
    let max_items = options.max_items.unwrap_or(usize::MAX);
    if max_items == 0 {
        return Ok(Vec::new());
    }

    let mut items: Vec<T> = Vec::new();
    let mut offset = 1;
    let mut pages = 0;

    loop {
        let page = fetch_page(offset, page_size).await?;
        pages += 1;

        let total = page.total;
        let received = page.items.len();
        items.extend(page.items);
        debug!(offset, page_size, received, total, "fetched page");

        if received == 0 || items.len() >= total || items.len() >= max_items {
            break;
        }
        if pages >= MAX_PAGES {
            warn!(
                pages,
                total,
                accumulated = items.len(),
                "pagination stopped at page ceiling"
            );
            break;
        }
        offset += page_size;
    }

    items.truncate(max_items);
    Ok(items)
}
