use std::sync::{Arc, Mutex};

use crate::client::{ClientError, Page};

use super::paginator::*;

/// Synthetic collection of `total` integers served by item offset.
fn source(
    total: usize,
    log: Arc<Mutex<Vec<(usize, usize)>>>,
) -> impl FnMut(usize, usize) -> std::future::Ready<Result<Page<usize>, ClientError>> {
    move |offset, page_size| {
        log.lock().unwrap().push((offset, page_size));
        let items: Vec<usize> = (offset..=total).take(page_size).collect();
        std::future::ready(Ok(Page::new(items, total)))
    }
}

#[tokio::test]
async fn test_fetches_every_page_in_order() {
    let log = Arc::new(Mutex::new(Vec::new()));

    let items = fetch_all(
        source(250, Arc::clone(&log)),
        FetchAllOptions {
            max_items: None,
            page_size: Some(100),
        },
    )
    .await
    .unwrap();

    assert_eq!(items.len(), 250);
    assert_eq!(items, (1..=250).collect::<Vec<_>>());
    assert_eq!(*log.lock().unwrap(), vec![(1, 100), (101, 100), (201, 100)]);
}

#[tokio::test]
async fn test_exact_multiple_of_page_size() {
    let log = Arc::new(Mutex::new(Vec::new()));

    let items = fetch_all(
        source(40, Arc::clone(&log)),
        FetchAllOptions {
            max_items: None,
            page_size: Some(20),
        },
    )
    .await
    .unwrap();

    assert_eq!(items.len(), 40);
    assert_eq!(log.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_truncates_to_max_items() {
    let log = Arc::new(Mutex::new(Vec::new()));

    let items = fetch_all(
        source(500, Arc::clone(&log)),
        FetchAllOptions {
            max_items: Some(150),
            page_size: Some(100),
        },
    )
    .await
    .unwrap();

    assert_eq!(items.len(), 150);
    assert_eq!(items.last(), Some(&150));
    // Two pages cover 150 items; nothing is fetched after that.
    assert_eq!(log.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_max_items_zero_fetches_nothing() {
    let log = Arc::new(Mutex::new(Vec::new()));

    let items = fetch_all(
        source(10, Arc::clone(&log)),
        FetchAllOptions {
            max_items: Some(0),
            page_size: None,
        },
    )
    .await
    .unwrap();

    assert!(items.is_empty());
    assert!(log.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_page_size_is_clamped() {
    let log = Arc::new(Mutex::new(Vec::new()));

    fetch_all(
        source(150, Arc::clone(&log)),
        FetchAllOptions {
            max_items: None,
            page_size: Some(500),
        },
    )
    .await
    .unwrap();

    assert!(log.lock().unwrap().iter().all(|(_, size)| *size == 100));
}

#[tokio::test]
async fn test_default_page_size_is_maximum() {
    assert_eq!(FetchAllOptions::default().effective_page_size(), 100);
    assert_eq!(
        FetchAllOptions {
            max_items: None,
            page_size: Some(0),
        }
        .effective_page_size(),
        1
    );
}

#[tokio::test]
async fn test_empty_collection_single_fetch() {
    let log = Arc::new(Mutex::new(Vec::new()));

    let items = fetch_all(source(0, Arc::clone(&log)), FetchAllOptions::default())
        .await
        .unwrap();

    assert!(items.is_empty());
    assert_eq!(log.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_inflated_total_stops_on_empty_page() {
    let mut calls = 0;

    let items = fetch_all(
        |offset, _page_size| {
            calls += 1;
            // Claims a million items but only ever serves the first page.
            let items = if offset == 1 { vec![1, 2, 3] } else { vec![] };
            std::future::ready(Ok::<_, ClientError>(Page::new(items, 1_000_000)))
        },
        FetchAllOptions::default(),
    )
    .await
    .unwrap();

    assert_eq!(items, vec![1, 2, 3]);
    assert_eq!(calls, 2);
}

#[tokio::test]
async fn test_page_ceiling_bounds_runaway_total() {
    let mut calls = 0;

    let items = fetch_all(
        |offset, _page_size| {
            calls += 1;
            std::future::ready(Ok::<_, ClientError>(Page::new(vec![offset], usize::MAX)))
        },
        FetchAllOptions {
            max_items: None,
            page_size: Some(1),
        },
    )
    .await
    .unwrap();

    assert_eq!(calls, MAX_PAGES);
    assert_eq!(items.len(), MAX_PAGES);
}

#[tokio::test]
async fn test_error_aborts_and_discards() {
    let mut calls = 0;

    let result: Result<Vec<usize>, ClientError> = fetch_all(
        |offset, page_size| {
            calls += 1;
            let outcome = if offset > 1 {
                Err(ClientError::Remote {
                    status: 500,
                    message: "down".to_string(),
                })
            } else {
                Ok(Page::new((1..=page_size).collect(), 300))
            };
            std::future::ready(outcome)
        },
        FetchAllOptions::default(),
    )
    .await;

    assert!(matches!(
        result,
        Err(ClientError::Remote { status: 500, .. })
    ));
    assert_eq!(calls, 2);
}
