mod helpers;

use helpers::FakeCatalog;
use mealdeck_recipe::{Browser, CatalogError, FETCH_FAILED, Query};
use mealdeck_shared::recipe::Recipe;

#[tokio::test]
async fn test_load_more_grows_by_page_until_exhausted() {
    let catalog = FakeCatalog::with_meals(20);
    let mut browser = Browser::default();

    assert!(browser.search(&catalog, "").await);
    assert_eq!(browser.results().len(), 6);
    assert!(browser.has_more());

    let mut counts = Vec::new();
    for _ in 0..4 {
        browser.load_more(&catalog).await;
        counts.push(browser.results().len());
    }

    assert_eq!(counts, vec![12, 18, 20, 20]);
    assert!(!browser.has_more());
    assert_eq!(browser.available(), 20);
    assert_eq!(catalog.calls(), 5);
}

#[tokio::test]
async fn test_new_query_resets_page() {
    let catalog = FakeCatalog::with_meals(20);
    let mut browser = Browser::default();

    browser.search(&catalog, "recipe").await;
    browser.load_more(&catalog).await;
    assert_eq!(browser.page(), 2);

    browser.filter_by_area(&catalog, "Japanese").await;
    assert_eq!(browser.page(), 1);
    assert_eq!(browser.query(), &Query::Area("Japanese".to_owned()));
    assert_eq!(browser.results().len(), 6);
    assert!(
        browser
            .results()
            .iter()
            .all(|r| r.area.as_deref() == Some("Japanese"))
    );
}

#[tokio::test]
async fn test_search_trims_term() {
    let catalog = FakeCatalog::with_meals(3);
    let mut browser = Browser::default();

    browser.search(&catalog, "  chicken ").await;

    assert_eq!(catalog.last_term.lock().unwrap().as_deref(), Some("chicken"));
    assert!(browser.results().is_empty());
}

#[tokio::test]
async fn test_failed_fetch_keeps_results_and_offers_retry() {
    let catalog = FakeCatalog::with_meals(8);
    let mut browser = Browser::default();
    browser.search(&catalog, "").await;

    catalog.go_offline();
    browser.load_more(&catalog).await;

    assert_eq!(browser.results().len(), 6);
    let notice = browser.notice().cloned().unwrap();
    assert_eq!(notice.message, FETCH_FAILED);
    assert!(notice.retry);

    catalog.go_online();
    browser.retry(&catalog).await;

    assert!(browser.notice().is_none());
    assert_eq!(browser.results().len(), 8);
}

#[tokio::test]
async fn test_notice_can_be_dismissed() {
    let catalog = FakeCatalog::with_meals(2);
    catalog.go_offline();

    let mut browser = Browser::default();
    browser.search(&catalog, "").await;
    assert!(browser.notice().is_some());

    browser.dismiss_notice();
    assert!(browser.notice().is_none());
    assert!(browser.results().is_empty());
}

#[test]
fn test_stale_response_is_discarded() {
    let mut browser = Browser::default();

    let older = browser.issue();
    let newer = browser.issue();

    assert!(browser.resolve(newer, Ok(vec![Recipe::new("2", "Newer")])));
    assert!(!browser.resolve(older, Ok(vec![Recipe::new("1", "Older")])));

    assert_eq!(browser.results().len(), 1);
    assert_eq!(browser.results()[0].id, "2");
}

#[test]
fn test_stale_failure_does_not_raise_notice() {
    let mut browser = Browser::default();

    let older = browser.issue();
    let newer = browser.issue();

    assert!(browser.resolve(newer, Ok(vec![])));
    assert!(!browser.resolve(older, Err(CatalogError::Status(500))));
    assert!(browser.notice().is_none());
}

#[test]
fn test_expand_and_collapse() {
    let mut browser = Browser::default();
    browser.expand(Recipe::new("1", "A"));
    browser.expand(Recipe::new("2", "B"));

    assert_eq!(browser.expanded().map(|r| r.id.as_str()), Some("2"));

    browser.collapse();
    assert!(browser.expanded().is_none());
}

#[tokio::test]
async fn test_reopened_listing_shows_earlier_pages() {
    let catalog = FakeCatalog::with_meals(20);
    let mut browser = Browser::default();
    browser.search(&catalog, "recipe").await;

    browser.show_page(3);
    assert_eq!(browser.results().len(), 18);
    assert!(browser.has_more());

    browser.show_page(0);
    assert_eq!(browser.page(), 1);
    assert_eq!(browser.results().len(), 6);
}

#[tokio::test]
async fn test_huge_page_is_clamped() {
    let catalog = FakeCatalog::with_meals(20);
    let mut browser = Browser::default();
    browser.search(&catalog, "recipe").await;

    browser.show_page(usize::MAX);
    assert_eq!(browser.page(), 4);
    assert_eq!(browser.results().len(), 20);

    assert!(browser.load_more(&catalog).await);
    assert_eq!(browser.page(), 4);
    assert!(!browser.has_more());
}

#[test]
fn test_resolve_with_huge_page_does_not_overflow() {
    let mut browser = Browser::default();
    let mut ticket = browser.issue();
    ticket.page = usize::MAX;

    let meals = (0..20).map(|i| Recipe::new(i.to_string(), "x")).collect();
    assert!(browser.resolve(ticket, Ok(meals)));

    assert_eq!(browser.results().len(), 20);
}
