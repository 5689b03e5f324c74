//! Async facade against a local site.

mod common;

use stylescout::{ContainerId, Error, Scout, ScoutConfig};

#[tokio::test]
async fn page_round_trip() {
    if common::skip_in_ci() {
        return;
    }
    let base = common::start_site();
    let scout = Scout::new(Some(ScoutConfig {
        hide_generic_fonts: true,
        ..Default::default()
    }))
    .await
    .expect("scout");
    let page = scout.new_page().await.unwrap();

    let summary = page.goto(&format!("{}/", base)).await.unwrap();
    assert_eq!(summary.title, "Scout Test");

    let sheets = page
        .fetch_stylesheets(&[format!("{}/a.css", base), format!("{}/gone.css", base)])
        .await
        .unwrap();
    assert_eq!(sheets.len(), 1);

    let report = page.report().await.unwrap();
    assert_eq!(report.title, "Scout Test");
    assert!(!report.fragment(ContainerId::Fonts).contains("sans-serif"));

    let tooltip = page.inspect("h1").await.unwrap().unwrap();
    assert!(tooltip.starts_with("Font: \"Open Sans\", Arial, sans-serif\n"));

    scout.close().await.unwrap();
}

#[tokio::test]
async fn failed_navigation_keeps_worker_alive() {
    if common::skip_in_ci() {
        return;
    }
    let base = common::start_site();
    let scout = Scout::new(None).await.unwrap();
    let page = scout.new_page().await.unwrap();

    let err = page.goto(&format!("{}/nope", base)).await.unwrap_err();
    assert!(matches!(err, Error::LoadError(_)));

    let summary = page.load_html("<title>Local</title>", None).await.unwrap();
    assert_eq!(summary.title, "Local");
    scout.close().await.unwrap();
}
