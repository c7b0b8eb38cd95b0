//! Scenarios against the live storefront.
//!
//! Needs Chromium and network access, so every test is ignored by default:
//!
//! ```text
//! cargo test -p storefront-probe --features browser --test live_scenarios -- --ignored
//! ```
//!
//! `STOREFRONT_BASE_URL`, `STOREFRONT_HEADLESS` and `CHROMIUM_PATH` tune the
//! launch.

#![cfg(feature = "browser")]
#![allow(clippy::unwrap_used, clippy::expect_used)]

use storefront_probe::prelude::*;

async fn fixtures(names: &[FixtureName]) -> (Browser, FixtureContext) {
    storefront_probe::init_tracing();
    let browser = Browser::launch_from_env().await.unwrap();
    let session = browser.new_session().await.unwrap();
    let ctx = Fixtures::new(session)
        .with_all(names.iter().copied())
        .build()
        .await
        .unwrap();
    (browser, ctx)
}

#[tokio::test]
#[ignore = "drives the live site"]
async fn live_search_shows_results() {
    let (browser, ctx) = fixtures(&[FixtureName::HomePage, FixtureName::SearchResultsPage]).await;
    let home = ctx.home_page().unwrap();

    home.search_for("iphone").await.unwrap();
    ctx.search_results_page()
        .unwrap()
        .expect_results_to_be_visible()
        .await
        .unwrap();

    browser.close().await.unwrap();
}

#[tokio::test]
#[ignore = "drives the live site"]
async fn live_add_first_result_to_cart() {
    let (browser, ctx) = fixtures(&[
        FixtureName::HomePage,
        FixtureName::SearchResultsPage,
        FixtureName::ProductDetailPage,
        FixtureName::CartPage,
    ])
    .await;
    let home = ctx.home_page().unwrap();
    let results = ctx.search_results_page().unwrap();
    let pdp = ctx.product_detail_page().unwrap();

    home.search_for("samsung").await.unwrap();
    results.expect_results_to_be_visible().await.unwrap();
    results.click_first_result().await.unwrap();

    pdp.expect_product_details_to_be_visible().await.unwrap();
    let name = pdp.get_product_title().await.unwrap();
    let price = pdp.get_product_price().await.unwrap();
    pdp.add_to_cart().await.unwrap();

    home.open_cart().await.unwrap();
    ctx.cart_page()
        .unwrap()
        .expect_product_in_cart(&name, &price)
        .await
        .unwrap();

    browser.close().await.unwrap();
}

#[tokio::test]
#[ignore = "drives the live site"]
async fn live_invalid_username_shows_error() {
    let (browser, ctx) = fixtures(&[FixtureName::LoginPage]).await;

    ctx.home_page().unwrap().open_login().await.unwrap();
    let login = ctx.login_page().unwrap();
    login.submit_username("invalid-user@test").await.unwrap();
    login.expect_identification_error(None).await.unwrap();

    browser.close().await.unwrap();
}

#[tokio::test]
#[ignore = "drives the live site"]
async fn live_sort_by_price() {
    for (term, option, order) in [
        ("samsung", SortOption::PriceAsc, SortOrder::Asc),
        ("xiaomi", SortOption::PriceDesc, SortOrder::Desc),
    ] {
        let (browser, ctx) =
            fixtures(&[FixtureName::HomePage, FixtureName::SearchResultsPage]).await;
        let results = ctx.search_results_page().unwrap();

        ctx.home_page().unwrap().search_for(term).await.unwrap();
        results.expect_results_to_be_visible().await.unwrap();
        results.select_sort_by(option).await.unwrap();
        results
            .expect_results_to_be_sorted_by_price(order)
            .await
            .unwrap();

        browser.close().await.unwrap();
    }
}

#[tokio::test]
#[ignore = "drives the live site"]
async fn live_pdp_variants_update_url() {
    let (browser, ctx) = fixtures(&[
        FixtureName::HomePage,
        FixtureName::SearchResultsPage,
        FixtureName::ProductDetailPage,
    ])
    .await;
    let pdp = ctx.product_detail_page().unwrap();

    ctx.home_page()
        .unwrap()
        .search_for("xiaomi redmi note 14")
        .await
        .unwrap();
    ctx.search_results_page()
        .unwrap()
        .click_first_result()
        .await
        .unwrap();
    pdp.expect_product_details_to_be_visible().await.unwrap();

    for fragment in ["azul-oceano", "128-gb-6-gb"] {
        pdp.expect_variant_option_to_exist(fragment).await.unwrap();
        pdp.select_variant_by_url_fragment(fragment).await.unwrap();
        pdp.expect_variant_applied(fragment).await.unwrap();
    }

    browser.close().await.unwrap();
}

#[tokio::test]
#[ignore = "drives the live site"]
async fn live_mocked_search_results() {
    let (browser, ctx) = fixtures(&[FixtureName::HomePage, FixtureName::SearchResultsPage]).await;
    let mock = SearchMock::from_file(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/tests/mocks/search.mock.json"
    ))
    .unwrap();
    ctx.session()
        .route(
            UrlPattern::glob("**/listado.mercadolibre.com.ar/*"),
            MockResponse::html(&build_search_html_from_mock(&mock, DEFAULT_MOCK_LIMIT)),
        )
        .await
        .unwrap();

    ctx.home_page().unwrap().search_for("macbook").await.unwrap();

    let results = ctx.search_results_page().unwrap();
    results.expect_results_count(3).await.unwrap();
    results
        .expect_result_titles(&[
            "Mock MacBook Air M1 256GB",
            "Mock MacBook Pro M2 512GB",
            "Mock MacBook Pro M3 1TB",
        ])
        .await
        .unwrap();

    browser.close().await.unwrap();
}

#[tokio::test]
#[ignore = "drives the live site"]
async fn live_price_range_filter() {
    let (browser, ctx) = fixtures(&[FixtureName::HomePage, FixtureName::SearchResultsPage]).await;
    let results = ctx.search_results_page().unwrap();

    ctx.home_page().unwrap().search_for("smart tv").await.unwrap();
    results.expect_results_to_be_visible().await.unwrap();
    results.apply_price_filter("100000", "300000").await.unwrap();
    results
        .validate_price_range_filtering("100000", "300000")
        .await
        .unwrap();

    browser.close().await.unwrap();
}
