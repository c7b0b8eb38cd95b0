//! Storefront scenarios against local HTML fixtures.
//!
//! Every scenario drives the page objects through `StaticDriver`, so the
//! suite runs without a browser or network access.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use storefront_probe::prelude::*;
use storefront_probe::{Query, Route};

const WWW: &str = "https://www.mercadolibre.com.ar";
const LISTADO: &str = "https://listado.mercadolibre.com.ar";

macro_rules! fixture {
    ($name:literal) => {
        include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/", $name))
    };
}

fn config() -> ProbeConfig {
    ProbeConfig::default()
        .with_base_url(WWW)
        .with_timeout_ms(200)
        .with_results_timeout_ms(300)
        .with_navigation_timeout_ms(1_000)
        .with_overlay_timeouts_ms(100, 200)
        .with_poll_interval_ms(5)
}

/// The storefront as a set of static pages
fn storefront() -> Arc<StaticDriver> {
    let pages = [
        ("/", fixture!("home.html")),
        ("/jms/mla/lgz/login", fixture!("login.html")),
        ("/jms/mla/lgz/login/identification", fixture!("login_error.html")),
        ("/registration", fixture!("registration.html")),
        (
            "https://listado.mercadolibre.com.ar/search",
            fixture!("search_samsung.html"),
        ),
        (
            "https://listado.mercadolibre.com.ar/search?as_word=samsung",
            fixture!("search_samsung.html"),
        ),
        (
            "https://listado.mercadolibre.com.ar/samsung_OrderId_PRICE_NoIndex_True",
            fixture!("search_samsung_price_asc.html"),
        ),
        (
            "https://listado.mercadolibre.com.ar/samsung/price-filter",
            fixture!("search_samsung_filtered.html"),
        ),
        (
            "https://listado.mercadolibre.com.ar/search?as_word=xiaomi",
            fixture!("search_xiaomi.html"),
        ),
        (
            "https://listado.mercadolibre.com.ar/search?as_word=xiaomi+redmi+note+14",
            fixture!("search_xiaomi.html"),
        ),
        (
            "https://listado.mercadolibre.com.ar/xiaomi_OrderId_PRICE*DESC_NoIndex_True",
            fixture!("search_xiaomi_price_desc.html"),
        ),
        (
            "/samsung-galaxy-a55-5g-128-gb-azul-oscuro-8-gb-ram/p/MLA34925813",
            fixture!("pdp_samsung.html"),
        ),
        ("/p/MLA34925813/add-to-cart", fixture!("added_to_cart.html")),
        ("/gz/cart", fixture!("cart.html")),
        ("/gz/cart/remove", fixture!("cart_empty.html")),
        ("/xiaomi-redmi-note-14/p/MLA44000001", fixture!("pdp_xiaomi.html")),
        (
            "/xiaomi-redmi-note-14-azul-oceano/p/MLA44000003",
            fixture!("pdp_xiaomi.html"),
        ),
        (
            "/xiaomi-redmi-note-14-128-gb-6-gb/p/MLA44000004",
            fixture!("pdp_xiaomi.html"),
        ),
    ];
    let driver = StaticDriver::new(WWW).unwrap();
    for (url, html) in pages {
        driver.add_page(url, html).unwrap();
    }
    Arc::new(driver)
}

fn session_over(driver: &Arc<StaticDriver>) -> Session {
    Session::from_shared(driver.clone(), config())
}

async fn build(driver: &Arc<StaticDriver>, names: &[FixtureName]) -> FixtureContext {
    storefront_probe::init_tracing();
    Fixtures::new(session_over(driver))
        .with_all(names.iter().copied())
        .build()
        .await
        .unwrap()
}

// ============================================================================
// Search
// ============================================================================

#[tokio::test]
async fn search_shows_results() {
    let driver = storefront();
    let ctx = build(
        &driver,
        &[FixtureName::HomePage, FixtureName::SearchResultsPage],
    )
    .await;
    let home = ctx.home_page().unwrap();

    home.open().await.unwrap();
    home.search_for("iphone").await.unwrap();

    ctx.search_results_page()
        .unwrap()
        .expect_results_to_be_visible()
        .await
        .unwrap();
    assert_eq!(
        ctx.session().url().await.unwrap(),
        format!("{LISTADO}/search?as_word=iphone")
    );
}

#[tokio::test]
async fn search_reads_titles_and_prices() {
    let driver = storefront();
    let ctx = build(
        &driver,
        &[FixtureName::HomePage, FixtureName::SearchResultsPage],
    )
    .await;
    ctx.home_page().unwrap().search_for("samsung").await.unwrap();
    let results = ctx.search_results_page().unwrap();

    results.expect_results_count(3).await.unwrap();
    results
        .expect_result_titles(&["Galaxy A55", "Galaxy S24"])
        .await
        .unwrap();
    assert_eq!(
        results.result_prices().await.unwrap(),
        vec!["$ 599.999", "$ 1.299.999", "$ 249.999,50"]
    );
}

#[tokio::test]
async fn search_results_count_mismatch_fails() {
    let driver = storefront();
    let ctx = build(
        &driver,
        &[FixtureName::HomePage, FixtureName::SearchResultsPage],
    )
    .await;
    ctx.home_page().unwrap().search_for("samsung").await.unwrap();

    let err = ctx
        .search_results_page()
        .unwrap()
        .expect_results_count(5)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("to have count 5, got 3"));
}

#[tokio::test]
async fn row_locators_chain_from_the_row() {
    let driver = storefront();
    let ctx = build(
        &driver,
        &[FixtureName::HomePage, FixtureName::SearchResultsPage],
    )
    .await;
    ctx.home_page().unwrap().search_for("samsung").await.unwrap();
    let locators = ctx.search_results_page().unwrap().locators();

    let third = locators.results_items().nth(2);
    assert_eq!(
        locators.item_rating(&third).inner_text().await.unwrap(),
        "4.6"
    );
    assert_eq!(
        locators.item_sold_quantity(&third).inner_text().await.unwrap(),
        "+10mil vendidos"
    );
    assert_eq!(
        locators.item_shipping(&third).inner_text().await.unwrap(),
        "Llega gratis mañana"
    );
    let second = locators.results_items().nth(1);
    assert_eq!(locators.item_shipping(&second).count().await.unwrap(), 0);
    assert_eq!(
        locators
            .item_image(&second)
            .get_attribute("alt")
            .await
            .unwrap()
            .as_deref(),
        Some("Samsung Galaxy S24")
    );
}

#[tokio::test]
async fn free_shipping_switch_toggles() {
    let driver = storefront();
    let ctx = build(
        &driver,
        &[FixtureName::HomePage, FixtureName::SearchResultsPage],
    )
    .await;
    ctx.home_page().unwrap().search_for("samsung").await.unwrap();
    let results = ctx.search_results_page().unwrap();
    let switch = results.locators().free_shipping_switch();

    assert_eq!(switch.get_attribute("checked").await.unwrap(), None);
    results.toggle_free_shipping().await.unwrap();
    assert_eq!(
        switch.get_attribute("checked").await.unwrap().as_deref(),
        Some("")
    );
}

// ============================================================================
// Mocked search
// ============================================================================

#[tokio::test]
async fn mocked_search_renders_mock_titles() {
    let driver = storefront();
    let ctx = build(
        &driver,
        &[FixtureName::HomePage, FixtureName::SearchResultsPage],
    )
    .await;
    let mock = SearchMock::from_json(include_str!(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/tests/mocks/search.mock.json"
    )))
    .unwrap();
    let html = build_search_html_from_mock(&mock, DEFAULT_MOCK_LIMIT);
    ctx.session()
        .route(
            UrlPattern::glob("**/listado.mercadolibre.com.ar/*"),
            MockResponse::html(&html),
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
    assert!(driver.was_called("route:"));
}

#[tokio::test]
async fn mocked_search_with_wrong_titles_fails() {
    let driver = storefront();
    let ctx = build(
        &driver,
        &[FixtureName::HomePage, FixtureName::SearchResultsPage],
    )
    .await;
    let mock = SearchMock {
        results: vec![SearchMockItem {
            title: "Mock Thinkpad X1".into(),
        }],
    };
    ctx.session()
        .driver()
        .route(Route::new(
            UrlPattern::Prefix(LISTADO.into()),
            MockResponse::html(&build_search_html_from_mock(&mock, 3)),
        ))
        .await
        .unwrap();

    ctx.home_page().unwrap().search_for("macbook").await.unwrap();

    let err = ctx
        .search_results_page()
        .unwrap()
        .expect_result_titles(&["Mock MacBook Air M1 256GB", "Mock MacBook Pro M2 512GB"])
        .await
        .unwrap_err();
    assert!(err.to_string().contains("expected at least 2 titles, got 1"));
}

// ============================================================================
// Sorting
// ============================================================================

#[tokio::test]
async fn sort_by_price_ascending() {
    let driver = storefront();
    let ctx = build(
        &driver,
        &[FixtureName::HomePage, FixtureName::SearchResultsPage],
    )
    .await;
    ctx.home_page().unwrap().search_for("samsung").await.unwrap();
    let results = ctx.search_results_page().unwrap();

    results.expect_results_to_be_visible().await.unwrap();
    results.select_sort_by(SortOption::PriceAsc).await.unwrap();
    results
        .expect_results_to_be_sorted_by_price(SortOrder::Asc)
        .await
        .unwrap();
    assert!(ctx.session().url().await.unwrap().contains("_OrderId_PRICE_"));
}

#[tokio::test]
async fn sort_by_price_descending() {
    let driver = storefront();
    let ctx = build(
        &driver,
        &[FixtureName::HomePage, FixtureName::SearchResultsPage],
    )
    .await;
    ctx.home_page().unwrap().search_for("xiaomi").await.unwrap();
    let results = ctx.search_results_page().unwrap();

    results.expect_results_to_be_visible().await.unwrap();
    results.select_sort_by(SortOption::PriceDesc).await.unwrap();
    results
        .expect_results_to_be_sorted_by_price(SortOrder::Desc)
        .await
        .unwrap();
    assert!(results
        .expect_results_to_be_sorted_by_price(SortOrder::Asc)
        .await
        .is_err());
}

#[tokio::test]
async fn sort_option_hidden_until_dropdown_opens() {
    let driver = storefront();
    let ctx = build(
        &driver,
        &[FixtureName::HomePage, FixtureName::SearchResultsPage],
    )
    .await;
    ctx.home_page().unwrap().search_for("samsung").await.unwrap();
    let locators = ctx.search_results_page().unwrap().locators();
    let option = locators.sort_option(SortOption::PriceDesc);

    assert!(!option.is_visible().await.unwrap());
    locators.sort_by_dropdown().click().await.unwrap();
    assert!(option.is_visible().await.unwrap());
}

// ============================================================================
// Price filter
// ============================================================================

#[tokio::test]
async fn price_filter_applies_range() {
    let driver = storefront();
    let ctx = build(
        &driver,
        &[FixtureName::HomePage, FixtureName::SearchResultsPage],
    )
    .await;
    ctx.home_page().unwrap().search_for("samsung").await.unwrap();
    let results = ctx.search_results_page().unwrap();

    results.apply_price_filter("100000", "700000").await.unwrap();
    results
        .validate_price_range_filtering("100.000", "700.000")
        .await
        .unwrap();
    assert!(ctx
        .session()
        .url()
        .await
        .unwrap()
        .ends_with("price-filter?min=100000&max=700000"));
}

#[tokio::test]
async fn price_range_reports_first_offender() {
    let driver = storefront();
    let ctx = build(
        &driver,
        &[FixtureName::HomePage, FixtureName::SearchResultsPage],
    )
    .await;
    ctx.home_page().unwrap().search_for("samsung").await.unwrap();
    let results = ctx.search_results_page().unwrap();
    results.apply_price_filter("100000", "700000").await.unwrap();

    let err = results
        .validate_price_range_filtering("200000", "500000")
        .await
        .unwrap_err();
    assert!(err.to_string().contains("result 0 priced \"$ 599.999\""));
}

#[tokio::test]
async fn price_filter_tag_missing_before_filtering() {
    let driver = storefront();
    let ctx = build(
        &driver,
        &[FixtureName::HomePage, FixtureName::SearchResultsPage],
    )
    .await;
    ctx.home_page().unwrap().search_for("samsung").await.unwrap();

    let err = ctx
        .search_results_page()
        .unwrap()
        .validate_price_filter()
        .await
        .unwrap_err();
    assert!(matches!(err, ProbeError::AssertionFailed { .. }));
}

// ============================================================================
// Product detail and cart
// ============================================================================

#[tokio::test]
async fn add_first_result_to_cart() {
    let driver = storefront();
    let ctx = build(
        &driver,
        &[
            FixtureName::HomePage,
            FixtureName::SearchResultsPage,
            FixtureName::ProductDetailPage,
            FixtureName::CartPage,
        ],
    )
    .await;
    let home = ctx.home_page().unwrap();
    let pdp = ctx.product_detail_page().unwrap();

    home.open().await.unwrap();
    home.search_for("samsung").await.unwrap();
    let results = ctx.search_results_page().unwrap();
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
    assert_eq!(name, "Samsung Galaxy A55 5G 128 GB azul oscuro 8 GB RAM");
    assert_eq!(price, "$ 599.999");
    assert!(driver.keys_pressed().contains(&"Escape".to_string()));
}

#[tokio::test]
async fn cart_mismatch_names_the_field() {
    let driver = storefront();
    let ctx = build(&driver, &[FixtureName::CartPage]).await;
    ctx.session().goto("/gz/cart").await.unwrap();

    let err = ctx
        .cart_page()
        .unwrap()
        .expect_product_in_cart("Samsung Galaxy A55", "$ 1.000")
        .await
        .unwrap_err();
    assert!(err.to_string().contains("cart product price"));
}

#[tokio::test]
async fn remove_product_empties_cart() {
    let driver = storefront();
    let ctx = build(&driver, &[FixtureName::CartPage]).await;
    ctx.session().goto("/gz/cart").await.unwrap();
    let cart = ctx.cart_page().unwrap();

    cart.remove_product().await.unwrap();

    expect(&cart.locators().product_title())
        .to_have_count(0)
        .await
        .unwrap();
    expect(&ctx.session().locator("h2"))
        .to_contain_text("vacío")
        .await
        .unwrap();
}

#[tokio::test]
async fn buy_now_follows_checkout_action() {
    let driver = storefront();
    let ctx = build(&driver, &[FixtureName::ProductDetailPage]).await;
    ctx.session()
        .goto("/samsung-galaxy-a55-5g-128-gb-azul-oscuro-8-gb-ram/p/MLA34925813")
        .await
        .unwrap();

    let err = ctx.product_detail_page().unwrap().buy_now().await.unwrap_err();
    match err {
        ProbeError::NavigationError { url, .. } => {
            assert_eq!(url, format!("{WWW}/gz/checkout/buy?item_id=MLA34925813"));
        }
        other => panic!("unexpected {other:?}"),
    }
}

// ============================================================================
// Variants
// ============================================================================

#[tokio::test]
async fn variant_selection_updates_url() {
    let driver = storefront();
    let ctx = build(
        &driver,
        &[
            FixtureName::HomePage,
            FixtureName::SearchResultsPage,
            FixtureName::ProductDetailPage,
        ],
    )
    .await;
    let pdp = ctx.product_detail_page().unwrap();

    ctx.home_page().unwrap().open().await.unwrap();
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

    pdp.expect_variant_option_to_exist("azul-oceano").await.unwrap();
    pdp.select_variant_by_url_fragment("azul-oceano").await.unwrap();
    pdp.expect_variant_applied("azul-oceano").await.unwrap();

    pdp.expect_variant_option_to_exist("128-gb-6-gb").await.unwrap();
    pdp.select_variant_by_url_fragment("128-gb-6-gb").await.unwrap();
    pdp.expect_variant_applied("128-gb-6-gb").await.unwrap();
}

#[tokio::test]
async fn variant_selection_by_label() {
    let driver = storefront();
    let ctx = build(&driver, &[FixtureName::ProductDetailPage]).await;
    ctx.session()
        .goto("/xiaomi-redmi-note-14/p/MLA44000001")
        .await
        .unwrap();
    let pdp = ctx.product_detail_page().unwrap();

    pdp.select_variant_and_expect_url_change("azul-oceano")
        .await
        .unwrap();
    assert!(ctx.session().url().await.unwrap().contains("azul-oceano"));
    assert_eq!(pdp.locators().variation_pickers().count().await.unwrap(), 2);
}

#[tokio::test]
async fn missing_variant_times_out() {
    let driver = storefront();
    let ctx = build(&driver, &[FixtureName::ProductDetailPage]).await;
    ctx.session()
        .goto("/xiaomi-redmi-note-14/p/MLA44000001")
        .await
        .unwrap();
    let pdp = ctx.product_detail_page().unwrap();

    assert!(pdp.expect_variant_option_to_exist("verde-menta").await.is_err());
    let err = pdp
        .select_variant_by_url_fragment("verde-menta")
        .await
        .unwrap_err();
    assert!(matches!(err, ProbeError::Timeout { .. }));
}

// ============================================================================
// Login
// ============================================================================

#[tokio::test]
async fn invalid_username_shows_error() {
    let driver = storefront();
    let ctx = build(&driver, &[FixtureName::LoginPage]).await;

    ctx.home_page().unwrap().open_login().await.unwrap();
    let login = ctx.login_page().unwrap();
    login.submit_username("invalid-user@test").await.unwrap();

    login.expect_identification_error(None).await.unwrap();
    login
        .expect_identification_error(Some("e-mail o usuario"))
        .await
        .unwrap();
    assert!(ctx
        .session()
        .url()
        .await
        .unwrap()
        .ends_with("identification?user_id=invalid-user%40test"));
}

#[tokio::test]
async fn identification_error_absent_on_clean_form() {
    let driver = storefront();
    let ctx = build(&driver, &[FixtureName::LoginPage]).await;
    ctx.home_page().unwrap().open_login().await.unwrap();

    let login = ctx.login_page().unwrap();
    login.handle_sso_overlay().await;
    assert!(login.expect_identification_error(None).await.is_err());
    assert!(login.locators().sso_button().is_visible().await.unwrap());
}

#[tokio::test]
async fn create_account_link_leaves_login() {
    let driver = storefront();
    let ctx = build(&driver, &[FixtureName::LoginPage]).await;
    ctx.home_page().unwrap().open_login().await.unwrap();

    ctx.login_page().unwrap().go_to_create_account().await.unwrap();

    assert_eq!(
        ctx.session().url().await.unwrap(),
        format!("{WWW}/registration")
    );
    expect(&ctx.session().locator("main.registration h1"))
        .to_contain_text("crear tu cuenta")
        .await
        .unwrap();
}

// ============================================================================
// Overlay handling
// ============================================================================

#[tokio::test]
async fn one_tap_overlay_dismissed_with_escape() {
    let driver = storefront();
    let ctx = build(&driver, &[FixtureName::SearchResultsPage]).await;
    ctx.session()
        .goto(&format!("{LISTADO}/search?as_word=xiaomi"))
        .await
        .unwrap();
    let overlay = ctx.session().locator(ONE_TAP_OVERLAY);
    assert!(overlay.is_visible().await.unwrap());

    ctx.search_results_page()
        .unwrap()
        .handle_third_party_overlays()
        .await;

    assert!(!overlay.is_visible().await.unwrap());
    assert_eq!(driver.keys_pressed(), vec!["Escape".to_string()]);
}

#[tokio::test]
async fn overlay_absent_presses_nothing() {
    let driver = storefront();
    let ctx = build(&driver, &[FixtureName::CartPage]).await;
    ctx.session().goto("/gz/cart").await.unwrap();

    ctx.cart_page().unwrap().handle_third_party_overlays().await;

    assert!(driver.keys_pressed().is_empty());
}

#[tokio::test]
async fn stuck_overlay_is_swallowed() {
    let driver = Arc::new(
        StaticDriver::new(WWW)
            .unwrap()
            .with_page(
                "/",
                r#"<div id="credential_picker_container"><iframe></iframe></div>"#,
            )
            .unwrap(),
    );
    let session = session_over(&driver);
    session.goto("/").await.unwrap();

    let started = tokio::time::Instant::now();
    CartPage::new(session.clone())
        .handle_third_party_overlays()
        .await;

    assert!(started.elapsed() >= Duration::from_millis(200));
    assert!(session.locator(ONE_TAP_OVERLAY).is_visible().await.unwrap());
}

/// Engine that fails every call
#[derive(Debug)]
struct BrokenDriver;

#[async_trait]
impl Driver for BrokenDriver {
    async fn goto(&self, url: &str) -> ProbeResult<()> {
        Err(ProbeError::NavigationError {
            url: url.into(),
            message: "target closed".into(),
        })
    }

    async fn current_url(&self) -> ProbeResult<String> {
        Err(ProbeError::PageError {
            message: "target closed".into(),
        })
    }

    async fn query(&self, _query: &Query) -> ProbeResult<Vec<ElementSnapshot>> {
        Err(ProbeError::PageError {
            message: "target closed".into(),
        })
    }

    async fn click(&self, _query: &Query) -> ProbeResult<()> {
        Err(ProbeError::PageError {
            message: "target closed".into(),
        })
    }

    async fn fill(&self, _query: &Query, _value: &str) -> ProbeResult<()> {
        Err(ProbeError::PageError {
            message: "target closed".into(),
        })
    }

    async fn press(&self, _query: &Query, _key: &str) -> ProbeResult<()> {
        Err(ProbeError::PageError {
            message: "target closed".into(),
        })
    }

    async fn keyboard_press(&self, _key: &str) -> ProbeResult<()> {
        Err(ProbeError::PageError {
            message: "target closed".into(),
        })
    }

    async fn route(&self, _route: Route) -> ProbeResult<()> {
        Ok(())
    }
}

/// Engine whose queries never answer
#[derive(Debug)]
struct HangingDriver;

#[async_trait]
impl Driver for HangingDriver {
    async fn goto(&self, _url: &str) -> ProbeResult<()> {
        Ok(())
    }

    async fn current_url(&self) -> ProbeResult<String> {
        Ok("about:blank".into())
    }

    async fn query(&self, _query: &Query) -> ProbeResult<Vec<ElementSnapshot>> {
        std::future::pending().await
    }

    async fn click(&self, _query: &Query) -> ProbeResult<()> {
        Ok(())
    }

    async fn fill(&self, _query: &Query, _value: &str) -> ProbeResult<()> {
        Ok(())
    }

    async fn press(&self, _query: &Query, _key: &str) -> ProbeResult<()> {
        Ok(())
    }

    async fn keyboard_press(&self, _key: &str) -> ProbeResult<()> {
        Ok(())
    }

    async fn route(&self, _route: Route) -> ProbeResult<()> {
        Ok(())
    }
}

#[tokio::test]
async fn overlay_handler_never_raises_on_engine_failure() {
    let page = ProductDetailPage::new(Session::new(BrokenDriver, config()));
    page.handle_third_party_overlays().await;
}

#[tokio::test]
async fn overlay_probe_is_bounded() {
    let page = HomePage::new(Session::new(HangingDriver, config()));
    tokio::time::timeout(Duration::from_secs(2), page.handle_third_party_overlays())
        .await
        .expect("overlay probe should give up after its own timeout");
}

// ============================================================================
// Fixtures
// ============================================================================

#[tokio::test]
async fn home_fixture_opens_and_accepts_cookies() {
    let driver = storefront();
    let ctx = build(&driver, &[FixtureName::HomePage]).await;

    assert_eq!(ctx.session().url().await.unwrap(), format!("{WWW}/"));
    assert_eq!(
        driver.clicks(),
        vec!["[data-testid=\"action:understood-button\"]".to_string()]
    );
}

#[tokio::test]
async fn fixtures_resolve_in_dependency_order() {
    let driver = storefront();
    let ctx = build(
        &driver,
        &[
            FixtureName::CartPage,
            FixtureName::SearchResultsPage,
            FixtureName::LoginPage,
        ],
    )
    .await;

    assert_eq!(
        ctx.resolution_order(),
        &[
            FixtureName::HomePage,
            FixtureName::CartPage,
            FixtureName::SearchResultsPage,
            FixtureName::LoginPage,
        ]
    );
    assert_eq!(ctx.state(FixtureName::HomePage), FixtureState::SetUp);
    assert_eq!(
        ctx.state(FixtureName::ProductDetailPage),
        FixtureState::Undeclared
    );
    assert!(ctx.product_detail_page().is_err());
    assert_eq!(driver.visits(), vec![format!("{WWW}/")]);
}

#[tokio::test]
async fn non_navigating_fixtures_leave_session_blank() {
    let driver = storefront();
    let ctx = build(
        &driver,
        &[FixtureName::SearchResultsPage, FixtureName::ProductDetailPage],
    )
    .await;

    assert!(driver.visits().is_empty());
    assert_eq!(ctx.session().url().await.unwrap(), "about:blank");
}

// ============================================================================
// Configuration
// ============================================================================

#[tokio::test]
async fn relative_and_absolute_navigation() {
    let driver = storefront();
    let session = session_over(&driver);

    session.goto("/gz/cart").await.unwrap();
    assert_eq!(session.url().await.unwrap(), format!("{WWW}/gz/cart"));
    session
        .goto(&format!("{LISTADO}/search?as_word=samsung"))
        .await
        .unwrap();
    assert!(session.url().await.unwrap().starts_with(LISTADO));
}
