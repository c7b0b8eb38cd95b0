//! Fixture Composer
//!
//! Builds the page objects a test declares, in dependency order, on one
//! shared [`Session`]. Undeclared fixtures are never constructed.
//!
//! ```ignore
//! let ctx = Fixtures::new(session)
//!     .with(FixtureName::HomePage)
//!     .with(FixtureName::SearchResultsPage)
//!     .build()
//!     .await?;
//! ctx.home_page()?.search_for("iphone").await?;
//! ctx.search_results_page()?.expect_results_to_be_visible().await?;
//! ```
//!
//! Side effects: the home page fixture opens `/` (and clears the cookie
//! banner) during setup, so a test starts on the storefront home. The cart
//! and login fixtures depend on it and therefore start there too. Search
//! results and product detail leave the session where it was. Teardown is
//! dropping the context.

use crate::pages::{
    CartPage, HomePage, LoginPage, PageObject, ProductDetailPage, SearchResultsPage,
};
use crate::result::{ProbeError, ProbeResult};
use crate::session::Session;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::Hash;

/// Fixtures a test can declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FixtureName {
    /// [`HomePage`]
    HomePage,
    /// [`SearchResultsPage`]
    SearchResultsPage,
    /// [`ProductDetailPage`]
    ProductDetailPage,
    /// [`CartPage`]
    CartPage,
    /// [`LoginPage`]
    LoginPage,
}

impl FixtureName {
    /// Every fixture
    pub const ALL: [Self; 5] = [
        Self::HomePage,
        Self::SearchResultsPage,
        Self::ProductDetailPage,
        Self::CartPage,
        Self::LoginPage,
    ];

    /// Name as used in test declarations
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::HomePage => "homePage",
            Self::SearchResultsPage => "searchResultsPage",
            Self::ProductDetailPage => "pdpPage",
            Self::CartPage => "cartPage",
            Self::LoginPage => "loginPage",
        }
    }

    /// Fixtures that must be set up first. The cart and the login form are
    /// reached through the home page header.
    #[must_use]
    pub const fn dependencies(self) -> &'static [Self] {
        match self {
            Self::CartPage | Self::LoginPage => &[Self::HomePage],
            Self::HomePage | Self::SearchResultsPage | Self::ProductDetailPage => &[],
        }
    }

    /// Whether declaring this fixture navigates the session, either in its
    /// own setup or through a dependency
    #[must_use]
    pub fn navigates_on_setup(self) -> bool {
        matches!(self, Self::HomePage)
            || self
                .dependencies()
                .iter()
                .any(|dep| dep.navigates_on_setup())
    }
}

impl fmt::Display for FixtureName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle of one fixture within a context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FixtureState {
    /// Not needed by this test
    Undeclared,
    /// Constructed and ready
    SetUp,
    /// Setup raised
    Failed,
}

/// Depth-first topological order of `requested` plus their transitive
/// dependencies. Dependencies come before dependents; otherwise declaration
/// order is kept.
///
/// # Errors
///
/// Returns [`ProbeError::FixtureError`] on a dependency cycle
pub fn resolve_order<T, F, I>(requested: &[T], dependencies: F) -> ProbeResult<Vec<T>>
where
    T: Copy + Eq + Hash + fmt::Debug,
    F: Fn(T) -> I,
    I: IntoIterator<Item = T>,
{
    fn visit<T, F, I>(
        node: T,
        dependencies: &F,
        done: &mut HashSet<T>,
        path: &mut Vec<T>,
        order: &mut Vec<T>,
    ) -> ProbeResult<()>
    where
        T: Copy + Eq + Hash + fmt::Debug,
        F: Fn(T) -> I,
        I: IntoIterator<Item = T>,
    {
        if done.contains(&node) {
            return Ok(());
        }
        if path.contains(&node) {
            path.push(node);
            return Err(ProbeError::FixtureError {
                message: format!("dependency cycle: {path:?}"),
            });
        }
        path.push(node);
        for dep in dependencies(node) {
            visit(dep, dependencies, done, path, order)?;
        }
        path.pop();
        done.insert(node);
        order.push(node);
        Ok(())
    }

    let mut done = HashSet::new();
    let mut order = Vec::new();
    for &node in requested {
        visit(node, &dependencies, &mut done, &mut Vec::new(), &mut order)?;
    }
    Ok(order)
}

/// Per-test fixture declaration
#[derive(Debug, Clone)]
pub struct Fixtures {
    session: Session,
    declared: Vec<FixtureName>,
}

impl Fixtures {
    /// Start declaring fixtures for `session`
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self {
            session,
            declared: Vec::new(),
        }
    }

    /// Declare one fixture
    #[must_use]
    pub fn with(mut self, name: FixtureName) -> Self {
        if !self.declared.contains(&name) {
            self.declared.push(name);
        }
        self
    }

    /// Declare several fixtures
    #[must_use]
    pub fn with_all(self, names: impl IntoIterator<Item = FixtureName>) -> Self {
        names.into_iter().fold(self, Self::with)
    }

    /// Set up declared fixtures and their dependencies, in order
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::FixtureError`] naming the fixture whose setup
    /// failed
    pub async fn build(self) -> ProbeResult<FixtureContext> {
        let order = resolve_order(&self.declared, |name: FixtureName| {
            name.dependencies().iter().copied()
        })?;
        let mut ctx = FixtureContext {
            session: self.session,
            order: Vec::new(),
            states: HashMap::new(),
            home: None,
            search_results: None,
            product_detail: None,
            cart: None,
            login: None,
        };

        for name in order {
            tracing::debug!(fixture = %name, "fixture setup");
            if let Err(err) = ctx.set_up(name).await {
                ctx.states.insert(name, FixtureState::Failed);
                return Err(ProbeError::FixtureError {
                    message: format!("Fixture '{name}' setup failed: {err}"),
                });
            }
            ctx.states.insert(name, FixtureState::SetUp);
            ctx.order.push(name);
        }
        tracing::info!(fixtures = ?ctx.order, "fixtures ready");
        Ok(ctx)
    }
}

/// Live page objects for one test
#[derive(Debug)]
pub struct FixtureContext {
    session: Session,
    order: Vec<FixtureName>,
    states: HashMap<FixtureName, FixtureState>,
    home: Option<HomePage>,
    search_results: Option<SearchResultsPage>,
    product_detail: Option<ProductDetailPage>,
    cart: Option<CartPage>,
    login: Option<LoginPage>,
}

fn undeclared(name: FixtureName) -> ProbeError {
    ProbeError::FixtureError {
        message: format!("fixture '{name}' was not declared for this test"),
    }
}

impl FixtureContext {
    async fn set_up(&mut self, name: FixtureName) -> ProbeResult<()> {
        let session = self.session.clone();
        match name {
            FixtureName::HomePage => {
                let home = HomePage::new(session);
                home.open().await?;
                self.home = Some(home);
            }
            FixtureName::SearchResultsPage => {
                self.search_results = Some(SearchResultsPage::new(session));
            }
            FixtureName::ProductDetailPage => {
                self.product_detail = Some(ProductDetailPage::new(session));
            }
            FixtureName::CartPage => self.cart = Some(CartPage::new(session)),
            FixtureName::LoginPage => self.login = Some(LoginPage::new(session)),
        }
        Ok(())
    }

    /// Shared session
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Order fixtures were set up in
    #[must_use]
    pub fn resolution_order(&self) -> &[FixtureName] {
        &self.order
    }

    /// State of `name` in this context
    #[must_use]
    pub fn state(&self, name: FixtureName) -> FixtureState {
        self.states
            .get(&name)
            .copied()
            .unwrap_or(FixtureState::Undeclared)
    }

    /// Home page fixture
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::FixtureError`] if it was not declared
    pub fn home_page(&self) -> ProbeResult<&HomePage> {
        self.home
            .as_ref()
            .ok_or_else(|| undeclared(FixtureName::HomePage))
    }

    /// Search results fixture
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::FixtureError`] if it was not declared
    pub fn search_results_page(&self) -> ProbeResult<&SearchResultsPage> {
        self.search_results
            .as_ref()
            .ok_or_else(|| undeclared(FixtureName::SearchResultsPage))
    }

    /// Product detail fixture
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::FixtureError`] if it was not declared
    pub fn product_detail_page(&self) -> ProbeResult<&ProductDetailPage> {
        self.product_detail
            .as_ref()
            .ok_or_else(|| undeclared(FixtureName::ProductDetailPage))
    }

    /// Cart fixture
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::FixtureError`] if it was not declared
    pub fn cart_page(&self) -> ProbeResult<&CartPage> {
        self.cart
            .as_ref()
            .ok_or_else(|| undeclared(FixtureName::CartPage))
    }

    /// Login fixture
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::FixtureError`] if it was not declared
    pub fn login_page(&self) -> ProbeResult<&LoginPage> {
        self.login
            .as_ref()
            .ok_or_else(|| undeclared(FixtureName::LoginPage))
    }
}
