use super::SearchResultsPage;
use crate::error::Result;
use crate::query::Query;
use crate::session::Session;

/// The landing page: global search box, navigation bar, cart badge.
pub struct HomePage<'a> {
    session: &'a Session,
}

impl<'a> HomePage<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    fn search_box() -> Query {
        Query::placeholder("Search products")
    }

    fn search_button() -> Query {
        Query::role_named("button", "Search")
    }

    pub fn cart_badge() -> Query {
        Query::test_id("cart-badge")
    }

    pub async fn open(session: &'a Session) -> Result<Self> {
        session.goto("/").await?;
        Ok(Self::new(session))
    }

    /// Submits a search and lands on the results page.
    pub async fn search(self, term: &str) -> Result<SearchResultsPage<'a>> {
        self.session.fill(Self::search_box(), term, None).await?;
        self.session
            .click_and_navigate(Self::search_button(), None)
            .await?;
        Ok(SearchResultsPage::new(self.session))
    }

    /// Number shown on the cart badge, `0` when the badge is hidden.
    pub async fn cart_count(&self) -> Result<usize> {
        let badge = self.session.resolve(Self::cart_badge()).await?;
        if !badge.is_visible().await? {
            return Ok(0);
        }
        let text = badge.inner_text().await?;
        Ok(text.trim().parse().unwrap_or(0))
    }
}
