use super::ProductPage;
use crate::element::Element;
use crate::error::Result;
use crate::query::Query;
use crate::session::Session;

/// Search results: a list of product cards plus a sort control.
pub struct SearchResultsPage<'a> {
    session: &'a Session,
}

impl<'a> SearchResultsPage<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    pub fn result_cards() -> Query {
        Query::test_id("product-card")
    }

    fn sort_select() -> Query {
        Query::test_id("sort-order")
    }

    pub fn empty_state() -> Query {
        Query::text("No products found")
    }

    /// One handle per product card, document order. Empty when the search
    /// matched nothing.
    pub async fn results(&self) -> Result<Vec<Element>> {
        self.session.resolve_all(Self::result_cards()).await
    }

    pub async fn sort_by(&self, order: &str) -> Result<()> {
        self.session.select_by_value(Self::sort_select(), order).await
    }

    /// Opens the `index`-th result's product page.
    pub async fn open_result(self, index: usize) -> Result<ProductPage<'a>> {
        let card = self.session.resolve(Self::result_cards()).await?.nth(index);
        self.session.click_and_navigate(card, None).await?;
        Ok(ProductPage::new(self.session))
    }
}
