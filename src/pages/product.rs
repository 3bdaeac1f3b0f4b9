use super::CartPage;
use crate::error::Result;
use crate::query::Query;
use crate::session::Session;

/// A product detail page.
pub struct ProductPage<'a> {
    session: &'a Session,
}

impl<'a> ProductPage<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    pub fn title() -> Query {
        Query::test_id("product-title")
    }

    pub fn price() -> Query {
        Query::test_id("product-price")
    }

    fn size_select() -> Query {
        Query::test_id("size-select")
    }

    fn quantity() -> Query {
        Query::label("Quantity")
    }

    fn add_to_cart() -> Query {
        Query::role_named("button", "Add to cart")
    }

    pub fn added_toast() -> Query {
        Query::text("Added to cart")
    }

    pub async fn select_size(&self, size: &str) -> Result<()> {
        self.session.select_by_text(Self::size_select(), size).await
    }

    pub async fn set_quantity(&self, quantity: u32) -> Result<()> {
        self.session
            .fill(Self::quantity(), &quantity.to_string(), None)
            .await
    }

    /// Adds the product to the cart and waits for the confirmation toast.
    pub async fn add_to_cart_and_confirm(&self) -> Result<()> {
        self.session.click(Self::add_to_cart(), None).await?;
        self.session
            .expect(Self::added_toast())
            .await?
            .to_be_visible()
            .await
    }

    /// Opens the cart via the header link.
    pub async fn open_cart(self) -> Result<CartPage<'a>> {
        self.session
            .click_and_navigate(Query::test_id("cart-link"), None)
            .await?;
        Ok(CartPage::new(self.session))
    }
}
