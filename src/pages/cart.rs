use super::CheckoutPage;
use crate::element::Element;
use crate::error::Result;
use crate::query::Query;
use crate::session::Session;

/// The shopping cart: line items, coupon entry, order summary.
pub struct CartPage<'a> {
    session: &'a Session,
}

impl<'a> CartPage<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    pub fn line_items() -> Query {
        Query::test_id("cart-line")
    }

    fn coupon_input() -> Query {
        Query::placeholder("Coupon code")
    }

    fn apply_coupon_button() -> Query {
        Query::role_named("button", "Apply")
    }

    pub fn discount_row() -> Query {
        Query::test_id("discount-row")
    }

    pub fn total() -> Query {
        Query::test_id("cart-total")
    }

    pub async fn open(session: &'a Session) -> Result<Self> {
        session.goto("/cart").await?;
        Ok(Self::new(session))
    }

    pub async fn items(&self) -> Result<Vec<Element>> {
        self.session.resolve_all(Self::line_items()).await
    }

    /// Applies a coupon and waits for the discount row to appear.
    pub async fn apply_coupon(&self, code: &str) -> Result<()> {
        self.session.fill(Self::coupon_input(), code, None).await?;
        self.session.click(Self::apply_coupon_button(), None).await?;
        self.session
            .expect(Self::discount_row())
            .await?
            .to_be_visible()
            .await
    }

    /// Removes the `index`-th line item via its remove button (buttons share
    /// the lines' document order).
    pub async fn remove_item(&self, index: usize) -> Result<()> {
        let button = self
            .session
            .resolve(Query::test_id("remove-line"))
            .await?
            .nth(index);
        self.session.click(button, None).await
    }

    pub async fn proceed_to_checkout(self) -> Result<CheckoutPage<'a>> {
        self.session
            .click_and_navigate(Query::role_named("button", "Checkout"), None)
            .await?;
        Ok(CheckoutPage::new(self.session))
    }
}
