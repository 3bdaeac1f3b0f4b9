use crate::error::Result;
use crate::query::Query;
use crate::session::Session;

/// Shipping details for the checkout form.
#[derive(Debug, Clone)]
pub struct ShippingDetails {
    pub full_name: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

/// The checkout page. Card fields live inside the payment-provider iframe
/// and are addressed through its frame boundary.
pub struct CheckoutPage<'a> {
    session: &'a Session,
}

impl<'a> CheckoutPage<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    const PAYMENT_FRAME: &'static str = "iframe#payment";

    fn card_number() -> Query {
        Query::within(Self::PAYMENT_FRAME, Query::test_id("card-number"))
    }

    fn card_expiry() -> Query {
        Query::within(Self::PAYMENT_FRAME, Query::test_id("card-expiry"))
    }

    fn card_cvc() -> Query {
        Query::within(Self::PAYMENT_FRAME, Query::test_id("card-cvc"))
    }

    fn terms_checkbox() -> Query {
        Query::label("I agree to the terms of sale")
    }

    fn place_order_button() -> Query {
        Query::role_named("button", "Place order")
    }

    pub fn confirmation() -> Query {
        Query::test_id("order-confirmation")
    }

    pub async fn fill_shipping(&self, details: &ShippingDetails) -> Result<()> {
        self.session
            .fill(Query::label("Full name"), &details.full_name, None)
            .await?;
        self.session
            .fill(Query::label("Address"), &details.address, None)
            .await?;
        self.session
            .fill(Query::label("City"), &details.city, None)
            .await?;
        self.session
            .fill(Query::label("Postal code"), &details.postal_code, None)
            .await?;
        self.session
            .select_by_text(Query::label("Country"), &details.country)
            .await
    }

    /// Fills the card fields through the payment iframe.
    pub async fn fill_payment(&self, number: &str, expiry: &str, cvc: &str) -> Result<()> {
        self.session.fill(Self::card_number(), number, None).await?;
        self.session.fill(Self::card_expiry(), expiry, None).await?;
        self.session.fill(Self::card_cvc(), cvc, None).await
    }

    pub async fn accept_terms(&self) -> Result<()> {
        self.session.check(Self::terms_checkbox(), None).await
    }

    /// Places the order and waits for the confirmation page.
    pub async fn place_order(&self) -> Result<()> {
        self.session
            .click_and_navigate(Self::place_order_button(), None)
            .await?;
        self.session
            .expect(Self::confirmation())
            .await?
            .to_be_visible()
            .await
    }
}
