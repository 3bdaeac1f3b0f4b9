// Storefront page objects.
//
// Each page wraps a borrowed `Session` with the selectors and user flows of
// one site page. Pages are transient views, not state: constructing one
// performs no document access, and flows that leave the page return the
// destination page object.

mod cart;
mod checkout;
mod home;
mod login;
mod product;
mod search;

pub use cart::CartPage;
pub use checkout::{CheckoutPage, ShippingDetails};
pub use home::HomePage;
pub use login::LoginPage;
pub use product::ProductPage;
pub use search::SearchResultsPage;
