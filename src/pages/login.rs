use crate::error::Result;
use crate::query::Query;
use crate::session::Session;

/// The sign-in page.
pub struct LoginPage<'a> {
    session: &'a Session,
}

impl<'a> LoginPage<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    fn email() -> Query {
        Query::label("Email address")
    }

    fn password() -> Query {
        Query::label("Password")
    }

    fn submit() -> Query {
        Query::role_named("button", "Sign in")
    }

    pub fn error_banner() -> Query {
        Query::test_id("login-error")
    }

    pub async fn open(session: &'a Session) -> Result<Self> {
        session.goto("/login").await?;
        Ok(Self::new(session))
    }

    /// Signs in and waits for the post-login navigation.
    pub async fn login(&self, email: &str, password: &str) -> Result<()> {
        self.session.fill(Self::email(), email, None).await?;
        self.session.fill(Self::password(), password, None).await?;
        self.session.click_and_navigate(Self::submit(), None).await
    }

    /// Submits credentials expected to be rejected; no navigation happens.
    pub async fn login_expecting_error(&self, email: &str, password: &str) -> Result<()> {
        self.session.fill(Self::email(), email, None).await?;
        self.session.fill(Self::password(), password, None).await?;
        self.session.click(Self::submit(), None).await
    }
}
