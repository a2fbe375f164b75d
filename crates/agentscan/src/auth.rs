use async_trait::async_trait;

/// Supplies the bearer credential for conversation requests.
///
/// The client only needs a token and an authenticated flag; where the token
/// comes from (wallet session, OAuth refresh, fixture) is the caller's
/// business.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Current access token, if any. Called once per request so rotating
    /// providers stay fresh.
    async fn access_token(&self) -> Option<String>;

    fn is_authenticated(&self) -> bool;
}

/// A fixed token, or anonymous when none is set.
pub struct StaticToken {
    token: Option<String>,
}

impl StaticToken {
    pub fn new<S: Into<String>>(token: S) -> Self {
        Self {
            token: Some(token.into()),
        }
    }

    pub fn anonymous() -> Self {
        Self { token: None }
    }
}

#[async_trait]
impl TokenProvider for StaticToken {
    async fn access_token(&self) -> Option<String> {
        self.token.clone()
    }

    fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_token() {
        let provider = StaticToken::new("secret");
        assert!(provider.is_authenticated());
        assert_eq!(provider.access_token().await.as_deref(), Some("secret"));

        let anon = StaticToken::anonymous();
        assert!(!anon.is_authenticated());
        assert_eq!(anon.access_token().await, None);
    }
}
