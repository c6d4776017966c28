use crate::fetch::client::HttpClient;
use anyhow::Result;
use async_trait::async_trait;
use reqwest::header::{HeaderName, HeaderValue};

/// An [`HttpClient`] wrapper that injects an API key as an HTTP header.
///
/// The backend's REST gateway wants the project key twice, once as `apikey`
/// and once as a bearer token, so the usual setup nests two wrappers:
/// `ApiKey::new(ApiKey::bearer(inner, key)?, "apikey", key)?`.
pub struct ApiKey<C> {
    inner: C,
    header_name: HeaderName,
    value: HeaderValue,
}

impl<C> ApiKey<C> {
    /// Validates the header up front so requests never fail on a bad name.
    pub fn new(inner: C, header_name: &str, key: &str) -> Result<Self> {
        let header_name = HeaderName::from_bytes(header_name.as_bytes())?;
        let mut value = HeaderValue::from_str(key)?;
        value.set_sensitive(true);
        Ok(Self {
            inner,
            header_name,
            value,
        })
    }

    /// `Authorization: Bearer <key>`.
    pub fn bearer(inner: C, key: &str) -> Result<Self> {
        Self::new(inner, "Authorization", &format!("Bearer {key}"))
    }
}

#[async_trait]
impl<C: HttpClient> HttpClient for ApiKey<C> {
    async fn execute(&self, mut req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        req.headers_mut()
            .insert(self.header_name.clone(), self.value.clone());
        self.inner.execute(req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::BasicClient;

    #[test]
    fn test_rejects_invalid_header_name() {
        assert!(ApiKey::new(BasicClient::new(), "bad header", "k").is_err());
    }

    #[test]
    fn test_rejects_invalid_header_value() {
        assert!(ApiKey::new(BasicClient::new(), "apikey", "line\nbreak").is_err());
    }

    #[test]
    fn test_bearer_prefixes_key() {
        let auth = ApiKey::bearer(BasicClient::new(), "secret").unwrap();
        assert_eq!(auth.header_name, "authorization");
        assert_eq!(auth.value, "Bearer secret");
        assert!(auth.value.is_sensitive());
    }
}
