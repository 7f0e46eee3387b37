use anyhow::{Context, Result};
use reqwest::Client;
use std::future::Future;

/// Outbound delivery of a form-encoded alert payload.
pub trait AlertTransport {
    fn post_form(
        &self,
        url: &str,
        form: &[(&str, &str)],
    ) -> impl Future<Output = Result<()>> + Send;
}

/// reqwest-backed transport. No timeout and no retry: a hung endpoint stalls
/// the caller until the connection gives up.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

impl AlertTransport for HttpTransport {
    async fn post_form(&self, url: &str, form: &[(&str, &str)]) -> Result<()> {
        let response = self
            .client
            .post(url)
            .form(form)
            .send()
            .await
            .context("Failed to reach messaging endpoint")?;

        // Delivery status is not acted upon, only transport failures are.
        tracing::debug!(status = %response.status(), "alert endpoint responded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http_stub::serve_once;

    #[tokio::test]
    async fn test_post_form_encodes_fields() {
        let (base, server) = serve_once(200, r#"{"ok":true}"#).await;
        let url = format!("{}/botTOKEN/sendMessage", base);

        HttpTransport::new()
            .post_form(&url, &[("chat_id", "42"), ("text", "hello world & more")])
            .await
            .unwrap();

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /botTOKEN/sendMessage HTTP/1.1"));
        assert!(
            request
                .to_ascii_lowercase()
                .contains("content-type: application/x-www-form-urlencoded")
        );
        assert!(request.ends_with("chat_id=42&text=hello+world+%26+more"));
    }

    #[tokio::test]
    async fn test_rejected_delivery_is_not_an_error() {
        let (base, server) = serve_once(400, r#"{"ok":false}"#).await;
        let url = format!("{}/botTOKEN/sendMessage", base);

        let result = HttpTransport::new().post_form(&url, &[("text", "hi")]).await;
        assert!(result.is_ok());
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_an_error() {
        let err = HttpTransport::new()
            .post_form("http://127.0.0.1:9/botTOKEN/sendMessage", &[("text", "hi")])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to reach messaging endpoint"));
    }
}
