//! HTTP implementation of the preview transport.

use std::time::Duration;

use n0_future::time::timeout;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Url};
use richtext_preview_core::{
    PreviewConfig, PreviewTransport, RenderOutcome, RenderRequest, TokenProvider, TransportError,
    decode_response,
};

/// Posts form-encoded previews to the endpoint with the page's token.
#[derive(Debug, Clone)]
pub struct HttpTransport<T> {
    client: Client,
    endpoint: Url,
    token_header: String,
    timeout: Duration,
    tokens: T,
}

impl<T: TokenProvider> HttpTransport<T> {
    pub fn new(endpoint: Url, config: &PreviewConfig, tokens: T) -> Self {
        Self {
            client: Client::new(),
            endpoint,
            token_header: config.token_header.clone(),
            timeout: config.timeout(),
            tokens,
        }
    }

    async fn send(&self, request: &RenderRequest) -> Result<RenderOutcome, TransportError> {
        let mut builder = self
            .client
            .post(self.endpoint.clone())
            .header("X-Requested-With", "XMLHttpRequest")
            .form(&request.form_fields());
        if let Some(token) = self.tokens.token() {
            builder = builder.header(self.token_header.as_str(), token);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Malformed(e.to_string()))?;

        decode_response(status, content_type.as_deref(), &body)
    }
}

impl<T: TokenProvider> PreviewTransport for HttpTransport<T> {
    async fn render(&self, request: &RenderRequest) -> Result<RenderOutcome, TransportError> {
        match timeout(self.timeout, self.send(request)).await {
            Ok(result) => result,
            Err(_) => Err(TransportError::Timeout(self.timeout.as_millis() as u64)),
        }
    }
}
