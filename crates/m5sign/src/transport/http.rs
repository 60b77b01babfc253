use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response, Url};
use tracing::debug;

use super::{Transport, decode_signature_payload};
use crate::codec::RawSignature;
use crate::config::HttpConfig;
use crate::digest::digest_hex;
use crate::error::{Error, Result, TransportError};

const PUBLIC_KEY_PATH: &str = "publickey";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Talks to the authority's web endpoint.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    sign_url: Url,
    public_key_url: Url,
    request_timeout: Duration,
}

impl HttpTransport {
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let sign_url = Url::parse(&config.base_url).map_err(|e| {
            TransportError::Connection(format!("invalid base URL {}: {e}", config.base_url))
        })?;
        let public_key_url = sign_url
            .join(PUBLIC_KEY_PATH)
            .map_err(|e| TransportError::Connection(format!("resolving public key URL: {e}")))?;
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| TransportError::Connection(format!("building HTTP client: {e}")))?;

        Ok(Self {
            client,
            sign_url,
            public_key_url,
            request_timeout: config.request_timeout,
        })
    }

    pub fn sign_url(&self) -> &Url {
        &self.sign_url
    }

    pub fn public_key_url(&self) -> &Url {
        &self.public_key_url
    }

    fn request_error(&self, error: reqwest::Error) -> Error {
        if error.is_timeout() {
            Error::TransportTimeout(self.request_timeout)
        } else if let Some(status) = error.status() {
            TransportError::Protocol(format!("authority answered {status}")).into()
        } else {
            TransportError::Connection(error.to_string()).into()
        }
    }

    fn check(&self, response: reqwest::Result<Response>) -> Result<Response> {
        response
            .and_then(Response::error_for_status)
            .map_err(|e| self.request_error(e))
    }
}

impl Transport for HttpTransport {
    async fn get_public_key(&mut self) -> Result<String> {
        debug!(url = %self.public_key_url, "requesting public key");
        let request = self.client.get(self.public_key_url.clone());
        let response = self.check(request.send().await)?;
        let body = response.text().await.map_err(|e| self.request_error(e))?;
        Ok(body.trim().to_string())
    }

    async fn request_signature(&mut self, message: &[u8]) -> Result<RawSignature> {
        let hex_digest = digest_hex(message);
        debug!(url = %self.sign_url, digest = %hex_digest, "requesting signature");
        let request = self
            .client
            .post(self.sign_url.clone())
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(format!("digest={hex_digest}"));
        let response = self.check(request.send().await)?;
        let body = response.bytes().await.map_err(|e| self.request_error(e))?;
        decode_signature_payload(&body)
    }
}
