//! Coinbase REST API client implementation.

use std::sync::Arc;

use reqwest::Method;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use reqwest_tracing::TracingMiddleware;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::auth::{
    ACCESS_KEY_HEADER, ACCESS_SIGN_HEADER, ACCESS_TIMESTAMP_HEADER, CredentialsProvider,
    StaticCredentials, SystemTimestamp, TimestampProvider, VERSION_HEADER, sign_request,
};
use crate::error::{ApiError, ApiErrorEntry, CoinbaseError};
use crate::rest::endpoints::{API_PREFIX, COINBASE_BASE_URL, DEFAULT_API_VERSION};
use crate::rest::wallet::Pagination;

/// The Coinbase REST API client.
///
/// Every request this client sends is signed: the body is serialized once,
/// that exact string is signed together with a fresh timestamp, the method
/// and the request path, and the signature travels in the `CB-ACCESS-*`
/// headers.
///
/// # Example
///
/// ```rust,no_run
/// use coinbase_api_client::rest::CoinbaseRestClient;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = CoinbaseRestClient::new("api_key", "api_secret")?;
///
///     let rate = client.get_exchange_rate("BTC", "EUR").await?;
///     println!("1 BTC = {rate} EUR");
///
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct CoinbaseRestClient {
    http_client: ClientWithMiddleware,
    // Same transport without transient retries, for non-idempotent requests.
    single_shot_client: ClientWithMiddleware,
    base_url: String,
    api_version: String,
    credentials: Arc<dyn CredentialsProvider>,
    timestamps: Arc<dyn TimestampProvider>,
    debug: bool,
}

impl CoinbaseRestClient {
    /// Create a client with default settings from an API key and secret.
    pub fn new(
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Result<Self, CoinbaseError> {
        let credentials = StaticCredentials::new(api_key, api_secret)?;
        Self::builder().credentials(Arc::new(credentials)).build()
    }

    /// Create a new client builder.
    pub fn builder() -> CoinbaseRestClientBuilder {
        CoinbaseRestClientBuilder::new()
    }

    /// The API version sent in the `CB-VERSION` header.
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// Make a signed GET request to a full request path (query included).
    pub(crate) async fn signed_get<T>(
        &self,
        request_path: &str,
    ) -> Result<Envelope<T>, CoinbaseError>
    where
        T: serde::de::DeserializeOwned,
    {
        self.send_signed(Method::GET, request_path, None).await
    }

    /// Make a signed GET request with query parameters.
    pub(crate) async fn signed_get_with_params<T, Q>(
        &self,
        endpoint: &str,
        params: &Q,
    ) -> Result<Envelope<T>, CoinbaseError>
    where
        T: serde::de::DeserializeOwned,
        Q: serde::Serialize + ?Sized,
    {
        let query_string = serde_urlencoded::to_string(params)
            .map_err(|e| CoinbaseError::Validation(e.to_string()))?;
        let request_path = if query_string.is_empty() {
            endpoint.to_string()
        } else {
            format!("{}?{}", endpoint, query_string)
        };
        self.signed_get(&request_path).await
    }

    /// Make a signed POST request with a JSON body.
    pub(crate) async fn signed_post<T, B>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<Envelope<T>, CoinbaseError>
    where
        T: serde::de::DeserializeOwned,
        B: serde::Serialize,
    {
        // The signed string and the transmitted body must be the same bytes.
        let body = serde_json::to_string(body)?;
        self.send_signed(Method::POST, endpoint, Some(body)).await
    }

    async fn send_signed<T>(
        &self,
        method: Method,
        request_path: &str,
        body: Option<String>,
    ) -> Result<Envelope<T>, CoinbaseError>
    where
        T: serde::de::DeserializeOwned,
    {
        if !request_path.starts_with(API_PREFIX) {
            return Err(CoinbaseError::Validation(format!(
                "request path {request_path:?} must start with {API_PREFIX}"
            )));
        }

        let creds = self.credentials.get_credentials();
        let signed = sign_request(
            creds,
            self.timestamps.as_ref(),
            method.as_str(),
            request_path,
            body.as_deref().unwrap_or(""),
        );

        debug!(method = %method, path = request_path, "sending signed request");

        let url = format!("{}{}", self.base_url, request_path);
        // A replayed POST would repeat its side effect, e.g. a second send.
        let http_client = if method == Method::GET {
            &self.http_client
        } else {
            &self.single_shot_client
        };
        let mut request = http_client
            .request(method.clone(), &url)
            .header(ACCESS_KEY_HEADER, &creds.api_key)
            .header(ACCESS_SIGN_HEADER, signed.signature)
            .header(ACCESS_TIMESTAMP_HEADER, signed.timestamp.to_string())
            .header(VERSION_HEADER, &self.api_version);

        if let Some(body) = body {
            request = request.header(CONTENT_TYPE, "application/json").body(body);
        }

        let response = request.send().await?;
        self.parse_response(&method, request_path, response).await
    }

    /// Parse a response from the Coinbase API.
    async fn parse_response<T>(
        &self,
        method: &Method,
        request_path: &str,
        response: reqwest::Response,
    ) -> Result<Envelope<T>, CoinbaseError>
    where
        T: serde::de::DeserializeOwned,
    {
        let status = response.status();
        let body = response.text().await?;

        if self.debug {
            debug!(status = status.as_u16(), body = %body, "received response");
        }

        if !status.is_success() {
            let errors = match serde_json::from_str::<ErrorEnvelope>(&body) {
                Ok(parsed) => parsed.errors,
                Err(_) if body.trim().is_empty() => Vec::new(),
                Err(_) => vec![ApiErrorEntry {
                    id: "unknown".to_string(),
                    message: body,
                }],
            };
            let error = ApiError::new(method.as_str(), request_path, status.as_u16(), errors);
            warn!(error = %error, "Coinbase API request failed");
            return Err(CoinbaseError::Api(error));
        }

        let parsed: Envelope<T> = serde_json::from_str(&body).map_err(|e| {
            CoinbaseError::InvalidResponse(format!(
                "Failed to parse response: {}. Body: {}",
                e, body
            ))
        })?;

        for warning in &parsed.warnings {
            warn!(id = %warning.id, message = %warning.message, "Coinbase API warning");
        }

        Ok(parsed)
    }
}

impl std::fmt::Debug for CoinbaseRestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoinbaseRestClient")
            .field("base_url", &self.base_url)
            .field("api_version", &self.api_version)
            .field("credentials", self.credentials.get_credentials())
            .field("debug", &self.debug)
            .finish()
    }
}

/// Builder for [`CoinbaseRestClient`].
pub struct CoinbaseRestClientBuilder {
    base_url: String,
    api_version: String,
    credentials: Option<Arc<dyn CredentialsProvider>>,
    timestamps: Option<Arc<dyn TimestampProvider>>,
    user_agent: Option<String>,
    max_retries: u32,
    debug: bool,
}

impl CoinbaseRestClientBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            base_url: COINBASE_BASE_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            credentials: None,
            timestamps: None,
            user_agent: None,
            max_retries: 3,
            debug: false,
        }
    }

    /// Set the base URL (useful for testing with a mock server).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the date-stamped API version sent in `CB-VERSION`.
    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Set the credentials provider. Required.
    pub fn credentials(mut self, credentials: Arc<dyn CredentialsProvider>) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Set a custom timestamp provider.
    pub fn timestamp_provider(mut self, provider: Arc<dyn TimestampProvider>) -> Self {
        self.timestamps = Some(provider);
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Set the maximum number of retries for transient failures.
    ///
    /// Only GET requests are retried; POST requests are sent once.
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Log response bodies at debug level.
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Build the client.
    ///
    /// Fails with [`CoinbaseError::MissingCredentials`] if no credentials were
    /// provided, or [`CoinbaseError::Config`] for an unusable base URL or
    /// version tag.
    pub fn build(self) -> Result<CoinbaseRestClient, CoinbaseError> {
        let credentials = self.credentials.ok_or(CoinbaseError::MissingCredentials)?;

        let base_url = self.base_url.trim_end_matches('/').to_string();
        url::Url::parse(&base_url)
            .map_err(|e| CoinbaseError::Config(format!("invalid base URL {base_url:?}: {e}")))?;

        // Build default headers.
        let mut headers = HeaderMap::new();
        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("coinbase-api-client/{}", env!("CARGO_PKG_VERSION")));
        let header_value = HeaderValue::from_str(&user_agent)
            .unwrap_or_else(|_| HeaderValue::from_static("coinbase-api-client"));
        headers.insert(USER_AGENT, header_value);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if self.api_version.trim().is_empty() || HeaderValue::from_str(&self.api_version).is_err() {
            return Err(CoinbaseError::Config(format!(
                "invalid API version {:?}",
                self.api_version
            )));
        }

        // Build the HTTP client with middleware.
        let reqwest_client = reqwest::Client::builder().default_headers(headers).build()?;

        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(self.max_retries);

        let client = ClientBuilder::new(reqwest_client.clone())
            .with(TracingMiddleware::default())
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();
        let single_shot_client = ClientBuilder::new(reqwest_client)
            .with(TracingMiddleware::default())
            .build();

        let timestamps = self
            .timestamps
            .unwrap_or_else(|| Arc::new(SystemTimestamp::new()));

        Ok(CoinbaseRestClient {
            http_client: client,
            single_shot_client,
            base_url,
            api_version: self.api_version,
            credentials,
            timestamps,
            debug: self.debug,
        })
    }
}

impl Default for CoinbaseRestClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Response wrapper for successful Coinbase API responses.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub(crate) data: T,
    #[serde(default)]
    pub(crate) pagination: Option<Pagination>,
    #[serde(default)]
    warnings: Vec<ApiWarning>,
}

#[derive(Debug, Deserialize)]
struct ApiWarning {
    #[serde(default)]
    id: String,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    errors: Vec<ApiErrorEntry>,
}
