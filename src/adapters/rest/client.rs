//! RestBookingApi - reqwest implementation of the remote data and
//! submission ports.
//!
//! # Endpoints
//!
//! - `GET  {base}/availability?start_date&end_date&region_id&search&exclude_booking_id`
//! - `GET  {base}/resources?region_id&search`
//! - `GET  {base}/calendar/bi-weeks/{year}`
//! - `POST {base}/bookings` (create) / `PUT {base}/bookings/{id}` (edit)
//!
//! # Configuration
//!
//! ```ignore
//! let config = RestApiConfig::new("https://booking.example.com/api")
//!     .with_token(token)
//!     .with_timeout(Duration::from_secs(10));
//! let api = RestBookingApi::new(config)?;
//! ```

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use secrecy::{ExposeSecret, Secret};
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::dto::{map_all, BookingCreatedDto, ResourceDto, SlotDto};
use crate::config::ApiConfig;
use crate::domain::availability::AvailabilityQuery;
use crate::domain::catalog::{Resource, ResourceFilter};
use crate::domain::foundation::BookingId;
use crate::domain::period::Slot;
use crate::domain::wizard::BookingPayload;
use crate::ports::{
    AvailabilitySource, BiWeekCalendarProvider, BookingReceipt, BookingSubmitter, CatalogSource,
    FetchError, SubmitError,
};

/// Configuration for the REST adapter.
#[derive(Debug, Clone)]
pub struct RestApiConfig {
    /// Base URL, without trailing slash.
    pub base_url: String,
    /// Bearer token for authentication.
    token: Option<Secret<String>>,
    /// Request timeout.
    pub timeout: Duration,
}

impl RestApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
            timeout: Duration::from_secs(30),
        }
    }

    /// Sets the bearer token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(Secret::new(token.into()));
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn token(&self) -> Option<&str> {
        self.token.as_ref().map(|t| t.expose_secret().as_str())
    }
}

impl From<&ApiConfig> for RestApiConfig {
    fn from(config: &ApiConfig) -> Self {
        let rest = RestApiConfig::new(config.base_url.clone()).with_timeout(config.timeout());
        match &config.api_token {
            Some(token) => rest.with_token(token.clone()),
            None => rest,
        }
    }
}

/// REST client for the booking backend.
#[derive(Debug, Clone)]
pub struct RestBookingApi {
    config: RestApiConfig,
    client: Client,
}

impl RestBookingApi {
    pub fn new(config: RestApiConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| FetchError::Network(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { config, client })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url, path.trim_start_matches('/'))
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match self.config.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn map_send_error(&self, e: reqwest::Error) -> FetchError {
        if e.is_timeout() {
            FetchError::Timeout {
                timeout_secs: self.config.timeout.as_secs(),
            }
        } else if e.is_connect() {
            FetchError::Network(format!("Connection failed: {}", e))
        } else {
            FetchError::Network(e.to_string())
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, FetchError> {
        self.authorized(request)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))
    }

    /// Maps non-success statuses to errors.
    async fn handle_response_status(response: Response) -> Result<Response, FetchError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        match status.as_u16() {
            401 | 403 => Err(FetchError::Unauthorized),
            code => Err(FetchError::Server { status: code, body }),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&'static str, String)],
    ) -> Result<T, FetchError> {
        let response = self.send(self.client.get(self.url(path)).query(params)).await?;
        let response = Self::handle_response_status(response).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| FetchError::Decode(format!("Failed to parse response: {}", e)))
    }
}

/// Query parameters for `GET /availability`. Absent fields are omitted.
pub(crate) fn availability_params(query: &AvailabilityQuery) -> Vec<(&'static str, String)> {
    let mut params = Vec::new();
    if let Some(start) = query.start_date {
        params.push(("start_date", start.to_string()));
    }
    if let Some(end) = query.end_date {
        params.push(("end_date", end.to_string()));
    }
    params.extend(filter_params(&query.filter()));
    if let Some(booking) = &query.exclude_booking_id {
        params.push(("exclude_booking_id", booking.to_string()));
    }
    params
}

/// Query parameters for `GET /resources`.
pub(crate) fn filter_params(filter: &ResourceFilter) -> Vec<(&'static str, String)> {
    let filter = filter.clone().normalized();
    let mut params = Vec::new();
    if let Some(region) = filter.region {
        params.push(("region_id", region.to_string()));
    }
    if let Some(text) = filter.text {
        params.push(("search", text));
    }
    params
}

#[async_trait]
impl AvailabilitySource for RestBookingApi {
    async fn fetch_available(
        &self,
        query: &AvailabilityQuery,
    ) -> Result<Vec<Resource>, FetchError> {
        let items: Vec<ResourceDto> = self
            .get_json("availability", &availability_params(query))
            .await?;
        tracing::debug!(count = items.len(), "availability response");
        map_all(items)
    }
}

#[async_trait]
impl CatalogSource for RestBookingApi {
    async fn fetch_catalog(&self, filter: &ResourceFilter) -> Result<Vec<Resource>, FetchError> {
        let items: Vec<ResourceDto> = self.get_json("resources", &filter_params(filter)).await?;
        map_all(items)
    }
}

#[async_trait]
impl BiWeekCalendarProvider for RestBookingApi {
    async fn slots_for_year(&self, year: i32) -> Result<Vec<Slot>, FetchError> {
        let items: Vec<SlotDto> = self
            .get_json(&format!("calendar/bi-weeks/{}", year), &[])
            .await?;
        map_all(items)
    }
}

#[async_trait]
impl BookingSubmitter for RestBookingApi {
    async fn submit(
        &self,
        editing: Option<&BookingId>,
        payload: &BookingPayload,
    ) -> Result<BookingReceipt, SubmitError> {
        let request = match editing {
            Some(id) => self.client.put(self.url(&format!("bookings/{}", id))),
            None => self.client.post(self.url("bookings")),
        };
        let response = self.send(request.json(payload)).await?;

        let status = response.status();
        if status.is_client_error() && status.as_u16() != 401 && status.as_u16() != 403 {
            let body = response.text().await.unwrap_or_default();
            return Err(SubmitError::Rejected {
                status: status.as_u16(),
                body,
            });
        }
        let response = Self::handle_response_status(response).await?;

        if let Some(id) = editing {
            return Ok(BookingReceipt {
                booking_id: id.clone(),
            });
        }
        let created: BookingCreatedDto = response
            .json()
            .await
            .map_err(|e| FetchError::Decode(format!("Failed to parse response: {}", e)))?;
        let booking_id =
            BookingId::new(created.id).map_err(|e| FetchError::Decode(e.to_string()))?;
        Ok(BookingReceipt { booking_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::RegionId;
    use chrono::NaiveDate;

    #[test]
    fn config_builder_works() {
        let config = RestApiConfig::new("https://booking.example.com/api/")
            .with_token("t0ken")
            .with_timeout(Duration::from_secs(5));

        assert_eq!(config.base_url, "https://booking.example.com/api");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.token(), Some("t0ken"));
    }

    #[test]
    fn config_from_app_config() {
        let api = ApiConfig {
            base_url: "http://localhost:4000".to_string(),
            api_token: None,
            timeout_secs: 12,
        };
        let config = RestApiConfig::from(&api);
        assert_eq!(config.timeout, Duration::from_secs(12));
        assert_eq!(config.token(), None);
    }

    #[test]
    fn url_joins_paths() {
        let api = RestBookingApi::new(RestApiConfig::new("http://localhost:4000/")).unwrap();
        assert_eq!(api.url("/availability"), "http://localhost:4000/availability");
        assert_eq!(
            api.url("calendar/bi-weeks/2026"),
            "http://localhost:4000/calendar/bi-weeks/2026"
        );
    }

    #[test]
    fn availability_params_skip_absent_fields() {
        let query = AvailabilityQuery {
            start_date: NaiveDate::from_ymd_opt(2026, 1, 1),
            end_date: NaiveDate::from_ymd_opt(2026, 1, 28),
            region_filter: Some(RegionId::new("north").unwrap()),
            text_filter: Some("  ".to_string()),
            exclude_booking_id: Some(BookingId::new("B-1").unwrap()),
        };
        assert_eq!(
            availability_params(&query),
            vec![
                ("start_date", "2026-01-01".to_string()),
                ("end_date", "2026-01-28".to_string()),
                ("region_id", "north".to_string()),
                ("exclude_booking_id", "B-1".to_string()),
            ]
        );
    }

    #[test]
    fn filter_params_trim_search_text() {
        let filter = ResourceFilter::new(None, Some("  Avenue ".to_string()));
        assert_eq!(filter_params(&filter), vec![("search", "Avenue".to_string())]);
    }
}
