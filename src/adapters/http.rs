use crate::core::LoanBook;
use crate::domain::model::{Activity, ActivityFilter, Community, LoanRequest};
use crate::utils::error::{LendError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

/// 透過後端 REST API 取得借款資料
///
/// - `GET {base}/requests`, `GET {base}/requests/{id}`
/// - `GET {base}/communities`, `GET {base}/communities/{id}`
/// - `GET {base}/activities?kind=all|lend|request`
#[derive(Debug, Clone)]
pub struct HttpLoanBook {
    client: Client,
    base_url: Url,
}

impl HttpLoanBook {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, Duration::from_secs(30))
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let parsed = Url::parse(base_url).map_err(|e| LendError::InvalidConfigValueError {
            field: "source.endpoint".to_string(),
            value: base_url.to_string(),
            reason: format!("Invalid URL format: {}", e),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(LendError::InvalidConfigValueError {
                field: "source.endpoint".to_string(),
                value: base_url.to_string(),
                reason: "URL cannot be used as a base".to_string(),
            });
        }

        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: parsed,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn fetch<T: DeserializeOwned>(&self, url: Url, query: &[(&str, &str)]) -> Result<Option<T>> {
        tracing::debug!("Making API request to: {}", url);
        let response = self.client.get(url.clone()).query(query).send().await?;
        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            tracing::warn!("Backend returned {} for {}", status, url);
            return Err(LendError::BackendError {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        Ok(Some(serde_json::from_str(&body)?))
    }

    async fn fetch_list<T: DeserializeOwned>(&self, segments: &[&str], query: &[(&str, &str)]) -> Result<Vec<T>> {
        let url = self.endpoint(segments);
        // 列表端點不該 404
        self.fetch(url.clone(), query)
            .await?
            .ok_or_else(|| LendError::BackendError {
                status: StatusCode::NOT_FOUND.as_u16(),
                url: url.to_string(),
            })
    }
}

#[async_trait]
impl LoanBook for HttpLoanBook {
    async fn list_requests(&self) -> Result<Vec<LoanRequest>> {
        self.fetch_list(&["requests"], &[]).await
    }

    async fn request_by_id(&self, id: &str) -> Result<Option<LoanRequest>> {
        self.fetch(self.endpoint(&["requests", id]), &[]).await
    }

    async fn list_communities(&self) -> Result<Vec<Community>> {
        self.fetch_list(&["communities"], &[]).await
    }

    async fn community_by_id(&self, id: &str) -> Result<Option<Community>> {
        self.fetch(self.endpoint(&["communities", id]), &[]).await
    }

    async fn list_activities(&self, filter: ActivityFilter) -> Result<Vec<Activity>> {
        self.fetch_list(&["activities"], &[("kind", filter.key())]).await
    }
}
