use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Serialize;
use url::Url;

use super::{BackendError, BackendResult, ShopBackend};
use crate::Config;
use crate::model::{Lesson, LessonKey};
use crate::order::{OrderReceipt, OrderRequest};

#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client, // cloning is cheap, the client is an Arc inside
    base_url: Url,
}

#[derive(Debug, Serialize)]
struct SpacesUpdate {
    spaces: u32,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Duration) -> BackendResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Self::with_client(base_url, client)
    }

    /// Uses a caller-built client, e.g. one with its own proxy or TLS setup.
    pub fn with_client(base_url: &str, client: Client) -> BackendResult<Self> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(BackendError::UrlNotABase(base_url.to_string()));
        }

        Ok(Self { client, base_url })
    }

    pub fn from_config(config: &Config) -> BackendResult<Self> {
        Self::new(config.backend().base_url(), config.backend().timeout())
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends path segments to the base url, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> BackendResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| BackendError::UrlNotABase(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn checked(response: Response) -> BackendResult<Response> {
        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::status(status.as_u16(), response.url().as_str()));
        }
        Ok(response)
    }
}

#[async_trait]
impl ShopBackend for HttpBackend {
    #[tracing::instrument(skip(self))]
    async fn fetch_lessons(&self) -> BackendResult<Vec<Lesson>> {
        let url = self.endpoint(&["lessons"])?;
        let response = Self::checked(self.client.get(url).send().await?)?;
        Ok(response.json().await?)
    }

    #[tracing::instrument(skip(self))]
    async fn search_lessons(&self, query: &str) -> BackendResult<Vec<Lesson>> {
        let mut url = self.endpoint(&["search"])?;
        let query = query.trim();
        if !query.is_empty() {
            url.query_pairs_mut().append_pair("q", query);
        }

        let response = Self::checked(self.client.get(url).send().await?)?;
        Ok(response.json().await?)
    }

    #[tracing::instrument(skip(self, order), fields(lines = order.items.len()))]
    async fn create_order(&self, order: &OrderRequest) -> BackendResult<OrderReceipt> {
        let url = self.endpoint(&["orders"])?;
        let response = Self::checked(self.client.post(url).json(order).send().await?)?;

        // the body is optional, any 2xx counts as placed
        let body = response.bytes().await?;
        if body.is_empty() {
            return Ok(OrderReceipt::default());
        }
        match serde_json::from_slice(&body) {
            Ok(receipt) => Ok(receipt),
            Err(e) => {
                tracing::debug!("order response is not a receipt: {e}");
                Ok(OrderReceipt::default())
            }
        }
    }

    #[tracing::instrument(skip(self))]
    async fn update_spaces(&self, key: &LessonKey, spaces: u32) -> BackendResult<()> {
        let url = self.endpoint(&["lessons", key.as_str()])?;
        Self::checked(
            self.client
                .put(url)
                .json(&SpacesUpdate { spaces })
                .send()
                .await?,
        )?;
        Ok(())
    }
}
