//! Remote catalog/order service.

use async_trait::async_trait;

use crate::model::{Lesson, LessonKey};
use crate::order::{OrderReceipt, OrderRequest};

mod error;
pub use error::{BackendError, BackendResult};

mod http;
pub use http::HttpBackend;

#[async_trait]
pub trait ShopBackend: Send + Sync {
    /// `GET /lessons`
    async fn fetch_lessons(&self) -> BackendResult<Vec<Lesson>>;

    /// `GET /search?q=`, an empty query returns the whole catalog.
    async fn search_lessons(&self, query: &str) -> BackendResult<Vec<Lesson>>;

    /// `POST /orders`
    async fn create_order(&self, order: &OrderRequest) -> BackendResult<OrderReceipt>;

    /// `PUT /lessons/{subject}`
    async fn update_spaces(&self, key: &LessonKey, spaces: u32) -> BackendResult<()>;
}
