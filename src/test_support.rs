//! In-memory backend for controller tests.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::backend::{BackendError, BackendResult, ShopBackend};
use crate::model::{Lesson, LessonKey};
use crate::order::{OrderReceipt, OrderRequest};

#[derive(Debug, Default)]
pub(crate) struct FakeBackend {
    lessons: Vec<Lesson>,
    search_result: Option<Vec<Lesson>>,
    order_id: Option<String>,
    fail_fetch: bool,
    fail_orders: bool,
    fail_updates_for: HashSet<LessonKey>,
    orders: Mutex<Vec<OrderRequest>>,
    space_updates: Mutex<Vec<(LessonKey, u32)>>,
}

impl FakeBackend {
    pub(crate) fn with_lessons(mut self, lessons: Vec<Lesson>) -> Self {
        self.lessons = lessons;
        self
    }

    pub(crate) fn with_search_result(mut self, lessons: Vec<Lesson>) -> Self {
        self.search_result = Some(lessons);
        self
    }

    pub(crate) fn with_order_id(mut self, id: &str) -> Self {
        self.order_id = Some(id.to_string());
        self
    }

    pub(crate) fn failing_fetch(mut self) -> Self {
        self.fail_fetch = true;
        self
    }

    pub(crate) fn failing_orders(mut self) -> Self {
        self.fail_orders = true;
        self
    }

    pub(crate) fn failing_updates_for(mut self, subject: &str) -> Self {
        self.fail_updates_for.insert(LessonKey::from(subject));
        self
    }

    pub(crate) fn orders(&self) -> Vec<OrderRequest> {
        self.orders.lock().unwrap().clone()
    }

    pub(crate) fn space_updates(&self) -> Vec<(LessonKey, u32)> {
        self.space_updates.lock().unwrap().clone()
    }
}

#[async_trait]
impl ShopBackend for FakeBackend {
    async fn fetch_lessons(&self) -> BackendResult<Vec<Lesson>> {
        if self.fail_fetch {
            return Err(BackendError::status(503, "fake://lessons"));
        }
        Ok(self.lessons.clone())
    }

    async fn search_lessons(&self, query: &str) -> BackendResult<Vec<Lesson>> {
        if self.fail_fetch {
            return Err(BackendError::status(503, "fake://search"));
        }
        if query.trim().is_empty() {
            return Ok(self.lessons.clone());
        }
        Ok(self.search_result.clone().unwrap_or_default())
    }

    async fn create_order(&self, order: &OrderRequest) -> BackendResult<OrderReceipt> {
        if self.fail_orders {
            return Err(BackendError::status(500, "fake://orders"));
        }
        self.orders.lock().unwrap().push(order.clone());
        Ok(match &self.order_id {
            Some(id) => OrderReceipt::with_id(id.as_str()),
            None => OrderReceipt::default(),
        })
    }

    async fn update_spaces(&self, key: &LessonKey, spaces: u32) -> BackendResult<()> {
        if self.fail_updates_for.contains(key) {
            return Err(BackendError::status(404, format!("fake://lessons/{key}")));
        }
        self.space_updates.lock().unwrap().push((key.clone(), spaces));
        Ok(())
    }
}
