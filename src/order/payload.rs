use serde::{Deserialize, Serialize};

use crate::model::{CartLine, LessonKey};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub key: LessonKey,
    pub qty: u32,
}

/// Body of `POST /orders`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub name: String,
    pub phone: String,
    pub lesson_subjects: Vec<LessonKey>,
    pub spaces: u32,
    pub items: Vec<OrderItem>,
}

impl OrderRequest {
    pub fn from_lines(name: &str, phone: &str, lines: &[CartLine]) -> Self {
        let items: Vec<OrderItem> = lines
            .iter()
            .map(|l| OrderItem {
                key: l.key().clone(),
                qty: l.quantity(),
            })
            .collect();

        Self {
            name: name.trim().to_string(),
            phone: phone.trim().to_string(),
            lesson_subjects: items.iter().map(|i| i.key.clone()).collect(),
            spaces: items.iter().map(|i| i.qty).sum(),
            items,
        }
    }
}

/// Whatever the backend answers to an order; only the identifier is read.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderReceipt {
    #[serde(rename = "orderId")]
    order_id: Option<serde_json::Value>,
    id: Option<serde_json::Value>,
    #[serde(rename = "_id")]
    underscore_id: Option<serde_json::Value>,
}

impl OrderReceipt {
    #[cfg(test)]
    pub(crate) fn with_id<S: Into<String>>(id: S) -> Self {
        Self {
            order_id: Some(serde_json::Value::String(id.into())),
            ..Self::default()
        }
    }

    /// First of `orderId`, `id`, `_id` that carries a usable value.
    pub fn order_id(&self) -> Option<String> {
        [&self.order_id, &self.id, &self.underscore_id]
            .into_iter()
            .flatten()
            .find_map(|v| match v {
                serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
                serde_json::Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
    }
}
