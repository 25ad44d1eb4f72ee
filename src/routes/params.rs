use serde::{Deserialize, Deserializer, de::Error as _};
use utoipa::ToSchema;

use crate::{domain::lifecycle::OrderStatus, error::AppError, models::Role};

// Flattened query structs hand every value over as a string.
#[derive(Deserialize)]
#[serde(untagged)]
enum Raw<T> {
    Value(T),
    Text(String),
}

fn lenient_int<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
    match Option::<Raw<i64>>::deserialize(d)? {
        None => Ok(None),
        Some(Raw::Value(v)) => Ok(Some(v)),
        Some(Raw::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(Raw::Text(s)) => s.trim().parse().map(Some).map_err(D::Error::custom),
    }
}

fn lenient_flag<'de, D: Deserializer<'de>>(d: D) -> Result<Option<bool>, D::Error> {
    match Option::<Raw<bool>>::deserialize(d)? {
        None => Ok(None),
        Some(Raw::Value(v)) => Ok(Some(v)),
        Some(Raw::Text(s)) => match s.trim() {
            "" => Ok(None),
            "true" | "1" => Ok(Some(true)),
            "false" | "0" => Ok(Some(false)),
            other => Err(D::Error::custom(format!("invalid flag {other}"))),
        },
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct Pagination {
    #[serde(default, deserialize_with = "lenient_int")]
    pub page: Option<i64>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub per_page: Option<i64>,
}

impl Pagination {
    pub fn normalize(&self) -> (i64, i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self.per_page.unwrap_or(20).clamp(1, 100);
        let offset = (page - 1).saturating_mul(per_page);
        (page, per_page, offset)
    }
}

#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct KitchenQuery {
    #[serde(flatten)]
    pub pagination: Pagination,
    pub q: Option<String>,
    pub cuisine: Option<String>,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub vegetarian: Option<bool>,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub subscription: Option<bool>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct OrderListQuery {
    #[serde(flatten)]
    pub pagination: Pagination,
    pub status: Option<String>,
    pub sort_order: Option<SortOrder>,
}

impl OrderListQuery {
    /// Empty means no filter; anything else must name a known status.
    pub fn status_filter(&self) -> Result<Option<OrderStatus>, AppError> {
        match self.status.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            None => Ok(None),
            Some(raw) => OrderStatus::parse(raw)
                .map(Some)
                .ok_or_else(|| AppError::BadRequest(format!("unknown order status {raw}"))),
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UserListQuery {
    #[serde(flatten)]
    pub pagination: Pagination,
    pub role: Option<Role>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_clamps_page_size() {
        let p = Pagination {
            page: Some(0),
            per_page: Some(500),
        };
        assert_eq!(p.normalize(), (1, 100, 0));
        assert_eq!(Pagination::default().normalize(), (1, 20, 0));
    }

    #[test]
    fn huge_page_numbers_saturate() {
        let p = Pagination {
            page: Some(i64::MAX),
            per_page: Some(100),
        };
        let (page, per_page, offset) = p.normalize();
        assert_eq!((page, per_page), (i64::MAX, 100));
        assert_eq!(offset, i64::MAX);

        let (items, meta) = crate::response::paginate(vec![1, 2, 3], page, per_page, offset);
        assert!(items.is_empty());
        assert_eq!(meta.total, Some(3));
    }

    #[test]
    fn status_filter_rejects_unknown_values() {
        let query = OrderListQuery {
            status: Some("shipped".into()),
            ..Default::default()
        };
        assert!(query.status_filter().is_err());

        let query = OrderListQuery {
            status: Some(" ready ".into()),
            ..Default::default()
        };
        assert_eq!(query.status_filter().unwrap(), Some(OrderStatus::Ready));
    }

    #[test]
    fn flattened_query_parses_numbers_and_flags() {
        let query: KitchenQuery =
            serde_json::from_value(serde_json::json!({ "page": "2", "per_page": "5", "vegetarian": "true" }))
                .unwrap();
        assert_eq!(query.pagination.normalize(), (2, 5, 5));
        assert_eq!(query.vegetarian, Some(true));
        assert_eq!(query.subscription, None);
    }
}
