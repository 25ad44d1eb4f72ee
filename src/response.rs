use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema, Clone)]
pub struct Meta {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub total: Option<i64>,
}

impl Meta {
    pub fn new(page: i64, per_page: i64, total: i64) -> Self {
        Self {
            page: Some(page),
            per_page: Some(per_page),
            total: Some(total),
        }
    }

    pub fn empty() -> Self {
        Self {
            page: None,
            per_page: None,
            total: None,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub message: String,
    pub data: Option<T>,
    pub meta: Option<Meta>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T, meta: Option<Meta>) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
            meta,
        }
    }
}

/// Slice one page out of an already filtered and sorted list.
pub fn paginate<T>(items: Vec<T>, page: i64, per_page: i64, offset: i64) -> (Vec<T>, Meta) {
    let total = items.len() as i64;
    let page_items = items
        .into_iter()
        .skip(offset.max(0) as usize)
        .take(per_page.max(0) as usize)
        .collect();
    (page_items, Meta::new(page, per_page, total))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paginate_reports_full_total() {
        let (items, meta) = paginate((1..=25).collect::<Vec<_>>(), 2, 10, 10);
        assert_eq!(items, (11..=20).collect::<Vec<_>>());
        assert_eq!(meta.total, Some(25));
        assert_eq!(meta.page, Some(2));
    }

    #[test]
    fn paginate_past_end_is_empty() {
        let (items, meta) = paginate(vec![1, 2, 3], 5, 20, 80);
        assert!(items.is_empty());
        assert_eq!(meta.total, Some(3));
    }
}
