use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 分页查询参数
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/pagination.ts")]
pub struct PaginationQuery {
    #[serde(
        default = "default_page",
        deserialize_with = "deserialize_string_to_i64"
    )]
    pub page: i64,
    #[serde(
        default = "default_size",
        deserialize_with = "deserialize_string_to_i64"
    )]
    pub size: i64,
}

// 分页响应信息
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/pagination.ts")]
pub struct PaginationInfo {
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
    pub total_pages: i64,
}

// 分页列表响应
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/pagination.ts")]
pub struct PaginatedResponse<T: TS> {
    pub items: Vec<T>,
    pub pagination: PaginationInfo,
}

// 自定义反序列化函数，支持字符串到i64的转换
fn deserialize_string_to_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{Error, Unexpected, Visitor};
    use std::fmt;

    struct I64Visitor;

    impl<'de> Visitor<'de> for I64Visitor {
        type Value = i64;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("an integer or a string containing an integer")
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: Error,
        {
            Ok(value)
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: Error,
        {
            if value <= i64::MAX as u64 {
                Ok(value as i64)
            } else {
                Err(Error::invalid_value(Unexpected::Unsigned(value), &self))
            }
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: Error,
        {
            value
                .parse()
                .map_err(|_| Error::invalid_value(Unexpected::Str(value), &self))
        }
    }

    deserializer.deserialize_any(I64Visitor)
}

fn default_page() -> i64 {
    1
}

fn default_size() -> i64 {
    10
}

/// 页码上限，保证偏移量 (page - 1) * size 不会溢出
pub const MAX_PAGE: u64 = 100_000;
/// 每页条数上限
pub const MAX_PAGE_SIZE: u64 = 100;

/// 存储层使用的页码与每页条数
pub fn clamp_page(page: u64, size: u64) -> (u64, u64) {
    (page.clamp(1, MAX_PAGE), size.clamp(1, MAX_PAGE_SIZE))
}

impl PaginationQuery {
    /// 规范化页码与每页条数：1 <= page <= MAX_PAGE，1 <= size <= 100
    pub fn normalized(&self) -> (u64, u64) {
        clamp_page(self.page.max(1) as u64, self.size.max(1) as u64)
    }
}

impl Default for PaginationQuery {
    fn default() -> Self {
        Self { page: 1, size: 10 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_string_numbers() {
        let query: PaginationQuery = serde_json::from_str(r#"{"page":"3","size":"25"}"#).unwrap();
        assert_eq!((query.page, query.size), (3, 25));

        let query: PaginationQuery = serde_json::from_str(r#"{"page":2}"#).unwrap();
        assert_eq!((query.page, query.size), (2, 10));

        assert!(serde_json::from_str::<PaginationQuery>(r#"{"page":"two"}"#).is_err());
    }

    #[test]
    fn test_normalized_bounds() {
        assert_eq!(PaginationQuery { page: 0, size: 0 }.normalized(), (1, 1));
        assert_eq!(PaginationQuery { page: -4, size: 500 }.normalized(), (1, 100));
        assert_eq!(PaginationQuery::default().normalized(), (1, 10));
        assert_eq!(
            PaginationQuery { page: i64::MAX, size: 100 }.normalized(),
            (MAX_PAGE, 100)
        );
    }

    #[test]
    fn test_huge_page_from_query_string() {
        let query: PaginationQuery =
            serde_json::from_str(r#"{"page":"9223372036854775807"}"#).unwrap();
        let (page, size) = query.normalized();
        assert_eq!(page, MAX_PAGE);
        assert!((page - 1).checked_mul(size).is_some());
    }
}
