//! SeaORM 实体
//!
//! 时间列统一存 Unix 秒，转换为业务模型时还原为 UTC 时间。

pub mod prelude;

pub mod materials;
pub mod students;
pub mod users;

use chrono::{DateTime, Utc};

/// Unix 秒转 UTC 时间，越界时回落到纪元起点
pub(crate) fn from_unix(secs: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(secs, 0).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_unix() {
        assert_eq!(from_unix(0), DateTime::<Utc>::UNIX_EPOCH);
        assert_eq!(from_unix(1_700_000_000).timestamp(), 1_700_000_000);
        assert_eq!(from_unix(i64::MAX), DateTime::<Utc>::UNIX_EPOCH);
    }
}
