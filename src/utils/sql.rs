use sea_orm::sea_query::LikeExpr;

/// LIKE 模式的转义字符
const LIKE_ESCAPE: char = '\\';

/// 转义 LIKE 通配符，使 `%` 和 `_` 按字面匹配
pub fn escape_like_pattern(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}

/// 子串匹配表达式，显式声明转义字符（SQLite 的 LIKE 没有默认转义符）
pub fn contains_literal(search: &str) -> LikeExpr {
    LikeExpr::new(format!("%{}%", escape_like_pattern(search))).escape(LIKE_ESCAPE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like_pattern() {
        assert_eq!(escape_like_pattern("Week 1"), "Week 1");
        assert_eq!(escape_like_pattern("100%"), "100\\%");
        assert_eq!(escape_like_pattern("W_ek"), "W\\_ek");
        assert_eq!(escape_like_pattern("a\\b"), "a\\\\b");
    }
}
