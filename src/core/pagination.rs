//! 分页参数

/// 默认每页条数
pub const DEFAULT_LIMIT: u32 = 100;
/// 单次请求允许的最大条数
pub const MAX_LIMIT: u32 = 1000;

pub fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

/// skip/limit 分页窗口，直接绑定到 SQL 的 `LIMIT ? OFFSET ?`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub skip: i64,
    pub limit: i64,
}

impl Page {
    pub fn new(skip: u32, limit: u32) -> Self {
        Self {
            skip: i64::from(skip),
            limit: i64::from(limit.min(MAX_LIMIT)),
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(0, DEFAULT_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_is_capped() {
        assert_eq!(Page::new(10, 5000), Page { skip: 10, limit: 1000 });
        assert_eq!(Page::default(), Page { skip: 0, limit: 100 });
    }
}
