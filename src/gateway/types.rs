use serde::Serialize;
use utoipa::ToSchema;

// ============================================================================
// Unified API Response Format
// ============================================================================

/// Unified API response wrapper
///
/// All API responses follow this structure:
/// - code: 0 = success, non-zero = error code
/// - msg: short message description
/// - data: actual data (success) or null (error)
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response code: 0 for success, non-zero for errors
    #[schema(example = 0)]
    pub code: i32,
    /// Response message
    #[schema(example = "ok")]
    pub msg: String,
    /// Response data (only present when code == 0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Create success response
    pub fn success(data: T) -> Self {
        Self {
            code: 0,
            msg: "ok".to_string(),
            data: Some(data),
        }
    }

    /// Create error response
    pub fn error(code: i32, msg: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            code,
            msg: msg.into(),
            data: None,
        }
    }
}

/// Pagination block returned alongside list payloads
#[derive(Debug, Serialize, ToSchema)]
pub struct Pagination {
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 10)]
    pub limit: u32,
    #[schema(example = 42)]
    pub total_items: i64,
    #[schema(example = 5)]
    pub total_pages: i64,
}

impl Pagination {
    pub fn new(page: u32, limit: u32, total_items: i64) -> Self {
        let limit_i64 = i64::from(limit.max(1));
        Self {
            page,
            limit,
            total_items,
            total_pages: (total_items + limit_i64 - 1) / limit_i64,
        }
    }
}

/// Error codes
pub mod error_codes {
    // Success
    pub const SUCCESS: i32 = 0;

    // Client errors (1xxx)
    pub const INVALID_PARAMETER: i32 = 1001;

    // Auth errors (2xxx)
    pub const MISSING_AUTH: i32 = 2001;
    pub const AUTH_FAILED: i32 = 2002;

    // Resource errors (3xxx)
    pub const RESOURCE_NOT_FOUND: i32 = 3001;
    pub const RESOURCE_CONFLICT: i32 = 3002;
    pub const LIMIT_EXCEEDED: i32 = 3003;

    // Server errors (5xxx)
    pub const INTERNAL_ERROR: i32 = 5000;
    pub const SERVICE_UNAVAILABLE: i32 = 5001;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_response_shape() {
        let resp = ApiResponse::success(7);
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["code"], 0);
        assert_eq!(json["msg"], "ok");
        assert_eq!(json["data"], 7);
    }

    #[test]
    fn test_error_response_omits_data() {
        let resp = ApiResponse::<()>::error(error_codes::RESOURCE_NOT_FOUND, "User not found");
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["code"], 3001);
        assert_eq!(json["msg"], "User not found");
        assert!(json.get("data").is_none());
    }

    #[test]
    fn test_pagination_rounds_up() {
        let p = Pagination::new(1, 10, 42);
        assert_eq!(p.total_pages, 5);

        let p = Pagination::new(2, 10, 40);
        assert_eq!(p.total_pages, 4);

        let p = Pagination::new(1, 10, 0);
        assert_eq!(p.total_pages, 0);
    }

    #[test]
    fn test_pagination_guards_zero_limit() {
        let p = Pagination::new(1, 0, 5);
        assert_eq!(p.total_pages, 5);
    }
}
