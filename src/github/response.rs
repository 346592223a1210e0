use thiserror::Error;

use super::rate_limit::RateLimit;

pub const STATUS_TRANSPORT_FAILURE: u16 = 0;
const STATUS_NOT_FOUND: u16 = 404;

pub fn is_success_status(status: u16) -> bool {
    (200..300).contains(&status)
}

/// Why a call did not produce a payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// No response was received: connection, DNS, timeout or cancellation.
    #[error("{0}")]
    Transport(String),
    /// GitHub answered with a non-2xx status; holds the raw response body.
    #[error("{0}")]
    Http(String),
    /// GitHub answered 2xx but the body did not match the expected shape.
    #[error("failed to decode response with status {status}: {message}")]
    Decode { status: u16, message: String },
}

impl ApiError {
    pub fn message(&self) -> &str {
        match self {
            Self::Transport(message) | Self::Http(message) => message,
            Self::Decode { message, .. } => message,
        }
    }
}

/// Interpretation of endpoints that answer yes/no through 204 vs 404.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Presence {
    Present,
    Absent,
    Error { status: u16, message: String },
}

/// Outcome of a single API call.
///
/// `data` is only set on a 2xx status and `error` only otherwise. Transport
/// and decode failures both report status 0 and are told apart by the
/// [`ApiError`] variant.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse<T> {
    pub status: u16,
    pub data: Option<T>,
    pub error: Option<ApiError>,
    pub rate_limit: Option<RateLimit>,
}

impl<T> ApiResponse<T> {
    pub(crate) fn success(status: u16, data: T, rate_limit: Option<RateLimit>) -> Self {
        Self {
            status,
            data: Some(data),
            error: None,
            rate_limit,
        }
    }

    pub(crate) fn failure(status: u16, error: ApiError, rate_limit: Option<RateLimit>) -> Self {
        Self {
            status,
            data: None,
            error: Some(error),
            rate_limit,
        }
    }

    pub(crate) fn transport_failure(message: impl Into<String>) -> Self {
        Self::failure(
            STATUS_TRANSPORT_FAILURE,
            ApiError::Transport(message.into()),
            None,
        )
    }

    pub fn is_success(&self) -> bool {
        is_success_status(self.status)
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_ref().map(ApiError::message)
    }

    /// Reads a 204/404 style check: any 2xx is present, 404 is absent.
    pub fn presence(&self) -> Presence {
        if self.is_success() {
            return Presence::Present;
        }
        if self.status == STATUS_NOT_FOUND {
            return Presence::Absent;
        }
        Presence::Error {
            status: self.status,
            message: self.error_message().unwrap_or_default().to_string(),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResponse<U> {
        ApiResponse {
            status: self.status,
            data: self.data.map(f),
            error: self.error,
            rate_limit: self.rate_limit,
        }
    }

    pub fn into_result(self) -> Result<T, ApiError> {
        match (self.data, self.error) {
            (Some(data), _) => Ok(data),
            (None, Some(error)) => Err(error),
            (None, None) => Err(ApiError::Decode {
                status: self.status,
                message: "response carried no payload".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ApiError, ApiResponse, Presence, is_success_status};

    #[test]
    fn success_is_exactly_the_2xx_range() {
        for status in [200, 201, 204, 299] {
            assert!(is_success_status(status), "{status}");
        }
        for status in [0, 100, 199, 300, 304, 404, 500, 599] {
            assert!(!is_success_status(status), "{status}");
        }
    }

    #[test]
    fn failure_carries_error_text_and_no_data() {
        let response: ApiResponse<u32> =
            ApiResponse::failure(404, ApiError::Http("{\"message\":\"Not Found\"}".into()), None);
        assert!(!response.is_success());
        assert_eq!(response.data, None);
        assert_eq!(response.error_message(), Some("{\"message\":\"Not Found\"}"));
    }

    #[test]
    fn transport_failure_reports_status_zero() {
        let response: ApiResponse<u32> = ApiResponse::transport_failure("connection refused");
        assert_eq!(response.status, 0);
        assert!(!response.is_success());
        assert_eq!(response.rate_limit, None);
        assert!(matches!(response.error, Some(ApiError::Transport(_))));
    }

    #[test]
    fn presence_maps_204_and_404() {
        let present = ApiResponse::success(204, String::new(), None);
        assert_eq!(present.presence(), Presence::Present);

        let absent: ApiResponse<String> =
            ApiResponse::failure(404, ApiError::Http(String::new()), None);
        assert_eq!(absent.presence(), Presence::Absent);

        let denied: ApiResponse<String> =
            ApiResponse::failure(403, ApiError::Http("forbidden".into()), None);
        assert_eq!(
            denied.presence(),
            Presence::Error {
                status: 403,
                message: "forbidden".to_string()
            }
        );
    }

    #[test]
    fn into_result_prefers_data() {
        assert_eq!(ApiResponse::success(200, 7u32, None).into_result(), Ok(7));
        let failed: ApiResponse<u32> = ApiResponse::transport_failure("timed out");
        assert_eq!(
            failed.into_result(),
            Err(ApiError::Transport("timed out".to_string()))
        );
    }

    #[test]
    fn map_keeps_status_and_error() {
        let mapped = ApiResponse::success(200, vec![1, 2], None).map(|items| items.len());
        assert_eq!(mapped.status, 200);
        assert_eq!(mapped.data, Some(2));
    }
}
