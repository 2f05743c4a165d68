use tower_api_client::Error as ApiError;

#[derive(Debug)]
pub enum CloudPrintApiError {
    /// Non-success HTTP status with the raw body
    Status(u16, String),
    /// The service answered `success: false`
    Rejected(String),
    Http(reqwest::Error),
    Internal(ApiError),
}

impl From<ApiError> for CloudPrintApiError {
    fn from(value: ApiError) -> Self {
        match value {
            ApiError::ClientError(status, detail) | ApiError::ServerError(status, detail) => {
                CloudPrintApiError::Status(status.as_u16(), detail.to_string())
            }
            e => CloudPrintApiError::Internal(e),
        }
    }
}

impl From<reqwest::Error> for CloudPrintApiError {
    fn from(value: reqwest::Error) -> Self {
        CloudPrintApiError::Http(value)
    }
}

impl std::fmt::Display for CloudPrintApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CloudPrintApiError::Status(status, body) => {
                write!(f, "Print service returned {}: {}", status, body)
            }
            CloudPrintApiError::Rejected(message) => {
                write!(f, "Print service rejected the request: {}", message)
            }
            CloudPrintApiError::Http(e) => write!(f, "HTTP error: {}", e),
            CloudPrintApiError::Internal(e) => write!(f, "Internal error: {}", e),
        }
    }
}

impl std::error::Error for CloudPrintApiError {}
