// HTTP status codes produced by the binding pipeline and the docs middleware

/// The subset of HTTP status codes Restifier produces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpStatus {
    // 2xx Success
    Ok = 200,

    // 4xx Client Errors
    BadRequest = 400,
    NotFound = 404,
    MethodNotAllowed = 405,
    UnsupportedMediaType = 415,

    // 5xx Server Errors
    InternalServerError = 500,
}

impl HttpStatus {
    /// Get the numeric status code
    pub fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the reason phrase for the status code
    pub fn reason(&self) -> &'static str {
        match self {
            HttpStatus::Ok => "OK",

            HttpStatus::BadRequest => "Bad Request",
            HttpStatus::NotFound => "Not Found",
            HttpStatus::MethodNotAllowed => "Method Not Allowed",
            HttpStatus::UnsupportedMediaType => "Unsupported Media Type",

            HttpStatus::InternalServerError => "Internal Server Error",
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.code())
    }

    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.code())
    }

    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.code())
    }

    /// Look up a status by its numeric code
    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            200 => Some(HttpStatus::Ok),
            400 => Some(HttpStatus::BadRequest),
            404 => Some(HttpStatus::NotFound),
            405 => Some(HttpStatus::MethodNotAllowed),
            415 => Some(HttpStatus::UnsupportedMediaType),
            500 => Some(HttpStatus::InternalServerError),
            _ => None,
        }
    }
}

impl std::fmt::Display for HttpStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.code(), self.reason())
    }
}

impl From<HttpStatus> for u16 {
    fn from(status: HttpStatus) -> Self {
        status.code()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code() {
        assert_eq!(HttpStatus::Ok.code(), 200);
        assert_eq!(HttpStatus::BadRequest.code(), 400);
        assert_eq!(HttpStatus::InternalServerError.code(), 500);
    }

    #[test]
    fn test_status_categories() {
        assert!(HttpStatus::Ok.is_success());
        assert!(HttpStatus::BadRequest.is_client_error());
        assert!(!HttpStatus::BadRequest.is_server_error());
        assert!(HttpStatus::InternalServerError.is_server_error());
    }

    #[test]
    fn test_from_code() {
        assert_eq!(HttpStatus::from_code(405), Some(HttpStatus::MethodNotAllowed));
        assert_eq!(HttpStatus::from_code(999), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(HttpStatus::NotFound.to_string(), "404 Not Found");
    }
}
