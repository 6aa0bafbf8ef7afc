/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the library
#[derive(Debug)]
pub enum Error {
    /// A route path that cannot be turned into a Swagger path template
    InvalidRouteTemplate { path: String, message: String },
    /// A router could not enumerate its routes
    RouteSource(String),
    /// A document was already registered under this key
    DuplicateDocument(String),
    /// No document is registered under this key
    DocumentNotFound(String),
    SerializationError(serde_json::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::InvalidRouteTemplate { path, message } => {
                write!(f, "Invalid route template {}: {}", path, message)
            }
            Error::RouteSource(msg) => write!(f, "Cannot enumerate routes: {}", msg),
            Error::DuplicateDocument(key) => {
                write!(f, "Document already registered for {}", key)
            }
            Error::DocumentNotFound(key) => write!(f, "No document registered for {}", key),
            Error::SerializationError(e) => write!(f, "Serialization error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::SerializationError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::SerializationError(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_the_route() {
        let err = Error::InvalidRouteTemplate {
            path: "/users/{id".to_string(),
            message: "unclosed '{'".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid route template /users/{id: unclosed '{'");
    }

    #[test]
    fn test_json_error_has_source() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = json_err.into();
        assert!(err.to_string().starts_with("Serialization error: "));
        assert!(std::error::Error::source(&err).is_some());
        assert!(std::error::Error::source(&Error::DocumentNotFound("x".into())).is_none());
    }
}
