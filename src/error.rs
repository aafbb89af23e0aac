use thiserror::Error;

/// Errors surfaced by the birthday operations.
///
/// Only validation and not-found are distinguished; every store failure
/// collapses into `Persistence`.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Validation(String),

    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("database error: {0}")]
    Persistence(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn friend_not_found(id: i64) -> Self {
        Self::NotFound { entity: "Friend", id }
    }

    pub fn birthday_not_found(id: i64) -> Self {
        Self::NotFound { entity: "Birthday", id }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_includes_id() {
        let err = Error::friend_not_found(42);
        assert_eq!(err.to_string(), "Friend with id 42 not found");
        assert!(err.is_not_found());

        let err = Error::birthday_not_found(7);
        assert_eq!(err.to_string(), "Birthday with id 7 not found");
    }

    #[test]
    fn test_persistence_from_rusqlite() {
        let err: Error = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(matches!(err, Error::Persistence(_)));
        assert!(!err.is_validation());
    }
}
