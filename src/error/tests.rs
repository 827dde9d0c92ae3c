//! Tests for error types.

#[cfg(test)]
mod tests {
    use super::super::*;

    #[test]
    fn test_error_display() {
        let err = Error::config("invalid interval");
        assert_eq!(err.to_string(), "configuration error: invalid interval");
    }

    #[test]
    fn test_store_error_corrupt() {
        let err = StoreError::Corrupt {
            path: "/vault/.assistant/vault_index.json".to_string(),
            reason: "unexpected EOF".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "corrupt fingerprint file '/vault/.assistant/vault_index.json': unexpected EOF"
        );
    }

    #[test]
    fn test_store_error_conversion() {
        let store_err = StoreError::Persist {
            path: "/tmp/x".to_string(),
            reason: "disk full".to_string(),
        };
        let err: Error = store_err.into();
        assert!(matches!(err, Error::Store(_)));
    }

    #[test]
    fn test_backend_error_conversion() {
        let backend_err = BackendError::Database("connection failed".to_string());
        let err: Error = backend_err.into();
        assert!(matches!(err, Error::Backend(_)));
    }

    #[test]
    fn test_vault_error_conversion() {
        let vault_err = VaultError::NoteNotFound {
            name: "missing.md".to_string(),
        };
        let err: Error = vault_err.into();
        assert!(matches!(err, Error::Vault(_)));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_ok() -> Result<i32> {
            Ok(42)
        }

        fn returns_err() -> Result<i32> {
            Err(Error::config("test error"))
        }

        assert!(returns_ok().is_ok());
        assert!(returns_err().is_err());
    }

    #[test]
    fn test_error_internal() {
        let err = Error::internal("test internal error");
        assert_eq!(err.to_string(), "internal error: test internal error");
    }

    #[test]
    fn test_backend_error_query() {
        let err = BackendError::Query("malformed match expression".to_string());
        assert_eq!(err.to_string(), "query error: malformed match expression");
    }

    #[test]
    fn test_backend_error_unavailable() {
        let err = BackendError::Unavailable("index table missing".to_string());
        assert_eq!(err.to_string(), "index unavailable: index table missing");
    }

    #[test]
    fn test_vault_error_note_exists() {
        let err = VaultError::NoteExists {
            name: "ideas.md".to_string(),
        };
        assert_eq!(err.to_string(), "note 'ideas.md' already exists");
    }

    #[test]
    fn test_vault_error_invalid_path() {
        let err = VaultError::invalid_path("../outside", "escapes the vault");
        assert_eq!(
            err.to_string(),
            "invalid vault path '../outside': escapes the vault"
        );
    }

    #[test]
    fn test_error_debug_format() {
        let err = Error::Internal("something went wrong".to_string());
        let debug_str = format!("{err:?}");
        assert!(debug_str.contains("Internal"));
        assert!(debug_str.contains("something went wrong"));
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn inner() -> Result<i32> {
            Err(Error::config("inner error"))
        }

        fn outer() -> Result<i32> {
            let _ = inner()?;
            Ok(0)
        }

        let result = outer();
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().to_string(),
            "configuration error: inner error"
        );
    }
}
