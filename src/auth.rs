//! Token file loading.
//!
//! A Zenodo personal access token lives in a plain text file the user keeps
//! outside the repository. Create one at
//! https://zenodo.org/account/settings/applications/tokens/new/ and keep it
//! secret.

use std::path::Path;

use crate::client::ZenodoError;

/// Load an access token from a plain text file.
///
/// Surrounding whitespace is trimmed (token files usually end in a newline).
/// The token value is not validated beyond being non-empty.
pub fn load_token(path: impl AsRef<Path>) -> Result<String, ZenodoError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)
        .map_err(|e| ZenodoError::Io(format!("{}: {}", path.display(), e)))?;

    let token = contents.trim();
    if token.is_empty() {
        return Err(ZenodoError::Io(format!(
            "{}: token file is empty",
            path.display()
        )));
    }

    Ok(token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_token_trims_trailing_newline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".zenodo-sandbox");
        std::fs::write(&path, "abc123token\n").unwrap();

        let token = load_token(&path).unwrap();
        assert_eq!(token, "abc123token");
    }

    #[test]
    fn test_load_token_trims_surrounding_whitespace() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token");
        std::fs::write(&path, "  tok  \n\n").unwrap();

        assert_eq!(load_token(&path).unwrap(), "tok");
    }

    #[test]
    fn test_load_token_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_token(dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, ZenodoError::Io(_)));
    }

    #[test]
    fn test_load_token_empty_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty");
        std::fs::write(&path, "\n").unwrap();

        let err = load_token(&path).unwrap_err();
        assert!(matches!(err, ZenodoError::Io(msg) if msg.contains("empty")));
    }
}
