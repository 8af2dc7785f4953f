//! Wire types for the result source

use serde::Deserialize;

use super::FetchError;

/// One entry of the result set, taken verbatim from the source
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchResult {
    pub phrase: String,
    pub subtext: String,
    pub url: String,
}

/// Document returned by the source
///
/// `{ "success": bool, "best_matches": [SearchResult, ...] }`
#[derive(Debug, Deserialize)]
pub struct SearchPayload {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub best_matches: Option<Vec<SearchResult>>,
}

impl SearchPayload {
    /// Validate the envelope and hand back the full entry list
    pub fn into_matches(self) -> Result<Vec<SearchResult>, FetchError> {
        if !self.success {
            return Err(FetchError::Unsuccessful);
        }
        self.best_matches.ok_or(FetchError::MissingMatches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_payload() {
        let payload: SearchPayload = serde_json::from_str(
            r#"{"success": true, "best_matches": [{"phrase": "Red Fox", "subtext": "animal", "url": "a.com"}]}"#,
        )
        .unwrap();
        let matches = payload.into_matches().unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].phrase, "Red Fox");
    }

    #[test]
    fn test_unsuccessful_payload() {
        let payload: SearchPayload =
            serde_json::from_str(r#"{"success": false, "best_matches": []}"#).unwrap();
        assert!(matches!(payload.into_matches(), Err(FetchError::Unsuccessful)));
    }

    #[test]
    fn test_missing_matches() {
        let payload: SearchPayload = serde_json::from_str(r#"{"success": true}"#).unwrap();
        assert!(matches!(payload.into_matches(), Err(FetchError::MissingMatches)));
    }

    #[test]
    fn test_null_matches() {
        let payload: SearchPayload =
            serde_json::from_str(r#"{"success": true, "best_matches": null}"#).unwrap();
        assert!(matches!(payload.into_matches(), Err(FetchError::MissingMatches)));
    }

    #[test]
    fn test_entry_missing_field_is_rejected() {
        let parsed = serde_json::from_str::<SearchPayload>(
            r#"{"success": true, "best_matches": [{"phrase": "x", "url": "y"}]}"#,
        );
        assert!(parsed.is_err());
    }
}
