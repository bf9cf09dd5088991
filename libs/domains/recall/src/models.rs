use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// A nearest-neighbor match produced by a search.
///
/// `distance` is the exact L2 distance between the query vector and the
/// stored vector; smaller means more similar. Results are transient values,
/// produced fresh per query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SearchHit {
    /// Caller-supplied document identifier
    pub identifier: String,
    /// Non-negative Euclidean distance to the query
    pub distance: f32,
}

/// Request to index a document
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct AddDocument {
    /// Opaque identifier, unique within the index's lifetime by caller
    /// convention (re-adding an identifier appends a second entry)
    #[validate(length(min = 1, max = 255))]
    pub identifier: String,
    #[validate(length(min = 1))]
    pub content: String,
}

/// Request to search for similar documents
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SearchDocuments {
    #[validate(length(min = 1))]
    pub query: String,
    /// Maximum number of hits to return
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

fn default_top_k() -> usize {
    5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_documents_default_top_k() {
        let request: SearchDocuments = serde_json::from_str(r#"{"query": "trades"}"#).unwrap();
        assert_eq!(request.top_k, 5);
    }

    #[test]
    fn test_add_document_rejects_empty_identifier() {
        let request = AddDocument {
            identifier: String::new(),
            content: "trade settled".to_string(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_search_hit_serialization() {
        let hit = SearchHit {
            identifier: "doc1".to_string(),
            distance: 0.5,
        };
        let json = serde_json::to_value(&hit).unwrap();
        assert_eq!(json["identifier"], "doc1");
        assert_eq!(json["distance"], 0.5);
    }
}
