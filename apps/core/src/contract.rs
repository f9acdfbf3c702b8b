use serde::{Deserialize, Serialize};

use crate::model::SearchResultPayload;

/// Transient state attached to the results route when a search completes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SearchHandoff {
    pub search_data: SearchResultPayload,
    pub search_term: String,
}

impl SearchHandoff {
    pub fn new(search_term: impl Into<String>, search_data: SearchResultPayload) -> Self {
        Self {
            search_data,
            search_term: search_term.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_router_field_names() {
        let handoff = SearchHandoff::new("Zakat", SearchResultPayload::default());
        let encoded = serde_json::to_value(&handoff).unwrap();
        assert_eq!(encoded["searchTerm"], "Zakat");
        assert_eq!(encoded["searchData"]["totalResults"], 0);
    }
}
