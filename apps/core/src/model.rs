use serde::{Deserialize, Serialize};

pub const EXCERPT_CHARS: usize = 150;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BlogItem {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VideoItem {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QnaItem {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub question: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
}

impl BlogItem {
    pub fn path(&self) -> String {
        format!("/blogs/{}", self.id)
    }

    pub fn excerpt(&self) -> Option<String> {
        self.content
            .as_deref()
            .filter(|content| !content.is_empty())
            .map(|content| {
                let head: String = content.chars().take(EXCERPT_CHARS).collect();
                format!("{head}...")
            })
    }
}

impl VideoItem {
    pub fn path(&self) -> String {
        format!("/videos/{}", self.id)
    }
}

impl QnaItem {
    /// A blank answer counts as unanswered.
    pub fn answer(&self) -> Option<&str> {
        self.answer
            .as_deref()
            .map(str::trim)
            .filter(|answer| !answer.is_empty())
    }

    pub fn is_answered(&self) -> bool {
        self.answer().is_some()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategorizedResults {
    #[serde(default)]
    pub blogs: Vec<BlogItem>,
    #[serde(default)]
    pub videos: Vec<VideoItem>,
    #[serde(default)]
    pub qna: Vec<QnaItem>,
}

/// Body of `GET /search`. `total_results` is reported by the backend and is
/// never recomputed from the category lengths.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultPayload {
    #[serde(default)]
    pub results: CategorizedResults,
    #[serde(default)]
    pub total_results: u64,
}

impl SearchResultPayload {
    pub fn is_empty(&self) -> bool {
        self.total_results == 0
    }
}

pub fn fold_case(input: &str) -> String {
    input.chars().flat_map(|c| c.to_lowercase()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_mongo_style_identifiers() {
        let payload: SearchResultPayload = serde_json::from_str(
            r#"{"results":{"blogs":[{"_id":"b1","title":"Fasting"}],"qna":[{"id":"q1","question":"When?"}]},"totalResults":2}"#,
        )
        .unwrap();

        assert_eq!(payload.results.blogs[0].id, "b1");
        assert_eq!(payload.results.qna[0].id, "q1");
        assert!(payload.results.videos.is_empty());
        assert_eq!(payload.total_results, 2);
    }

    #[test]
    fn trusts_reported_total() {
        let payload: SearchResultPayload =
            serde_json::from_str(r#"{"results":{"blogs":[]},"totalResults":7}"#).unwrap();
        assert_eq!(payload.total_results, 7);
        assert!(!payload.is_empty());
    }

    #[test]
    fn excerpt_truncates_on_char_boundary() {
        let blog = BlogItem {
            id: "b".into(),
            title: "t".into(),
            content: Some("ص".repeat(200)),
        };
        let excerpt = blog.excerpt().unwrap();
        assert_eq!(excerpt.chars().count(), EXCERPT_CHARS + 3);
        assert!(excerpt.ends_with("..."));
    }

    #[test]
    fn blank_answer_is_unanswered() {
        let item = QnaItem {
            id: "q".into(),
            question: "Is it valid?".into(),
            answer: Some("   ".into()),
        };
        assert!(!item.is_answered());
    }
}
