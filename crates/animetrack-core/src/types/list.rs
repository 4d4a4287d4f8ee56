use serde::{Deserialize, Serialize};

use super::{AnimeId, AnimeSummary, ListId};
use crate::error::{AnimetrackError, Result};

/// An anime's membership in a user list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListItem {
    #[serde(default)]
    pub id: Option<i64>,
    pub anime: AnimeSummary,
}

/// A user-curated collection of animes. The top list is managed from a
/// list's page, and the list's animes are the top-search candidates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimeList {
    pub id: ListId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "animeLists", alias = "anime_lists")]
    pub items: Vec<ListItem>,
}

impl AnimeList {
    /// The animes in this list, in list order.
    #[must_use]
    pub fn animes(&self) -> Vec<AnimeSummary> {
        self.items.iter().map(|item| item.anime.clone()).collect()
    }

    #[must_use]
    pub fn contains_anime(&self, anime_id: AnimeId) -> bool {
        self.items.iter().any(|item| item.anime.id == anime_id)
    }

    /// Drops `anime_id` locally. Returns whether it was present.
    pub fn remove_anime(&mut self, anime_id: AnimeId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.anime.id != anime_id);
        self.items.len() != before
    }

    /// The editable fields, as a starting point for an update.
    #[must_use]
    pub fn draft(&self) -> ListDraft {
        ListDraft {
            title: self.title.clone(),
            description: self.description.clone().unwrap_or_default(),
        }
    }
}

/// Body of list create and update requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

impl ListDraft {
    /// A draft with an empty description.
    ///
    /// # Errors
    ///
    /// Returns `AnimetrackError::EmptyListTitle` when `title` is blank.
    pub fn new(title: impl Into<String>) -> Result<Self> {
        Self {
            title: String::new(),
            description: String::new(),
        }
        .with_title(title)
    }

    /// Replaces the title, trimmed.
    ///
    /// # Errors
    ///
    /// Returns `AnimetrackError::EmptyListTitle` when `title` is blank.
    pub fn with_title(mut self, title: impl Into<String>) -> Result<Self> {
        let title = title.into();
        let title = title.trim();
        if title.is_empty() {
            return Err(AnimetrackError::EmptyListTitle);
        }
        self.title = title.to_string();
        Ok(self)
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AnimeList {
        serde_json::from_str(
            r#"{
                "id": 3,
                "title": "Comfy",
                "description": null,
                "animeLists": [
                    { "id": 10, "anime": { "id": 7, "title": "Yuru Camp", "coverImg": "y.png" } },
                    { "id": 11, "anime": { "id": 9, "title": "Non Non Biyori" } }
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn deserializes_list_with_items() {
        let list = sample();
        assert_eq!(list.items.len(), 2);
        assert_eq!(list.items[0].anime.cover_img.as_deref(), Some("y.png"));
        assert_eq!(
            list.animes().iter().map(|a| a.id).collect::<Vec<_>>(),
            vec![7, 9]
        );
        assert!(list.contains_anime(9));
        assert!(!list.contains_anime(1));
    }

    #[test]
    fn list_without_items_is_empty() {
        let list: AnimeList = serde_json::from_str(r#"{"id": 1, "title": "New"}"#).unwrap();
        assert!(list.items.is_empty());
        assert_eq!(list.description, None);
    }

    #[test]
    fn remove_anime_reports_presence() {
        let mut list = sample();
        assert!(list.remove_anime(7));
        assert!(!list.remove_anime(7));
        assert_eq!(list.animes().len(), 1);
    }

    #[test]
    fn draft_requires_a_title() {
        assert!(matches!(
            ListDraft::new("   "),
            Err(AnimetrackError::EmptyListTitle)
        ));
        let draft = ListDraft::new("  Winter 2024 ").unwrap().with_description("cozy");
        assert_eq!(
            serde_json::to_value(&draft).unwrap(),
            serde_json::json!({ "title": "Winter 2024", "description": "cozy" })
        );
    }

    #[test]
    fn draft_of_existing_list_keeps_fields() {
        let draft = sample().draft();
        assert_eq!(draft.title, "Comfy");
        assert_eq!(draft.description, "");
    }
}
