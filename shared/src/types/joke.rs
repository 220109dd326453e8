use serde::{Deserialize, Serialize};

/// A joke as stored in the `jokes` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Joke {
    pub id: String,
    pub name: String,
    pub content: String,
    /// Id of the user who wrote the joke.
    pub jokester_id: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Joke {
    /// Anonymous viewers (`None`) never own a joke.
    pub fn is_owned_by(&self, user_id: Option<&str>) -> bool {
        user_id.is_some_and(|id| id == self.jokester_id)
    }
}

/// Data required to INSERT a new joke.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewJoke {
    pub name: String,
    pub content: String,
    pub jokester_id: String,
}

/// What the joke-detail page receives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JokeView {
    pub joke: Joke,
    pub is_owner: bool,
}

impl JokeView {
    pub fn for_viewer(joke: Joke, viewer_id: Option<&str>) -> Self {
        let is_owner = joke.is_owned_by(viewer_id);
        Self { joke, is_owner }
    }
}
