use hyper::StatusCode;
use shared::types::JokeView;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::ports::JokeRepository;

pub const JOKE_NOT_FOUND: &str = "What a joke! Not found.";

/// Where the browser goes after a joke is deleted.
pub const JOKES_INDEX: &str = "/jokes";

/// Why the joke-detail loader could not produce a view.
#[derive(Debug, Error)]
pub enum JokeError {
    #[error("What a joke! Not found.")]
    NotFound { joke_id: String },

    #[error("failed to load joke {joke_id}: {detail}")]
    Internal { joke_id: String, detail: String },
}

impl JokeError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "JOKE_NOT_FOUND",
            Self::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    /// Message shown to the user. Never includes internal detail.
    pub fn boundary_message(&self) -> String {
        match self {
            Self::NotFound { joke_id } => format!("Huh? What the heck is \"{}\"?", joke_id),
            Self::Internal { joke_id, .. } => {
                format!("There was an error loading joke by the id {}. Sorry.", joke_id)
            }
        }
    }
}

/// Load a joke for display. `current_user_id` is `None` for anonymous viewers.
pub async fn load_joke(
    joke_id: &str,
    current_user_id: Option<&str>,
    jokes: &dyn JokeRepository,
) -> Result<JokeView, JokeError> {
    let joke = jokes.find_joke_by_id(joke_id).await.map_err(|e| {
        error!("Failed to load joke {}: {:#}", joke_id, e);
        JokeError::Internal {
            joke_id: joke_id.to_string(),
            detail: format!("{:#}", e),
        }
    })?;

    let Some(joke) = joke else {
        info!("Joke not found: {}", joke_id);
        return Err(JokeError::NotFound {
            joke_id: joke_id.to_string(),
        });
    };

    Ok(JokeView::for_viewer(joke, current_user_id))
}

/// Rejections from the delete action.
#[derive(Debug, Error)]
pub enum DeleteJokeError {
    #[error("Invalid intent")]
    InvalidIntent,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Can't delete what does not exist")]
    NotFound { joke_id: String },

    #[error("Pssh, nice try. That's not your joke")]
    NotOwner { joke_id: String },

    #[error("failed to delete joke {joke_id}: {detail}")]
    Internal { joke_id: String, detail: String },
}

impl DeleteJokeError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidIntent => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::NotOwner { .. } => StatusCode::FORBIDDEN,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidIntent => "INVALID_INTENT",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::NotFound { .. } => "JOKE_NOT_FOUND",
            Self::NotOwner { .. } => "FORBIDDEN",
            Self::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::Internal { joke_id, .. } => {
                format!("There was an error deleting joke by the id {}. Sorry.", joke_id)
            }
            other => other.to_string(),
        }
    }
}

/// Delete a joke on behalf of its author. Returns the redirect location.
///
/// `intent` is the form's `_method` field; only `delete` is accepted.
pub async fn delete_joke_action(
    joke_id: &str,
    intent: Option<&str>,
    current_user_id: Option<&str>,
    jokes: &dyn JokeRepository,
) -> Result<&'static str, DeleteJokeError> {
    if intent != Some("delete") {
        warn!("Unsupported joke action {:?} on {}", intent, joke_id);
        return Err(DeleteJokeError::InvalidIntent);
    }

    let Some(user_id) = current_user_id else {
        warn!("Anonymous delete attempt on joke {}", joke_id);
        return Err(DeleteJokeError::Unauthorized);
    };

    let internal = |e: anyhow::Error| {
        error!("Failed to delete joke {}: {:#}", joke_id, e);
        DeleteJokeError::Internal {
            joke_id: joke_id.to_string(),
            detail: format!("{:#}", e),
        }
    };

    let Some(joke) = jokes.find_joke_by_id(joke_id).await.map_err(internal)? else {
        return Err(DeleteJokeError::NotFound {
            joke_id: joke_id.to_string(),
        });
    };

    if !joke.is_owned_by(Some(user_id)) {
        warn!("User {} tried to delete joke {} they do not own", user_id, joke_id);
        return Err(DeleteJokeError::NotOwner {
            joke_id: joke_id.to_string(),
        });
    }

    // A concurrent delete between the read and here leaves nothing to remove.
    if !jokes.delete_joke(joke_id).await.map_err(internal)? {
        return Err(DeleteJokeError::NotFound {
            joke_id: joke_id.to_string(),
        });
    }

    info!("Joke {} deleted by {}", joke_id, user_id);
    Ok(JOKES_INDEX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::fakes::FakeStore;

    #[tokio::test]
    async fn owner_sees_is_owner_true() {
        let store = FakeStore::default();
        let kody = store.add_user("kody", "twixrox");
        let joke = store.add_joke("Frisbee", &kody.id);

        let view = load_joke(&joke.id, Some(&kody.id), &store).await.unwrap();
        assert_eq!(view.joke, joke);
        assert!(view.is_owner);
    }

    #[tokio::test]
    async fn other_user_and_anonymous_are_not_owners() {
        let store = FakeStore::default();
        let kody = store.add_user("kody", "twixrox");
        let joke = store.add_joke("Frisbee", &kody.id);

        let view = load_joke(&joke.id, Some("someone-else"), &store).await.unwrap();
        assert!(!view.is_owner);
        let view = load_joke(&joke.id, None, &store).await.unwrap();
        assert!(!view.is_owner);
    }

    #[tokio::test]
    async fn missing_joke_is_not_found() {
        let store = FakeStore::default();
        let err = load_joke("nope", None, &store).await.unwrap_err();

        assert!(matches!(err, JokeError::NotFound { ref joke_id } if joke_id == "nope"));
        assert_eq!(err.to_string(), JOKE_NOT_FOUND);
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.boundary_message(), "Huh? What the heck is \"nope\"?");
    }

    #[tokio::test]
    async fn store_failure_is_internal_not_not_found() {
        let store = FakeStore::failing();
        let err = load_joke("abc", None, &store).await.unwrap_err();

        assert!(matches!(err, JokeError::Internal { .. }));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            err.boundary_message(),
            "There was an error loading joke by the id abc. Sorry."
        );
    }

    #[tokio::test]
    async fn owner_can_delete() {
        let store = FakeStore::default();
        let kody = store.add_user("kody", "twixrox");
        let joke = store.add_joke("Frisbee", &kody.id);

        let location = delete_joke_action(&joke.id, Some("delete"), Some(&kody.id), &store)
            .await
            .unwrap();
        assert_eq!(location, "/jokes");
        assert!(!store.has_joke(&joke.id));
    }

    #[tokio::test]
    async fn non_owner_is_forbidden() {
        let store = FakeStore::default();
        let kody = store.add_user("kody", "twixrox");
        let other = store.add_user("other", "password");
        let joke = store.add_joke("Frisbee", &kody.id);

        let err = delete_joke_action(&joke.id, Some("delete"), Some(&other.id), &store)
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
        assert_eq!(err.message(), "Pssh, nice try. That's not your joke");
        assert!(store.has_joke(&joke.id));
    }

    #[tokio::test]
    async fn anonymous_is_unauthorized() {
        let store = FakeStore::default();
        let kody = store.add_user("kody", "twixrox");
        let joke = store.add_joke("Frisbee", &kody.id);

        let err = delete_joke_action(&joke.id, Some("delete"), None, &store)
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        assert!(store.has_joke(&joke.id));
    }

    #[tokio::test]
    async fn deleting_missing_joke_is_not_found() {
        let store = FakeStore::default();
        let kody = store.add_user("kody", "twixrox");

        let err = delete_joke_action("nope", Some("delete"), Some(&kody.id), &store)
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.message(), "Can't delete what does not exist");
    }

    #[tokio::test]
    async fn other_intents_are_rejected_first() {
        let store = FakeStore::default();
        for intent in [None, Some("put"), Some("DELETE")] {
            let err = delete_joke_action("any", intent, None, &store)
                .await
                .unwrap_err();
            assert!(matches!(err, DeleteJokeError::InvalidIntent));
            assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        }
    }
}
