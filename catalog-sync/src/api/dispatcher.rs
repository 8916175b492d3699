//! Two-step submission of a row payload

use anyhow::{Context, Result};

use super::client::{PayloadPoster, PostResponse};
use crate::catalog::RowSubmission;

/// Result of the recommendation call for one row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecommendationOutcome {
    Accepted,
    /// Answered with something other than 200
    Rejected { status: u16, body: String },
    /// Never got an answer
    Failed(String),
}

/// Sends a row's payload to the fixed recommendation endpoint, then to the
/// row's own registration URL
pub struct Dispatcher<P> {
    poster: P,
    recommendation_url: String,
}

impl<P: PayloadPoster> Dispatcher<P> {
    pub fn new(poster: P, recommendation_url: impl Into<String>) -> Self {
        Self {
            poster,
            recommendation_url: recommendation_url.into(),
        }
    }

    #[cfg(test)]
    pub fn poster(&self) -> &P {
        &self.poster
    }

    /// First call. Only HTTP 200 counts as success.
    pub async fn recommend(&self, submission: &RowSubmission) -> RecommendationOutcome {
        match self
            .poster
            .post_json(&self.recommendation_url, &submission.text)
            .await
        {
            Ok(PostResponse { status: 200, .. }) => RecommendationOutcome::Accepted,
            Ok(PostResponse { status, body }) => RecommendationOutcome::Rejected { status, body },
            Err(e) => RecommendationOutcome::Failed(format!("{:#}", e)),
        }
    }

    /// Second call. The response status is not checked; a transport failure
    /// is returned to the caller.
    pub async fn register(&self, submission: &RowSubmission) -> Result<PostResponse> {
        let response = self
            .poster
            .post_json(&submission.registration_url, &submission.text)
            .await
            .with_context(|| format!("Registration call for row {} failed", submission.row))?;
        log::debug!(
            "[Row {}] Registration API answered {}",
            submission.row,
            response.status
        );
        Ok(response)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::catalog::payload::{ContentPayload, RatingIndex};
    use anyhow::bail;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Scripted poster recording every call
    #[derive(Default)]
    pub(crate) struct ScriptedPoster {
        pub calls: Mutex<Vec<(String, String)>>,
        /// url -> statuses returned in order; missing or exhausted means 200
        pub statuses: Mutex<HashMap<String, Vec<u16>>>,
        /// urls whose calls fail at the transport level
        pub unreachable: Vec<String>,
    }

    impl ScriptedPoster {
        pub fn respond(&self, url: &str, statuses: &[u16]) {
            self.statuses
                .lock()
                .unwrap()
                .insert(url.to_string(), statuses.to_vec());
        }

        pub fn calls(&self) -> Vec<(String, String)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PayloadPoster for ScriptedPoster {
        async fn post_json(&self, url: &str, body: &str) -> Result<PostResponse> {
            self.calls
                .lock()
                .unwrap()
                .push((url.to_string(), body.to_string()));
            if self.unreachable.iter().any(|u| u == url) {
                bail!("connection refused: {}", url);
            }
            let mut statuses = self.statuses.lock().unwrap();
            let status = match statuses.get_mut(url) {
                Some(queue) if !queue.is_empty() => queue.remove(0),
                _ => 200,
            };
            Ok(PostResponse {
                status,
                body: format!("status {}", status),
            })
        }
    }

    fn submission() -> RowSubmission {
        RowSubmission {
            row: 2,
            payload: ContentPayload {
                id: "42".into(),
                content_type: "movie".into(),
                title: "T".into(),
                description: String::new(),
                language_code: "en-US".into(),
                primary_category: "[]".into(),
                actors: String::new(),
                director: String::new(),
                content_region: String::new(),
                rating_index: RatingIndex::NotRated,
            },
            text: "{\"ID\": \"42\"}".into(),
            registration_url: "https://x/ingest".into(),
            full_url: "https://rg/42?acl=en-US".into(),
        }
    }

    const REC: &str = "https://rec/online/recommend";

    #[tokio::test]
    async fn test_recommend_accepts_only_200() {
        let poster = ScriptedPoster::default();
        poster.respond(REC, &[200, 201, 500]);
        let dispatcher = Dispatcher::new(poster, REC);
        let sub = submission();

        assert_eq!(dispatcher.recommend(&sub).await, RecommendationOutcome::Accepted);
        assert!(matches!(
            dispatcher.recommend(&sub).await,
            RecommendationOutcome::Rejected { status: 201, .. }
        ));
        assert!(matches!(
            dispatcher.recommend(&sub).await,
            RecommendationOutcome::Rejected { status: 500, .. }
        ));

        let calls = dispatcher.poster().calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0], (REC.to_string(), "{\"ID\": \"42\"}".to_string()));
    }

    #[tokio::test]
    async fn test_recommend_transport_failure() {
        let poster = ScriptedPoster {
            unreachable: vec![REC.to_string()],
            ..Default::default()
        };
        let dispatcher = Dispatcher::new(poster, REC);
        assert!(matches!(
            dispatcher.recommend(&submission()).await,
            RecommendationOutcome::Failed(_)
        ));
    }

    #[tokio::test]
    async fn test_register_ignores_status() {
        let poster = ScriptedPoster::default();
        poster.respond("https://x/ingest", &[503]);
        let dispatcher = Dispatcher::new(poster, REC);

        let response = dispatcher.register(&submission()).await.unwrap();
        assert_eq!(response.status, 503);
        assert_eq!(dispatcher.poster().calls()[0].0, "https://x/ingest");
    }

    #[tokio::test]
    async fn test_register_transport_failure_is_error() {
        let poster = ScriptedPoster {
            unreachable: vec!["https://x/ingest".to_string()],
            ..Default::default()
        };
        let dispatcher = Dispatcher::new(poster, REC);
        let err = dispatcher.register(&submission()).await.unwrap_err();
        assert!(err.to_string().contains("row 2"));
    }
}
