pub mod aggregate;
pub mod band;
pub mod normalizer;

pub use aggregate::{AggregateScore, AnimeScores, Precision, UNSET_PLACEHOLDER};
pub use band::{BandScale, RatingBand};
pub use normalizer::{MAX_RATING, MIN_RATING, Rating, normalize_rating, round_half_away};

use tracing::debug;

use crate::api::RatingApi;
use crate::error::Result;
use crate::types::{Episode, EpisodeId, MusicId};

/// What a rating is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RatingSubject {
    Episode(EpisodeId),
    Music(MusicId),
}

/// Normalizes `raw` and sends it for `subject`.
///
/// Returns `Ok(None)` without calling `api` when `raw` holds no number, so an
/// existing rating is left untouched.
///
/// # Errors
///
/// Propagates the collaborator's error; nothing is retried.
pub async fn submit_rating<A>(
    api: &A,
    subject: RatingSubject,
    raw: &str,
    comment: Option<&str>,
) -> Result<Option<Rating>>
where
    A: RatingApi + ?Sized,
{
    let Some(rating) = normalize_rating(raw) else {
        debug!(?subject, raw, "no rating entered, skipping");
        return Ok(None);
    };

    match subject {
        RatingSubject::Episode(id) => {
            api.rate_episode(id, rating, comment).await?;
        }
        RatingSubject::Music(id) => {
            api.rate_music(id, rating, comment).await?;
        }
    }
    debug!(?subject, %rating, "rating saved");
    Ok(Some(rating))
}

/// Saves a comment on an episode, leaving any rating as it is.
///
/// # Errors
///
/// Propagates the collaborator's error.
pub async fn submit_comment<A>(api: &A, episode_id: EpisodeId, comment: &str) -> Result<Episode>
where
    A: RatingApi + ?Sized,
{
    let episode = api.comment_episode(episode_id, comment).await?;
    debug!(episode_id, "episode comment saved");
    Ok(episode)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::error::AnimetrackError;
    use crate::types::MusicRating;

    #[derive(Default)]
    struct RecordingApi {
        calls: Mutex<Vec<(RatingSubject, Option<f64>, Option<String>)>>,
        fail: bool,
    }

    #[async_trait]
    impl RatingApi for RecordingApi {
        async fn rate_episode(
            &self,
            episode_id: EpisodeId,
            rating: Rating,
            comment: Option<&str>,
        ) -> Result<Episode> {
            if self.fail {
                return Err(AnimetrackError::Transport("offline".into()));
            }
            self.calls.lock().unwrap().push((
                RatingSubject::Episode(episode_id),
                Some(rating.value()),
                comment.map(str::to_owned),
            ));
            Ok(Episode {
                id: episode_id,
                number: 1,
                title: None,
                rating: Some(rating.value()),
                comment: comment.map(str::to_owned),
            })
        }

        async fn comment_episode(&self, episode_id: EpisodeId, comment: &str) -> Result<Episode> {
            self.calls.lock().unwrap().push((
                RatingSubject::Episode(episode_id),
                None,
                Some(comment.to_owned()),
            ));
            Ok(Episode {
                id: episode_id,
                number: 1,
                title: None,
                rating: Some(6.5),
                comment: Some(comment.to_owned()),
            })
        }

        async fn rate_music(
            &self,
            music_id: MusicId,
            rating: Rating,
            comment: Option<&str>,
        ) -> Result<Vec<MusicRating>> {
            self.calls.lock().unwrap().push((
                RatingSubject::Music(music_id),
                Some(rating.value()),
                comment.map(str::to_owned),
            ));
            Ok(vec![MusicRating {
                user_id: 1,
                rating: rating.value(),
                comment: comment.map(str::to_owned),
            }])
        }
    }

    #[tokio::test]
    async fn empty_input_makes_no_call() {
        let api = RecordingApi::default();
        let result = submit_rating(&api, RatingSubject::Episode(4), "", None)
            .await
            .unwrap();
        assert_eq!(result, None);
        assert!(api.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn episode_and_music_share_one_policy() {
        let api = RecordingApi::default();
        submit_rating(&api, RatingSubject::Episode(4), "73", Some("great fight"))
            .await
            .unwrap();
        submit_rating(&api, RatingSubject::Music(8), "73", None)
            .await
            .unwrap();

        let calls = api.calls.lock().unwrap();
        assert_eq!(
            *calls,
            vec![
                (
                    RatingSubject::Episode(4),
                    Some(7.3),
                    Some("great fight".to_string())
                ),
                (RatingSubject::Music(8), Some(7.3), None),
            ]
        );
    }

    #[tokio::test]
    async fn collaborator_errors_propagate() {
        let api = RecordingApi {
            fail: true,
            ..Default::default()
        };
        let err = submit_rating(&api, RatingSubject::Episode(1), "8", None)
            .await
            .unwrap_err();
        assert!(matches!(err, AnimetrackError::Transport(_)));
    }

    #[tokio::test]
    async fn comment_is_saved_without_a_rating() {
        let api = RecordingApi::default();
        let episode = submit_comment(&api, 12, "rewatch the ending").await.unwrap();
        assert_eq!(episode.comment.as_deref(), Some("rewatch the ending"));
        // The stored rating comes back untouched.
        assert_eq!(episode.rating, Some(6.5));
        assert_eq!(
            *api.calls.lock().unwrap(),
            vec![(
                RatingSubject::Episode(12),
                None,
                Some("rewatch the ending".to_string())
            )]
        );
    }
}
