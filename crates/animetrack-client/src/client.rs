use animetrack_core::rating::Rating;
use animetrack_core::types::{
    AnimeDetail, AnimeId, AnimeList, Episode, EpisodeId, ListDraft, ListId, ListItem, Music,
    MusicId, MusicRating, TopEntry, TopEntryId,
};
use animetrack_core::{RatingApi, TopListApi};
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::credentials::TokenStore;
use crate::error::{ClientError, ClientResult};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AddToTopBody {
    anime_id: AnimeId,
    position: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AddToListBody {
    anime_id: AnimeId,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PositionBody {
    new_position: u32,
}

/// `rating` is sent as `null` for a comment-only save.
#[derive(Serialize)]
struct RateBody<'a> {
    rating: Option<Rating>,
    #[serde(skip_serializing_if = "Option::is_none")]
    comment: Option<&'a str>,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Builds the message for a failed response from its body.
fn error_message(status: StatusCode, body: &[u8]) -> String {
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        })
}

/// Bearer-authenticated client for the AnimeTracker REST API.
pub struct ApiClient {
    http: Client,
    config: ClientConfig,
    tokens: TokenStore,
}

impl ApiClient {
    /// Builds a client from `config`, authenticating with whatever `tokens` holds.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Http` if the HTTP client cannot be built.
    pub fn new(config: ClientConfig, tokens: TokenStore) -> ClientResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self {
            http,
            config,
            tokens,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    /// Starts a request, attaching the bearer token when one is stored.
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, self.config.url(path));
        match self.tokens.get() {
            Some(token) => builder.header(AUTHORIZATION, format!("Bearer {token}")),
            None => builder,
        }
    }

    /// Maps non-2xx responses to errors. A 401 also clears the stored token.
    async fn check(&self, response: Response, path: &str) -> ClientResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::UNAUTHORIZED {
            warn!(path, "session rejected, clearing stored credentials");
            if let Err(err) = self.tokens.clear() {
                warn!(error = %err, "failed to clear stored credentials");
            }
            return Err(ClientError::Unauthorized);
        }
        let body = response.bytes().await.unwrap_or_default();
        Err(ClientError::Status {
            path: path.to_string(),
            status: status.as_u16(),
            message: error_message(status, &body),
        })
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        path: &str,
    ) -> ClientResult<T> {
        debug!(path, "sending request");
        let response = self.check(builder.send().await?, path).await?;
        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|source| ClientError::Decode {
            path: path.to_string(),
            source,
        })
    }

    async fn send_empty(&self, builder: RequestBuilder, path: &str) -> ClientResult<()> {
        debug!(path, "sending request");
        self.check(builder.send().await?, path).await?;
        Ok(())
    }

    /// `POST /animes/episodes/{id}/rate`
    pub async fn rate_episode(
        &self,
        episode_id: EpisodeId,
        rating: Rating,
        comment: Option<&str>,
    ) -> ClientResult<Episode> {
        let path = format!("animes/episodes/{episode_id}/rate");
        let builder = self.request(Method::POST, &path).json(&RateBody {
            rating: Some(rating),
            comment,
        });
        self.send_json(builder, &path).await
    }

    /// `POST /animes/episodes/{id}/rate` with a null rating, saving only the comment.
    pub async fn comment_episode(
        &self,
        episode_id: EpisodeId,
        comment: &str,
    ) -> ClientResult<Episode> {
        let path = format!("animes/episodes/{episode_id}/rate");
        let builder = self.request(Method::POST, &path).json(&RateBody {
            rating: None,
            comment: Some(comment),
        });
        self.send_json(builder, &path).await
    }

    /// `POST /music/{id}/rate`
    pub async fn rate_music(
        &self,
        music_id: MusicId,
        rating: Rating,
        comment: Option<&str>,
    ) -> ClientResult<Vec<MusicRating>> {
        let path = format!("music/{music_id}/rate");
        let builder = self.request(Method::POST, &path).json(&RateBody {
            rating: Some(rating),
            comment,
        });
        self.send_json(builder, &path).await
    }

    /// `GET /top-animes`
    pub async fn get_top(&self) -> ClientResult<Vec<TopEntry>> {
        let path = "top-animes";
        self.send_json(self.request(Method::GET, path), path).await
    }

    /// `POST /top-animes`
    pub async fn add_to_top(&self, anime_id: AnimeId, position: u32) -> ClientResult<TopEntry> {
        let path = "top-animes";
        let builder = self
            .request(Method::POST, path)
            .json(&AddToTopBody { anime_id, position });
        self.send_json(builder, path).await
    }

    /// `DELETE /top-animes/{id}`
    pub async fn remove_from_top(&self, entry_id: TopEntryId) -> ClientResult<()> {
        let path = format!("top-animes/{entry_id}");
        self.send_empty(self.request(Method::DELETE, &path), &path).await
    }

    /// `PUT /top-animes/{id}/position`
    pub async fn update_position(
        &self,
        entry_id: TopEntryId,
        new_position: u32,
    ) -> ClientResult<TopEntry> {
        let path = format!("top-animes/{entry_id}/position");
        let builder = self
            .request(Method::PUT, &path)
            .json(&PositionBody { new_position });
        self.send_json(builder, &path).await
    }

    /// `GET /animes/{id}` with the caller's episode ratings.
    pub async fn get_anime_detail(&self, anime_id: AnimeId) -> ClientResult<AnimeDetail> {
        let path = format!("animes/{anime_id}");
        self.send_json(self.request(Method::GET, &path), &path).await
    }

    /// `GET /music?animeId=&seasonId=`
    pub async fn get_music(&self, anime_id: AnimeId, season_id: i64) -> ClientResult<Vec<Music>> {
        let path = "music";
        let builder = self
            .request(Method::GET, path)
            .query(&[("animeId", anime_id), ("seasonId", season_id)]);
        self.send_json(builder, path).await
    }

    /// `GET /music/{id}/ratings`
    pub async fn get_music_ratings(&self, music_id: MusicId) -> ClientResult<Vec<MusicRating>> {
        let path = format!("music/{music_id}/ratings");
        self.send_json(self.request(Method::GET, &path), &path).await
    }

    /// `GET /lists`
    pub async fn get_lists(&self) -> ClientResult<Vec<AnimeList>> {
        let path = "lists";
        self.send_json(self.request(Method::GET, path), path).await
    }

    /// `GET /lists/{id}` with its animes.
    pub async fn get_list(&self, list_id: ListId) -> ClientResult<AnimeList> {
        let path = format!("lists/{list_id}");
        self.send_json(self.request(Method::GET, &path), &path).await
    }

    /// `POST /lists`
    pub async fn create_list(&self, draft: &ListDraft) -> ClientResult<AnimeList> {
        let path = "lists";
        self.send_json(self.request(Method::POST, path).json(draft), path).await
    }

    /// `PUT /lists/{id}`
    pub async fn update_list(&self, list_id: ListId, draft: &ListDraft) -> ClientResult<AnimeList> {
        let path = format!("lists/{list_id}");
        self.send_json(self.request(Method::PUT, &path).json(draft), &path).await
    }

    /// `DELETE /lists/{id}`
    pub async fn delete_list(&self, list_id: ListId) -> ClientResult<()> {
        let path = format!("lists/{list_id}");
        self.send_empty(self.request(Method::DELETE, &path), &path).await
    }

    /// `POST /lists/{id}/anime`
    pub async fn add_anime_to_list(
        &self,
        list_id: ListId,
        anime_id: AnimeId,
    ) -> ClientResult<ListItem> {
        let path = format!("lists/{list_id}/anime");
        let builder = self
            .request(Method::POST, &path)
            .json(&AddToListBody { anime_id });
        self.send_json(builder, &path).await
    }

    /// `DELETE /lists/{id}/anime/{anime_id}`
    pub async fn remove_anime_from_list(
        &self,
        list_id: ListId,
        anime_id: AnimeId,
    ) -> ClientResult<()> {
        let path = format!("lists/{list_id}/anime/{anime_id}");
        self.send_empty(self.request(Method::DELETE, &path), &path).await
    }
}

#[async_trait]
impl TopListApi for ApiClient {
    async fn fetch_top(&self) -> animetrack_core::Result<Vec<TopEntry>> {
        Ok(self.get_top().await?)
    }

    async fn add_to_top(
        &self,
        anime_id: AnimeId,
        position: u32,
    ) -> animetrack_core::Result<TopEntry> {
        Ok(ApiClient::add_to_top(self, anime_id, position).await?)
    }

    async fn remove_from_top(&self, entry_id: TopEntryId) -> animetrack_core::Result<()> {
        Ok(ApiClient::remove_from_top(self, entry_id).await?)
    }

    async fn update_position(
        &self,
        entry_id: TopEntryId,
        new_position: u32,
    ) -> animetrack_core::Result<TopEntry> {
        Ok(ApiClient::update_position(self, entry_id, new_position).await?)
    }
}

#[async_trait]
impl RatingApi for ApiClient {
    async fn rate_episode(
        &self,
        episode_id: EpisodeId,
        rating: Rating,
        comment: Option<&str>,
    ) -> animetrack_core::Result<Episode> {
        Ok(ApiClient::rate_episode(self, episode_id, rating, comment).await?)
    }

    async fn comment_episode(
        &self,
        episode_id: EpisodeId,
        comment: &str,
    ) -> animetrack_core::Result<Episode> {
        Ok(ApiClient::comment_episode(self, episode_id, comment).await?)
    }

    async fn rate_music(
        &self,
        music_id: MusicId,
        rating: Rating,
        comment: Option<&str>,
    ) -> animetrack_core::Result<Vec<MusicRating>> {
        Ok(ApiClient::rate_music(self, music_id, rating, comment).await?)
    }
}
