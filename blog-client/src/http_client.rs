use crate::error::BlogClientError;
use crate::{BlogStats, Post, User};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::debug;
use uuid::Uuid;

#[derive(Clone)]
pub struct BlogClient {
    client: Client,
    base_url: String,
    token: Option<String>,
    token_file: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
    username: String,
    expires_in: i64,
}

#[derive(Debug, Default, Serialize)]
pub struct PostUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub likes: Option<u32>,
}

impl BlogClient {
    pub fn connect(endpoint: &str) -> Result<Self, BlogClientError> {
        let base_url = endpoint.trim_end_matches('/').to_string();
        Ok(Self {
            client: Client::builder().build()?,
            base_url,
            token: None,
            token_file: None,
        })
    }

    /// Persists tokens at `path` and picks up one saved by an earlier run.
    pub fn with_token_file(mut self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if self.token.is_none() {
            self.token = fs::read_to_string(&path)
                .ok()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty());
        }
        self.token_file = Some(path);
        self
    }

    pub fn set_token(&mut self, token: String) -> Result<(), BlogClientError> {
        if let Some(path) = &self.token_file {
            fs::write(path, &token)?;
        }
        self.token = Some(token);
        Ok(())
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    fn authorized(&self, req: RequestBuilder) -> Result<RequestBuilder, BlogClientError> {
        let token = self.token.as_deref().ok_or(BlogClientError::Unauthorized)?;
        Ok(req.bearer_auth(token))
    }

    async fn parse<T: DeserializeOwned>(resp: Response) -> Result<T, BlogClientError> {
        if resp.status().is_success() {
            Ok(resp.json().await?)
        } else {
            Err(BlogClientError::from_http_response(resp).await)
        }
    }

    pub async fn register(
        &self,
        username: &str,
        name: Option<&str>,
        password: &str,
    ) -> Result<User, BlogClientError> {
        let resp = self
            .client
            .post(self.url("/users"))
            .json(&serde_json::json!({
                "username": username,
                "name": name,
                "password": password,
            }))
            .send()
            .await?;

        Self::parse(resp).await
    }

    pub async fn login(&mut self, username: &str, password: &str) -> Result<(), BlogClientError> {
        let resp = self
            .client
            .post(self.url("/login"))
            .json(&serde_json::json!({
                "username": username,
                "password": password,
            }))
            .send()
            .await?;

        let login: LoginResponse = Self::parse(resp).await?;
        debug!(username = %login.username, expires_in = login.expires_in, "logged in");
        self.set_token(login.token)
    }

    pub async fn list_users(&self) -> Result<Vec<User>, BlogClientError> {
        let resp = self.client.get(self.url("/users")).send().await?;
        Self::parse(resp).await
    }

    pub async fn list_posts(&self) -> Result<Vec<Post>, BlogClientError> {
        let resp = self.client.get(self.url("/blogs")).send().await?;
        Self::parse(resp).await
    }

    pub async fn get_post(&self, id: Uuid) -> Result<Post, BlogClientError> {
        let resp = self
            .client
            .get(self.url(&format!("/blogs/{id}")))
            .send()
            .await?;
        Self::parse(resp).await
    }

    pub async fn stats(&self) -> Result<BlogStats, BlogClientError> {
        let resp = self.client.get(self.url("/blogs/stats")).send().await?;
        Self::parse(resp).await
    }

    pub async fn create_post(
        &self,
        title: &str,
        author: &str,
        url: &str,
        likes: Option<u32>,
    ) -> Result<Post, BlogClientError> {
        let req = self.authorized(self.client.post(self.url("/blogs")))?;
        let resp = req
            .json(&serde_json::json!({
                "title": title,
                "author": author,
                "url": url,
                "likes": likes,
            }))
            .send()
            .await?;

        Self::parse(resp).await
    }

    pub async fn update_post(&self, id: Uuid, update: &PostUpdate) -> Result<Post, BlogClientError> {
        let req = self.authorized(self.client.put(self.url(&format!("/blogs/{id}"))))?;
        let resp = req.json(update).send().await?;
        Self::parse(resp).await
    }

    pub async fn delete_post(&self, id: Uuid) -> Result<(), BlogClientError> {
        let req = self.authorized(self.client.delete(self.url(&format!("/blogs/{id}"))))?;
        let resp = req.send().await?;

        if resp.status().is_success() {
            Ok(())
        } else {
            Err(BlogClientError::from_http_response(resp).await)
        }
    }
}
