//! HTTP client for the PHP record-store endpoints

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use reqwest::header::ACCEPT;
use reqwest::multipart::{Form, Part};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::{BackendConfig, CreateEncoding};
use crate::error::{Error, Result};
use crate::project::{EditValues, Project, ProjectDraft, ProjectId};

use super::ProjectStore;
use super::schema::{Listing, decode_listing};

pub const LIST_PATH: &str = "/projects-list.php";
pub const CREATE_PATH: &str = "/project-create.php";
pub const UPDATE_PATH: &str = "/project-update.php";
pub const DELETE_PATH: &str = "/project-delete.php";

/// Record store backed by the PHP endpoints
#[derive(Clone)]
pub struct HttpProjectStore {
    http_client: HttpClient,
    base_url: String,
    create_encoding: CreateEncoding,
}

impl std::fmt::Debug for HttpProjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpProjectStore")
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Builder for HttpProjectStore
pub struct HttpProjectStoreBuilder {
    base_url: Option<String>,
    timeout_secs: Option<u64>,
    create_encoding: CreateEncoding,
}

impl Default for HttpProjectStoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpProjectStoreBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            base_url: None,
            timeout_secs: None,
            create_encoding: CreateEncoding::default(),
        }
    }

    /// Set the base URL the endpoint paths are appended to
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set a request timeout; without one the transport default applies
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Set how create requests are encoded
    pub fn create_encoding(mut self, encoding: CreateEncoding) -> Self {
        self.create_encoding = encoding;
        self
    }

    /// Build the HttpProjectStore
    pub fn build(self) -> Result<HttpProjectStore> {
        let base_url = self
            .base_url
            .ok_or_else(|| Error::ConfigError("Backend base URL is required".to_string()))?;
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(Error::ConfigError("Backend base URL is empty".to_string()));
        }

        let mut builder = HttpClient::builder();
        if let Some(secs) = self.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http_client = builder.build().map_err(Error::Network)?;

        Ok(HttpProjectStore {
            http_client,
            base_url,
            create_encoding: self.create_encoding,
        })
    }
}

#[derive(Serialize)]
struct CreateBody<'a> {
    title: &'a str,
    description: &'a str,
}

#[derive(Serialize)]
struct UpdateBody<'a> {
    id: &'a ProjectId,
    #[serde(flatten)]
    values: &'a EditValues,
}

#[derive(Serialize)]
struct DeleteBody<'a> {
    id: &'a ProjectId,
}

impl HttpProjectStore {
    /// Create a new store for the given base URL
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        HttpProjectStoreBuilder::new().base_url(base_url).build()
    }

    /// Create a new builder
    pub fn builder() -> HttpProjectStoreBuilder {
        HttpProjectStoreBuilder::new()
    }

    /// Build a store from the backend section of the configuration
    pub fn from_config(config: &BackendConfig) -> Result<Self> {
        let mut builder = HttpProjectStoreBuilder::new()
            .base_url(&config.base_url)
            .create_encoding(config.create_encoding);
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout_secs(secs);
        }
        builder.build()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn create_encoding(&self) -> CreateEncoding {
        self.create_encoding
    }

    /// Full URL for an endpoint path
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Turn any non-2xx status into an error, ignoring the body
    fn check_status(path: &str, response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(Error::Status {
                endpoint: path.to_string(),
                status: status.as_u16(),
            })
        }
    }

    async fn post_json<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<()> {
        let url = self.endpoint(path);
        debug!(url = %url, "Sending JSON request");

        let response = self
            .http_client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(Error::Network)?;

        Self::check_status(path, response)?;
        Ok(())
    }

    fn multipart_form(draft: &ProjectDraft) -> Result<Form> {
        let mut form = Form::new()
            .text("title", draft.title.clone())
            .text("description", draft.description.clone());

        if let Some(image) = &draft.image {
            let part = Part::bytes(image.bytes.clone())
                .file_name(image.file_name.clone())
                .mime_str(&image.mime_type)
                .map_err(|e| {
                    Error::InvalidInput(format!("Bad MIME type '{}': {}", image.mime_type, e))
                })?;
            form = form.part("imageFile", part);
        }

        Ok(form)
    }
}

#[async_trait]
impl ProjectStore for HttpProjectStore {
    async fn list(&self) -> Result<Vec<Project>> {
        let url = self.endpoint(LIST_PATH);
        debug!(url = %url, "Fetching project list");

        let response = self
            .http_client
            .get(&url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(Error::Network)?;

        let response = Self::check_status(LIST_PATH, response)?;
        let body = response.bytes().await.map_err(Error::Network)?;

        match decode_listing(&body)? {
            Listing::Records(records) => {
                info!(count = records.len(), "Project list fetched");
                Ok(records)
            }
            Listing::NotAList(kind) => {
                warn!(kind = kind, "Listing response is not an array, treating as empty");
                Ok(Vec::new())
            }
        }
    }

    async fn create(&self, draft: &ProjectDraft) -> Result<()> {
        match self.create_encoding {
            CreateEncoding::Multipart => {
                let url = self.endpoint(CREATE_PATH);
                debug!(
                    url = %url,
                    has_image = draft.image.is_some(),
                    "Sending multipart create request"
                );

                let form = Self::multipart_form(draft)?;
                let response = self
                    .http_client
                    .post(&url)
                    .multipart(form)
                    .send()
                    .await
                    .map_err(Error::Network)?;

                Self::check_status(CREATE_PATH, response)?;
                Ok(())
            }
            CreateEncoding::Json => {
                if draft.image.is_some() {
                    return Err(Error::InvalidInput(
                        "Image uploads need backend.create_encoding = multipart".to_string(),
                    ));
                }
                let body = CreateBody {
                    title: &draft.title,
                    description: &draft.description,
                };
                self.post_json(CREATE_PATH, &body).await
            }
        }
    }

    async fn update(&self, id: &ProjectId, values: &EditValues) -> Result<()> {
        self.post_json(UPDATE_PATH, &UpdateBody { id, values }).await
    }

    async fn delete(&self, id: &ProjectId) -> Result<()> {
        self.post_json(DELETE_PATH, &DeleteBody { id }).await
    }
}
