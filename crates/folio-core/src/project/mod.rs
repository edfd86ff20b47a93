//! Project records
//!
//! The backend owns identity and storage; these types are the client's view
//! of one portfolio item plus the input buffers used to create and edit one.

mod fallback;
mod upload;

pub use fallback::fallback_projects;
pub use upload::{ImageUpload, detect_image_mime_type};

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Backend-assigned project identifier
///
/// The PHP endpoints emit ids as JSON numbers or strings depending on the
/// driver; both are kept in the form they arrived in so they are sent back
/// unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProjectId {
    Int(i64),
    Text(String),
}

impl ProjectId {
    /// Parse a user-typed id, preferring the numeric form
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        s.parse::<i64>()
            .map(Self::Int)
            .unwrap_or_else(|_| Self::Text(s.to_string()))
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{}", n),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for ProjectId {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<&str> for ProjectId {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

/// A portfolio project as returned by the listing endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Absent until the backend has assigned one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ProjectId>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "imageSrc", default, skip_serializing_if = "Option::is_none")]
    pub image_src: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub live_url: Option<String>,
}

/// Nullable text columns arrive as `null`; read them as `""`
fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl Project {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<ProjectId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_image_src(mut self, src: impl Into<String>) -> Self {
        self.image_src = Some(src.into());
        self
    }

    pub fn with_repo_url(mut self, url: impl Into<String>) -> Self {
        self.repo_url = Some(url.into());
        self
    }

    pub fn with_live_url(mut self, url: impl Into<String>) -> Self {
        self.live_url = Some(url.into());
        self
    }

    /// Stable key for renderers; records without an id fall back to
    /// `"{title}-{index}"`
    pub fn display_key(&self, index: usize) -> String {
        match &self.id {
            Some(id) => id.to_string(),
            None => format!("{}-{}", self.title, index),
        }
    }
}

/// Input buffer for the creation form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectDraft {
    pub title: String,
    pub description: String,
    pub image: Option<ImageUpload>,
}

impl ProjectDraft {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            image: None,
        }
    }

    pub fn with_image(mut self, image: ImageUpload) -> Self {
        self.image = Some(image);
        self
    }

    /// True if the form is in its reset state
    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.description.is_empty() && self.image.is_none()
    }
}

/// Editing buffer for one record
///
/// Sent to the update endpoint as a full replacement of all four fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditValues {
    pub title: String,
    pub description: String,
    pub repo_url: String,
    pub live_url: String,
}

impl EditValues {
    pub fn from_project(project: &Project) -> Self {
        Self {
            title: project.title.clone(),
            description: project.description.clone().unwrap_or_default(),
            repo_url: project.repo_url.clone().unwrap_or_default(),
            live_url: project.live_url.clone().unwrap_or_default(),
        }
    }
}
