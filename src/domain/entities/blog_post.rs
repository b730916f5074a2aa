use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationErrors};
use sqlx::types::Json;

use crate::entities::{
    content_block::{estimate_reading_time, render_blocks_to_html, validate_content_blocks, ContentBlock},
    option_fields::OptionField,
    validation::{
        generate_slug, validate_char_length, validate_optional_slug, validate_tags, validate_title,
        validate_url, PatchValidator,
    },
};

// ───── Constants ──────────────────────────────────────────────────────
const MIN_TITLE_LENGTH: u64 = 3;
const MAX_TITLE_LENGTH: u64 = 120;
const MIN_DESCRIPTION_LENGTH: u64 = 10;
const MAX_DESCRIPTION_LENGTH: u64 = 300;


// ───── Database Models ───────────────────────────────────────────────

#[derive(Debug, sqlx::FromRow)]
pub struct BlogPostRow {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub content: Json<Vec<ContentBlock>>,
    pub cover_image_url: Option<String>,
    pub category_id: Option<Uuid>,
    pub category_name: Option<String>,
    pub category_slug: Option<String>,
    pub tags: Vec<String>,
    pub is_published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub view_count: i64,
    pub reading_time_minutes: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BlogPost {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub content: Vec<ContentBlock>,
    pub cover_image_url: Option<String>,
    pub category_id: Option<Uuid>,
    pub category_name: Option<String>,
    pub category_slug: Option<String>,
    pub tags: Vec<String>,
    pub is_published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub view_count: i64,
    pub reading_time_minutes: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Validated, normalized payload ready for INSERT.
#[derive(Debug, Clone)]
pub struct BlogPostInsert {
    pub title: String,
    pub slug: String,
    pub description: String,
    pub content: Vec<ContentBlock>,
    pub cover_image_url: Option<String>,
    pub category_id: Option<Uuid>,
    pub tags: Vec<String>,
    pub is_published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub reading_time_minutes: i32,
}

/// Validated column changes for UPDATE. `None` leaves a column untouched.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct BlogPostChanges {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub content: Option<Vec<ContentBlock>>,
    pub reading_time_minutes: Option<i32>,
    pub cover_image_url: Option<Option<String>>,
    pub category_id: Option<Option<Uuid>>,
    pub tags: Option<Vec<String>>,
    pub is_published: Option<bool>,
    pub published_at: Option<Option<DateTime<Utc>>>,
}

impl BlogPostChanges {
    pub fn is_empty(&self) -> bool {
        *self == BlogPostChanges::default()
    }
}

// ───── API Response Models ──────────────────────────────────────────
#[derive(Debug, Serialize)]
pub struct BlogPostListResponse {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub cover_image_url: Option<String>,
    pub category_name: Option<String>,
    pub category_slug: Option<String>,
    pub tags: Vec<String>,
    pub is_published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub view_count: i64,
    pub reading_time_minutes: i32,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct BlogPostDetailResponse {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub content: Vec<ContentBlock>,
    pub content_html: String,
    pub cover_image_url: Option<String>,
    pub category_name: Option<String>,
    pub category_slug: Option<String>,
    pub tags: Vec<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub view_count: i64,
    pub reading_time_minutes: i32,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BlogPostCreatedResponse {
    pub id: Uuid,
    pub slug: String,
    pub preview_url: String,
    pub admin_url: String,
}

#[derive(Debug, Serialize)]
pub struct ContentPreviewResponse {
    pub content_html: String,
    pub reading_time_minutes: i32,
}

#[derive(Debug, Default, Serialize, sqlx::FromRow)]
pub struct BlogStats {
    pub total_posts: i64,
    pub published_posts: i64,
    pub draft_posts: i64,
    pub total_views: i64,
}

// ───── Input & Validation Requests ──────────────────────────────────

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct NewBlogPostRequest {
    #[validate(
        length(min = MIN_TITLE_LENGTH, max = MAX_TITLE_LENGTH),
        custom(function = "validate_title")
    )]
    pub title: String,

    #[validate(custom(function = "validate_optional_slug"))]
    pub slug: Option<String>,

    #[validate(length(min = MIN_DESCRIPTION_LENGTH, max = MAX_DESCRIPTION_LENGTH))]
    pub description: String,

    #[validate(custom(function = "validate_content_blocks"))]
    pub content: Vec<ContentBlock>,

    #[validate(custom(function = "validate_url"))]
    pub cover_image_url: Option<String>,

    pub category_id: Option<Uuid>,

    #[validate(custom(function = "validate_tags"))]
    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub is_published: bool,

    pub published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct UpdateBlogPostRequest {
    pub title: OptionField<String>,
    pub slug: OptionField<String>,
    pub description: OptionField<String>,
    pub content: OptionField<Vec<ContentBlock>>,
    pub cover_image_url: OptionField<String>,
    pub category_id: OptionField<Uuid>,
    pub tags: OptionField<Vec<String>>,
    pub is_published: OptionField<bool>,
    pub published_at: OptionField<DateTime<Utc>>,
}

/// Listing filter. Public listings always set `published_only`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlogPostFilter {
    #[serde(skip)]
    pub published_only: bool,
    pub category: Option<String>,
    pub tag: Option<String>,
    pub q: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ContentPreviewRequest {
    pub content: Vec<ContentBlock>,
}

// ───── Validation Helpers ───────────────────────────────────────────

fn title_length(title: &String) -> Result<(), validator::ValidationError> {
    validate_char_length(title, MIN_TITLE_LENGTH as usize, MAX_TITLE_LENGTH as usize)?;
    validate_title(title)
}

fn description_length(description: &String) -> Result<(), validator::ValidationError> {
    validate_char_length(description, MIN_DESCRIPTION_LENGTH as usize, MAX_DESCRIPTION_LENGTH as usize)
}

// ───── Conversions ──────────────────────────────────────────────────
impl From<BlogPostRow> for BlogPost {
    fn from(row: BlogPostRow) -> Self {
        BlogPost {
            id: row.id,
            title: row.title,
            slug: row.slug,
            description: row.description,
            content: row.content.0,
            cover_image_url: row.cover_image_url,
            category_id: row.category_id,
            category_name: row.category_name,
            category_slug: row.category_slug,
            tags: row.tags,
            is_published: row.is_published,
            published_at: row.published_at,
            view_count: row.view_count,
            reading_time_minutes: row.reading_time_minutes,
            created_at: row.created_at,
            updated_at: row.updated_at,
            deleted_at: row.deleted_at,
        }
    }
}

impl TryFrom<NewBlogPostRequest> for BlogPostInsert {
    type Error = ValidationErrors;

    fn try_from(value: NewBlogPostRequest) -> Result<Self, Self::Error> {
        value.validate()?;

        let slug = match value.slug {
            Some(s) if !s.trim().is_empty() => s,
            _ => generate_slug(&value.title)?,
        };

        let published_at = match (value.is_published, value.published_at) {
            (true, None) => Some(Utc::now()),
            (_, at) => at,
        };

        Ok(BlogPostInsert {
            reading_time_minutes: estimate_reading_time(&value.content),
            title: value.title,
            slug,
            description: value.description,
            content: value.content,
            cover_image_url: value.cover_image_url,
            category_id: value.category_id,
            tags: value.tags,
            is_published: value.is_published,
            published_at,
        })
    }
}

impl UpdateBlogPostRequest {
    pub fn validate_patch(&self) -> Result<(), ValidationErrors> {
        PatchValidator::new()
            .required("title", &self.title, title_length)
            .required("slug", &self.slug, |s| validate_optional_slug(s))
            .required("description", &self.description, description_length)
            .required("content", &self.content, |c| validate_content_blocks(c))
            .nullable("cover_image_url", &self.cover_image_url, |u| validate_url(u))
            .required("tags", &self.tags, |t| validate_tags(t))
            .required("is_published", &self.is_published, |_| Ok(()))
            .finish()
    }

    /// Turns a validated patch into column changes.
    ///
    /// The slug only moves when the caller sends one; an empty slug is
    /// regenerated from the new title, or the current title when unchanged.
    pub fn into_changes(self, current: &BlogPost) -> Result<BlogPostChanges, ValidationErrors> {
        self.validate_patch()?;

        let slug = match &self.slug {
            OptionField::SetToValue(s) if !s.trim().is_empty() => Some(s.clone()),
            OptionField::SetToValue(_) => {
                let title = self.title.value_ref().unwrap_or(&current.title);
                Some(generate_slug(title)?)
            }
            _ => None,
        };
        let slug = slug.filter(|s| *s != current.slug);

        let is_published = self.is_published.value_ref().copied();
        let published_at = match (is_published, self.published_at.clone().into_option()) {
            (_, Some(explicit)) => Some(explicit),
            (Some(true), None) if current.published_at.is_none() => Some(Some(Utc::now())),
            _ => None,
        };

        let reading_time_minutes = self.content.value_ref().map(|c| estimate_reading_time(c));

        Ok(BlogPostChanges {
            title: self.title.take_value(),
            slug,
            description: self.description.take_value(),
            content: self.content.take_value(),
            reading_time_minutes,
            cover_image_url: self.cover_image_url.into_option(),
            category_id: self.category_id.into_option(),
            tags: self.tags.take_value(),
            is_published,
            published_at,
        })
    }
}

impl BlogPost {
    pub fn to_list_response(&self) -> BlogPostListResponse {
        BlogPostListResponse {
            id: self.id,
            title: self.title.clone(),
            slug: self.slug.clone(),
            description: self.description.clone(),
            cover_image_url: self.cover_image_url.clone(),
            category_name: self.category_name.clone(),
            category_slug: self.category_slug.clone(),
            tags: self.tags.clone(),
            is_published: self.is_published,
            published_at: self.published_at,
            view_count: self.view_count,
            reading_time_minutes: self.reading_time_minutes,
            updated_at: self.updated_at,
        }
    }

    pub fn to_detail_response(&self) -> BlogPostDetailResponse {
        BlogPostDetailResponse {
            id: self.id,
            title: self.title.clone(),
            slug: self.slug.clone(),
            description: self.description.clone(),
            content: self.content.clone(),
            content_html: render_blocks_to_html(&self.content),
            cover_image_url: self.cover_image_url.clone(),
            category_name: self.category_name.clone(),
            category_slug: self.category_slug.clone(),
            tags: self.tags.clone(),
            published_at: self.published_at,
            view_count: self.view_count,
            reading_time_minutes: self.reading_time_minutes,
            updated_at: self.updated_at,
        }
    }
}
