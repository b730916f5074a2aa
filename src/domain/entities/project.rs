use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::entities::{
    option_fields::OptionField,
    validation::{new_validation_error, validate_char_length, validate_tag_list, validate_title, validate_url, PatchValidator},
};

const MIN_TITLE_LENGTH: u64 = 3;
const MAX_TITLE_LENGTH: u64 = 120;
const MIN_SHORT_DESCRIPTION_LENGTH: u64 = 10;
const MAX_SHORT_DESCRIPTION_LENGTH: u64 = 300;
const MAX_LONG_DESCRIPTION_LENGTH: u64 = 5000;
const MAX_TECH_TAGS: usize = 20;
const MAX_TECH_TAG_LENGTH: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "project_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Active,
    Archived,
    Draft,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    pub id: Uuid,
    pub title: String,
    pub short_description: String,
    pub long_description: Option<String>,
    pub tech_stack: Vec<String>,
    pub image_url: Option<String>,
    pub github_url: Option<String>,
    pub live_url: Option<String>,
    pub featured: bool,
    pub status: ProjectStatus,
    pub order_index: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewProjectRequest {
    #[validate(
        length(min = MIN_TITLE_LENGTH, max = MAX_TITLE_LENGTH),
        custom(function = "validate_title")
    )]
    pub title: String,

    #[validate(length(min = MIN_SHORT_DESCRIPTION_LENGTH, max = MAX_SHORT_DESCRIPTION_LENGTH))]
    pub short_description: String,

    #[validate(length(max = MAX_LONG_DESCRIPTION_LENGTH))]
    pub long_description: Option<String>,

    #[validate(custom(function = "validate_tech_stack"))]
    #[serde(default)]
    pub tech_stack: Vec<String>,

    #[validate(custom(function = "validate_url"))]
    pub image_url: Option<String>,

    #[validate(custom(function = "validate_url"))]
    pub github_url: Option<String>,

    #[validate(custom(function = "validate_url"))]
    pub live_url: Option<String>,

    #[serde(default)]
    pub featured: bool,

    #[serde(default = "default_status")]
    pub status: ProjectStatus,

    #[validate(range(min = 0))]
    #[serde(default)]
    pub order_index: i32,
}

fn default_status() -> ProjectStatus {
    ProjectStatus::Draft
}

#[derive(Debug, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct UpdateProjectRequest {
    pub title: OptionField<String>,
    pub short_description: OptionField<String>,
    pub long_description: OptionField<String>,
    pub tech_stack: OptionField<Vec<String>>,
    pub image_url: OptionField<String>,
    pub github_url: OptionField<String>,
    pub live_url: OptionField<String>,
    pub featured: OptionField<bool>,
    pub status: OptionField<ProjectStatus>,
    pub order_index: OptionField<i32>,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ProjectChanges {
    pub title: Option<String>,
    pub short_description: Option<String>,
    pub long_description: Option<Option<String>>,
    pub tech_stack: Option<Vec<String>>,
    pub image_url: Option<Option<String>>,
    pub github_url: Option<Option<String>>,
    pub live_url: Option<Option<String>>,
    pub featured: Option<bool>,
    pub status: Option<ProjectStatus>,
    pub order_index: Option<i32>,
}

/// Listing filter; the public listing never sees drafts.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ProjectFilter {
    pub status: Option<ProjectStatus>,
    pub featured: Option<bool>,
    #[serde(skip)]
    pub include_drafts: bool,
}

#[derive(Debug, Default, Serialize, PartialEq, sqlx::FromRow)]
pub struct ProjectStats {
    pub active: i64,
    pub archived: i64,
    pub draft: i64,
    pub featured: i64,
}

pub fn validate_tech_stack(stack: &[String]) -> Result<(), ValidationError> {
    validate_tag_list(stack, MAX_TECH_TAGS, MAX_TECH_TAG_LENGTH)
}

fn title_length(title: &String) -> Result<(), ValidationError> {
    validate_char_length(title, MIN_TITLE_LENGTH as usize, MAX_TITLE_LENGTH as usize)?;
    validate_title(title)
}

fn short_description_length(text: &String) -> Result<(), ValidationError> {
    validate_char_length(text, MIN_SHORT_DESCRIPTION_LENGTH as usize, MAX_SHORT_DESCRIPTION_LENGTH as usize)
}

fn long_description_length(text: &String) -> Result<(), ValidationError> {
    validate_char_length(text, 0, MAX_LONG_DESCRIPTION_LENGTH as usize)
}

fn non_negative(value: &i32) -> Result<(), ValidationError> {
    if *value < 0 {
        return Err(new_validation_error("range", "Order index cannot be negative"));
    }
    Ok(())
}

impl UpdateProjectRequest {
    pub fn into_changes(self) -> Result<ProjectChanges, ValidationErrors> {
        PatchValidator::new()
            .required("title", &self.title, title_length)
            .required("short_description", &self.short_description, short_description_length)
            .nullable("long_description", &self.long_description, long_description_length)
            .required("tech_stack", &self.tech_stack, |s| validate_tech_stack(s))
            .nullable("image_url", &self.image_url, |u| validate_url(u))
            .nullable("github_url", &self.github_url, |u| validate_url(u))
            .nullable("live_url", &self.live_url, |u| validate_url(u))
            .required("featured", &self.featured, |_| Ok(()))
            .required("status", &self.status, |_| Ok(()))
            .required("order_index", &self.order_index, non_negative)
            .finish()?;

        Ok(ProjectChanges {
            title: self.title.take_value(),
            short_description: self.short_description.take_value(),
            long_description: self.long_description.into_option(),
            tech_stack: self.tech_stack.take_value(),
            image_url: self.image_url.into_option(),
            github_url: self.github_url.into_option(),
            live_url: self.live_url.into_option(),
            featured: self.featured.take_value(),
            status: self.status.take_value(),
            order_index: self.order_index.take_value(),
        })
    }
}

impl ProjectChanges {
    pub fn is_empty(&self) -> bool {
        *self == ProjectChanges::default()
    }
}
