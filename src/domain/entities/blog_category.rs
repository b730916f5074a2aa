use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::entities::{
    option_fields::OptionField,
    validation::{generate_slug, new_validation_error, validate_char_length, validate_optional_slug, PatchValidator},
};

const MIN_NAME_LENGTH: u64 = 2;
const MAX_NAME_LENGTH: u64 = 50;
const MAX_ICON_LENGTH: u64 = 32;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct BlogCategory {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub icon: Option<String>,
    pub display_order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct BlogCategoryInsert {
    pub name: String,
    pub slug: String,
    pub icon: Option<String>,
    pub display_order: i32,
    pub is_active: bool,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct BlogCategoryChanges {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub icon: Option<Option<String>>,
    pub display_order: Option<i32>,
    pub is_active: Option<bool>,
}

impl BlogCategoryChanges {
    pub fn is_empty(&self) -> bool {
        *self == BlogCategoryChanges::default()
    }
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct NewBlogCategoryRequest {
    #[validate(custom(function = "name_length"))]
    pub name: String,

    #[validate(custom(function = "validate_optional_slug"))]
    pub slug: Option<String>,

    #[validate(length(max = MAX_ICON_LENGTH))]
    pub icon: Option<String>,

    #[validate(range(min = 0))]
    #[serde(default)]
    pub display_order: i32,

    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct UpdateBlogCategoryRequest {
    pub name: OptionField<String>,
    pub slug: OptionField<String>,
    pub icon: OptionField<String>,
    pub display_order: OptionField<i32>,
    pub is_active: OptionField<bool>,
}

/// Measured after trimming, since the stored name is trimmed.
fn name_length(name: &String) -> Result<(), ValidationError> {
    validate_char_length(name.trim(), MIN_NAME_LENGTH as usize, MAX_NAME_LENGTH as usize)
}

fn icon_length(icon: &String) -> Result<(), ValidationError> {
    validate_char_length(icon, 0, MAX_ICON_LENGTH as usize)
}

fn non_negative(value: &i32) -> Result<(), ValidationError> {
    if *value < 0 {
        return Err(new_validation_error("range", "Display order cannot be negative"));
    }
    Ok(())
}

impl TryFrom<NewBlogCategoryRequest> for BlogCategoryInsert {
    type Error = ValidationErrors;

    fn try_from(value: NewBlogCategoryRequest) -> Result<Self, Self::Error> {
        value.validate()?;

        let slug = match value.slug {
            Some(s) if !s.trim().is_empty() => s,
            _ => generate_slug(&value.name)?,
        };

        Ok(BlogCategoryInsert {
            name: value.name.trim().to_string(),
            slug,
            icon: value.icon.filter(|i| !i.trim().is_empty()),
            display_order: value.display_order,
            is_active: value.is_active,
        })
    }
}

impl UpdateBlogCategoryRequest {
    /// An empty slug is regenerated from the new name, or the current one.
    pub fn into_changes(self, current: &BlogCategory) -> Result<BlogCategoryChanges, ValidationErrors> {
        PatchValidator::new()
            .required("name", &self.name, name_length)
            .required("slug", &self.slug, |s| validate_optional_slug(s))
            .nullable("icon", &self.icon, icon_length)
            .required("display_order", &self.display_order, non_negative)
            .required("is_active", &self.is_active, |_| Ok(()))
            .finish()?;

        let name = self.name.take_value().map(|n| n.trim().to_string());
        let slug = match self.slug.take_value() {
            Some(s) if !s.trim().is_empty() => Some(s),
            Some(_) => Some(generate_slug(name.as_deref().unwrap_or(&current.name))?),
            None => None,
        };

        Ok(BlogCategoryChanges {
            name,
            slug: slug.filter(|s| *s != current.slug),
            icon: self.icon.into_option(),
            display_order: self.display_order.take_value(),
            is_active: self.is_active.take_value(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored_category() -> BlogCategory {
        let now = Utc::now();
        BlogCategory {
            id: Uuid::new_v4(),
            name: "Systems".into(),
            slug: "systems".into(),
            icon: None,
            display_order: 0,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn new_request(name: &str, slug: Option<&str>) -> NewBlogCategoryRequest {
        NewBlogCategoryRequest {
            name: name.into(),
            slug: slug.map(Into::into),
            icon: None,
            display_order: 0,
            is_active: true,
        }
    }

    #[test]
    fn slug_is_derived_from_name() {
        let request = NewBlogCategoryRequest {
            name: "Systems Programming".into(),
            slug: None,
            icon: Some("terminal".into()),
            display_order: 1,
            is_active: true,
        };

        let insert = BlogCategoryInsert::try_from(request).unwrap();
        assert_eq!(insert.slug, "systems-programming");
    }

    #[test]
    fn negative_display_order_is_rejected() {
        let patch: UpdateBlogCategoryRequest = serde_json::from_str(r#"{"display_order": -1}"#).unwrap();
        assert!(patch.into_changes(&stored_category()).is_err());
    }

    #[test]
    fn icon_can_be_cleared() {
        let patch: UpdateBlogCategoryRequest = serde_json::from_str(r#"{"icon": null}"#).unwrap();
        assert_eq!(patch.into_changes(&stored_category()).unwrap().icon, Some(None));
    }

    #[test]
    fn name_is_measured_after_trimming() {
        let padded = BlogCategoryInsert::try_from(new_request("   Go   ", Some("golang"))).unwrap();
        assert_eq!(padded.name, "Go");

        assert!(BlogCategoryInsert::try_from(new_request("  a  ", Some("abc"))).is_err());
        assert!(BlogCategoryInsert::try_from(new_request(&format!("  {}  ", "n".repeat(50)), None)).is_ok());

        let patch: UpdateBlogCategoryRequest = serde_json::from_str(r#"{"name": "   x   "}"#).unwrap();
        assert!(patch.into_changes(&stored_category()).is_err());
    }

    #[test]
    fn empty_slug_falls_back_to_name() {
        let insert = BlogCategoryInsert::try_from(new_request("Web Dev", Some(""))).unwrap();
        assert_eq!(insert.slug, "web-dev");

        let insert = BlogCategoryInsert::try_from(new_request("Web Dev", Some("  "))).unwrap();
        assert_eq!(insert.slug, "web-dev");
    }

    #[test]
    fn empty_slug_on_patch_is_regenerated() {
        let renamed: UpdateBlogCategoryRequest =
            serde_json::from_str(r#"{"name": "Embedded Rust", "slug": ""}"#).unwrap();
        assert_eq!(renamed.into_changes(&stored_category()).unwrap().slug.as_deref(), Some("embedded-rust"));

        let same_name: UpdateBlogCategoryRequest = serde_json::from_str(r#"{"slug": ""}"#).unwrap();
        assert_eq!(same_name.into_changes(&stored_category()).unwrap().slug, None);
    }

    #[test]
    fn long_name_gets_a_bounded_slug() {
        let name = "中文".repeat(20);
        assert!(slug::slugify(&name).len() > crate::entities::validation::MAX_SLUG_LENGTH);

        let insert = BlogCategoryInsert::try_from(new_request(&name, None)).unwrap();
        assert!(insert.slug.len() <= crate::entities::validation::MAX_SLUG_LENGTH);
        assert!(crate::entities::validation::validate_slug(&insert.slug).is_ok());
    }
}
