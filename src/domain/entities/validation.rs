use std::borrow::Cow;

use validator::{ValidationError, ValidationErrors};

use crate::entities::option_fields::OptionField;

pub const MIN_SLUG_LENGTH: usize = 3;
pub const MAX_SLUG_LENGTH: usize = 80;
pub const MAX_TAGS: usize = 10;
pub const MAX_TAG_LENGTH: usize = 30;

pub fn validate_url(url: &str) -> Result<(), ValidationError> {
    match url::Url::parse(url) {
        Ok(parsed) => {
            if parsed.scheme() == "http" || parsed.scheme() == "https" {
                Ok(())
            } else {
                Err(new_validation_error("invalid_url_scheme", "URL must start with http:// or https://"))
            }
        }
        Err(_) => Err(new_validation_error("invalid_url", "Invalid URL format")),
    }
}

pub fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    if slug.is_empty() {
        return Err(new_validation_error("slug_empty", "Slug cannot be empty"));
    }
    if slug.len() < MIN_SLUG_LENGTH || slug.len() > MAX_SLUG_LENGTH {
        return Err(new_validation_error("slug_length", "Slug must be between 3 and 80 characters"));
    }
    if !slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-') {
        return Err(new_validation_error("slug_invalid_chars", "Slug must contain only lowercase letters, digits, or hyphens"));
    }
    if slug.starts_with('-') || slug.ends_with('-') {
        return Err(new_validation_error("slug_edge_hyphen", "Slug must not start or end with a hyphen"));
    }
    if slug.contains("--") {
        return Err(new_validation_error("slug_double_hyphen", "Slug must not contain consecutive hyphens"));
    }
    Ok(())
}

/// Empty slugs are allowed in requests; they fall back to a generated one.
pub fn validate_optional_slug(slug: &str) -> Result<(), ValidationError> {
    if slug.trim().is_empty() {
        return Ok(());
    }
    validate_slug(slug)
}

/// Slugifies `source`, cutting long results at a hyphen so they stay within
/// `MAX_SLUG_LENGTH`. The result always passes `validate_slug`.
pub fn generate_slug(source: &str) -> Result<String, ValidationErrors> {
    let mut generated = slug::slugify(source);
    if generated.len() > MAX_SLUG_LENGTH {
        // slugify output is ASCII, so byte offsets are char boundaries.
        let cut = generated[..=MAX_SLUG_LENGTH].rfind('-').unwrap_or(MAX_SLUG_LENGTH);
        generated.truncate(cut);
    }
    let generated = generated.trim_matches('-');

    let mut errors = ValidationErrors::new();
    if generated.len() < MIN_SLUG_LENGTH {
        errors.add("slug", new_validation_error("slug_too_short", "Generated slug is too short; please provide a custom slug"));
        return Err(errors);
    }
    if let Err(e) = validate_slug(generated) {
        errors.add("slug", e);
        return Err(errors);
    }
    Ok(generated.to_string())
}

pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().len() != title.len() {
        return Err(new_validation_error("title_whitespace", "Title must not have leading or trailing whitespace"));
    }
    Ok(())
}

/// Post tags are single words: letters, digits and hyphens.
pub fn validate_tags(tags: &[String]) -> Result<(), ValidationError> {
    if tags.len() > MAX_TAGS {
        return Err(new_validation_error("too_many_tags", "Too many tags provided"));
    }
    for tag in tags {
        if tag.trim().is_empty() || tag.chars().count() > MAX_TAG_LENGTH {
            return Err(new_validation_error("invalid_tag_length", "Tag length must be within allowed range"));
        }
        if !tag.chars().all(|c| c.is_alphanumeric() || c == '-') {
            return Err(new_validation_error("invalid_tag_chars", "Tags may only contain letters, digits, or hyphens"));
        }
    }
    Ok(())
}

/// Tech stack entries, which also allow spaces and `. + #`.
pub fn validate_tag_list(tags: &[String], max_tags: usize, max_len: usize) -> Result<(), ValidationError> {
    if tags.len() > max_tags {
        return Err(new_validation_error("too_many_tags", "Too many tags provided"));
    }
    for tag in tags {
        if tag.trim().is_empty() || tag.chars().count() > max_len {
            return Err(new_validation_error("invalid_tag_length", "Tag length must be within allowed range"));
        }
        if !tag.chars().all(|c| c.is_alphanumeric() || matches!(c, '-' | '.' | '+' | '#' | ' ')) {
            return Err(new_validation_error("invalid_tag_chars", "Tags must be alphanumeric, spaces, or - . + #"));
        }
    }
    Ok(())
}

/// Length check in characters, for fields the derive cannot reach.
pub fn validate_char_length(value: &str, min: usize, max: usize) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if len < min || len > max {
        let mut err = ValidationError::new("length");
        err.message = Some(Cow::Owned(format!("Must be between {min} and {max} characters")));
        return Err(err);
    }
    Ok(())
}

pub fn new_validation_error(code: &'static str, msg: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(msg));
    err
}

/// Collects field-level checks for PATCH payloads.
#[derive(Default)]
pub struct PatchValidator {
    errors: ValidationErrors,
}

impl PatchValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `check` on a set value and rejects `null` for required fields.
    pub fn required<T, F>(&mut self, field: &'static str, value: &OptionField<T>, check: F) -> &mut Self
    where
        F: FnOnce(&T) -> Result<(), ValidationError>,
    {
        match value {
            OptionField::SetToNull => {
                self.errors.add(field, new_validation_error("required", "Field cannot be null"));
            }
            OptionField::SetToValue(v) => {
                if let Err(e) = check(v) {
                    self.errors.add(field, e);
                }
            }
            OptionField::Unchanged => {}
        }
        self
    }

    /// Runs `check` on a set value; `null` clears the field.
    pub fn nullable<T, F>(&mut self, field: &'static str, value: &OptionField<T>, check: F) -> &mut Self
    where
        F: FnOnce(&T) -> Result<(), ValidationError>,
    {
        if let OptionField::SetToValue(v) = value {
            if let Err(e) = check(v) {
                self.errors.add(field, e);
            }
        }
        self
    }

    pub fn finish(&mut self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(std::mem::take(&mut self.errors))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_rules() {
        assert!(validate_slug("hello-world-2").is_ok());
        assert!(validate_slug("Hello").is_err());
        assert!(validate_slug("-edge").is_err());
        assert!(validate_slug("a--b").is_err());
        assert!(validate_slug("ab").is_err());
    }

    #[test]
    fn patch_validator_rejects_null_on_required_field() {
        let title: OptionField<String> = OptionField::SetToNull;
        let cover: OptionField<String> = OptionField::SetToNull;

        let result = PatchValidator::new()
            .required("title", &title, |t| validate_title(t))
            .nullable("cover_image_url", &cover, |u| validate_url(u))
            .finish();

        let errors = result.unwrap_err();
        assert!(errors.field_errors().contains_key("title"));
        assert!(!errors.field_errors().contains_key("cover_image_url"));
    }

    #[test]
    fn post_tags_are_single_words() {
        let ok = vec!["rust".to_string(), "web-dev".to_string(), "ünïcode".to_string()];
        assert!(validate_tags(&ok).is_ok());

        for bad in ["c++", "rust lang", " ", "node.js", ""] {
            assert!(validate_tags(&[bad.to_string()]).is_err(), "{bad:?} should be rejected");
        }
        assert!(validate_tags(&["a".repeat(31)]).is_err());
    }

    #[test]
    fn long_sources_are_cut_at_a_hyphen() {
        let title = "word ".repeat(24);
        assert_eq!(title.trim().len(), 119);

        let slug = generate_slug(&title).unwrap();
        assert!(slug.len() <= MAX_SLUG_LENGTH);
        assert!(validate_slug(&slug).is_ok());
        assert!(slug.ends_with("word"));
    }

    #[test]
    fn long_unbroken_source_is_cut_at_the_limit() {
        let slug = generate_slug(&"a".repeat(120)).unwrap();
        assert_eq!(slug.len(), MAX_SLUG_LENGTH);
    }

    #[test]
    fn tiny_sources_need_a_custom_slug() {
        let errors = generate_slug("!!").unwrap_err();
        assert!(errors.field_errors().contains_key("slug"));
    }

    #[test]
    fn tech_stack_symbols_are_accepted() {
        let stack = vec!["C#".to_string(), "Node.js".to_string(), "C++".to_string()];
        assert!(validate_tag_list(&stack, 20, 40).is_ok());
    }
}
