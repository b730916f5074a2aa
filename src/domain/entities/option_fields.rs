use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Tri-state field for PATCH requests.
///
/// - `Unchanged` → key absent from the body
/// - `SetToNull` → key present with `null`
/// - `SetToValue` → key present with a value
///
/// Structs using it must carry `#[serde(default)]` so absent keys stay `Unchanged`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum OptionField<T> {
    #[default]
    Unchanged,
    SetToNull,
    SetToValue(T),
}

impl<'de, T> Deserialize<'de> for OptionField<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(value) => OptionField::SetToValue(value),
            None => OptionField::SetToNull,
        })
    }
}

impl<T: Serialize> Serialize for OptionField<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            OptionField::SetToValue(value) => serializer.serialize_some(value),
            _ => serializer.serialize_none(),
        }
    }
}

impl<T> OptionField<T> {
    /// Convert to nested option:
    /// - `None` → unchanged
    /// - `Some(None)` → set null
    /// - `Some(Some(T))` → set to value
    pub fn into_option(self) -> Option<Option<T>> {
        match self {
            Self::Unchanged => None,
            Self::SetToNull => Some(None),
            Self::SetToValue(v) => Some(Some(v)),
        }
    }

    pub fn is_unchanged(&self) -> bool {
        matches!(self, Self::Unchanged)
    }

    pub fn is_set_to_null(&self) -> bool {
        matches!(self, Self::SetToNull)
    }

    pub fn value_ref(&self) -> Option<&T> {
        if let Self::SetToValue(v) = self {
            Some(v)
        } else {
            None
        }
    }

    pub fn take_value(self) -> Option<T> {
        if let Self::SetToValue(v) = self {
            Some(v)
        } else {
            None
        }
    }
}

impl<T> From<Option<Option<T>>> for OptionField<T> {
    fn from(opt: Option<Option<T>>) -> Self {
        match opt {
            None => OptionField::Unchanged,
            Some(None) => OptionField::SetToNull,
            Some(Some(v)) => OptionField::SetToValue(v),
        }
    }
}

impl<T> From<OptionField<T>> for Option<Option<T>> {
    fn from(of: OptionField<T>) -> Self {
        of.into_option()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize, Default)]
    #[serde(default)]
    struct Patch {
        title: OptionField<String>,
        cover: OptionField<String>,
        tags: OptionField<Vec<String>>,
    }

    #[test]
    fn absent_null_and_value_are_distinguished() {
        let patch: Patch = serde_json::from_str(r#"{"cover": null, "tags": ["rust"]}"#).unwrap();

        assert!(patch.title.is_unchanged());
        assert!(patch.cover.is_set_to_null());
        assert_eq!(patch.tags.value_ref(), Some(&vec!["rust".to_string()]));
    }

    #[test]
    fn nested_option_conversions_agree() {
        let field: OptionField<u8> = Some(Some(3)).into();
        assert_eq!(field.clone().into_option(), Some(Some(3)));
        assert_eq!(Option::<Option<u8>>::from(field.clone()), Some(Some(3)));
        assert_eq!(field.take_value(), Some(3));
    }
}
