use serde::{Deserialize, Deserializer, Serialize};

/// Represents optional field semantics in partial update requests.
///
/// - `Unchanged` → field not present in the payload
/// - `SetToNull` → explicitly null (or empty string for URL fields)
/// - `SetToValue` → set to provided value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum OptionField<T> {
    Unchanged,
    SetToNull,
    SetToValue(T),
}

impl<T> Default for OptionField<T> {
    fn default() -> Self {
        OptionField::Unchanged
    }
}

// Absent fields never reach Deserialize; `#[serde(default)]` on the request
// struct turns them into Unchanged. A present field is either null or a value.
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

impl<T> OptionField<T> {
    /// True when `Unchanged`.
    pub fn is_unchanged(&self) -> bool {
        matches!(self, Self::Unchanged)
    }

    /// Convert into `Option<T>` (what SQLx expects for a nullable bind)
    pub fn flatten(self) -> Option<T> {
        match self {
            OptionField::SetToValue(v) => Some(v),
            _ => None
        }
    }

    /// Borrowed flatten for references
    pub fn flatten_ref(&self) -> Option<&T> {
        match self {
            OptionField::SetToValue(v) => Some(v),
            _ => None
        }
    }
}

impl OptionField<String> {
    pub fn flatten_str(&self) -> Option<&str> {
        self.flatten_ref().map(|s| s.as_str())
    }
}
