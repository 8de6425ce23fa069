use serde::{Deserialize, Deserializer};
use uuid::Uuid;

/// Deserializes an optional UUID, treating an empty string the same as a missing value.
///
/// Form selects on the homeroom portal submit `""` when nothing has been picked yet.
pub fn deserialize_optional_uuid<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: From<Uuid>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => Uuid::parse_str(s.trim())
            .map(|uuid| Some(T::from(uuid)))
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}
