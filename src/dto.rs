use serde::{Deserialize, Deserializer, Serialize};

// Absent and null both collapse to an empty string, keeping them on the
// validation path instead of failing deserialization.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Contact form submission. A body with missing or null fields reaches
/// validation instead of being rejected during deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactRequest {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub subject: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactResponse {
    pub success: bool,
    pub message: String,
}
