use serde::{Deserialize, Serialize};

/// Body shape of every successful registry response that carries data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub response: T,
}

impl<T> ApiEnvelope<T> {
    pub fn new(response: T) -> Self {
        Self { response }
    }
}

/// Coordinates arrive as JSON numbers or as numeric strings depending on the
/// server build. Both are accepted here so the rest of the system only ever
/// sees `f64`.
pub mod coordinate {
    use serde::{de::Error as _, Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawCoordinate {
        Number(f64),
        Text(String),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        match RawCoordinate::deserialize(deserializer)? {
            RawCoordinate::Number(value) => Ok(value),
            RawCoordinate::Text(text) => {
                let trimmed = text.trim();
                let value = trimmed
                    .parse::<f64>()
                    .map_err(|_| D::Error::custom(format!("invalid coordinate: {text:?}")))?;
                if value.is_finite() {
                    Ok(value)
                } else {
                    Err(D::Error::custom(format!("invalid coordinate: {text:?}")))
                }
            }
        }
    }
}
