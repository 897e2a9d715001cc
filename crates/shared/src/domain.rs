use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Deserializer, Serialize};

use crate::protocol::coordinate;

/// Opaque client identifier assigned by the remote registry.
///
/// Servers in the wild hand these out either as strings or as integers; both
/// decode into the same textual form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ClientId(String);

impl ClientId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ClientId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ClientId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ClientId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl<'de> Deserialize<'de> for ClientId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Signed(i64),
            Unsigned(u64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(text) => Self(text),
            RawId::Signed(value) => Self(value.to_string()),
            RawId::Unsigned(value) => Self(value.to_string()),
        })
    }
}

/// A client record as exchanged with the registry and held in memory.
///
/// `id` is `None` until the remote service has persisted the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ClientId>,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(deserialize_with = "coordinate::deserialize")]
    pub coordinate_x: f64,
    #[serde(deserialize_with = "coordinate::deserialize")]
    pub coordinate_y: f64,
}

impl Client {
    /// True when the record carries the given identifier.
    pub fn has_id(&self, id: &ClientId) -> bool {
        self.id.as_ref() == Some(id)
    }
}

/// Payload of a create request: a validated record that has no identity yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewClient {
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(deserialize_with = "coordinate::deserialize")]
    pub coordinate_x: f64,
    #[serde(deserialize_with = "coordinate::deserialize")]
    pub coordinate_y: f64,
}

impl NewClient {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        coordinate_x: f64,
        coordinate_y: f64,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            coordinate_x,
            coordinate_y,
        }
    }

    /// Attaches a server-assigned identifier, producing a persisted record.
    pub fn with_id(self, id: ClientId) -> Client {
        Client {
            id: Some(id),
            name: self.name,
            email: self.email,
            phone: self.phone,
            coordinate_x: self.coordinate_x,
            coordinate_y: self.coordinate_y,
        }
    }
}
