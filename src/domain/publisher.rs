use serde::{Deserialize, Serialize};

/// Name used for the entity in notification headers and error payloads.
pub const ENTITY_NAME: &str = "publisher";

/// Maximum number of characters allowed in a publisher name.
pub const NAME_MAX_LENGTH: usize = 100;

/// A publisher of books in the library catalogue.
///
/// `id` stays unset until the record has been persisted; the store assigns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publisher {
    #[serde(default)]
    pub id: Option<u64>,
    pub name: String,
}

impl Publisher {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }

    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }

    /// Copies every field present in `patch` onto this publisher.
    pub fn merge(&mut self, patch: PublisherPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
    }
}

/// Merge-patch body for partial updates: absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublisherPatch {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: Option<String>,
}
