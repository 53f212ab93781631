use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Placeholder replaced by the media path segment
pub const TYPE_TOKEN: &str = "{type}";

/// Placeholder replaced by the normalized external identifier
pub const ID_TOKEN: &str = "{id}";

/// One third-party playback provider
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerTemplate {
    pub name: String,
    pub url_pattern: String,
    /// Informational only ("HD", "Fast", ...)
    #[serde(default)]
    pub quality_tag: String,
}

impl ServerTemplate {
    pub fn new(name: &str, url_pattern: &str, quality_tag: &str) -> Self {
        Self {
            name: name.to_string(),
            url_pattern: url_pattern.to_string(),
            quality_tag: quality_tag.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("Server registry must contain at least one server")]
    Empty,

    #[error("Duplicate server name: {0}")]
    DuplicateName(String),

    #[error("Server '{0}' has no {{id}} placeholder in its URL pattern")]
    MissingIdToken(String),

    #[error("Invalid server list: {0}")]
    Parse(String),
}

/// Ordered, immutable list of playback servers. Index 0 is the primary server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerRegistry {
    servers: Vec<ServerTemplate>,
}

impl ServerRegistry {
    /// Builds a registry, rejecting empty lists, duplicate names and patterns
    /// that cannot carry an identifier.
    pub fn new(servers: Vec<ServerTemplate>) -> Result<Self, RegistryError> {
        if servers.is_empty() {
            return Err(RegistryError::Empty);
        }

        let mut seen = HashSet::new();
        for server in &servers {
            if !seen.insert(server.name.as_str()) {
                return Err(RegistryError::DuplicateName(server.name.clone()));
            }
            if !server.url_pattern.contains(ID_TOKEN) {
                return Err(RegistryError::MissingIdToken(server.name.clone()));
            }
        }

        Ok(Self { servers })
    }

    /// Parses a JSON array of server templates
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let servers: Vec<ServerTemplate> =
            serde_json::from_str(json).map_err(|e| RegistryError::Parse(e.to_string()))?;
        Self::new(servers)
    }

    pub fn primary(&self) -> &ServerTemplate {
        &self.servers[0]
    }

    pub fn get(&self, index: usize) -> Option<&ServerTemplate> {
        self.servers.get(index)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.servers.iter().position(|s| s.name == name)
    }

    pub fn len(&self) -> usize {
        self.servers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ServerTemplate> {
        self.servers.iter()
    }
}

impl Default for ServerRegistry {
    fn default() -> Self {
        Self {
            servers: vec![
                ServerTemplate::new(
                    "Primary Server",
                    "https://vidsrc.me/embed/{type}?imdb={id}",
                    "HD",
                ),
                ServerTemplate::new("Server 2", "https://vidsrc.to/embed/{type}/{id}", "Fast"),
                ServerTemplate::new("Server 3 (su)", "https://embed.su/{type}?imdb={id}", "Stable"),
            ],
        }
    }
}
