//! # HTTP-backed fetch source.
//!
//! [`HttpSource`] issues `GET {endpoint_base}/{id}` against a JSON endpoint.
//! The transport does not reject on non-2xx status, so status is checked
//! explicitly and converted into a typed error before propagating:
//! 404 becomes [`FetchError::NotFound`], any other non-success status —
//! and any connect or decode failure — becomes [`FetchError::Network`].

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::FetchError;
use crate::fetch::source::{Entity, FetchSource};

/// Remote entity body: a name plus a nested image reference.
#[derive(Deserialize)]
struct EntityBody {
    name: String,
    #[serde(default)]
    sprites: SpriteBody,
}

#[derive(Deserialize, Default)]
struct SpriteBody {
    front_default: Option<String>,
}

/// HTTP client for the remote entity endpoint.
pub struct HttpSource {
    inner: reqwest::Client,
    base: String,
}

impl HttpSource {
    /// Creates a new source rooted at `base` (trailing slashes are trimmed).
    pub fn new(base: &str) -> Self {
        Self {
            inner: reqwest::Client::new(),
            base: base.trim_end_matches('/').to_string(),
        }
    }

    fn entity_url(&self, id: &str) -> String {
        format!("{}/{}", self.base, id)
    }
}

#[async_trait]
impl FetchSource for HttpSource {
    async fn get(&self, id: &str) -> Result<Entity, FetchError> {
        let url = self.entity_url(id);

        let response = self.inner.get(&url).send().await.map_err(|e| {
            FetchError::Network {
                message: e.to_string(),
            }
        })?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound {
                entity: id.to_string(),
            });
        }
        if !status.is_success() {
            return Err(FetchError::Network {
                message: format!("HTTP {status} for {id}"),
            });
        }

        let body: EntityBody = response.json().await.map_err(|e| FetchError::Network {
            message: e.to_string(),
        })?;

        Ok(Entity {
            name: body.name,
            image: body.sprites.front_default,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_url_joins_with_slash() {
        let src = HttpSource::new("https://pokeapi.co/api/v2/pokemon");
        assert_eq!(
            src.entity_url("pikachu"),
            "https://pokeapi.co/api/v2/pokemon/pikachu"
        );
    }

    #[test]
    fn test_entity_url_trims_trailing_slash() {
        let src = HttpSource::new("https://pokeapi.co/api/v2/pokemon/");
        assert_eq!(
            src.entity_url("pikachu"),
            "https://pokeapi.co/api/v2/pokemon/pikachu"
        );
    }
}
