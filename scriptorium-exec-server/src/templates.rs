//! Stored-template lookup, the only contact point with the persistence
//! layer. Template storage itself lives with an external collaborator;
//! this seam only resolves an id to executable source.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::ServerError;

/// A saved code template, resolvable by id and fed through the same
/// execution pipeline as inline submissions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredTemplate {
    pub id: String,
    pub title: String,
    pub language: String,
    pub content: String,
}

#[async_trait]
pub trait TemplateStore: Send + Sync {
    /// Resolve a template id; `Ok(None)` when no such template exists.
    async fn fetch(&self, id: &str) -> Result<Option<StoredTemplate>, ServerError>;
}

/// In-memory store backing tests and standalone deployments. Read-only
/// after construction, so lookups need no locking.
#[derive(Debug, Default)]
pub struct MemoryTemplateStore {
    templates: HashMap<String, StoredTemplate>,
}

impl MemoryTemplateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_template(mut self, template: StoredTemplate) -> Self {
        self.templates.insert(template.id.clone(), template);
        self
    }
}

#[async_trait]
impl TemplateStore for MemoryTemplateStore {
    async fn fetch(&self, id: &str) -> Result<Option<StoredTemplate>, ServerError> {
        Ok(self.templates.get(id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> StoredTemplate {
        StoredTemplate {
            id: "tpl-1".to_string(),
            title: "Hello".to_string(),
            language: "python".to_string(),
            content: "print('hi')".to_string(),
        }
    }

    #[tokio::test]
    async fn fetch_returns_the_stored_template() {
        let store = MemoryTemplateStore::new().with_template(sample());
        let found = store.fetch("tpl-1").await.unwrap();
        assert_eq!(found.unwrap().title, "Hello");
    }

    #[tokio::test]
    async fn fetch_of_unknown_id_is_none() {
        let store = MemoryTemplateStore::new();
        assert!(store.fetch("missing").await.unwrap().is_none());
    }
}
