// Copyright 2025 Sushanth (https://github.com/sushanthpy)
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Configuration for the triple store
//!
//! ```toml
//! store_path = "storage/triplestore"
//! triples_path = "triples"
//! topic = "triple_store"
//! publish_failure = "log"
//!
//! [[views]]
//! predicate = { type = "iri", value = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type" }
//! ```

use crate::error::{Result, TripleStoreError};
use crate::pattern::TriplePattern;
use crate::routing::DEFAULT_TOPIC;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the named-graph catalog file under the store root.
pub const GRAPH_CATALOG_FILE: &str = "graphs.json";

/// What to do when publishing a mutation event fails.
///
/// The durable write has already committed at that point; neither policy
/// rolls it back or retries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublishFailurePolicy {
    /// Log the failure and keep publishing the remaining events.
    #[default]
    Log,
    /// Stop publishing and return `TripleStoreError::Bus` to the caller.
    Fail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TripleStoreConfig {
    /// Store root directory.
    pub store_path: PathBuf,
    /// Partition directory, relative to `store_path`.
    pub triples_path: String,
    /// View directory, relative to `store_path`.
    pub views_path: String,
    /// Bus topic for mutation events.
    pub topic: String,
    /// View trigger patterns.
    pub views: Vec<TriplePattern>,
    pub publish_failure: PublishFailurePolicy,
    /// Insert the internal provenance ontology on startup.
    pub bootstrap_internal_schema: bool,
}

impl Default for TripleStoreConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from("storage/triplestore"),
            triples_path: "triples".to_string(),
            views_path: "views".to_string(),
            topic: DEFAULT_TOPIC.to_string(),
            views: vec![TriplePattern::rdf_type()],
            publish_failure: PublishFailurePolicy::Log,
            bootstrap_internal_schema: true,
        }
    }
}

impl TripleStoreConfig {
    /// Defaults rooted at `store_path`.
    pub fn at(store_path: impl AsRef<Path>) -> Self {
        Self {
            store_path: store_path.as_ref().to_path_buf(),
            ..Default::default()
        }
    }

    /// Same store without any view triggers.
    pub fn without_views(mut self) -> Self {
        self.views.clear();
        self
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("triples_path", &self.triples_path),
            ("views_path", &self.views_path),
        ] {
            if value.is_empty() || Path::new(value).is_absolute() {
                return Err(TripleStoreError::Config(format!(
                    "{} must be a non-empty relative path, got {:?}",
                    name, value
                )));
            }
        }
        if self.triples_path == self.views_path {
            return Err(TripleStoreError::Config(
                "triples_path and views_path must differ".to_string(),
            ));
        }
        if self.topic.is_empty() {
            return Err(TripleStoreError::Config("topic must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn triples_dir(&self) -> PathBuf {
        self.store_path.join(&self.triples_path)
    }

    pub fn views_dir(&self) -> PathBuf {
        self.store_path.join(&self.views_path)
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.store_path.join(GRAPH_CATALOG_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::Term;
    use crate::vocab::RDF_TYPE;

    #[test]
    fn test_default_config() {
        let config = TripleStoreConfig::default();
        assert_eq!(config.triples_path, "triples");
        assert_eq!(config.topic, "triple_store");
        assert_eq!(config.views, vec![TriplePattern::rdf_type()]);
        assert_eq!(config.publish_failure, PublishFailurePolicy::Log);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_paths() {
        let config = TripleStoreConfig::at("/data/ts");
        assert_eq!(config.triples_dir(), PathBuf::from("/data/ts/triples"));
        assert_eq!(config.views_dir(), PathBuf::from("/data/ts/views"));
        assert_eq!(config.catalog_path(), PathBuf::from("/data/ts/graphs.json"));
    }

    #[test]
    fn test_from_toml() {
        let config = TripleStoreConfig::from_toml_str(
            r#"
            store_path = "/tmp/store"
            publish_failure = "fail"

            [[views]]
            predicate = { type = "iri", value = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type" }
            object = { type = "iri", value = "http://ex.org/Person" }
            "#,
        )
        .unwrap();

        assert_eq!(config.store_path, PathBuf::from("/tmp/store"));
        assert_eq!(config.triples_path, "triples");
        assert_eq!(config.publish_failure, PublishFailurePolicy::Fail);
        assert_eq!(
            config.views,
            vec![TriplePattern::new(
                None,
                Some(Term::iri(RDF_TYPE)),
                Some(Term::iri("http://ex.org/Person"))
            )]
        );
    }

    #[test]
    fn test_rejects_colliding_dirs() {
        let err = TripleStoreConfig::from_toml_str(
            r#"
            triples_path = "data"
            views_path = "data"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, TripleStoreError::Config(_)));
    }

    #[test]
    fn test_without_views() {
        assert!(TripleStoreConfig::default().without_views().views.is_empty());
    }
}
