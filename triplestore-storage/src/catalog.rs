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


//! Named-graph catalog, persisted as `graphs.json` under the store root.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use triplestore_core::{Result, TripleStoreError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEntry {
    pub iri: String,
    pub created_at: DateTime<Utc>,
}

pub struct GraphCatalog {
    graphs: BTreeMap<String, GraphEntry>,
    file_path: PathBuf,
}

impl GraphCatalog {
    /// Load the catalog at `file_path`, or start empty if it doesn't exist.
    pub fn open(file_path: impl AsRef<Path>) -> Result<Self> {
        let file_path = file_path.as_ref().to_path_buf();
        let mut graphs = BTreeMap::new();
        if file_path.exists() {
            let contents = fs::read_to_string(&file_path)?;
            let entries: Vec<GraphEntry> = serde_json::from_str(&contents)?;
            for entry in entries {
                graphs.insert(entry.iri.clone(), entry);
            }
            info!("Loaded {} named graphs from catalog", graphs.len());
        }
        Ok(Self { graphs, file_path })
    }

    fn save(&self) -> Result<()> {
        let entries: Vec<&GraphEntry> = self.graphs.values().collect();
        let json = serde_json::to_string_pretty(&entries)?;
        let tmp = self.file_path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.file_path)?;
        Ok(())
    }

    pub fn contains(&self, iri: &str) -> bool {
        self.graphs.contains_key(iri)
    }

    /// Register a graph. Returns false if it was already known.
    pub fn register(&mut self, iri: &str) -> Result<bool> {
        if self.graphs.contains_key(iri) {
            return Ok(false);
        }
        self.graphs.insert(
            iri.to_string(),
            GraphEntry {
                iri: iri.to_string(),
                created_at: Utc::now(),
            },
        );
        self.save()?;
        Ok(true)
    }

    pub fn drop_graph(&mut self, iri: &str) -> Result<GraphEntry> {
        let entry = self
            .graphs
            .remove(iri)
            .ok_or_else(|| TripleStoreError::GraphNotFound(iri.to_string()))?;
        self.save()?;
        Ok(entry)
    }

    pub fn list(&self) -> Vec<String> {
        self.graphs.keys().cloned().collect()
    }

    pub fn get(&self, iri: &str) -> Option<&GraphEntry> {
        self.graphs.get(iri)
    }
}
