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


//! Schema loading with change tracking.
//!
//! Every loaded schema file gets a provenance record in the store:
//!
//! ```text
//! <http://triple-store.internal/<uuid>> a internal:Schema ;
//!     internal:filePath "ontologies/core.ttl" ;
//!     internal:hash "<sha256 of content>" ;
//!     internal:fileLastUpdateTime "2025-01-01T00:00:00Z"^^xsd:dateTime ;
//!     internal:content "<base64 of content>"^^xsd:base64Binary .
//! ```
//!
//! Reloading a file compares hashes and applies only the difference.

use crate::service::TripleStoreService;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, SecondsFormat, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};
use triplestore_core::vocab::{
    INTERNAL_BASE, INTERNAL_CONTENT, INTERNAL_FILE_LAST_UPDATE_TIME, INTERNAL_FILE_PATH,
    INTERNAL_HASH, INTERNAL_NS, INTERNAL_SCHEMA, RDF_TYPE, XSD_NS,
};
use triplestore_core::{sha256_hex, Graph, GraphName, Result, Term, Triple, TripleStoreError};
use triplestore_storage::codec;
use uuid::Uuid;

/// Ontology describing schema provenance records.
pub const INTERNAL_SCHEMA_TTL: &str = r#"
@prefix internal: <http://triple-store.internal#> .
@prefix owl: <http://www.w3.org/2002/07/owl#> .
@prefix rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix xsd: <http://www.w3.org/2001/XMLSchema#> .

internal:Schema a owl:Class ;
    rdfs:label "Schema" ;
    rdfs:comment "Represents a schema file that has been loaded into the triple store" .

internal:hash a owl:DatatypeProperty ;
    rdfs:domain internal:Schema ;
    rdfs:range xsd:string ;
    rdfs:label "hash" ;
    rdfs:comment "SHA-256 hash of the schema content" .

internal:fileLastUpdateTime a owl:DatatypeProperty ;
    rdfs:domain internal:Schema ;
    rdfs:range xsd:dateTime ;
    rdfs:label "file last update time" ;
    rdfs:comment "Last modification timestamp of the schema file" .

internal:filePath a owl:DatatypeProperty ;
    rdfs:domain internal:Schema ;
    rdfs:range xsd:string ;
    rdfs:label "file path" ;
    rdfs:comment "Path to the schema file" .

internal:content a owl:DatatypeProperty ;
    rdfs:domain internal:Schema ;
    rdfs:range xsd:base64Binary ;
    rdfs:label "content" ;
    rdfs:comment "Base64 encoded content of the schema file" .
"#;

/// Outcome of loading one schema file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaLoad {
    /// First load; `record` is the new provenance subject.
    Loaded { record: Term, triples: usize },
    /// Content changed since the last load.
    Updated { added: usize, removed: usize },
    /// Same hash as the recorded content.
    Unchanged,
}

/// Stored provenance of one schema file.
struct SchemaRecord {
    subject: Term,
    hash: Term,
    modified: Option<Term>,
    content: Term,
}

impl SchemaRecord {
    fn hash(&self) -> &str {
        self.hash.canonical_str()
    }

    fn decoded_content(&self) -> Result<String> {
        decode_content(self.content.canonical_str())
    }

    fn tracking_triples(&self) -> Graph {
        let mut graph = Graph::new();
        graph.add(Triple::new(
            self.subject.clone(),
            Term::iri(INTERNAL_HASH),
            self.hash.clone(),
        ));
        if let Some(modified) = &self.modified {
            graph.add(Triple::new(
                self.subject.clone(),
                Term::iri(INTERNAL_FILE_LAST_UPDATE_TIME),
                modified.clone(),
            ));
        }
        graph.add(Triple::new(
            self.subject.clone(),
            Term::iri(INTERNAL_CONTENT),
            self.content.clone(),
        ));
        graph
    }
}

fn decode_content(encoded: &str) -> Result<String> {
    let bytes = STANDARD
        .decode(encoded)
        .map_err(|e| TripleStoreError::Parse(format!("schema content is not base64: {}", e)))?;
    String::from_utf8(bytes)
        .map_err(|e| TripleStoreError::Parse(format!("schema content is not UTF-8: {}", e)))
}

fn modified_time(path: &Path) -> Result<DateTime<Utc>> {
    Ok(DateTime::<Utc>::from(fs::metadata(path)?.modified()?))
}

/// Tracking values for a freshly read file.
fn tracking_terms(content: &str, modified: DateTime<Utc>) -> (Term, Term, Term) {
    (
        Term::literal(sha256_hex(content.as_bytes())),
        Term::typed_literal(
            modified.to_rfc3339_opts(SecondsFormat::Secs, true),
            format!("{}dateTime", XSD_NS),
        ),
        Term::typed_literal(
            STANDARD.encode(content.as_bytes()),
            format!("{}base64Binary", XSD_NS),
        ),
    )
}

impl TripleStoreService {
    /// Provenance record for `file_path`, read back from its partition so
    /// that every term keeps its stored lexical form.
    fn find_schema_record(&self, file_path: &str) -> Result<Option<SchemaRecord>> {
        let sparql = format!(
            "SELECT ?schema WHERE {{ ?schema a <{}> ; <{}> {} }}",
            INTERNAL_SCHEMA,
            INTERNAL_FILE_PATH,
            Term::literal(file_path).to_n3(),
        );
        let results = self.query(&sparql)?;
        let subject = match results
            .solutions()
            .and_then(|s| s.column("schema").first().map(|t| (*t).clone()))
        {
            Some(subject) => subject,
            None => return Ok(None),
        };

        let partition = self.get_subject_graph(&subject)?;
        let value = |predicate: &str| partition.value(&subject, &Term::iri(predicate)).cloned();
        match (value(INTERNAL_HASH), value(INTERNAL_CONTENT)) {
            (Some(hash), Some(content)) => Ok(Some(SchemaRecord {
                subject: subject.clone(),
                hash,
                modified: value(INTERNAL_FILE_LAST_UPDATE_TIME),
                content,
            })),
            _ => Ok(None),
        }
    }

    /// Load one Turtle schema file, tracking its provenance.
    pub fn load_schema(&self, path: impl AsRef<Path>) -> Result<SchemaLoad> {
        let path = path.as_ref();
        let file_path = path.to_string_lossy().into_owned();
        debug!(path = %file_path, "Loading schema");

        let content = fs::read_to_string(path)?;
        let (hash, modified, encoded) = tracking_terms(&content, modified_time(path)?);

        match self.find_schema_record(&file_path)? {
            Some(record) if record.hash() == hash.canonical_str() => {
                debug!(path = %file_path, "Schema is up to date");
                Ok(SchemaLoad::Unchanged)
            }
            Some(record) => {
                let old = codec::parse(&record.decoded_content()?)?;
                let new = codec::parse(&content)?;
                let added = new.difference(&old);
                let removed = old.difference(&new);

                self.insert(&added, &GraphName::Default)?;
                self.remove(&removed, &GraphName::Default)?;

                self.remove(&record.tracking_triples(), &GraphName::Default)?;
                let updated = SchemaRecord {
                    subject: record.subject.clone(),
                    hash,
                    modified: Some(modified),
                    content: encoded,
                };
                self.insert(&updated.tracking_triples(), &GraphName::Default)?;

                info!(
                    path = %file_path,
                    added = added.len(),
                    removed = removed.len(),
                    "Schema updated"
                );
                Ok(SchemaLoad::Updated {
                    added: added.len(),
                    removed: removed.len(),
                })
            }
            None => {
                let schema = codec::parse(&content)?;
                self.insert(&schema, &GraphName::Default)?;

                let record = Term::iri(format!("{}{}", INTERNAL_BASE, Uuid::new_v4()));
                let mut provenance = SchemaRecord {
                    subject: record.clone(),
                    hash,
                    modified: Some(modified),
                    content: encoded,
                }
                .tracking_triples();
                provenance.bind("internal", INTERNAL_NS);
                provenance.add(Triple::new(
                    record.clone(),
                    Term::iri(RDF_TYPE),
                    Term::iri(INTERNAL_SCHEMA),
                ));
                provenance.add(Triple::new(
                    record.clone(),
                    Term::iri(INTERNAL_FILE_PATH),
                    Term::literal(file_path.as_str()),
                ));
                self.insert(&provenance, &GraphName::Default)?;

                info!(path = %file_path, triples = schema.len(), "Schema loaded");
                Ok(SchemaLoad::Loaded {
                    record,
                    triples: schema.len(),
                })
            }
        }
    }

    /// Load several schema files. A failing file is logged and skipped.
    pub fn load_schemas<P: AsRef<Path>>(&self, paths: &[P]) -> Vec<(PathBuf, SchemaLoad)> {
        let mut loaded = Vec::with_capacity(paths.len());
        for path in paths {
            let path = path.as_ref();
            match self.load_schema(path) {
                Ok(outcome) => loaded.push((path.to_path_buf(), outcome)),
                Err(e) => error!(path = ?path, error = %e, "Error loading schema"),
            }
        }
        loaded
    }

    /// Union of every recorded schema's content, with prefix bindings.
    pub fn get_schema_graph(&self) -> Result<Graph> {
        let sparql = format!(
            "SELECT ?content WHERE {{ ?schema <{}> ?content }}",
            INTERNAL_CONTENT
        );
        let results = self.query(&sparql)?;
        let mut graph = Graph::new();
        if let Some(solutions) = results.solutions() {
            for content in solutions.column("content") {
                let schema = codec::parse(&decode_content(content.canonical_str())?)?;
                graph.merge(&schema);
            }
        }
        Ok(graph)
    }
}
