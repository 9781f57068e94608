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


//! Filesystem triple store
//!
//! ```text
//! <store>/
//!   triples/<sha256(subject)>.ttl          one partition per subject
//!   views/<label>_<localid>/<hash>.ttl     links into triples/
//!   graphs.json                            named-graph catalog
//! ```
//!
//! One lock serializes every mutation, view update and aggregate read, so
//! a reader never observes half of a mutation and two inserts never
//! interleave their partition rewrites. A subject's partition and its
//! triples in the aggregate are updated together; if a later subject of
//! the same call fails, the subjects already written stay in both and
//! their views are still maintained.

use crate::catalog::GraphCatalog;
use crate::convert;
use crate::live_graph::LiveGraph;
use crate::partition::SubjectPartitionStore;
use crate::port::TripleStorePort;
use crate::query::{OxigraphEngine, QueryEngine};
use crate::views::ViewMaterializer;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use triplestore_core::vocab::RDFS_LABEL;
use triplestore_core::{
    EventKind, Graph, GraphName, Result, ResultSet, Term, Triple, TriplePattern,
    TripleStoreConfig, TripleStoreError,
};

struct StoreState {
    partitions: SubjectPartitionStore,
    live: LiveGraph,
    views: ViewMaterializer,
    catalog: GraphCatalog,
}

pub struct FilesystemTripleStore {
    root: PathBuf,
    /// View trigger patterns, applied under the store lock.
    triggers: Vec<TriplePattern>,
    state: Mutex<StoreState>,
}

impl FilesystemTripleStore {
    /// Open a store at `root` with default layout.
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self> {
        Self::open_with_config(&TripleStoreConfig::at(root))
    }

    pub fn open_with_config(config: &TripleStoreConfig) -> Result<Self> {
        Self::open_with_engine(config, Box::new(OxigraphEngine::new()?))
    }

    /// Open with a caller-supplied query engine.
    ///
    /// Every partition is loaded into the aggregate before this returns; a
    /// corrupt partition fails the open.
    pub fn open_with_engine(
        config: &TripleStoreConfig,
        engine: Box<dyn QueryEngine>,
    ) -> Result<Self> {
        config.validate()?;
        info!("Opening triple store at {:?}", config.store_path);

        let partitions = SubjectPartitionStore::open(config.triples_dir())?;
        let catalog = GraphCatalog::open(config.catalog_path())?;
        let views = ViewMaterializer::new(
            &config.store_path,
            &config.views_path,
            &config.triples_path,
        );

        let mut live = LiveGraph::new(engine);
        live.load(partitions.load_all()?)?;

        info!(
            triples = live.len(),
            named_graphs = catalog.list().len(),
            "Triple store ready"
        );

        Ok(Self {
            root: config.store_path.clone(),
            triggers: config.views.clone(),
            state: Mutex::new(StoreState {
                partitions,
                live,
                views,
                catalog,
            }),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Number of triples in the aggregate.
    pub fn len(&self) -> usize {
        self.state.lock().live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn list_views(&self) -> Result<Vec<String>> {
        self.state.lock().views.list()
    }

    pub fn triggers(&self) -> &[TriplePattern] {
        &self.triggers
    }

    /// Write each subject's partition, then its triples into the
    /// aggregate. `committed` collects the triples of every subject that
    /// made it to disk, including when a later subject fails.
    fn commit_insert(
        state: &mut StoreState,
        grouped: &BTreeMap<Term, Vec<(Term, Term)>>,
        bindings: &Graph,
        committed: &mut Vec<Triple>,
    ) -> Result<usize> {
        let mut added = 0;
        for (subject, pairs) in grouped {
            state.partitions.merge_insert(subject, pairs, bindings)?;
            let batch = subject_triples(subject, pairs);
            added += state.live.insert(&batch)?;
            committed.extend(batch);
        }
        Ok(added)
    }

    fn commit_remove(
        state: &mut StoreState,
        grouped: &BTreeMap<Term, Vec<(Term, Term)>>,
        committed: &mut Vec<Triple>,
    ) -> Result<usize> {
        let mut removed = 0;
        for (subject, pairs) in grouped {
            if state.partitions.merge_remove(subject, pairs)?.is_none() {
                continue;
            }
            let batch = subject_triples(subject, pairs);
            removed += state.live.remove(&batch)?;
            committed.extend(batch);
        }
        Ok(removed)
    }

    /// Apply every trigger to the committed triples. Failures are logged;
    /// the data change already stands.
    fn maintain_views(&self, state: &StoreState, kind: EventKind, committed: &[Triple]) {
        for triple in committed {
            if !self.triggers.iter().any(|t| t.matches(triple)) {
                continue;
            }
            if let Err(e) = Self::apply_view_event(state, kind, triple) {
                warn!(
                    event = %kind,
                    subject = %triple.subject,
                    error = %e,
                    "View maintenance failed"
                );
            }
        }
    }

    fn apply_view_event(state: &StoreState, kind: EventKind, triple: &Triple) -> Result<()> {
        if !triple.subject.is_resource() || !triple.object.is_resource() {
            debug!(triple = %triple.to_ntriples().trim_end(), "View event skipped: literal anchor");
            return Ok(());
        }

        let anchor = match state.partitions.read(&triple.object)? {
            Some(anchor) => anchor,
            None => {
                debug!(anchor = %triple.object, "View event skipped: anchor not stored");
                return Ok(());
            }
        };
        let label = anchor
            .value(&triple.object, &Term::iri(RDFS_LABEL))
            .map(|l| l.canonical_str().to_string());

        let change = state
            .views
            .apply(kind, &triple.subject, &triple.object, label.as_deref())?;
        debug!(event = %kind, change = ?change, "View maintained");
        Ok(())
    }

    fn validate(triples: &Graph, graph: &GraphName) -> Result<()> {
        if let Some(iri) = graph.as_iri() {
            convert::to_named_node(&Term::iri(iri))?;
        }
        for triple in triples {
            convert::to_quad(triple)?;
        }
        Ok(())
    }
}

impl TripleStorePort for FilesystemTripleStore {
    fn insert(&self, triples: &Graph, graph: &GraphName) -> Result<()> {
        if triples.is_empty() {
            return Ok(());
        }
        Self::validate(triples, graph)?;

        let mut state = self.state.lock();
        if let Some(iri) = graph.as_iri() {
            if state.catalog.register(iri)? {
                info!(graph = %iri, "Registered named graph");
            }
        }
        state.live.bind_all(triples);

        let grouped = triples.by_subject();
        let mut committed = Vec::with_capacity(triples.len());
        let outcome = Self::commit_insert(&mut state, &grouped, triples, &mut committed);
        self.maintain_views(&state, EventKind::Insert, &committed);

        let added = outcome?;
        debug!(
            triples = committed.len(),
            added,
            subjects = grouped.len(),
            graph = %graph,
            "Insert committed"
        );
        Ok(())
    }

    fn remove(&self, triples: &Graph, graph: &GraphName) -> Result<()> {
        if triples.is_empty() {
            return Ok(());
        }
        Self::validate(triples, graph)?;

        let mut state = self.state.lock();
        let grouped = triples.by_subject();
        let mut committed = Vec::with_capacity(triples.len());
        let outcome = Self::commit_remove(&mut state, &grouped, &mut committed);
        self.maintain_views(&state, EventKind::Delete, &committed);

        let removed = outcome?;
        debug!(
            triples = committed.len(),
            removed,
            subjects = grouped.len(),
            graph = %graph,
            "Remove committed"
        );
        Ok(())
    }

    fn get(&self) -> Result<Graph> {
        Ok(self.state.lock().live.graph().clone())
    }

    fn get_subject_graph(&self, subject: &Term) -> Result<Graph> {
        let state = self.state.lock();
        state
            .partitions
            .read(subject)?
            .ok_or_else(|| TripleStoreError::SubjectNotFound(subject.canonical_str().to_string()))
    }

    fn query(&self, sparql: &str) -> Result<ResultSet> {
        self.state.lock().live.query(sparql)
    }

    fn query_view(&self, view: &str, sparql: &str) -> Result<ResultSet> {
        let state = self.state.lock();
        let graph = state.views.load(view)?;
        state.live.query_detached(&graph, sparql)
    }

    fn create_graph(&self, iri: &str) -> Result<()> {
        convert::to_named_node(&Term::iri(iri))?;
        let created = self.state.lock().catalog.register(iri)?;
        info!(graph = %iri, created, "create_graph");
        Ok(())
    }

    fn clear_graph(&self, iri: Option<&str>) -> Result<()> {
        let mut state = self.state.lock();
        match iri {
            None => {
                let partitions = state.partitions.truncate_all()?;
                state.live.clear()?;
                info!(partitions, "Cleared default graph");
                Ok(())
            }
            Some(iri) if !state.catalog.contains(iri) => {
                Err(TripleStoreError::GraphNotFound(iri.to_string()))
            }
            Some(iri) => Err(TripleStoreError::Unsupported(format!(
                "clearing named graph <{}>: partitions are shared by every graph",
                iri
            ))),
        }
    }

    fn drop_graph(&self, iri: &str) -> Result<()> {
        self.state.lock().catalog.drop_graph(iri)?;
        info!(graph = %iri, "Dropped named graph");
        Ok(())
    }

    fn list_graphs(&self) -> Result<Vec<String>> {
        Ok(self.state.lock().catalog.list())
    }
}

fn subject_triples(subject: &Term, pairs: &[(Term, Term)]) -> Vec<Triple> {
    pairs
        .iter()
        .map(|(p, o)| Triple::new(subject.clone(), p.clone(), o.clone()))
        .collect()
}
