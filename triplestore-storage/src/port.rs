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


//! Storage port: what the service needs from a storage adapter.

use triplestore_core::{Graph, GraphName, Result, ResultSet, Term};

/// A triple store backend.
///
/// Implementations serialize mutations and aggregate reads internally; every
/// method may be called from any thread.
pub trait TripleStorePort: Send + Sync {
    /// Durably add `triples` under `graph`, maintaining views for the
    /// adapter's trigger patterns in the same critical section.
    fn insert(&self, triples: &Graph, graph: &GraphName) -> Result<()>;

    /// Durably remove `triples` under `graph`. Absent triples are ignored.
    fn remove(&self, triples: &Graph, graph: &GraphName) -> Result<()>;

    /// Snapshot of every stored triple.
    fn get(&self) -> Result<Graph>;

    /// Exactly the stored triples of `subject`.
    ///
    /// Fails with `SubjectNotFound` only for a subject that was never
    /// inserted; an emptied subject yields an empty graph.
    fn get_subject_graph(&self, subject: &Term) -> Result<Graph>;

    fn query(&self, sparql: &str) -> Result<ResultSet>;

    /// Query one view's derived sub-graph. `ViewNotFound` if it doesn't exist.
    fn query_view(&self, view: &str, sparql: &str) -> Result<ResultSet>;

    fn create_graph(&self, iri: &str) -> Result<()>;

    /// `None` clears the default graph.
    fn clear_graph(&self, iri: Option<&str>) -> Result<()>;

    fn drop_graph(&self, iri: &str) -> Result<()>;

    fn list_graphs(&self) -> Result<Vec<String>>;
}
