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


//! Live Aggregate Graph
//!
//! In-memory union of every partition. The set of triples and the query
//! engine index are updated together; callers hold the store lock.

use crate::query::QueryEngine;
use triplestore_core::{Graph, Result, ResultSet, Triple};

pub struct LiveGraph {
    graph: Graph,
    engine: Box<dyn QueryEngine>,
}

impl LiveGraph {
    pub fn new(engine: Box<dyn QueryEngine>) -> Self {
        Self {
            graph: Graph::new(),
            engine,
        }
    }

    /// Replace the contents with `graph` (startup load).
    pub fn load(&mut self, graph: Graph) -> Result<()> {
        self.engine.clear()?;
        self.engine.load(&graph)?;
        self.graph = graph;
        Ok(())
    }

    /// Add triples; returns how many were new.
    pub fn insert(&mut self, triples: &[Triple]) -> Result<usize> {
        let fresh: Vec<Triple> = triples
            .iter()
            .filter(|t| !self.graph.contains(t))
            .cloned()
            .collect();
        self.engine.insert(&fresh)?;
        let added = fresh.len();
        self.graph.extend(fresh);
        Ok(added)
    }

    /// Remove triples; returns how many were present.
    pub fn remove(&mut self, triples: &[Triple]) -> Result<usize> {
        let present: Vec<Triple> = triples
            .iter()
            .filter(|t| self.graph.contains(t))
            .cloned()
            .collect();
        self.engine.remove(&present)?;
        for t in &present {
            self.graph.remove(t);
        }
        Ok(present.len())
    }

    /// Merge the prefix bindings of `other` into the aggregate.
    pub fn bind_all(&mut self, other: &Graph) {
        self.graph.bind_all(other);
    }

    pub fn clear(&mut self) -> Result<()> {
        self.engine.clear()?;
        self.graph.clear();
        Ok(())
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn len(&self) -> usize {
        self.graph.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }

    pub fn query(&self, sparql: &str) -> Result<ResultSet> {
        self.engine.query(sparql)
    }

    /// Evaluate `sparql` against `graph` alone, on a throwaway engine.
    pub fn query_detached(&self, graph: &Graph, sparql: &str) -> Result<ResultSet> {
        let mut engine = self.engine.empty()?;
        engine.load(graph)?;
        engine.query(sparql)
    }
}
