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


//! Query engine seam.
//!
//! The store never evaluates SPARQL itself. It keeps a query engine in sync
//! with the live aggregate graph and hands query strings to it.

use crate::convert;
use oxigraph::sparql::QueryResults;
use oxigraph::store::Store;
use triplestore_core::{Graph, Result, ResultSet, Solutions, Triple, TripleStoreError};

/// A SPARQL-capable index over a set of triples.
pub trait QueryEngine: Send {
    fn insert(&mut self, triples: &[Triple]) -> Result<()>;

    fn remove(&mut self, triples: &[Triple]) -> Result<()>;

    fn clear(&mut self) -> Result<()>;

    fn query(&self, sparql: &str) -> Result<ResultSet>;

    /// An empty engine of the same kind, used for per-view queries.
    fn empty(&self) -> Result<Box<dyn QueryEngine>>;

    fn load(&mut self, graph: &Graph) -> Result<()> {
        let triples: Vec<Triple> = graph.iter().cloned().collect();
        self.insert(&triples)
    }
}

fn storage_err(e: impl std::fmt::Display) -> TripleStoreError {
    TripleStoreError::Query(format!("storage: {}", e))
}

fn query_err(e: impl std::fmt::Display) -> TripleStoreError {
    TripleStoreError::Query(e.to_string())
}

/// In-memory oxigraph store.
pub struct OxigraphEngine {
    store: Store,
}

impl OxigraphEngine {
    pub fn new() -> Result<Self> {
        Ok(Self {
            store: Store::new().map_err(storage_err)?,
        })
    }
}

impl QueryEngine for OxigraphEngine {
    fn insert(&mut self, triples: &[Triple]) -> Result<()> {
        for triple in triples {
            let quad = convert::to_quad(triple)?;
            self.store.insert(&quad).map_err(storage_err)?;
        }
        Ok(())
    }

    fn remove(&mut self, triples: &[Triple]) -> Result<()> {
        for triple in triples {
            let quad = convert::to_quad(triple)?;
            self.store.remove(&quad).map_err(storage_err)?;
        }
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.store.clear().map_err(storage_err)
    }

    fn query(&self, sparql: &str) -> Result<ResultSet> {
        let results = self.store.query(sparql).map_err(query_err)?;
        match results {
            QueryResults::Solutions(solutions) => {
                let variables: Vec<String> = solutions
                    .variables()
                    .iter()
                    .map(|v| v.as_str().to_string())
                    .collect();
                let mut out = Solutions::new(variables.clone());
                for solution in solutions {
                    let solution = solution.map_err(query_err)?;
                    let row = variables
                        .iter()
                        .map(|v| {
                            solution
                                .get(v.as_str())
                                .cloned()
                                .map(convert::from_term)
                                .transpose()
                        })
                        .collect::<Result<Vec<_>>>()?;
                    out.push_row(row);
                }
                Ok(ResultSet::Solutions(out))
            }
            QueryResults::Boolean(b) => Ok(ResultSet::Boolean(b)),
            QueryResults::Graph(triples) => {
                let mut graph = Graph::new();
                for triple in triples {
                    let triple = triple.map_err(query_err)?;
                    graph.add(convert::from_triple(triple)?);
                }
                Ok(ResultSet::Graph(graph))
            }
        }
    }

    fn empty(&self) -> Result<Box<dyn QueryEngine>> {
        Ok(Box::new(OxigraphEngine::new()?))
    }
}
