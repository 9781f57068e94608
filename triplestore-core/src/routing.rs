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

//! Routing Keys
//!
//! Every mutated triple is published under a hierarchical routing key that a
//! topic exchange can match with wildcards. The format is a wire contract
//! shared with every consumer and must stay bit-exact:
//!
//! ```text
//! ts.<insert|delete>.g.<default|H(graph)|*>.s.<H(s)|*>.p.<H(p)|*>.o.<H(o)|*>
//! ```
//!
//! where `H(x)` is the lowercase hex SHA-256 of the canonical string of `x`.

use crate::graph::Triple;
use crate::term::{sha256_hex, Term};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default topic name on the bus.
pub const DEFAULT_TOPIC: &str = "triple_store";

/// Wildcard used for unset components of a subscription pattern.
pub const WILDCARD: &str = "*";

const KEY_PREFIX: &str = "ts";
const DEFAULT_GRAPH_SEGMENT: &str = "default";

/// Mutation kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Insert,
    Delete,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Insert => "insert",
            EventKind::Delete => "delete",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Target graph of a mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "iri", rename_all = "lowercase")]
pub enum GraphName {
    #[default]
    Default,
    Named(String),
}

impl GraphName {
    pub fn named(iri: impl Into<String>) -> Self {
        GraphName::Named(iri.into())
    }

    pub fn from_option(iri: Option<&str>) -> Self {
        iri.map_or(GraphName::Default, GraphName::named)
    }

    pub fn as_iri(&self) -> Option<&str> {
        match self {
            GraphName::Default => None,
            GraphName::Named(iri) => Some(iri),
        }
    }

    fn key_segment(&self) -> String {
        match self {
            GraphName::Default => DEFAULT_GRAPH_SEGMENT.to_string(),
            GraphName::Named(iri) => sha256_hex(iri.as_bytes()),
        }
    }
}

impl fmt::Display for GraphName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphName::Default => f.write_str(DEFAULT_GRAPH_SEGMENT),
            GraphName::Named(iri) => write!(f, "<{}>", iri),
        }
    }
}

/// Which graphs a subscription listens to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum GraphScope {
    /// Every graph (`*`).
    #[default]
    Any,
    /// Only the default graph (`default`).
    Default,
    /// One named graph.
    Named(String),
}

impl GraphScope {
    fn key_segment(&self) -> String {
        match self {
            GraphScope::Any => WILDCARD.to_string(),
            GraphScope::Default => DEFAULT_GRAPH_SEGMENT.to_string(),
            GraphScope::Named(iri) => sha256_hex(iri.as_bytes()),
        }
    }
}

impl From<GraphName> for GraphScope {
    fn from(graph: GraphName) -> Self {
        match graph {
            GraphName::Default => GraphScope::Default,
            GraphName::Named(iri) => GraphScope::Named(iri),
        }
    }
}

/// Stateless encoder for routing keys and subscription patterns.
pub struct RoutingKeyBuilder;

impl RoutingKeyBuilder {
    /// Exact routing key for one mutated triple.
    pub fn key(kind: EventKind, graph: &GraphName, triple: &Triple) -> String {
        Self::assemble(
            kind.as_str(),
            &graph.key_segment(),
            &triple.subject.content_hash(),
            &triple.predicate.content_hash(),
            &triple.object.content_hash(),
        )
    }

    /// Pattern for `topic_consume`; unset components become `*`.
    pub fn pattern(
        kind: Option<EventKind>,
        graph: &GraphScope,
        subject: Option<&Term>,
        predicate: Option<&Term>,
        object: Option<&Term>,
    ) -> String {
        let segment = |term: Option<&Term>| term.map_or_else(|| WILDCARD.to_string(), Term::content_hash);
        Self::assemble(
            kind.map_or(WILDCARD, |k| k.as_str()),
            &graph.key_segment(),
            &segment(subject),
            &segment(predicate),
            &segment(object),
        )
    }

    fn assemble(kind: &str, graph: &str, s: &str, p: &str, o: &str) -> String {
        format!(
            "{}.{}.g.{}.s.{}.p.{}.o.{}",
            KEY_PREFIX, kind, graph, s, p, o
        )
    }
}

/// One mutated triple, as published to the bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationEvent {
    pub kind: EventKind,
    pub graph: GraphName,
    pub triple: Triple,
}

impl MutationEvent {
    pub fn new(kind: EventKind, graph: GraphName, triple: Triple) -> Self {
        Self {
            kind,
            graph,
            triple,
        }
    }

    pub fn routing_key(&self) -> String {
        RoutingKeyBuilder::key(self.kind, &self.graph, &self.triple)
    }

    /// Payload bytes: the triple as one N-Triples statement.
    pub fn payload(&self) -> Vec<u8> {
        self.triple.to_ntriples().into_bytes()
    }
}
