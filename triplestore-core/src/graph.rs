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

//! Triples and in-memory graphs with set semantics.

use crate::term::Term;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// An immutable (subject, predicate, object) statement.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Triple {
    pub subject: Term,
    pub predicate: Term,
    pub object: Term,
}

impl Triple {
    pub fn new(subject: Term, predicate: Term, object: Term) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }

    /// One N-Triples statement, newline terminated.
    pub fn to_ntriples(&self) -> String {
        let mut out = String::with_capacity(128);
        self.subject.write_n3(&mut out);
        out.push(' ');
        self.predicate.write_n3(&mut out);
        out.push(' ');
        self.object.write_n3(&mut out);
        out.push_str(" .\n");
        out
    }
}

/// A set of triples plus the prefix bindings that came with them.
///
/// Prefix bindings are presentation only; they never affect equality of
/// triples, but they are carried into partition files so that serialized
/// partitions stay readable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Graph {
    triples: BTreeSet<Triple>,
    namespaces: BTreeMap<String, String>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a triple. Returns false if it was already present.
    pub fn add(&mut self, triple: Triple) -> bool {
        self.triples.insert(triple)
    }

    /// Remove a triple. Returns false if it was absent.
    pub fn remove(&mut self, triple: &Triple) -> bool {
        self.triples.remove(triple)
    }

    pub fn contains(&self, triple: &Triple) -> bool {
        self.triples.contains(triple)
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Triple> + '_ {
        self.triples.iter()
    }

    pub fn clear(&mut self) {
        self.triples.clear();
    }

    /// Bind a prefix. A later binding for the same prefix wins.
    pub fn bind(&mut self, prefix: impl Into<String>, namespace: impl Into<String>) {
        self.namespaces.insert(prefix.into(), namespace.into());
    }

    pub fn namespaces(&self) -> &BTreeMap<String, String> {
        &self.namespaces
    }

    /// Copy every prefix binding of `other` into this graph.
    pub fn bind_all(&mut self, other: &Graph) {
        for (prefix, ns) in &other.namespaces {
            self.namespaces.insert(prefix.clone(), ns.clone());
        }
    }

    /// Triples matching a pattern; `None` matches anything.
    pub fn triples_matching<'a>(
        &'a self,
        subject: Option<&'a Term>,
        predicate: Option<&'a Term>,
        object: Option<&'a Term>,
    ) -> impl Iterator<Item = &'a Triple> + 'a {
        self.triples.iter().filter(move |t| {
            subject.map_or(true, |s| &t.subject == s)
                && predicate.map_or(true, |p| &t.predicate == p)
                && object.map_or(true, |o| &t.object == o)
        })
    }

    /// First object for (subject, predicate), if any.
    pub fn value(&self, subject: &Term, predicate: &Term) -> Option<&Term> {
        self.triples
            .iter()
            .find(|t| &t.subject == subject && &t.predicate == predicate)
            .map(|t| &t.object)
    }

    pub fn subjects(&self) -> BTreeSet<&Term> {
        self.triples.iter().map(|t| &t.subject).collect()
    }

    /// Group (predicate, object) pairs by subject.
    pub fn by_subject(&self) -> BTreeMap<Term, Vec<(Term, Term)>> {
        let mut grouped: BTreeMap<Term, Vec<(Term, Term)>> = BTreeMap::new();
        for t in &self.triples {
            grouped
                .entry(t.subject.clone())
                .or_default()
                .push((t.predicate.clone(), t.object.clone()));
        }
        grouped
    }

    /// Add every triple (and binding) of `other`.
    pub fn merge(&mut self, other: &Graph) {
        self.bind_all(other);
        self.triples.extend(other.triples.iter().cloned());
    }

    /// Remove every triple of `other`.
    pub fn subtract(&mut self, other: &Graph) {
        for t in &other.triples {
            self.triples.remove(t);
        }
    }

    pub fn union(&self, other: &Graph) -> Graph {
        let mut out = self.clone();
        out.merge(other);
        out
    }

    /// Triples in `self` but not in `other`. Keeps `self`'s bindings.
    pub fn difference(&self, other: &Graph) -> Graph {
        Graph {
            triples: self.triples.difference(&other.triples).cloned().collect(),
            namespaces: self.namespaces.clone(),
        }
    }

    /// The whole graph as N-Triples.
    pub fn to_ntriples(&self) -> String {
        self.triples.iter().map(Triple::to_ntriples).collect()
    }
}

impl FromIterator<Triple> for Graph {
    fn from_iter<I: IntoIterator<Item = Triple>>(iter: I) -> Self {
        Graph {
            triples: iter.into_iter().collect(),
            namespaces: BTreeMap::new(),
        }
    }
}

impl Extend<Triple> for Graph {
    fn extend<I: IntoIterator<Item = Triple>>(&mut self, iter: I) {
        self.triples.extend(iter);
    }
}

impl IntoIterator for Graph {
    type Item = Triple;
    type IntoIter = std::collections::btree_set::IntoIter<Triple>;

    fn into_iter(self) -> Self::IntoIter {
        self.triples.into_iter()
    }
}

impl<'a> IntoIterator for &'a Graph {
    type Item = &'a Triple;
    type IntoIter = std::collections::btree_set::Iter<'a, Triple>;

    fn into_iter(self) -> Self::IntoIter {
        self.triples.iter()
    }
}
