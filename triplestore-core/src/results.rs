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

//! Query results, independent of the engine that produced them.

use crate::graph::{Graph, Triple};
use crate::term::Term;
use serde::Serialize;

/// Result of a query: solution bindings (SELECT), a boolean (ASK) or a
/// graph (CONSTRUCT/DESCRIBE).
#[derive(Debug, Clone, PartialEq)]
pub enum ResultSet {
    Solutions(Solutions),
    Boolean(bool),
    Graph(Graph),
}

impl ResultSet {
    pub fn solutions(&self) -> Option<&Solutions> {
        match self {
            ResultSet::Solutions(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ResultSet::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn into_graph(self) -> Option<Graph> {
        match self {
            ResultSet::Graph(g) => Some(g),
            _ => None,
        }
    }

    /// Number of rows, triples, or 1 for a boolean.
    pub fn len(&self) -> usize {
        match self {
            ResultSet::Solutions(s) => s.len(),
            ResultSet::Boolean(_) => 1,
            ResultSet::Graph(g) => g.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// JSON rendering used by the CLI.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            ResultSet::Solutions(s) => serde_json::json!({
                "variables": s.variables,
                "rows": s.rows,
            }),
            ResultSet::Boolean(b) => serde_json::json!({ "boolean": b }),
            ResultSet::Graph(g) => {
                let triples: Vec<&Triple> = g.iter().collect();
                serde_json::json!({ "triples": triples })
            }
        }
    }
}

/// Tabular SELECT bindings.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Solutions {
    variables: Vec<String>,
    rows: Vec<Vec<Option<Term>>>,
}

impl Solutions {
    pub fn new(variables: Vec<String>) -> Self {
        Self {
            variables,
            rows: Vec::new(),
        }
    }

    /// Append a row; values are positional against `variables`.
    pub fn push_row(&mut self, row: Vec<Option<Term>>) {
        debug_assert_eq!(row.len(), self.variables.len());
        self.rows.push(row);
    }

    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Binding<'_>> + '_ {
        self.rows.iter().map(move |values| Binding {
            variables: &self.variables,
            values,
        })
    }

    /// Every bound value of one variable, in row order.
    pub fn column(&self, variable: &str) -> Vec<&Term> {
        self.iter().filter_map(|b| b.get(variable)).collect()
    }
}

/// One solution row.
#[derive(Debug, Clone, Copy)]
pub struct Binding<'a> {
    variables: &'a [String],
    values: &'a [Option<Term>],
}

impl<'a> Binding<'a> {
    pub fn get(&self, variable: &str) -> Option<&'a Term> {
        let variable = variable.trim_start_matches(['?', '$']);
        self.variables
            .iter()
            .position(|v| v == variable)
            .and_then(|i| self.values[i].as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binding_lookup() {
        let mut s = Solutions::new(vec!["s".into(), "label".into()]);
        s.push_row(vec![Some(Term::iri("http://ex.org/a")), Some(Term::literal("A"))]);
        s.push_row(vec![Some(Term::iri("http://ex.org/b")), None]);

        let rows: Vec<Binding<'_>> = s.iter().collect();
        assert_eq!(rows[0].get("?label"), Some(&Term::literal("A")));
        assert_eq!(rows[1].get("label"), None);
        assert_eq!(rows[1].get("missing"), None);
        assert_eq!(s.column("s").len(), 2);
    }

    #[test]
    fn test_result_set_len() {
        assert_eq!(ResultSet::Boolean(false).len(), 1);
        assert!(ResultSet::Graph(Graph::new()).is_empty());
        assert!(ResultSet::Solutions(Solutions::new(vec!["x".into()])).is_empty());
    }
}
