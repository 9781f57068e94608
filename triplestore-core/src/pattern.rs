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

//! (S?, P?, O?) patterns used for view triggers and subscriptions.

use crate::graph::Triple;
use crate::term::Term;
use crate::vocab::RDF_TYPE;
use serde::{Deserialize, Serialize};

/// Triple pattern; an unset component matches any term.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TriplePattern {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<Term>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predicate: Option<Term>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<Term>,
}

impl TriplePattern {
    pub fn new(subject: Option<Term>, predicate: Option<Term>, object: Option<Term>) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }

    /// Matches every triple.
    pub fn any() -> Self {
        Self::default()
    }

    /// `(?, rdf:type, ?)`: the view trigger used when none is configured.
    pub fn rdf_type() -> Self {
        Self::new(None, Some(Term::iri(RDF_TYPE)), None)
    }

    pub fn with_subject(mut self, subject: Term) -> Self {
        self.subject = Some(subject);
        self
    }

    pub fn with_predicate(mut self, predicate: Term) -> Self {
        self.predicate = Some(predicate);
        self
    }

    pub fn with_object(mut self, object: Term) -> Self {
        self.object = Some(object);
        self
    }

    pub fn matches(&self, triple: &Triple) -> bool {
        self.subject.as_ref().map_or(true, |s| s == &triple.subject)
            && self.predicate.as_ref().map_or(true, |p| p == &triple.predicate)
            && self.object.as_ref().map_or(true, |o| o == &triple.object)
    }
}
