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


//! Conversions between the store's terms and oxigraph's model.

use oxigraph::model as ox;
use triplestore_core::{Result, Term, Triple, TripleStoreError};

pub(crate) fn to_named_node(term: &Term) -> Result<ox::NamedNode> {
    match term {
        Term::Iri(iri) => ox::NamedNode::new(iri.as_str())
            .map_err(|e| TripleStoreError::InvalidTerm(format!("<{}>: {}", iri, e))),
        other => Err(TripleStoreError::InvalidTerm(format!(
            "{} is not an IRI",
            other
        ))),
    }
}

fn to_blank_node(id: &str) -> Result<ox::BlankNode> {
    ox::BlankNode::new(id).map_err(|e| TripleStoreError::InvalidTerm(format!("_:{}: {}", id, e)))
}

pub(crate) fn to_subject(term: &Term) -> Result<ox::Subject> {
    match term {
        Term::Iri(_) => Ok(to_named_node(term)?.into()),
        Term::BlankNode(id) => Ok(to_blank_node(id)?.into()),
        Term::Literal(_) => Err(TripleStoreError::InvalidTerm(format!(
            "literal {} cannot be a subject",
            term
        ))),
    }
}

pub(crate) fn to_term(term: &Term) -> Result<ox::Term> {
    match term {
        Term::Iri(_) => Ok(to_named_node(term)?.into()),
        Term::BlankNode(id) => Ok(to_blank_node(id)?.into()),
        Term::Literal(lit) => {
            let literal = if let Some(lang) = &lit.language {
                ox::Literal::new_language_tagged_literal(lit.value.as_str(), lang.as_str())
                    .map_err(|e| TripleStoreError::InvalidTerm(format!("{}: {}", term, e)))?
            } else if let Some(datatype) = &lit.datatype {
                let datatype = ox::NamedNode::new(datatype.as_str())
                    .map_err(|e| TripleStoreError::InvalidTerm(format!("{}: {}", term, e)))?;
                ox::Literal::new_typed_literal(lit.value.as_str(), datatype)
            } else {
                ox::Literal::new_simple_literal(lit.value.as_str())
            };
            Ok(literal.into())
        }
    }
}

/// Default-graph quad for a triple. Also serves as validation: a triple
/// that converts is a triple the query engine and the codec accept.
pub(crate) fn to_quad(triple: &Triple) -> Result<ox::Quad> {
    Ok(ox::Quad::new(
        to_subject(&triple.subject)?,
        to_named_node(&triple.predicate)?,
        to_term(&triple.object)?,
        ox::GraphName::DefaultGraph,
    ))
}

pub(crate) fn from_term(term: ox::Term) -> Result<Term> {
    match term {
        ox::Term::NamedNode(node) => Ok(Term::Iri(node.into_string())),
        ox::Term::BlankNode(node) => Ok(Term::BlankNode(node.into_string())),
        ox::Term::Literal(literal) => Ok(from_literal(literal)),
        #[allow(unreachable_patterns)]
        other => Err(TripleStoreError::Unsupported(format!(
            "quoted triple term {}",
            other
        ))),
    }
}

fn from_literal(literal: ox::Literal) -> Term {
    if let Some(lang) = literal.language() {
        return Term::lang_literal(literal.value(), lang);
    }
    let datatype = literal.datatype().as_str().to_string();
    Term::typed_literal(literal.value(), datatype)
}

pub(crate) fn from_subject(subject: ox::Subject) -> Result<Term> {
    match subject {
        ox::Subject::NamedNode(node) => Ok(Term::Iri(node.into_string())),
        ox::Subject::BlankNode(node) => Ok(Term::BlankNode(node.into_string())),
        #[allow(unreachable_patterns)]
        other => Err(TripleStoreError::Unsupported(format!(
            "quoted triple subject {}",
            other
        ))),
    }
}

pub(crate) fn from_triple(triple: ox::Triple) -> Result<Triple> {
    Ok(Triple::new(
        from_subject(triple.subject)?,
        Term::Iri(triple.predicate.into_string()),
        from_term(triple.object)?,
    ))
}

/// Graph name is dropped; partitions are dataset-wide.
pub(crate) fn from_quad(quad: ox::Quad) -> Result<Triple> {
    Ok(Triple::new(
        from_subject(quad.subject)?,
        Term::Iri(quad.predicate.into_string()),
        from_term(quad.object)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_round_trip() {
        for term in [
            Term::literal("plain"),
            Term::lang_literal("chat", "fr"),
            Term::typed_literal("5", "http://www.w3.org/2001/XMLSchema#integer"),
        ] {
            assert_eq!(from_term(to_term(&term).unwrap()).unwrap(), term);
        }
    }

    #[test]
    fn test_rejects_literal_subject() {
        let triple = Triple::new(
            Term::literal("x"),
            Term::iri("http://ex.org/p"),
            Term::literal("y"),
        );
        assert!(matches!(to_quad(&triple), Err(TripleStoreError::InvalidTerm(_))));
    }

    #[test]
    fn test_rejects_relative_iri() {
        assert!(to_named_node(&Term::iri("not an iri")).is_err());
    }
}
