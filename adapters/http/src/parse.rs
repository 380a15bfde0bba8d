//! Turtle / N-Triples parsing into a core graph

use oxrdf::vocab::xsd;
use oxrdf::{Subject, Term as OxTerm};
use oxttl::TurtleParser;
use wrangle_core::prelude::*;

/// Parse a Turtle (or N-Triples) document. Relative references resolve
/// against `base`; `@prefix` declarations are bound in the graph's namespace table.
pub fn parse_turtle(data: &[u8], base: Option<&str>, location: &str) -> FetchResult<Graph> {
    let parse_error = |message: String| FetchError::Parse {
        location: location.to_string(),
        message,
    };

    let mut parser = TurtleParser::new();
    if let Some(base) = base {
        parser = parser
            .with_base_iri(base)
            .map_err(|e| parse_error(format!("invalid base IRI {}: {}", base, e)))?;
    }

    let mut graph = Graph::new();
    let mut reader = parser.for_slice(data);
    while let Some(result) = reader.next() {
        let triple = result.map_err(|e| parse_error(e.to_string()))?;
        let Some(subject) = subject_term(triple.subject) else {
            continue;
        };
        let Some(object) = object_term(triple.object) else {
            continue;
        };
        graph.insert(Triple::new(subject, Iri::new(triple.predicate.into_string()), object));
    }
    for (prefix, namespace) in reader.prefixes() {
        graph.bind(prefix, namespace);
    }
    Ok(graph)
}

fn subject_term(subject: Subject) -> Option<Term> {
    match subject {
        Subject::NamedNode(node) => Some(Term::Iri(Iri::new(node.into_string()))),
        Subject::BlankNode(node) => Some(Term::Blank(node.as_str().to_string())),
        #[allow(unreachable_patterns)]
        _ => None,
    }
}

fn object_term(object: OxTerm) -> Option<Term> {
    match object {
        OxTerm::NamedNode(node) => Some(Term::Iri(Iri::new(node.into_string()))),
        OxTerm::BlankNode(node) => Some(Term::Blank(node.as_str().to_string())),
        OxTerm::Literal(literal) => {
            let value = literal.value().to_string();
            if let Some(language) = literal.language() {
                return Some(Term::Literal(Literal::with_language(value, language)));
            }
            let datatype = literal.datatype();
            if datatype == xsd::STRING {
                Some(Term::Literal(Literal::simple(value)))
            } else {
                Some(Term::Literal(Literal::typed(value, Iri::new(datatype.as_str()))))
            }
        }
        #[allow(unreachable_patterns)]
        _ => None,
    }
}
