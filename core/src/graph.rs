//! In-memory triple graph with a namespace-prefix table

use crate::types::{Iri, Term, Triple};
use crate::vocab;
use std::collections::{BTreeMap, BTreeSet};

/// Prefix -> namespace bindings carried by a graph
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceTable {
    bindings: BTreeMap<String, String>,
}

impl NamespaceTable {
    /// Table with no bindings
    pub fn empty() -> Self {
        Self::default()
    }

    /// Table holding the standard bindings (`rdf`, `rdfs`, `xsd`, `owl`)
    pub fn with_defaults() -> Self {
        let mut table = Self::empty();
        for (prefix, namespace) in vocab::DEFAULT_PREFIXES {
            table.bind(prefix, namespace);
        }
        table
    }

    /// Bind a prefix unless it is already bound. Returns whether the binding was added.
    pub fn bind(&mut self, prefix: impl Into<String>, namespace: impl Into<String>) -> bool {
        let prefix = prefix.into();
        if self.bindings.contains_key(&prefix) {
            return false;
        }
        self.bindings.insert(prefix, namespace.into());
        true
    }

    /// Namespace bound to `prefix`
    pub fn namespace(&self, prefix: &str) -> Option<&str> {
        self.bindings.get(prefix).map(String::as_str)
    }

    /// Smallest non-empty prefix bound to exactly `namespace`
    pub fn prefix_for(&self, namespace: &str) -> Option<&str> {
        self.bindings
            .iter()
            .find(|(prefix, ns)| !prefix.is_empty() && ns.as_str() == namespace)
            .map(|(prefix, _)| prefix.as_str())
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// A set of triples indexed subject -> predicate -> objects
///
/// All iteration is in sorted order, so every traversal of an unchanged graph
/// is reproducible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graph {
    spo: BTreeMap<Term, BTreeMap<Iri, BTreeSet<Term>>>,
    namespaces: NamespaceTable,
    len: usize,
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl Graph {
    /// Create an empty graph with the default namespace bindings
    pub fn new() -> Self {
        Self::with_namespaces(NamespaceTable::with_defaults())
    }

    /// Create an empty graph using the supplied namespace table
    pub fn with_namespaces(namespaces: NamespaceTable) -> Self {
        Self {
            spo: BTreeMap::new(),
            namespaces,
            len: 0,
        }
    }

    pub fn namespaces(&self) -> &NamespaceTable {
        &self.namespaces
    }

    /// Bind a namespace prefix; an existing binding for the prefix is kept
    pub fn bind(&mut self, prefix: impl Into<String>, namespace: impl Into<String>) -> bool {
        self.namespaces.bind(prefix, namespace)
    }

    /// Insert a triple. Returns false when it was already present.
    pub fn insert(&mut self, triple: Triple) -> bool {
        let added = self
            .spo
            .entry(triple.subject)
            .or_default()
            .entry(triple.predicate)
            .or_default()
            .insert(triple.object);
        if added {
            self.len += 1;
        }
        added
    }

    /// Convenience wrapper around [`Graph::insert`]
    pub fn add(&mut self, subject: impl Into<Term>, predicate: Iri, object: impl Into<Term>) -> bool {
        self.insert(Triple::new(subject, predicate, object))
    }

    /// Union `other` into this graph. Prefixes already bound here keep their namespace.
    /// Returns the number of triples that were new.
    pub fn merge(&mut self, other: Graph) -> usize {
        for (prefix, namespace) in other.namespaces.bindings {
            self.namespaces.bind(prefix, namespace);
        }
        let mut added = 0;
        for (subject, predicates) in other.spo {
            for (predicate, objects) in predicates {
                for object in objects {
                    if self.insert(Triple::new(subject.clone(), predicate.clone(), object)) {
                        added += 1;
                    }
                }
            }
        }
        added
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn contains(&self, subject: &Term, predicate: &Iri, object: &Term) -> bool {
        self.spo
            .get(subject)
            .and_then(|predicates| predicates.get(predicate))
            .map_or(false, |objects| objects.contains(object))
    }

    /// All triples in (subject, predicate, object) order
    pub fn triples(&self) -> impl Iterator<Item = (&Term, &Iri, &Term)> {
        self.spo.iter().flat_map(|(s, predicates)| {
            predicates
                .iter()
                .flat_map(move |(p, objects)| objects.iter().map(move |o| (s, p, o)))
        })
    }

    /// Distinct subjects
    pub fn subjects(&self) -> impl Iterator<Item = &Term> {
        self.spo.keys()
    }

    /// Distinct subjects having `predicate` with value `object`
    pub fn subjects_with(&self, predicate: &Iri, object: &Term) -> Vec<&Term> {
        self.spo
            .iter()
            .filter(|(_, predicates)| {
                predicates
                    .get(predicate)
                    .map_or(false, |objects| objects.contains(object))
            })
            .map(|(subject, _)| subject)
            .collect()
    }

    /// Distinct predicates used by `subject`
    pub fn predicates<'a>(&'a self, subject: &Term) -> impl Iterator<Item = &'a Iri> + 'a {
        self.spo
            .get(subject)
            .into_iter()
            .flat_map(|predicates| predicates.keys())
    }

    /// Objects of `(subject, predicate, ?)`
    pub fn objects<'a>(&'a self, subject: &Term, predicate: &Iri) -> impl Iterator<Item = &'a Term> + 'a {
        self.spo
            .get(subject)
            .and_then(|predicates| predicates.get(predicate))
            .into_iter()
            .flat_map(|objects| objects.iter())
    }

    /// Distinct objects of `(?, predicate, ?)` across the whole graph
    pub fn objects_of(&self, predicate: &Iri) -> BTreeSet<&Term> {
        self.spo
            .values()
            .filter_map(|predicates| predicates.get(predicate))
            .flat_map(|objects| objects.iter())
            .collect()
    }

    /// `(predicate, object)` pairs of `subject`
    pub fn predicate_objects<'a>(&'a self, subject: &Term) -> impl Iterator<Item = (&'a Iri, &'a Term)> + 'a {
        self.spo.get(subject).into_iter().flat_map(|predicates| {
            predicates
                .iter()
                .flat_map(|(p, objects)| objects.iter().map(move |o| (p, o)))
        })
    }

    /// Single value of `(subject, predicate, ?)`, the first in sort order
    pub fn value(&self, subject: &Term, predicate: &Iri) -> Option<&Term> {
        self.objects(subject, predicate).next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ex(local: &str) -> Iri {
        Iri::new(format!("http://example.org/{}", local))
    }

    #[test]
    fn test_insert_deduplicates() {
        let mut graph = Graph::new();
        assert!(graph.add(ex("a"), ex("p"), Term::literal("1")));
        assert!(!graph.add(ex("a"), ex("p"), Term::literal("1")));
        assert!(graph.add(ex("a"), ex("p"), Term::literal("2")));
        assert_eq!(graph.len(), 2);
        assert_eq!(graph.triples().count(), 2);
    }

    #[test]
    fn test_queries() {
        let mut graph = Graph::new();
        let rdf_type = Iri::new(vocab::RDF_TYPE);
        graph.add(ex("b"), rdf_type.clone(), ex("T"));
        graph.add(ex("a"), rdf_type.clone(), ex("T"));
        graph.add(ex("a"), ex("name"), Term::literal("alpha"));

        let subjects = graph.subjects_with(&rdf_type, &Term::Iri(ex("T")));
        assert_eq!(subjects, vec![&Term::Iri(ex("a")), &Term::Iri(ex("b"))]);

        let predicates: Vec<_> = graph.predicates(&Term::Iri(ex("a"))).collect();
        assert_eq!(predicates, vec![&ex("name"), &rdf_type]);

        assert_eq!(
            graph.value(&Term::Iri(ex("a")), &ex("name")),
            Some(&Term::literal("alpha"))
        );
        assert_eq!(graph.value(&Term::Iri(ex("zzz")), &ex("name")), None);
        assert_eq!(graph.objects_of(&rdf_type).len(), 1);
    }

    #[test]
    fn test_merge_keeps_first_prefix_binding() {
        let mut left = Graph::new();
        left.bind("ex", "http://example.org/");
        left.add(ex("a"), ex("p"), Term::literal("1"));

        let mut right = Graph::new();
        right.bind("ex", "http://other.example/");
        right.bind("dc", "http://purl.org/dc/terms/");
        right.add(ex("a"), ex("p"), Term::literal("1"));
        right.add(ex("b"), ex("p"), Term::literal("2"));

        assert_eq!(left.merge(right), 1);
        assert_eq!(left.len(), 2);
        assert_eq!(left.namespaces().namespace("ex"), Some("http://example.org/"));
        assert_eq!(left.namespaces().namespace("dc"), Some("http://purl.org/dc/terms/"));
    }

    #[test]
    fn test_prefix_for_ignores_empty_prefix() {
        let mut table = NamespaceTable::empty();
        table.bind("", "http://example.org/");
        assert_eq!(table.prefix_for("http://example.org/"), None);
        table.bind("ex", "http://example.org/");
        assert_eq!(table.prefix_for("http://example.org/"), Some("ex"));
        assert_eq!(NamespaceTable::with_defaults().prefix_for(vocab::RDFS), Some("rdfs"));
    }
}
