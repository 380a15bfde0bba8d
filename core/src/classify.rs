//! Type discovery over a graph

use crate::graph::Graph;
use crate::naming::{IdRegistry, IdentifierMapper};
use crate::types::{Iri, Term, TypeDescriptor};
use crate::vocab;
use tracing::warn;

/// Enumerates and describes the entity types present in a graph
#[derive(Debug, Clone)]
pub struct TypeClassifier {
    excluded_namespace: String,
}

impl Default for TypeClassifier {
    fn default() -> Self {
        Self::new(vocab::RDF)
    }
}

impl TypeClassifier {
    /// Classifier ignoring every type whose identifier starts with `excluded_namespace`
    pub fn new(excluded_namespace: impl Into<String>) -> Self {
        Self {
            excluded_namespace: excluded_namespace.into(),
        }
    }

    /// Distinct type identifiers asserted in `graph`, sorted by absolute identifier
    pub fn list_types(&self, graph: &Graph) -> Vec<Iri> {
        let rdf_type = Iri::new(vocab::RDF_TYPE);
        graph
            .objects_of(&rdf_type)
            .into_iter()
            .filter_map(|object| match object {
                Term::Iri(iri) => Some(iri),
                other => {
                    warn!("Ignoring non-IRI type {}", other);
                    None
                }
            })
            .filter(|iri| !iri.as_str().starts_with(&self.excluded_namespace))
            .cloned()
            .collect()
    }

    /// Descriptor for `type_iri`, with synthesized label and comment when the graph has none
    pub fn describe_type(&self, graph: &Graph, type_iri: &Iri) -> TypeDescriptor {
        let mapper = IdentifierMapper::new(graph.namespaces());
        let qname = mapper.qualify(type_iri);
        let uri = qname.curie_or(type_iri.as_str());
        let subject = Term::Iri(type_iri.clone());
        let label = graph
            .value(&subject, &Iri::new(vocab::RDFS_LABEL))
            .map(Term::to_string)
            .unwrap_or_else(|| format!("Type {}", uri));
        let comment = graph
            .value(&subject, &Iri::new(vocab::RDFS_COMMENT))
            .map(Term::to_string)
            .unwrap_or_else(|| format!("Type {} ({})", uri, type_iri));
        TypeDescriptor {
            list_name: format!("{}_list", qname.local),
            view_name: format!("{}_view", qname.local),
            id: qname.local,
            uri,
            label,
            comment,
        }
    }

    /// Descriptors for every listed type, in type order. Types sharing a local
    /// name get distinct ids, lists and views; see [`IdRegistry`].
    pub fn describe_types(&self, graph: &Graph) -> Vec<(Iri, TypeDescriptor)> {
        let mapper = IdentifierMapper::new(graph.namespaces());
        let mut ids = IdRegistry::new();
        self.list_types(graph)
            .into_iter()
            .map(|type_iri| {
                let mut td = self.describe_type(graph, &type_iri);
                let prefix = mapper.qualify(&type_iri).prefix;
                let id = ids.claim(&td.id, type_iri.as_str(), prefix.as_deref());
                if id != td.id {
                    td.list_name = format!("{}_list", id);
                    td.view_name = format!("{}_view", id);
                    td.id = id;
                }
                (type_iri, td)
            })
            .collect()
    }

    /// Outline of every asserted type, its co-occurring types and its instances' properties
    pub fn explore(&self, graph: &Graph) -> ExploreReport {
        let rdf_type = Iri::new(vocab::RDF_TYPE);
        let types = graph
            .objects_of(&rdf_type)
            .into_iter()
            .map(|type_term| {
                let instances = graph.subjects_with(&rdf_type, type_term);
                let mut additional_types: Vec<Term> = instances
                    .iter()
                    .flat_map(|subject| graph.objects(subject, &rdf_type))
                    .filter(|other| *other != type_term)
                    .cloned()
                    .collect();
                additional_types.sort();
                additional_types.dedup();

                let mut properties: Vec<Iri> = Vec::new();
                for subject in &instances {
                    for predicate in graph.predicates(subject) {
                        if *predicate != rdf_type && !properties.contains(predicate) {
                            properties.push(predicate.clone());
                        }
                    }
                }

                ExploredType {
                    type_term: type_term.clone(),
                    instance_count: instances.len(),
                    additional_types,
                    properties,
                }
            })
            .collect();
        ExploreReport {
            triple_count: graph.len(),
            types,
        }
    }
}

/// Result of exploring a graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExploreReport {
    pub triple_count: usize,
    pub types: Vec<ExploredType>,
}

/// One asserted type in an [`ExploreReport`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExploredType {
    pub type_term: Term,
    pub instance_count: usize,
    /// Other types carried by instances of this type
    pub additional_types: Vec<Term>,
    /// Properties used by instances, in first-seen order
    pub properties: Vec<Iri>,
}
