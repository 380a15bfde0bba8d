//! Core data types for wrangle

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An absolute resource identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Iri(pub String);

impl Iri {
    /// Create a new Iri
    pub fn new(iri: impl Into<String>) -> Self {
        Self(iri.into())
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Iri {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A literal value with optional datatype or language tag
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Literal {
    pub value: String,
    pub datatype: Option<Iri>,
    pub language: Option<String>,
}

impl Literal {
    /// Create a plain literal
    pub fn simple(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            datatype: None,
            language: None,
        }
    }

    /// Create a literal with an explicit datatype
    pub fn typed(value: impl Into<String>, datatype: Iri) -> Self {
        Self {
            value: value.into(),
            datatype: Some(datatype),
            language: None,
        }
    }

    /// Create a language-tagged literal
    pub fn with_language(value: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            datatype: None,
            language: Some(language.into()),
        }
    }
}

/// A graph term: resource identifier, blank node or literal
///
/// Only `Iri` terms are eligible as exported subjects; literals are always
/// terminal and are stringified, never traversed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Term {
    Iri(Iri),
    Blank(String),
    Literal(Literal),
}

impl Term {
    pub fn iri(iri: impl Into<String>) -> Self {
        Term::Iri(Iri::new(iri))
    }

    pub fn blank(id: impl Into<String>) -> Self {
        Term::Blank(id.into())
    }

    pub fn literal(value: impl Into<String>) -> Self {
        Term::Literal(Literal::simple(value))
    }

    pub fn as_iri(&self) -> Option<&Iri> {
        match self {
            Term::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    pub fn is_iri(&self) -> bool {
        matches!(self, Term::Iri(_))
    }
}

impl From<Iri> for Term {
    fn from(iri: Iri) -> Self {
        Term::Iri(iri)
    }
}

impl std::fmt::Display for Term {
    /// Stringified form used for attribute values
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Term::Iri(iri) => write!(f, "{}", iri),
            Term::Blank(id) => write!(f, "_:{}", id),
            Term::Literal(literal) => write!(f, "{}", literal.value),
        }
    }
}

/// A (subject, predicate, object) statement
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Triple {
    pub subject: Term,
    pub predicate: Iri,
    pub object: Term,
}

impl Triple {
    pub fn new(subject: impl Into<Term>, predicate: Iri, object: impl Into<Term>) -> Self {
        Self {
            subject: subject.into(),
            predicate,
            object: object.into(),
        }
    }
}

/// Decomposition of an identifier against a namespace-prefix table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QName {
    /// Registered prefix for the namespace, if any
    pub prefix: Option<String>,
    /// Namespace part, including its trailing separator
    pub namespace: String,
    /// Local name following the namespace
    pub local: String,
}

impl QName {
    /// `prefix:local` when a prefix is known, else the absolute identifier
    pub fn curie_or(&self, absolute: &str) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}:{}", prefix, self.local),
            None => absolute.to_string(),
        }
    }
}

/// Naming triple derived from a property identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PropertyKey {
    /// Local name of the property
    pub name: String,
    /// Field identifier, `<name>_field`
    pub field_id: String,
    /// `<prefix>:<name>`, or the absolute identifier when no prefix is bound
    pub property_key: String,
}

/// Descriptive metadata for an entity type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
    pub uri: String,
    pub id: String,
    pub label: String,
    pub comment: String,
    pub list_name: String,
    pub view_name: String,
}

/// How a field value is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenderType {
    Text,
    URILink,
}

impl RenderType {
    /// Value type vocabulary term for this render type
    pub fn value_type(&self) -> &'static str {
        match self {
            RenderType::Text => "annal:Text",
            RenderType::URILink => "annal:Identifier",
        }
    }
}

impl std::fmt::Display for RenderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderType::Text => write!(f, "Text"),
            RenderType::URILink => write!(f, "URILink"),
        }
    }
}

/// Field description referenced from views
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub field_id: String,
    pub label: String,
    pub comment: String,
    pub render_type: RenderType,
    pub property_key: String,
    pub placement: String,
}

/// Reference from a list or view to a field, with its layout position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldPlacement {
    #[serde(rename = "annal:field_id")]
    pub field_id: String,
    #[serde(rename = "annal:field_placement")]
    pub placement: String,
}

impl FieldPlacement {
    pub fn new(field_id: impl Into<String>, placement: impl Into<String>) -> Self {
        Self {
            field_id: field_id.into(),
            placement: placement.into(),
        }
    }
}

/// Per-type list presentation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListDescriptor {
    pub id: String,
    pub label: String,
    pub comment: String,
    pub default_view: String,
    pub default_type: String,
    pub entity_selector: String,
    pub fields: Vec<FieldPlacement>,
}

/// Per-type view presentation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewDescriptor {
    pub id: String,
    pub label: String,
    pub comment: String,
    pub fields: Vec<FieldPlacement>,
}

/// Attributes of one exported subject
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectRecord {
    pub uri: String,
    pub id: String,
    pub label: String,
    pub comment: String,
    /// Link back to the source resource, when the extraction strategy keeps one
    pub back_reference: Option<String>,
    /// property key -> stringified object value
    pub attributes: BTreeMap<String, String>,
}
