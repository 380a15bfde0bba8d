//! Identifier derivation from resource identifiers
//!
//! Derivation is a pure function of a [`NamespaceTable`] and the input
//! identifier, so ids, keys and paths are stable across runs. [`IdRegistry`]
//! keeps derived ids unique when distinct identifiers share a local name.

use crate::graph::NamespaceTable;
use crate::types::{Iri, PropertyKey, QName};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use tracing::warn;

/// Maximum activity identifier length accepted downstream
pub const ACTIVITY_ID_MAX_LEN: usize = 32;

const SHORT_ID_HEAD: usize = 8;
const SHORT_ID_TAIL: usize = 20;

static HASH_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"-([a-z0-9]{12})$").expect("static pattern is valid"));

/// Maps identifiers to names using a namespace-prefix table
#[derive(Debug, Clone, Copy)]
pub struct IdentifierMapper<'a> {
    namespaces: &'a NamespaceTable,
}

impl<'a> IdentifierMapper<'a> {
    pub fn new(namespaces: &'a NamespaceTable) -> Self {
        Self { namespaces }
    }

    /// Split `iri` into namespace and local name, and look up the namespace prefix
    pub fn qualify(&self, iri: &Iri) -> QName {
        let (namespace, local) = split_iri(iri.as_str());
        QName {
            prefix: self.namespaces.prefix_for(namespace).map(str::to_string),
            namespace: namespace.to_string(),
            local: local.to_string(),
        }
    }

    /// `prefix:local` when a prefix is bound for the namespace, else the absolute identifier
    pub fn curie(&self, iri: &Iri) -> String {
        self.qualify(iri).curie_or(iri.as_str())
    }

    /// Naming triple used to key a property in records and views
    pub fn property_key(&self, iri: &Iri) -> PropertyKey {
        let qname = self.qualify(iri);
        PropertyKey {
            field_id: format!("{}_field", qname.local),
            property_key: qname.curie_or(iri.as_str()),
            name: qname.local,
        }
    }
}

/// Assigns path ids so that no two owners share one.
///
/// The first owner to claim an id keeps it. A later owner of the same id gets
/// it qualified by its namespace prefix (`other_Bar`), then numbered
/// (`other_Bar_2`) until it is free. Claims are only stable across runs when
/// owners claim in the same order.
#[derive(Debug, Clone, Default)]
pub struct IdRegistry {
    /// id -> owning identifier
    owners: BTreeMap<String, String>,
    /// owning identifier -> id
    assigned: BTreeMap<String, String>,
}

impl IdRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id for `owner`, derived from `id`. Repeated claims by one owner return
    /// the same id.
    pub fn claim(&mut self, id: &str, owner: &str, prefix: Option<&str>) -> String {
        if let Some(existing) = self.assigned.get(owner) {
            return existing.clone();
        }
        let mut candidate = id.to_string();
        if let Some(holder) = self.owners.get(id) {
            let base = match prefix {
                Some(prefix) if !prefix.is_empty() => format!("{}_{}", prefix, id),
                _ => id.to_string(),
            };
            candidate = base.clone();
            let mut n = 2;
            while self.owners.contains_key(&candidate) {
                candidate = format!("{}_{}", base, n);
                n += 1;
            }
            warn!(
                "Id {} of {} already used by {}; using {}",
                id, owner, holder, candidate
            );
        }
        self.owners.insert(candidate.clone(), owner.to_string());
        self.assigned.insert(owner.to_string(), candidate.clone());
        candidate
    }

    /// Id previously assigned to `owner`
    pub fn get(&self, owner: &str) -> Option<&str> {
        self.assigned.get(owner).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.assigned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assigned.is_empty()
    }
}

/// Split an identifier at its last `#`, `/` or `:`.
///
/// Trailing separators are not part of the local name, so
/// `http://example.org/things/` yields local name `things`.
pub fn split_iri(iri: &str) -> (&str, &str) {
    let body = iri.trim_end_matches(['/', '#']);
    let cut = body
        .rfind('#')
        .or_else(|| body.rfind('/'))
        .or_else(|| body.rfind(':'))
        .map(|pos| pos + 1)
        .unwrap_or(0);
    (&iri[..cut], &body[cut..])
}

/// Derive an activity identifier from its namespace and local name.
///
/// The last path segment of the namespace is folded into the id: when it ends
/// in a hyphen followed by 12 lowercase alphanumerics only that suffix is kept,
/// otherwise the whole segment is kept with hyphens replaced by underscores.
/// Identifiers longer than [`ACTIVITY_ID_MAX_LEN`] are shortened to their first
/// 8 characters, `___`, and their last 20 characters.
pub fn activity_id(namespace: &str, local: &str) -> String {
    let uname = namespace_last_segment(namespace);
    let stem = match HASH_SUFFIX.captures(uname) {
        Some(captures) => captures[1].to_string(),
        None => uname.replace('-', "_"),
    };
    let actid = format!("{}_{}", stem, local.replace('-', "_"));
    shorten_id(&actid)
}

/// Final non-empty path segment of a namespace identifier
fn namespace_last_segment(namespace: &str) -> &str {
    let path = match namespace.find("://") {
        Some(pos) => {
            let rest = &namespace[pos + 3..];
            rest.find('/').map_or("", |slash| &rest[slash..])
        }
        None => namespace,
    };
    let path = path.split(['#', '?']).next().unwrap_or("");
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .last()
        .unwrap_or("")
}

fn shorten_id(id: &str) -> String {
    let chars: Vec<char> = id.chars().collect();
    if chars.len() <= ACTIVITY_ID_MAX_LEN {
        return id.to_string();
    }
    let head: String = chars[..SHORT_ID_HEAD].iter().collect();
    let tail: String = chars[chars.len() - SHORT_ID_TAIL..].iter().collect();
    format!("{}___{}", head, tail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocab;

    fn table() -> NamespaceTable {
        let mut table = NamespaceTable::with_defaults();
        table.bind("ex", "http://example.org/");
        table
    }

    #[test]
    fn test_split_iri() {
        assert_eq!(split_iri("http://example.org/name"), ("http://example.org/", "name"));
        assert_eq!(split_iri(vocab::RDF_TYPE), (vocab::RDF, "type"));
        assert_eq!(split_iri("urn:isbn:1234"), ("urn:isbn:", "1234"));
        assert_eq!(split_iri("http://example.org/things/"), ("http://example.org/", "things"));
        assert_eq!(split_iri("nonsense"), ("", "nonsense"));
    }

    #[test]
    fn test_property_key_with_prefix() {
        let table = table();
        let mapper = IdentifierMapper::new(&table);
        let key = mapper.property_key(&Iri::new("http://example.org/name"));
        assert_eq!(key.name, "name");
        assert_eq!(key.field_id, "name_field");
        assert_eq!(key.property_key, "ex:name");
    }

    #[test]
    fn test_property_key_without_prefix() {
        let table = table();
        let mapper = IdentifierMapper::new(&table);
        let key = mapper.property_key(&Iri::new("http://unbound.example/vocab#size"));
        assert_eq!(key.name, "size");
        assert_eq!(key.field_id, "size_field");
        assert_eq!(key.property_key, "http://unbound.example/vocab#size");
    }

    #[test]
    fn test_qualify_is_independent_of_unrelated_bindings() {
        let mut other = table();
        other.bind("zz", "http://zz.example/");
        let iri = Iri::new("http://example.org/name");
        assert_eq!(
            IdentifierMapper::new(&table()).qualify(&iri),
            IdentifierMapper::new(&other).qualify(&iri)
        );
    }

    #[test]
    fn test_id_registry_first_claim_keeps_id() {
        let mut ids = IdRegistry::new();
        assert_eq!(ids.claim("Bar", "http://example.org/Bar", Some("ex")), "Bar");
        assert_eq!(ids.claim("Bar", "http://other.example/Bar", Some("other")), "other_Bar");
        // Same owner, same answer
        assert_eq!(ids.claim("Bar", "http://example.org/Bar", Some("ex")), "Bar");
        assert_eq!(ids.get("http://other.example/Bar"), Some("other_Bar"));
        assert_eq!(ids.len(), 2);
    }

    #[test]
    fn test_id_registry_numbers_when_qualified_id_is_taken() {
        let mut ids = IdRegistry::new();
        assert_eq!(ids.claim("x", "a:x", Some("a")), "x");
        assert_eq!(ids.claim("x", "urn:one:x", None), "x_2");
        assert_eq!(ids.claim("x", "urn:two:x", None), "x_3");
        assert_eq!(ids.claim("a_x", "urn:three:a_x", None), "a_x");
        assert_eq!(ids.claim("x", "http://a2.example/x", Some("a")), "a_x_2");
        assert!(!ids.is_empty());
    }

    #[test]
    fn test_activity_id_hash_suffix() {
        let id = activity_id(
            "http://calma.example/data/track-analysis-0a1b2c3d4e5f/",
            "run",
        );
        assert_eq!(id, "0a1b2c3d4e5f_run");
    }

    #[test]
    fn test_activity_id_fallback_replaces_hyphens() {
        let id = activity_id("http://calma.example/data/my-run/", "step-1");
        assert_eq!(id, "my_run_step_1");
    }

    #[test]
    fn test_activity_id_suffix_must_be_lowercase() {
        let id = activity_id("http://calma.example/x-0A1B2C3D4E5F/", "a");
        assert_eq!(id, "x_0A1B2C3D4E5F_a");
    }

    #[test]
    fn test_activity_id_is_shortened() {
        let id = activity_id(
            "http://calma.example/data/a-very-long-analysis-name/",
            "transform-segmentation-output",
        );
        let full = "a_very_long_analysis_name_transform_segmentation_output";
        assert_eq!(id.len(), 31);
        assert_eq!(&id[..8], &full[..8]);
        assert_eq!(&id[8..11], "___");
        assert_eq!(&id[11..], &full[full.len() - 20..]);
    }

    #[test]
    fn test_activity_id_at_limit_is_kept() {
        // 32 characters exactly
        let id = activity_id("http://calma.example/abcdefghijklmno/", "pqrstuvwxyzabcde");
        assert_eq!(id.len(), 32);
        assert_eq!(id, "abcdefghijklmno_pqrstuvwxyzabcde");
    }
}
