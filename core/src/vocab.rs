//! Well-known namespaces and terms

/// Base vocabulary namespace; its types are never classified
pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
pub const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";
pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";
pub const OWL: &str = "http://www.w3.org/2002/07/owl#";
pub const PROV: &str = "http://www.w3.org/ns/prov#";

pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
pub const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
pub const RDFS_COMMENT: &str = "http://www.w3.org/2000/01/rdf-schema#comment";

/// Default type marking activities in a batch listing
pub const PROV_ACTIVITY: &str = "http://www.w3.org/ns/prov#Activity";

/// Prefix bindings every graph starts with
pub const DEFAULT_PREFIXES: [(&str, &str); 4] =
    [("owl", OWL), ("rdf", RDF), ("rdfs", RDFS), ("xsd", XSD)];

/// Property key of the back-reference written on activity records
pub const SEE_ALSO_KEY: &str = "rdfs:seeAlso";
