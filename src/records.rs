//! The boundary with the external technique-data collaborator.
//!
//! The core never parses STIX-shaped documents; it only needs an id and two
//! lifecycle flags per raw record, expressed here as a narrow accessor trait.
//! Whatever fetches and caches the upstream bundles implements this and hands
//! the core a finished universe.

use serde::Deserialize;
use std::collections::BTreeSet;

pub const MITRE_ATTACK_SOURCE_NAME: &str = "mitre-attack";

/// Accessors the core requires from one raw technique record.
pub trait TechniqueRecord {
    /// The stable technique id (e.g. `T1059`), if the record carries one.
    fn external_id(&self) -> Option<&str>;

    fn is_revoked(&self) -> bool;

    fn is_deprecated(&self) -> bool;
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ExternalReference {
    pub source_name: String,
    #[serde(default)]
    pub external_id: Option<String>,
}

/// An ATT&CK-flavored technique record, as decoded by the collaborator.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AttackRecord {
    #[serde(default)]
    pub external_references: Vec<ExternalReference>,
    #[serde(default)]
    pub revoked: bool,
    #[serde(default, rename = "x-mitre-deprecated")]
    pub deprecated: bool,
}

impl TechniqueRecord for AttackRecord {
    fn external_id(&self) -> Option<&str> {
        self.external_references
            .iter()
            .find(|reference| reference.source_name == MITRE_ATTACK_SOURCE_NAME)
            .and_then(|reference| reference.external_id.as_deref())
    }

    fn is_revoked(&self) -> bool {
        self.revoked
    }

    fn is_deprecated(&self) -> bool {
        self.deprecated
    }
}

/// Collect the live technique-id universe: revoked, deprecated, and id-less
/// records are dropped.
pub fn technique_universe<R: TechniqueRecord>(records: &[R]) -> BTreeSet<String> {
    records
        .iter()
        .filter(|record| !record.is_revoked() && !record.is_deprecated())
        .filter_map(|record| record.external_id())
        .map(str::to_string)
        .collect()
}
