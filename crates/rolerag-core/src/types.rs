//! Domain types shared by the index, ingest, and retrieval crates.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Access-partition label under which documents are indexed and queried.
///
/// The set is closed and known at configuration time; unknown names are
/// rejected rather than silently creating new partitions. Declaration order
/// is the enumeration order used for federated search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Engineering,
    Finance,
    Hr,
    Marketing,
    General,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::Engineering,
        Role::Finance,
        Role::Hr,
        Role::Marketing,
        Role::General,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Engineering => "engineering",
            Role::Finance => "finance",
            Role::Hr => "hr",
            Role::Marketing => "marketing",
            Role::General => "general",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "engineering" => Ok(Role::Engineering),
            "finance" => Ok(Role::Finance),
            "hr" => Ok(Role::Hr),
            "marketing" => Ok(Role::Marketing),
            "general" => Ok(Role::General),
            other => Err(Error::UnknownRole(other.to_string())),
        }
    }
}

/// Query scope: a single role, or a federated search across all of them.
///
/// "all" is search-only; mutating APIs take a concrete [`Role`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleScope {
    Role(Role),
    All,
}

impl fmt::Display for RoleScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoleScope::Role(role) => f.write_str(role.as_str()),
            RoleScope::All => f.write_str("all"),
        }
    }
}

impl FromStr for RoleScope {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            Ok(RoleScope::All)
        } else {
            s.parse::<Role>().map(RoleScope::Role)
        }
    }
}

/// Per-chunk metadata stored alongside the document text.
///
/// `(source, chunk_index)` is the stable identity of a chunk; the external
/// id string is derived from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMeta {
    pub source: String,
    pub role: Role,
    pub chunk_index: usize,
}

impl ChunkMeta {
    pub fn new(source: impl Into<String>, role: Role, chunk_index: usize) -> Self {
        Self { source: source.into(), role, chunk_index }
    }

    /// Stable external id, e.g. `docs/hr/policy.md::chunk_3`.
    pub fn chunk_id(&self) -> String {
        format!("{}::chunk_{}", self.source, self.chunk_index)
    }
}

/// One retrieved chunk. `score` is an inner-product similarity; higher is
/// more relevant, and it is not bounded to [0, 1].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub document: String,
    pub meta: ChunkMeta,
    pub score: f32,
}
