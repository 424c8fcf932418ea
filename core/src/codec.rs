//! Persistent encoding of a [`Trails`] tree
//!
//! The tree is stored as nested records:
//!
//! ```json
//! {"version": 1, "main": [[1, 1], [3, 1]], "branches": [{"version": 1, ...}]}
//! ```
//!
//! Every level carries the version. Decoding rebuilds the tree branch by
//! branch, so a record that breaks the tree rules is rejected and sibling
//! order is re-established.

use serde::{Deserialize, Serialize};

use crate::error::{MazeError, Result};
use crate::geometry::Route;
use crate::trails::Trails;

/// Current encoding version
pub const ENCODING_VERSION: u32 = 1;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrailsRecord {
    pub version: u32,
    pub main: Route,
    #[serde(default)]
    pub branches: Vec<TrailsRecord>,
}

/// Snapshot a tree into its record form
pub fn encode(trails: &Trails) -> TrailsRecord {
    TrailsRecord {
        version: ENCODING_VERSION,
        main: trails.main().to_vec(),
        branches: trails.branches().iter().map(encode).collect(),
    }
}

/// Rebuild a tree from its record form
pub fn decode(record: TrailsRecord) -> Result<Trails> {
    if record.version != ENCODING_VERSION {
        return Err(MazeError::VersionMismatch {
            found: record.version,
            expected: ENCODING_VERSION,
        });
    }
    let mut trails = Trails::new(record.main);
    for branch in record.branches {
        trails.add_branch(decode(branch)?)?;
    }
    Ok(trails)
}

pub fn to_json(trails: &Trails) -> Result<String> {
    Ok(serde_json::to_string(&encode(trails))?)
}

pub fn from_json(json: &str) -> Result<Trails> {
    decode(serde_json::from_str(json)?)
}

impl From<Trails> for TrailsRecord {
    fn from(trails: Trails) -> Self {
        encode(&trails)
    }
}

impl TryFrom<TrailsRecord> for Trails {
    type Error = MazeError;

    fn try_from(record: TrailsRecord) -> Result<Self> {
        decode(record)
    }
}
