//! Photo groups shared by the distance and burst groupers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Category of a group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroupKind {
    /// Perceptual hashes within the duplicate band
    Duplicate,
    /// Perceptual hashes within the similar band
    Similar,
    /// Modification times within the burst window
    Burst,
}

impl GroupKind {
    /// Prefix of the group id, e.g. `DUP` in `DUP-3`
    pub fn prefix(&self) -> &'static str {
        match self {
            GroupKind::Duplicate => "DUP",
            GroupKind::Similar => "SIM",
            GroupKind::Burst => "BURST",
        }
    }

    /// Name used in the report's Type column
    pub fn label(&self) -> &'static str {
        match self {
            GroupKind::Duplicate => "Duplicate",
            GroupKind::Similar => "Similar",
            GroupKind::Burst => "Burst",
        }
    }
}

impl fmt::Display for GroupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An ordered group of at least two photos. The first member is the anchor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoGroup {
    pub kind: GroupKind,
    /// 1-based position among groups of the same kind
    pub number: usize,
    pub members: Vec<PathBuf>,
}

impl PhotoGroup {
    pub fn new(kind: GroupKind, number: usize, members: Vec<PathBuf>) -> Self {
        Self {
            kind,
            number,
            members,
        }
    }

    /// Group id such as `DUP-1`, `SIM-2` or `BURST-3`
    pub fn id(&self) -> String {
        format!("{}-{}", self.kind.prefix(), self.number)
    }

    /// The keep candidate
    pub fn anchor(&self) -> &Path {
        &self.members[0]
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
