//! Inventory observations and the tag metadata attached to them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::transponder::{EpcTransponderModel, IdType, RfTechnology, TransponderType};

/// One Gen 2 memory bank: size in bits plus access capability flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryBankDescriptor {
    pub size: u32,
    pub readable: bool,
    pub writeable: bool,
}

impl MemoryBankDescriptor {
    pub fn new(size: u32, readable: bool, writeable: bool) -> Self {
        Self {
            size,
            readable,
            writeable,
        }
    }
}

/// The four fixed Gen 2 memory banks of one tag model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryDescriptor {
    banks: [MemoryBankDescriptor; 4],
}

impl MemoryDescriptor {
    /// Banks in Gen 2 order: reserved, EPC, TID, user.
    pub fn new(banks: [MemoryBankDescriptor; 4]) -> Self {
        Self { banks }
    }

    pub fn reserved(&self) -> &MemoryBankDescriptor {
        &self.banks[0]
    }

    pub fn epc(&self) -> &MemoryBankDescriptor {
        &self.banks[1]
    }

    pub fn tid(&self) -> &MemoryBankDescriptor {
        &self.banks[2]
    }

    pub fn user(&self) -> &MemoryBankDescriptor {
        &self.banks[3]
    }
}

/// Per-tag descriptor handed to the host alongside the tag id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagDescriptor {
    pub id_type: IdType,
    pub memory: MemoryDescriptor,
}

/// One observed tag at one instant.
///
/// Created per poll cycle and owned by that poll until handed to the
/// inventory snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct InventoryItem {
    /// Tag identifier in the reader's hex encoding.
    pub id: String,

    /// Transponder class of the tag.
    pub transponder_type: TransponderType,

    /// RF band the tag was read on.
    pub rf_technology: RfTechnology,

    /// Raw TID bytes. BRI inventory responses do not carry the TID, so this
    /// is a single zero byte unless a later memory read fills it in.
    pub tid: Vec<u8>,

    /// Memory-layout model resolved from the TID.
    pub model: EpcTransponderModel,

    /// Name of the read point that produced the observation.
    pub read_point: String,
}

/// Per-read-point result of one identify cycle. Ownership transfers to the
/// caller.
#[derive(Debug, Clone, Serialize)]
pub struct Observation {
    /// Name of the HAL instance that produced this observation.
    pub hal_name: String,

    /// The logical read point polled.
    pub read_point: String,

    /// Tag identifiers seen at this read point, in response order.
    pub tag_ids: Vec<String>,

    /// Per-tag memory-layout descriptors, parallel to `tag_ids`. Present
    /// only when every tag in the list has a descriptor-bearing class.
    pub tag_descriptors: Option<Vec<TagDescriptor>>,

    /// Wall-clock capture time.
    pub timestamp: DateTime<Utc>,
}

impl Observation {
    /// Whether the given tag id was seen at this read point.
    pub fn contains_tag(&self, id: &str) -> bool {
        self.tag_ids.iter().any(|t| t == id)
    }

    /// Number of tags observed.
    pub fn len(&self) -> usize {
        self.tag_ids.len()
    }

    /// Whether no tags were observed.
    pub fn is_empty(&self) -> bool {
        self.tag_ids.is_empty()
    }
}
