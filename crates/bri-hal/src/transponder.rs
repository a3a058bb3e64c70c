//! Transponder classification and per-model memory layouts.
//!
//! BRI inventory responses carry tag identifiers only, so everything known
//! about a tag's silicon comes from static tables: the transponder class the
//! reader is configured to inventory (EPC Class 1 Gen 2) and a per-model
//! lookup keyed by TID prefix describing the four Gen 2 memory banks.
//!
//! The model table is a read-only dependency injected into the reader at
//! construction, not process-wide state.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::observation::{MemoryBankDescriptor, MemoryDescriptor};

/// Transponder-class code the reader inventories by default.
pub const EPC_CLASS1_GEN2_CODE: u8 = 0x84;

/// Air-interface transponder class of an observed tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransponderType {
    /// EPCglobal Class 1 Generation 2 (ISO 18000-6C).
    EpcClass1Gen2,

    /// Anything this driver cannot classify.
    Unknown,
}

impl TransponderType {
    /// Classify a transponder-type code as reported by reader firmware.
    pub fn from_code(code: u8) -> Self {
        match code {
            EPC_CLASS1_GEN2_CODE => Self::EpcClass1Gen2,
            _ => Self::Unknown,
        }
    }
}

/// RF technology band of an observed tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RfTechnology {
    Uhf,
    Hf,
    Unknown,
}

impl RfTechnology {
    /// Derive the band from the transponder-type code. Gen 2 is UHF.
    pub fn from_code(code: u8) -> Self {
        match code {
            EPC_CLASS1_GEN2_CODE => Self::Uhf,
            _ => Self::Unknown,
        }
    }
}

/// Identifier encoding scheme of a tag id string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IdType {
    Epc,
}

/// Static memory-layout description of one EPC tag model.
///
/// Sizes are in bits. The four banks follow the Gen 2 memory map:
/// reserved (bank 00), EPC (01), TID (10), user (11).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpcTransponderModel {
    pub name: String,

    pub reserved_size: u32,
    pub reserved_readable: bool,
    pub reserved_writeable: bool,

    pub epc_size: u32,
    pub epc_readable: bool,
    pub epc_writeable: bool,

    pub tid_size: u32,
    pub tid_readable: bool,
    pub tid_writeable: bool,

    pub user_size: u32,
    pub user_readable: bool,
    pub user_writeable: bool,
}

impl EpcTransponderModel {
    /// The fallback model used when the TID matches nothing in the table.
    /// Conservative Gen 2 minimums: 96-bit EPC, readable TID, no user bank.
    pub fn unknown() -> Self {
        Self {
            name: "unknown".to_string(),
            reserved_size: 64,
            reserved_readable: true,
            reserved_writeable: true,
            epc_size: 96,
            epc_readable: true,
            epc_writeable: true,
            tid_size: 32,
            tid_readable: true,
            tid_writeable: false,
            user_size: 0,
            user_readable: false,
            user_writeable: false,
        }
    }

    /// The four-bank memory descriptor for this model.
    pub fn memory_descriptor(&self) -> MemoryDescriptor {
        MemoryDescriptor::new([
            MemoryBankDescriptor::new(
                self.reserved_size,
                self.reserved_readable,
                self.reserved_writeable,
            ),
            MemoryBankDescriptor::new(self.epc_size, self.epc_readable, self.epc_writeable),
            MemoryBankDescriptor::new(self.tid_size, self.tid_readable, self.tid_writeable),
            MemoryBankDescriptor::new(self.user_size, self.user_readable, self.user_writeable),
        ])
    }
}

/// Read-only table mapping TID prefixes to tag models.
#[derive(Debug, Clone)]
pub struct TransponderModels {
    by_tid_prefix: HashMap<Vec<u8>, EpcTransponderModel>,
    default_model: EpcTransponderModel,
}

impl TransponderModels {
    /// An empty table with the given fallback model.
    pub fn new(default_model: EpcTransponderModel) -> Self {
        Self {
            by_tid_prefix: HashMap::new(),
            default_model,
        }
    }

    /// A table preloaded with common Gen 2 silicon, keyed by the
    /// `E2` + mask-designer TID prefix.
    pub fn with_builtin() -> Self {
        let mut models = Self::new(EpcTransponderModel::unknown());

        models.insert(
            vec![0xE2, 0x00, 0x34],
            EpcTransponderModel {
                name: "NXP UCODE G2XM".to_string(),
                epc_size: 240,
                user_size: 512,
                user_readable: true,
                user_writeable: true,
                ..EpcTransponderModel::unknown()
            },
        );
        models.insert(
            vec![0xE2, 0x80, 0x11],
            EpcTransponderModel {
                name: "Impinj Monza 4D".to_string(),
                epc_size: 128,
                user_size: 32,
                user_readable: true,
                user_writeable: true,
                ..EpcTransponderModel::unknown()
            },
        );
        models.insert(
            vec![0xE2, 0x00, 0x38],
            EpcTransponderModel {
                name: "Alien Higgs-3".to_string(),
                epc_size: 96,
                user_size: 512,
                user_readable: true,
                user_writeable: true,
                ..EpcTransponderModel::unknown()
            },
        );

        models
    }

    /// Register a model under a TID prefix.
    pub fn insert(&mut self, tid_prefix: Vec<u8>, model: EpcTransponderModel) {
        self.by_tid_prefix.insert(tid_prefix, model);
    }

    /// Resolve the model for a TID, longest matching prefix first, falling
    /// back to the default model.
    pub fn model_for_tid(&self, tid: &[u8]) -> &EpcTransponderModel {
        self.by_tid_prefix
            .iter()
            .filter(|(prefix, _)| tid.starts_with(prefix))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(_, model)| model)
            .unwrap_or(&self.default_model)
    }

    /// Number of registered models, excluding the default.
    pub fn len(&self) -> usize {
        self.by_tid_prefix.len()
    }

    /// Whether no models are registered beyond the default.
    pub fn is_empty(&self) -> bool {
        self.by_tid_prefix.is_empty()
    }
}

impl Default for TransponderModels {
    fn default() -> Self {
        Self::with_builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_from_code() {
        assert_eq!(TransponderType::from_code(0x84), TransponderType::EpcClass1Gen2);
        assert_eq!(TransponderType::from_code(0x00), TransponderType::Unknown);
        assert_eq!(RfTechnology::from_code(0x84), RfTechnology::Uhf);
        assert_eq!(RfTechnology::from_code(0x12), RfTechnology::Unknown);
    }

    #[test]
    fn test_unknown_model_banks() {
        let memory = EpcTransponderModel::unknown().memory_descriptor();

        assert_eq!(memory.epc().size, 96);
        assert!(memory.tid().readable);
        assert!(!memory.tid().writeable);
        assert_eq!(memory.user().size, 0);
    }

    #[test]
    fn test_model_lookup_by_tid_prefix() {
        let models = TransponderModels::with_builtin();

        let model = models.model_for_tid(&[0xE2, 0x80, 0x11, 0x05, 0x20]);
        assert_eq!(model.name, "Impinj Monza 4D");
        assert_eq!(model.epc_size, 128);
    }

    #[test]
    fn test_unmatched_tid_falls_back_to_default() {
        let models = TransponderModels::with_builtin();

        let model = models.model_for_tid(&[0x00]);
        assert_eq!(model.name, "unknown");
    }

    #[test]
    fn test_longest_prefix_wins() {
        let mut models = TransponderModels::new(EpcTransponderModel::unknown());
        models.insert(
            vec![0xE2],
            EpcTransponderModel {
                name: "generic".to_string(),
                ..EpcTransponderModel::unknown()
            },
        );
        models.insert(
            vec![0xE2, 0x00],
            EpcTransponderModel {
                name: "specific".to_string(),
                ..EpcTransponderModel::unknown()
            },
        );

        assert_eq!(models.model_for_tid(&[0xE2, 0x00, 0x34]).name, "specific");
        assert_eq!(models.model_for_tid(&[0xE2, 0x80]).name, "generic");
    }
}
