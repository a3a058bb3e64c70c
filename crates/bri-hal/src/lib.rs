//! Hardware-abstraction layer for Intermec-family BRI readers.
//!
//! This crate turns the serialized line-protocol client from `bri-client`
//! into the hardware-independent surface an RFID middleware host consumes:
//! logical read points resolved to physical antennas, per-read-point
//! inventory observations, and the capability-negotiated plugin contract.
//!
//! # Architecture
//!
//! ```text
//! Host framework
//!     │
//!     └─> HardwareAbstraction (trait)
//!             │
//!             └─> BriReader ──> BriClient ───(TCP/BRI)───> reader device
//!                     │
//!                     ├─> ReadPointMap      (name -> antennas)
//!                     └─> TransponderModels (TID -> memory layout)
//! ```
//!
//! # Example
//!
//! ```no_run
//! use bri_hal::{BriReader, HardwareAbstraction, ReaderConfig, TransponderModels};
//!
//! # async fn example() -> bri_hal::Result<()> {
//! let config: ReaderConfig = ReaderConfig {
//!     host: "10.2.4.217".to_string(),
//!     port: 2189,
//!     timeout_ms: 2000,
//!     read_points: vec![],
//! };
//!
//! let reader = BriReader::new("IntermecIF5", &config, TransponderModels::with_builtin())?;
//! reader.initialize().await?;
//!
//! let observations = reader.identify(&["Dock door".to_string()]).await?;
//! for obs in observations {
//!     println!("{}: {} tags", obs.read_point, obs.tag_ids.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod observation;
pub mod read_point;
pub mod reader;
pub mod traits;
pub mod transponder;

pub use config::{ReadPointConfig, ReaderConfig};
pub use error::{HalError, Result};
pub use observation::{
    InventoryItem, MemoryBankDescriptor, MemoryDescriptor, Observation, TagDescriptor,
};
pub use read_point::{MAX_READ_POINTS, ReadPoint, ReadPointMap};
pub use reader::BriReader;
pub use traits::{HardwareAbstraction, Trigger};
pub use transponder::{EpcTransponderModel, IdType, RfTechnology, TransponderModels, TransponderType};
