//! The BRI reader driver: inventory orchestration over the line client.
//!
//! [`BriReader`] resolves logical read points to antenna sets, polls each
//! one through the serialized [`BriClient`], and assembles the results into
//! per-read-point [`Observation`]s plus a shared snapshot of the tags seen
//! in the current cycle.
//!
//! # Concurrency
//!
//! Two mutexes provide all the safety there is:
//!
//! - the client's internal connection mutex serializes wire traffic, and
//! - the snapshot mutex here is held for a whole identify cycle, so two
//!   concurrent `identify` calls can never race on the clear-and-rebuild of
//!   the snapshot.
//!
//! Nothing is cancellable mid-flight; the per-line read timeout on the
//! client is the only bounded wait.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use bri_client::{BriClient, BriClientConfig};

use crate::config::ReaderConfig;
use crate::error::{HalError, Result};
use crate::observation::{InventoryItem, Observation, TagDescriptor};
use crate::read_point::{ReadPoint, ReadPointMap};
use crate::traits::{HardwareAbstraction, Trigger};
use crate::transponder::{
    EPC_CLASS1_GEN2_CODE, IdType, RfTechnology, TransponderModels, TransponderType,
};

/// Pause between consecutive read-point polls so the reader's command
/// processor is not overrun. A deliberate throttle, not configurable.
const POLL_PACING: Duration = Duration::from_millis(50);

/// Driver for one Intermec-family reader speaking BRI over TCP.
pub struct BriReader {
    hal_name: String,
    client: Arc<BriClient>,
    read_points: ReadPointMap,
    models: TransponderModels,

    /// Reported configuration, frozen at construction.
    parameters: HashMap<String, String>,

    /// Tags seen in the current identify cycle, keyed by tag id. Cleared at
    /// the start of every cycle; the mutex is held across a whole cycle.
    inventory: Mutex<HashMap<String, InventoryItem>>,
}

impl BriReader {
    /// Build a driver from configuration and an injected transponder model
    /// table. No connection is opened; call [`initialize`](Self::initialize)
    /// next.
    ///
    /// # Errors
    ///
    /// [`HalError::Configuration`] if the read-point configuration violates
    /// the one-read-point-per-antenna invariant or repeats a name.
    pub fn new(
        hal_name: impl Into<String>,
        config: &ReaderConfig,
        models: TransponderModels,
    ) -> Result<Self> {
        let hal_name = hal_name.into();
        let read_points = ReadPointMap::from_config(&config.read_points)?;

        let mut parameters = HashMap::new();
        parameters.insert("host".to_string(), config.host.clone());
        parameters.insert("port".to_string(), config.port.to_string());
        parameters.insert("timeout_ms".to_string(), config.timeout_ms.to_string());
        for rp in read_points.names() {
            let antennas = read_points
                .get(&rp)
                .map(|p| {
                    p.antennas()
                        .iter()
                        .map(|a| a.to_string())
                        .collect::<Vec<_>>()
                        .join(",")
                })
                .unwrap_or_default();
            parameters.insert(format!("read_point.{rp}.antennas"), antennas);
        }

        let client = Arc::new(BriClient::new(BriClientConfig {
            host: config.host.clone(),
            port: config.port,
            timeout: config.timeout(),
        }));

        info!(
            "Created BRI reader {:?} for {} with {} read point(s)",
            hal_name,
            client.addr(),
            read_points.len()
        );

        Ok(Self {
            hal_name,
            client,
            read_points,
            models,
            parameters,
            inventory: Mutex::new(HashMap::new()),
        })
    }

    /// Open the connection to the reader and drain its banner.
    ///
    /// # Errors
    ///
    /// [`HalError::Hardware`] wrapping the connect failure.
    pub async fn initialize(&self) -> Result<()> {
        info!("Trying to connect to {} ...", self.client.addr());

        self.client
            .connect()
            .await
            .map_err(|e| HalError::hardware("initialize", e))?;

        info!("Reader initialized");
        Ok(())
    }

    /// Whether the driver currently holds an open connection. No I/O.
    pub fn is_connected(&self) -> bool {
        self.client.is_connected()
    }

    /// The tags observed in the most recent identify cycle.
    pub async fn current_inventory(&self) -> Vec<InventoryItem> {
        self.inventory.lock().await.values().cloned().collect()
    }

    /// The read point owning the given physical antenna, if any.
    pub fn read_point_for_antenna(&self, antenna: u16) -> Option<&str> {
        self.read_points.read_point_for_antenna(antenna)
    }

    /// Poll one read point and wrap the returned tag ids into inventory
    /// items.
    ///
    /// A disconnected client yields an empty inventory rather than an
    /// error, and so does a response without tag data. Must only be called
    /// while the snapshot mutex is held: the caller owns the cycle.
    async fn poll_read_point(&self, read_point: &ReadPoint) -> Result<Vec<InventoryItem>> {
        if !self.client.is_connected() {
            warn!(
                "Not connected, returning empty inventory for {:?}",
                read_point.name()
            );
            return Ok(Vec::new());
        }

        let command = read_point.inventory_command();
        let tag_ids = self
            .client
            .send_inventory_request(&command)
            .await
            .map_err(|e| HalError::hardware("get_inventory", e))?;

        let Some(tag_ids) = tag_ids else {
            debug!("No tag data for {:?}", read_point.name());
            return Ok(Vec::new());
        };

        debug!("Inventory size for {:?}: {}", read_point.name(), tag_ids.len());

        let items = tag_ids
            .into_iter()
            .map(|id| {
                // BRI inventory responses carry no TID; the placeholder
                // resolves to the table's default model.
                let tid = vec![0x00];
                let model = self.models.model_for_tid(&tid).clone();

                InventoryItem {
                    id,
                    transponder_type: TransponderType::from_code(EPC_CLASS1_GEN2_CODE),
                    rf_technology: RfTechnology::from_code(EPC_CLASS1_GEN2_CODE),
                    tid,
                    model,
                    read_point: read_point.name().to_string(),
                }
            })
            .collect();

        // Give the reader's command processor room before the next poll.
        tokio::time::sleep(POLL_PACING).await;

        Ok(items)
    }

    fn unsupported<T>(operation: &str) -> Result<T> {
        Err(HalError::unsupported(operation))
    }
}

impl HardwareAbstraction for BriReader {
    fn hal_name(&self) -> &str {
        &self.hal_name
    }

    async fn identify(&self, read_point_names: &[String]) -> Result<Vec<Observation>> {
        // Held for the whole cycle: serializes concurrent identify calls
        // and keeps the clear-and-rebuild of the snapshot atomic.
        let mut inventory = self.inventory.lock().await;
        inventory.clear();

        let mut observations = Vec::with_capacity(read_point_names.len());

        for name in read_point_names {
            let read_point = self
                .read_points
                .get(name)
                .ok_or_else(|| HalError::ReadPointNotFound(name.clone()))?;

            let items = self.poll_read_point(read_point).await?;

            let mut tag_ids = Vec::with_capacity(items.len());
            let mut descriptors = Vec::with_capacity(items.len());

            for item in items {
                if item.transponder_type == TransponderType::EpcClass1Gen2 {
                    descriptors.push(TagDescriptor {
                        id_type: IdType::Epc,
                        memory: item.model.memory_descriptor(),
                    });
                }

                tag_ids.push(item.id.clone());
                // Later read points overwrite earlier entries for the same
                // tag: last write wins.
                inventory.insert(item.id.clone(), item);
            }

            let tag_descriptors = (descriptors.len() == tag_ids.len()).then_some(descriptors);

            observations.push(Observation {
                hal_name: self.hal_name.clone(),
                read_point: name.clone(),
                tag_ids,
                tag_descriptors,
                timestamp: Utc::now(),
            });
        }

        Ok(observations)
    }

    async fn reset(&self) -> Result<()> {
        self.client.reconnect().await.map_err(|e| {
            warn!("Reset failed, reader left disconnected: {}", e);
            HalError::hardware("reset", e)
        })
    }

    fn supports_reset(&self) -> bool {
        true
    }

    fn read_point_names(&self) -> Vec<String> {
        self.read_points.names()
    }

    fn is_read_point_ready(&self, name: &str) -> bool {
        self.read_points.contains_ignore_case(name)
    }

    fn supports_is_read_point_ready(&self) -> bool {
        true
    }

    async fn start_asynchronous_identify(
        &self,
        _read_point_names: &[String],
        _trigger: Trigger,
    ) -> Result<()> {
        Self::unsupported("start_asynchronous_identify")
    }

    async fn stop_asynchronous_identify(&self) -> Result<()> {
        Self::unsupported("stop_asynchronous_identify")
    }

    async fn is_asynchronous_identify_running(&self) -> Result<bool> {
        Ok(false)
    }

    fn supports_asynchronous_identify(&self) -> bool {
        false
    }

    async fn read_bytes(
        &self,
        _read_point_name: &str,
        _id: &str,
        _memory_bank: u32,
        _offset: u32,
        _length: u32,
        _passwords: &[String],
    ) -> Result<Vec<u8>> {
        Self::unsupported("read_bytes")
    }

    fn supports_read_bytes(&self) -> bool {
        false
    }

    async fn write_bytes(
        &self,
        _read_point_name: &str,
        _id: &str,
        _memory_bank: u32,
        _offset: u32,
        _data: &[u8],
        _passwords: &[String],
    ) -> Result<()> {
        Self::unsupported("write_bytes")
    }

    fn supports_write_bytes(&self) -> bool {
        false
    }

    async fn kill(&self, _read_point_name: &str, _id: &str, _passwords: &[String]) -> Result<()> {
        Self::unsupported("kill")
    }

    fn supports_kill(&self) -> bool {
        false
    }

    async fn write_id(
        &self,
        _read_point_name: &str,
        _id: &str,
        _passwords: &[String],
    ) -> Result<()> {
        Self::unsupported("write_id")
    }

    fn supports_write_id(&self) -> bool {
        false
    }

    async fn get_read_point_power_level(
        &self,
        _read_point_name: &str,
        _normalize: bool,
    ) -> Result<i32> {
        Self::unsupported("get_read_point_power_level")
    }

    fn supports_get_read_point_power_level(&self) -> bool {
        false
    }

    async fn get_read_point_noise_level(
        &self,
        _read_point_name: &str,
        _normalize: bool,
    ) -> Result<i32> {
        Self::unsupported("get_read_point_noise_level")
    }

    fn supports_get_read_point_noise_level(&self) -> bool {
        false
    }

    async fn start_up_read_point(&self, _read_point_name: &str) -> Result<()> {
        Self::unsupported("start_up_read_point")
    }

    fn supports_start_up_read_point(&self) -> bool {
        false
    }

    async fn shut_down_read_point(&self, _read_point_name: &str) -> Result<()> {
        Self::unsupported("shut_down_read_point")
    }

    fn supports_shut_down_read_point(&self) -> bool {
        false
    }

    fn get_all_parameter_names(&self) -> Result<Vec<String>> {
        Ok(self.parameters.keys().cloned().collect())
    }

    fn get_parameter(&self, name: &str) -> Result<String> {
        self.parameters
            .get(name)
            .cloned()
            .ok_or_else(|| HalError::UnknownParameter(name.to_string()))
    }

    fn set_parameter(&self, _name: &str, _value: &str) -> Result<()> {
        // Runtime parameter changes are not supported by this reader
        // family; the call is accepted and ignored.
        Ok(())
    }

    fn supports_parameters(&self) -> bool {
        true
    }
}
