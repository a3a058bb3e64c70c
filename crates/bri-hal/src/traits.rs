//! The hardware-abstraction contract consumed by the host framework.
//!
//! The host framework loads reader drivers behind this trait and negotiates
//! capabilities through the `supports_*` flags before calling the matching
//! operation. A driver must answer every operation; capabilities it does not
//! implement fail with [`HalError::Unsupported`] and must not touch the
//! device.
//!
//! Methods use native `async fn` (Edition 2024 RPITIT), so the trait is not
//! object-safe; hosts hold drivers behind generics or a driver enum.
//!
//! [`HalError::Unsupported`]: crate::HalError::Unsupported

#![allow(async_fn_in_trait)]

use std::time::Duration;

use crate::error::Result;
use crate::observation::Observation;

/// Trigger mode for asynchronous identify operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Poll continuously.
    Continuous,

    /// Poll once per period.
    Timer { period: Duration },
}

/// Reader driver surface exposed to the host framework.
pub trait HardwareAbstraction: Send + Sync {
    /// The configured name of this HAL instance.
    fn hal_name(&self) -> &str;

    /// Run one inventory cycle over the given read points, in order, and
    /// return one [`Observation`] per read point.
    ///
    /// # Errors
    ///
    /// [`HalError::ReadPointNotFound`] for an unconfigured name;
    /// [`HalError::Hardware`] if any poll fails, failing the whole call.
    ///
    /// [`HalError::ReadPointNotFound`]: crate::HalError::ReadPointNotFound
    /// [`HalError::Hardware`]: crate::HalError::Hardware
    async fn identify(&self, read_point_names: &[String]) -> Result<Vec<Observation>>;

    /// Tear down and rebuild the device connection.
    async fn reset(&self) -> Result<()>;

    /// Whether [`reset`](Self::reset) is implemented.
    fn supports_reset(&self) -> bool;

    /// The configured logical read point names, order unspecified.
    fn read_point_names(&self) -> Vec<String>;

    /// Case-insensitive test whether `name` is a configured read point.
    /// Performs no device I/O.
    fn is_read_point_ready(&self, name: &str) -> bool;

    /// Whether [`is_read_point_ready`](Self::is_read_point_ready) is
    /// implemented.
    fn supports_is_read_point_ready(&self) -> bool;

    /// Begin identifying continuously in the background.
    async fn start_asynchronous_identify(
        &self,
        read_point_names: &[String],
        trigger: Trigger,
    ) -> Result<()>;

    /// Stop a running asynchronous identify.
    async fn stop_asynchronous_identify(&self) -> Result<()>;

    /// Whether an asynchronous identify is currently running.
    async fn is_asynchronous_identify_running(&self) -> Result<bool>;

    /// Whether asynchronous identify is implemented.
    fn supports_asynchronous_identify(&self) -> bool;

    /// Read `length` bytes from a tag memory bank.
    async fn read_bytes(
        &self,
        read_point_name: &str,
        id: &str,
        memory_bank: u32,
        offset: u32,
        length: u32,
        passwords: &[String],
    ) -> Result<Vec<u8>>;

    /// Whether [`read_bytes`](Self::read_bytes) is implemented.
    fn supports_read_bytes(&self) -> bool;

    /// Write bytes into a tag memory bank.
    async fn write_bytes(
        &self,
        read_point_name: &str,
        id: &str,
        memory_bank: u32,
        offset: u32,
        data: &[u8],
        passwords: &[String],
    ) -> Result<()>;

    /// Whether [`write_bytes`](Self::write_bytes) is implemented.
    fn supports_write_bytes(&self) -> bool;

    /// Permanently disable a tag.
    async fn kill(&self, read_point_name: &str, id: &str, passwords: &[String]) -> Result<()>;

    /// Whether [`kill`](Self::kill) is implemented.
    fn supports_kill(&self) -> bool;

    /// Program a new identifier into a tag.
    async fn write_id(&self, read_point_name: &str, id: &str, passwords: &[String]) -> Result<()>;

    /// Whether [`write_id`](Self::write_id) is implemented.
    fn supports_write_id(&self) -> bool;

    /// Current transmit power at a read point.
    async fn get_read_point_power_level(
        &self,
        read_point_name: &str,
        normalize: bool,
    ) -> Result<i32>;

    /// Whether power-level queries are implemented.
    fn supports_get_read_point_power_level(&self) -> bool;

    /// Current noise level at a read point.
    async fn get_read_point_noise_level(
        &self,
        read_point_name: &str,
        normalize: bool,
    ) -> Result<i32>;

    /// Whether noise-level queries are implemented.
    fn supports_get_read_point_noise_level(&self) -> bool;

    /// Power up a read point.
    async fn start_up_read_point(&self, read_point_name: &str) -> Result<()>;

    /// Whether [`start_up_read_point`](Self::start_up_read_point) is
    /// implemented.
    fn supports_start_up_read_point(&self) -> bool;

    /// Power down a read point.
    async fn shut_down_read_point(&self, read_point_name: &str) -> Result<()>;

    /// Whether [`shut_down_read_point`](Self::shut_down_read_point) is
    /// implemented.
    fn supports_shut_down_read_point(&self) -> bool;

    /// Names of all configuration parameters this driver can report.
    fn get_all_parameter_names(&self) -> Result<Vec<String>>;

    /// Value of one configuration parameter.
    fn get_parameter(&self, name: &str) -> Result<String>;

    /// Change a runtime parameter. Drivers that cannot apply runtime
    /// changes accept and ignore the call.
    fn set_parameter(&self, name: &str, value: &str) -> Result<()>;

    /// Whether parameter reporting is implemented.
    fn supports_parameters(&self) -> bool;
}
