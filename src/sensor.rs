//! Resource implementations for the supported devices.
//!
//! Each module pairs a driver trait (the hardware seam) with a resource
//! type implementing [`crate::resource::Resource`]. Per-device cargo
//! features let a build carry only the devices its board actually has.

#[cfg(feature = "sensor-adxl335")]
pub mod adxl335;
#[cfg(feature = "sensor-bme280")]
pub mod bme280;
#[cfg(feature = "sensor-hx711")]
pub mod hx711;
#[cfg(feature = "sensor-mq6")]
pub mod mq6;
#[cfg(feature = "sensor-opt3001")]
pub mod opt3001;
#[cfg(feature = "sensor-relay")]
pub mod relay;

#[cfg(feature = "sensor-adxl335")]
pub use self::adxl335::Adxl335;
#[cfg(feature = "sensor-bme280")]
pub use self::bme280::Bme280;
#[cfg(feature = "sensor-hx711")]
pub use self::hx711::Hx711;
#[cfg(feature = "sensor-mq6")]
pub use self::mq6::Mq6;
#[cfg(feature = "sensor-opt3001")]
pub use self::opt3001::Opt3001;
#[cfg(feature = "sensor-relay")]
pub use self::relay::Relay;
