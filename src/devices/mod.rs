//! Battery model and synthetic generation/demand sources.

/// Stationary battery storage model.
pub mod battery;
/// Constant-output biogas plant.
pub mod biogas;
/// Residential community demand generator.
pub mod demand;
pub mod profile;
/// Solar park generation model.
pub mod solar;
pub mod types;
/// Wind farm generation model.
pub mod wind;

// Re-export the main types for convenience
pub use battery::{Battery, Exchange};
pub use biogas::BiogasChp;
pub use demand::CommunityDemand;
pub use solar::SolarPark;
pub use types::Device;
pub use types::DeviceContext;
pub use wind::WindFarm;
