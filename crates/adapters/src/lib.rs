//! Swap Adapters
//!
//! Provider registry and built-in collaborators for the swap engine.

pub mod fixed_rate;
pub mod registry;
pub mod static_prices;
pub mod static_settings;

pub use fixed_rate::FixedRateProvider;
pub use registry::ProviderRegistry;
pub use static_prices::StaticPriceSource;
pub use static_settings::StaticSettingsProvider;
pub use swap_types::{ProviderError, ProviderResult, SwapProvider};
