pub mod grid;
pub mod prices;

pub use grid::{DAY_AHEAD_PUBLICATION_HOUR, PriceGrid};
pub use prices::{PriceSeries, ROLLING_WINDOW};
