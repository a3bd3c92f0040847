pub mod config;
pub mod errors;
pub mod terrain;

// Selective re-exports for external consumers

pub use config::Config;
pub use errors::{LandscapeError, LandscapeResult};
pub use terrain::Landscape;
pub use terrain::coordinates::Coordinate;
pub use terrain::grid::Square;
