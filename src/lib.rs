pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};

pub use adapters::{InMemoryLineRepository, InMemoryStationRepository};
pub use config::network::NetworkConfig;
pub use self::core::{line_service::LineService, SectionChain, SectionChainError};
pub use utils::error::{RejectionStatus, Result, SubwayError};
