pub mod line_service;

pub use crate::domain::line::Line;
pub use crate::domain::model::{LineId, Section, SectionId, Station, StationId, MAX_DISTANCE};
pub use crate::domain::ports::{LineHandle, LineRepository, StationRepository};
pub use crate::domain::sections::{SectionChain, SectionChainError};
pub use crate::utils::error::Result;
pub use line_service::LineService;
