use crate::domain::line::Line;
use crate::domain::model::{LineId, SectionId, Station, StationId};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Exclusive access to one line. Writers hold the guard for a whole
/// validate-and-apply step, so readers only ever see committed chains.
pub type LineHandle = Arc<RwLock<Line>>;

#[async_trait]
pub trait StationRepository: Send + Sync {
    async fn save(&self, name: &str) -> Result<Station>;
    /// Store a station that already has an id, e.g. when loading a network file.
    async fn restore(&self, station: Station) -> Result<()>;
    async fn find_by_id(&self, id: StationId) -> Result<Option<Station>>;
    async fn find_all(&self) -> Result<Vec<Station>>;
    async fn delete(&self, id: StationId) -> Result<bool>;
}

#[async_trait]
pub trait LineRepository: Send + Sync {
    fn next_line_id(&self) -> LineId;
    fn next_section_id(&self) -> SectionId;
    async fn save(&self, line: Line) -> Result<LineHandle>;
    async fn find_by_id(&self, id: LineId) -> Result<Option<LineHandle>>;
    /// All lines, ordered by id.
    async fn find_all(&self) -> Result<Vec<LineHandle>>;
    async fn delete(&self, id: LineId) -> Result<bool>;
}
