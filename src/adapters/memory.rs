//! In-memory repositories.
//!
//! The line index sits behind its own lock that is held only to look up or
//! insert a handle; each line then carries its own lock, so mutations on
//! different lines never wait on each other.

use crate::domain::line::Line;
use crate::domain::model::{LineId, SectionId, Station, StationId};
use crate::domain::ports::{LineHandle, LineRepository, StationRepository};
use crate::utils::error::{Result, SubwayError};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Clone, Default)]
pub struct InMemoryStationRepository {
    stations: Arc<RwLock<BTreeMap<StationId, Station>>>,
    next_id: Arc<AtomicU64>,
}

impl InMemoryStationRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StationRepository for InMemoryStationRepository {
    async fn save(&self, name: &str) -> Result<Station> {
        let id = StationId(self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        let station = Station::new(id, name);
        self.stations.write().await.insert(id, station.clone());
        Ok(station)
    }

    async fn restore(&self, station: Station) -> Result<()> {
        let mut stations = self.stations.write().await;
        if stations.contains_key(&station.id) {
            return Err(SubwayError::validation(format!(
                "station id {} is already taken",
                station.id
            )));
        }
        self.next_id.fetch_max(station.id.value(), Ordering::SeqCst);
        stations.insert(station.id, station);
        Ok(())
    }

    async fn find_by_id(&self, id: StationId) -> Result<Option<Station>> {
        Ok(self.stations.read().await.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Station>> {
        Ok(self.stations.read().await.values().cloned().collect())
    }

    async fn delete(&self, id: StationId) -> Result<bool> {
        Ok(self.stations.write().await.remove(&id).is_some())
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryLineRepository {
    lines: Arc<RwLock<BTreeMap<LineId, LineHandle>>>,
    next_line_id: Arc<AtomicU64>,
    next_section_id: Arc<AtomicU64>,
}

impl InMemoryLineRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LineRepository for InMemoryLineRepository {
    fn next_line_id(&self) -> LineId {
        LineId(self.next_line_id.fetch_add(1, Ordering::SeqCst) + 1)
    }

    fn next_section_id(&self) -> SectionId {
        SectionId(self.next_section_id.fetch_add(1, Ordering::SeqCst) + 1)
    }

    async fn save(&self, line: Line) -> Result<LineHandle> {
        let mut lines = self.lines.write().await;
        if lines.contains_key(&line.id()) {
            return Err(SubwayError::validation(format!(
                "line id {} is already taken",
                line.id()
            )));
        }

        // Lines restored from a file bring their own ids.
        self.next_line_id.fetch_max(line.id().value(), Ordering::SeqCst);
        if let Some(max_section) = line.sections().sections().map(|s| s.id().value()).max() {
            self.next_section_id.fetch_max(max_section, Ordering::SeqCst);
        }

        let id = line.id();
        let handle = Arc::new(RwLock::new(line));
        lines.insert(id, Arc::clone(&handle));
        Ok(handle)
    }

    async fn find_by_id(&self, id: LineId) -> Result<Option<LineHandle>> {
        Ok(self.lines.read().await.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<LineHandle>> {
        Ok(self.lines.read().await.values().cloned().collect())
    }

    async fn delete(&self, id: LineId) -> Result<bool> {
        Ok(self.lines.write().await.remove(&id).is_some())
    }
}
