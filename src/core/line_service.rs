use crate::app::dto::{
    LineRequest, LineResponse, LineUpdateRequest, SectionRequest, SectionResponse,
    StationRequest, StationResponse,
};
use crate::domain::line::Line;
use crate::domain::model::{LineId, Section, Station, StationId};
use crate::domain::ports::{LineHandle, LineRepository, StationRepository};
use crate::domain::sections::SectionChainError;
use crate::utils::error::{Result, SubwayError};
use crate::utils::validation::Validate;
use tokio::sync::Mutex;

/// Line management on top of the station and line repositories.
///
/// Station ids are resolved here, before anything reaches a line's section
/// chain, so a missing station is reported as `StationNotFound` and never as a
/// chain rejection.
///
/// Section mutations resolve their stations while holding the line's write
/// guard, and `delete_station` holds every line's read guard while it checks
/// usage. Line creation, renames and station deletion also run under one
/// registry lock, so line names stay unique and a new line never references a
/// station deleted in the meantime. The registry lock is always taken before
/// any line guard.
pub struct LineService<S: StationRepository, L: LineRepository> {
    stations: S,
    lines: L,
    registry: Mutex<()>,
}

impl<S: StationRepository, L: LineRepository> LineService<S, L> {
    pub fn new(stations: S, lines: L) -> Self {
        Self {
            stations,
            lines,
            registry: Mutex::new(()),
        }
    }

    pub async fn create_station(&self, request: StationRequest) -> Result<StationResponse> {
        request.validate()?;

        let station = self.stations.save(request.name.trim()).await?;
        tracing::info!("Created station {} ({})", station.id, station.name);
        Ok(station.into())
    }

    pub async fn list_stations(&self) -> Result<Vec<StationResponse>> {
        let stations = self.stations.find_all().await?;
        Ok(stations.into_iter().map(StationResponse::from).collect())
    }

    pub async fn delete_station(&self, id: StationId) -> Result<()> {
        let _registry = self.registry.lock().await;
        self.find_station(id).await?;

        let handles = self.lines.find_all().await?;
        let mut guards = Vec::with_capacity(handles.len());
        for handle in &handles {
            let line = handle.read().await;
            if line.contains(id) {
                tracing::warn!("Refusing to delete station {}: used by line {}", id, line.id());
                return Err(SubwayError::StationInUse {
                    id,
                    line_id: line.id(),
                });
            }
            guards.push(line);
        }

        self.stations.delete(id).await?;
        tracing::info!("Deleted station {}", id);
        Ok(())
    }

    pub async fn create_line(&self, request: LineRequest) -> Result<LineResponse> {
        request.validate()?;
        let name = request.name.trim().to_string();

        let registry = self.registry.lock().await;
        self.ensure_unique_name(&name, None).await?;

        self.find_station(request.up_station_id).await?;
        self.find_station(request.down_station_id).await?;

        let initial = Section::new(
            self.lines.next_section_id(),
            request.up_station_id,
            request.down_station_id,
            request.distance,
        )?;
        let line = Line::new(self.lines.next_line_id(), name, request.color, initial);
        let handle = self.lines.save(line).await?;
        drop(registry);

        let line = handle.read().await;
        tracing::info!(
            "Created line {} ({}) from station {} to {}, distance {}",
            line.id(),
            line.name(),
            request.up_station_id,
            request.down_station_id,
            line.total_distance()
        );
        self.render(&line).await
    }

    pub async fn list_lines(&self) -> Result<Vec<LineResponse>> {
        let mut responses = Vec::new();
        for handle in self.lines.find_all().await? {
            let line = handle.read().await;
            responses.push(self.render(&line).await?);
        }
        Ok(responses)
    }

    pub async fn find_line(&self, id: LineId) -> Result<LineResponse> {
        let handle = self.find_handle(id).await?;
        let line = handle.read().await;
        self.render(&line).await
    }

    pub async fn update_line(
        &self,
        id: LineId,
        request: LineUpdateRequest,
    ) -> Result<LineResponse> {
        request.validate()?;
        let name = request.name.trim().to_string();

        let _registry = self.registry.lock().await;
        let handle = self.find_handle(id).await?;
        self.ensure_unique_name(&name, Some(id)).await?;

        let mut line = handle.write().await;
        line.update(name, request.color);
        tracing::info!("Updated line {} to {} ({})", id, line.name(), line.color());

        self.render(&line).await
    }

    pub async fn delete_line(&self, id: LineId) -> Result<()> {
        if !self.lines.delete(id).await? {
            return Err(SubwayError::LineNotFound { id });
        }
        tracing::info!("Deleted line {} and its sections", id);
        Ok(())
    }

    pub async fn add_section(
        &self,
        line_id: LineId,
        request: SectionRequest,
    ) -> Result<SectionResponse> {
        request.validate()?;

        let handle = self.find_handle(line_id).await?;
        let mut line = handle.write().await;

        self.find_station(request.up_station_id).await?;
        self.find_station(request.down_station_id).await?;

        let section_id = self.lines.next_section_id();
        if let Err(e) = line.add_section(
            section_id,
            request.up_station_id,
            request.down_station_id,
            request.distance,
        ) {
            tracing::warn!("Rejected section for line {}: {}", line_id, e);
            return Err(e.into());
        }

        let section = line
            .find_section(request.up_station_id, request.down_station_id)
            .ok_or_else(|| SectionChainError::BrokenChain {
                reason: format!("section {} missing right after insert", section_id),
            })?;
        tracing::info!(
            "Added section {} ({} -> {}) to line {}: {} sections, distance {}",
            section.id(),
            section.up_station_id(),
            section.down_station_id(),
            line_id,
            line.sections().section_count(),
            line.total_distance()
        );

        Ok(SectionResponse::new(line_id, section))
    }

    pub async fn remove_section(&self, line_id: LineId, station_id: StationId) -> Result<()> {
        let handle = self.find_handle(line_id).await?;
        let mut line = handle.write().await;

        self.find_station(station_id).await?;

        match line.remove_section(station_id) {
            Ok(removed) => {
                tracing::info!(
                    "Removed section {} from line {}: down terminus is now {}, distance {}",
                    removed.id(),
                    line_id,
                    line.sections().down_terminus(),
                    line.total_distance()
                );
                Ok(())
            }
            Err(e) => {
                tracing::warn!(
                    "Rejected removal of station {} from line {}: {}",
                    station_id,
                    line_id,
                    e
                );
                Err(e.into())
            }
        }
    }

    /// Consistent copies of all stations and lines, for writing the network back out.
    pub async fn export(&self) -> Result<(Vec<Station>, Vec<Line>)> {
        let stations = self.stations.find_all().await?;
        let mut lines = Vec::new();
        for handle in self.lines.find_all().await? {
            lines.push(handle.read().await.clone());
        }
        Ok((stations, lines))
    }

    async fn find_station(&self, id: StationId) -> Result<Station> {
        tracing::debug!("Resolving station {}", id);
        self.stations
            .find_by_id(id)
            .await?
            .ok_or(SubwayError::StationNotFound { id })
    }

    async fn find_handle(&self, id: LineId) -> Result<LineHandle> {
        tracing::debug!("Resolving line {}", id);
        self.lines
            .find_by_id(id)
            .await?
            .ok_or(SubwayError::LineNotFound { id })
    }

    async fn ensure_unique_name(&self, name: &str, except: Option<LineId>) -> Result<()> {
        for handle in self.lines.find_all().await? {
            let line = handle.read().await;
            if except != Some(line.id()) && line.name() == name {
                return Err(SubwayError::DuplicateLineName {
                    name: name.to_string(),
                });
            }
        }
        Ok(())
    }

    async fn render(&self, line: &Line) -> Result<LineResponse> {
        let mut stations = Vec::with_capacity(line.sections().section_count() + 1);
        for id in line.ordered_station_ids() {
            stations.push(self.find_station(id).await?);
        }
        Ok(LineResponse::new(line, stations))
    }
}
