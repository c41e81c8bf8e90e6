use crate::app::dto::{LineRequest, LineUpdateRequest, SectionRequest, StationRequest};
use crate::config::Command;
use crate::core::{LineId, LineRepository, LineService, StationId, StationRepository};
use crate::utils::error::Result;
use serde_json::Value;

/// Run one CLI command. `None` means the command succeeded with nothing to show.
pub async fn execute<S, L>(service: &LineService<S, L>, command: &Command) -> Result<Option<Value>>
where
    S: StationRepository,
    L: LineRepository,
{
    let output = match command {
        Command::Stations => Some(serde_json::to_value(service.list_stations().await?)?),
        Command::AddStation { name } => {
            let request = StationRequest { name: name.clone() };
            Some(serde_json::to_value(service.create_station(request).await?)?)
        }
        Command::DeleteStation { id } => {
            service.delete_station(StationId(*id)).await?;
            None
        }
        Command::Lines => Some(serde_json::to_value(service.list_lines().await?)?),
        Command::ShowLine { id } => {
            Some(serde_json::to_value(service.find_line(LineId(*id)).await?)?)
        }
        Command::CreateLine {
            name,
            color,
            up,
            down,
            distance,
        } => {
            let request = LineRequest {
                name: name.clone(),
                color: color.clone(),
                up_station_id: StationId(*up),
                down_station_id: StationId(*down),
                distance: *distance,
            };
            Some(serde_json::to_value(service.create_line(request).await?)?)
        }
        Command::UpdateLine { id, name, color } => {
            let request = LineUpdateRequest {
                name: name.clone(),
                color: color.clone(),
            };
            Some(serde_json::to_value(service.update_line(LineId(*id), request).await?)?)
        }
        Command::DeleteLine { id } => {
            service.delete_line(LineId(*id)).await?;
            None
        }
        Command::AddSection {
            line,
            up,
            down,
            distance,
        } => {
            let request = SectionRequest {
                up_station_id: StationId(*up),
                down_station_id: StationId(*down),
                distance: *distance,
            };
            service.add_section(LineId(*line), request).await?;
            Some(serde_json::to_value(service.find_line(LineId(*line)).await?)?)
        }
        Command::RemoveSection { line, station } => {
            service.remove_section(LineId(*line), StationId(*station)).await?;
            Some(serde_json::to_value(service.find_line(LineId(*line)).await?)?)
        }
    };

    Ok(output)
}
