use crate::domain::line::Line;
use crate::domain::model::{LineId, Section, SectionId, Station, StationId, MAX_DISTANCE};
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_max_length, validate_max_number, validate_non_empty_string,
    validate_positive_number, Validate,
};
use serde::{Deserialize, Serialize};

const MAX_NAME_LENGTH: usize = 255;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationRequest {
    pub name: String,
}

impl Validate for StationRequest {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("name", &self.name)?;
        validate_max_length("name", &self.name, MAX_NAME_LENGTH)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationResponse {
    pub id: StationId,
    pub name: String,
}

impl From<Station> for StationResponse {
    fn from(station: Station) -> Self {
        Self {
            id: station.id,
            name: station.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineRequest {
    pub name: String,
    pub color: String,
    pub up_station_id: StationId,
    pub down_station_id: StationId,
    pub distance: u64,
}

impl Validate for LineRequest {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("name", &self.name)?;
        validate_max_length("name", &self.name, MAX_NAME_LENGTH)?;
        validate_non_empty_string("color", &self.color)?;
        validate_positive_number("distance", self.distance, 1)?;
        validate_max_number("distance", self.distance, MAX_DISTANCE)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineUpdateRequest {
    pub name: String,
    pub color: String,
}

impl Validate for LineUpdateRequest {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("name", &self.name)?;
        validate_max_length("name", &self.name, MAX_NAME_LENGTH)?;
        validate_non_empty_string("color", &self.color)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineResponse {
    pub id: LineId,
    pub name: String,
    pub color: String,
    pub stations: Vec<StationResponse>,
    pub distance: u64,
}

impl LineResponse {
    /// `stations` must already be resolved in path order.
    pub fn new(line: &Line, stations: Vec<Station>) -> Self {
        Self {
            id: line.id(),
            name: line.name().to_string(),
            color: line.color().to_string(),
            stations: stations.into_iter().map(StationResponse::from).collect(),
            distance: line.total_distance(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionRequest {
    pub up_station_id: StationId,
    pub down_station_id: StationId,
    pub distance: u64,
}

impl Validate for SectionRequest {
    fn validate(&self) -> Result<()> {
        validate_positive_number("distance", self.distance, 1)?;
        validate_max_number("distance", self.distance, MAX_DISTANCE)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionResponse {
    pub id: SectionId,
    pub line_id: LineId,
    pub up_station_id: StationId,
    pub down_station_id: StationId,
    pub distance: u64,
}

impl SectionResponse {
    pub fn new(line_id: LineId, section: &Section) -> Self {
        Self {
            id: section.id(),
            line_id,
            up_station_id: section.up_station_id(),
            down_station_id: section.down_station_id(),
            distance: section.distance(),
        }
    }
}
