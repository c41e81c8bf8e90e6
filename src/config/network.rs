use crate::adapters::{InMemoryLineRepository, InMemoryStationRepository};
use crate::core::{
    Line, LineId, LineRepository, LineService, Section, SectionChain, SectionId, Station,
    StationId, StationRepository, MAX_DISTANCE,
};
use crate::utils::error::{RejectionStatus, Result, SubwayError};
use crate::utils::validation::{
    validate_max_number, validate_non_empty_string, validate_positive_number, Validate,
};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A whole subway network as stored on disk.
///
/// ```toml
/// [settings]
/// rejection_status = "distinct"
///
/// [[stations]]
/// id = 1
/// name = "신사역"
///
/// [[lines]]
/// id = 1
/// name = "신분당선"
/// color = "bg-red-600"
///
/// [[lines.sections]]
/// up_station_id = 1
/// down_station_id = 2
/// distance = 10
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    #[serde(default)]
    pub settings: SettingsConfig,
    #[serde(default)]
    pub stations: Vec<StationConfig>,
    #[serde(default)]
    pub lines: Vec<LineConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettingsConfig {
    #[serde(default)]
    pub rejection_status: RejectionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationConfig {
    pub id: StationId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineConfig {
    pub id: LineId,
    pub name: String,
    pub color: String,
    pub sections: Vec<SectionConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<SectionId>,
    pub up_station_id: StationId,
    pub down_station_id: StationId,
    pub distance: u64,
}

pub type InMemoryLineService = LineService<InMemoryStationRepository, InMemoryLineRepository>;

impl NetworkConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(SubwayError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Parse a network, expanding `${VAR}` references from the environment first.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| SubwayError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| SubwayError::ConfigValidationError {
            field: "env_substitution".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }

    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = self.to_toml_string()?;
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn log_level(&self) -> Option<&str> {
        self.settings.log_level.as_deref()
    }

    /// Validate the file and load it into fresh in-memory repositories.
    pub async fn build(&self) -> Result<InMemoryLineService> {
        self.validate()?;

        let stations = InMemoryStationRepository::new();
        for station in &self.stations {
            stations
                .restore(Station::new(station.id, station.name.trim()))
                .await?;
        }

        let lines = InMemoryLineRepository::new();
        for (line, chain) in self.lines.iter().zip(self.chains()?) {
            lines
                .save(Line::from_chain(line.id, line.name.trim(), line.color.as_str(), chain))
                .await?;
        }

        tracing::info!(
            "Loaded network with {} stations and {} lines",
            self.stations.len(),
            self.lines.len()
        );
        Ok(LineService::new(stations, lines))
    }

    /// Capture the current state of a service; sections are written in path order.
    pub async fn snapshot<S, L>(
        service: &LineService<S, L>,
        settings: SettingsConfig,
    ) -> Result<Self>
    where
        S: StationRepository,
        L: LineRepository,
    {
        let (stations, lines) = service.export().await?;

        Ok(Self {
            settings,
            stations: stations
                .into_iter()
                .map(|station| StationConfig {
                    id: station.id,
                    name: station.name,
                })
                .collect(),
            lines: lines
                .iter()
                .map(|line| LineConfig {
                    id: line.id(),
                    name: line.name().to_string(),
                    color: line.color().to_string(),
                    sections: line
                        .sections()
                        .sections()
                        .map(|section| SectionConfig {
                            id: Some(section.id()),
                            up_station_id: section.up_station_id(),
                            down_station_id: section.down_station_id(),
                            distance: section.distance(),
                        })
                        .collect(),
                })
                .collect(),
        })
    }

    // Sections without an id are numbered after the largest explicit one.
    fn chains(&self) -> Result<Vec<SectionChain>> {
        let mut next_id = self
            .lines
            .iter()
            .flat_map(|line| line.sections.iter())
            .filter_map(|section| section.id.map(|id| id.value()))
            .max()
            .unwrap_or(0);

        self.lines
            .iter()
            .map(|line| {
                let sections = line
                    .sections
                    .iter()
                    .map(|section| {
                        let id = section.id.unwrap_or_else(|| {
                            next_id += 1;
                            SectionId(next_id)
                        });
                        Section::new(
                            id,
                            section.up_station_id,
                            section.down_station_id,
                            section.distance,
                        )
                    })
                    .collect::<std::result::Result<Vec<_>, _>>()
                    .map_err(|e| config_error(format!("lines.{}.sections", line.id), e))?;

                SectionChain::from_sections(sections)
                    .map_err(|e| config_error(format!("lines.{}.sections", line.id), e))
            })
            .collect()
    }
}

fn config_error(field: String, message: impl ToString) -> SubwayError {
    SubwayError::ConfigValidationError {
        field,
        message: message.to_string(),
    }
}

impl Validate for NetworkConfig {
    fn validate(&self) -> Result<()> {
        if let Some(level) = self.log_level() {
            if !LOG_LEVELS.contains(&level) {
                return Err(SubwayError::InvalidValueError {
                    field: "settings.log_level".to_string(),
                    value: level.to_string(),
                    reason: format!("Valid levels: {}", LOG_LEVELS.join(", ")),
                });
            }
        }

        let mut station_ids = HashSet::new();
        for station in &self.stations {
            validate_non_empty_string("stations.name", &station.name)?;
            if !station_ids.insert(station.id) {
                return Err(config_error(
                    "stations.id".to_string(),
                    format!("duplicate station id {}", station.id),
                ));
            }
        }

        let mut line_ids = HashSet::new();
        let mut line_names = HashMap::new();
        let mut section_ids = HashSet::new();
        for line in &self.lines {
            validate_non_empty_string("lines.name", &line.name)?;
            validate_non_empty_string("lines.color", &line.color)?;
            if !line_ids.insert(line.id) {
                return Err(config_error(
                    "lines.id".to_string(),
                    format!("duplicate line id {}", line.id),
                ));
            }
            if let Some(other) = line_names.insert(line.name.trim(), line.id) {
                return Err(config_error(
                    "lines.name".to_string(),
                    format!("lines {} and {} are both named '{}'", other, line.id, line.name),
                ));
            }

            for section in &line.sections {
                validate_positive_number("lines.sections.distance", section.distance, 1)?;
                validate_max_number("lines.sections.distance", section.distance, MAX_DISTANCE)?;
                for station_id in [section.up_station_id, section.down_station_id] {
                    if !station_ids.contains(&station_id) {
                        return Err(config_error(
                            format!("lines.{}.sections", line.id),
                            format!("unknown station {}", station_id),
                        ));
                    }
                }
                if let Some(id) = section.id {
                    if !section_ids.insert(id) {
                        return Err(config_error(
                            format!("lines.{}.sections", line.id),
                            format!("duplicate section id {}", id),
                        ));
                    }
                }
            }
        }

        self.chains().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SINBUNDANG: &str = r#"
[[stations]]
id = 1
name = "신사역"

[[stations]]
id = 2
name = "광교역"

[[lines]]
id = 1
name = "신분당선"
color = "bg-red-600"

[[lines.sections]]
up_station_id = 1
down_station_id = 2
distance = 10
"#;

    #[test]
    fn test_parse_defaults() {
        let config = NetworkConfig::from_toml_str(SINBUNDANG).unwrap();
        assert_eq!(config.settings.rejection_status, RejectionStatus::Distinct);
        assert_eq!(config.stations.len(), 2);
        assert_eq!(config.lines[0].sections[0].id, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unknown_station_is_rejected() {
        let mut config = NetworkConfig::from_toml_str(SINBUNDANG).unwrap();
        config.lines[0].sections[0].down_station_id = StationId(99);
        assert!(matches!(
            config.validate(),
            Err(SubwayError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn test_branching_line_is_rejected() {
        let mut config = NetworkConfig::from_toml_str(SINBUNDANG).unwrap();
        config.stations.push(StationConfig {
            id: StationId(3),
            name: "강남역".to_string(),
        });
        config.lines[0].sections.push(SectionConfig {
            id: None,
            up_station_id: StationId(1),
            down_station_id: StationId(3),
            distance: 4,
        });

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("more than one outgoing section"));
    }

    #[test]
    fn test_line_total_beyond_max_distance_is_rejected() {
        let mut config = NetworkConfig::from_toml_str(SINBUNDANG).unwrap();
        config.stations.push(StationConfig {
            id: StationId(3),
            name: "강남역".to_string(),
        });
        config.lines[0].sections[0].distance = MAX_DISTANCE;
        config.lines[0].sections.push(SectionConfig {
            id: None,
            up_station_id: StationId(2),
            down_station_id: StationId(3),
            distance: 1,
        });

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("total distance exceeds"));

        config.lines[0].sections[1].distance = u64::MAX;
        assert!(matches!(
            config.validate(),
            Err(SubwayError::InvalidValueError { .. })
        ));
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = NetworkConfig::from_toml_str(SINBUNDANG).unwrap();
        config.settings.log_level = Some("loud".to_string());
        assert!(matches!(
            config.validate(),
            Err(SubwayError::InvalidValueError { .. })
        ));
    }

    #[test]
    fn test_env_substitution() {
        std::env::set_var("SUBWAY_TEST_LINE_COLOR", "bg-blue-400");
        let content = SINBUNDANG.replace("bg-red-600", "${SUBWAY_TEST_LINE_COLOR}");
        let config = NetworkConfig::from_toml_str(&content).unwrap();
        assert_eq!(config.lines[0].color, "bg-blue-400");
    }
}
