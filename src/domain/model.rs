use crate::domain::sections::SectionChainError;
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! id_type {
    ($name:ident) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            pub fn new(value: u64) -> Self {
                Self(value)
            }

            pub fn value(&self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }
    };
}

id_type!(StationId);
id_type!(LineId);
id_type!(SectionId);

/// Largest distance a section or a whole line may have. Network files store
/// distances as TOML integers, which are signed 64-bit.
pub const MAX_DISTANCE: u64 = i64::MAX as u64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Station {
    pub id: StationId,
    pub name: String,
}

impl Station {
    pub fn new(id: StationId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// A directed edge between two stations of one line.
///
/// Stations are referenced by id only; resolving them to [`Station`] records is
/// the repository's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    id: SectionId,
    up_station_id: StationId,
    down_station_id: StationId,
    distance: u64,
}

impl Section {
    pub fn new(
        id: SectionId,
        up_station_id: StationId,
        down_station_id: StationId,
        distance: u64,
    ) -> Result<Self, SectionChainError> {
        if distance == 0 {
            return Err(SectionChainError::InvalidSection {
                reason: "distance must be greater than zero".to_string(),
            });
        }
        if distance > MAX_DISTANCE {
            return Err(SectionChainError::InvalidSection {
                reason: format!("distance {} exceeds {}", distance, MAX_DISTANCE),
            });
        }
        if up_station_id == down_station_id {
            return Err(SectionChainError::InvalidSection {
                reason: format!("station {} cannot connect to itself", up_station_id),
            });
        }

        Ok(Self {
            id,
            up_station_id,
            down_station_id,
            distance,
        })
    }

    pub fn id(&self) -> SectionId {
        self.id
    }

    pub fn up_station_id(&self) -> StationId {
        self.up_station_id
    }

    pub fn down_station_id(&self) -> StationId {
        self.down_station_id
    }

    pub fn distance(&self) -> u64 {
        self.distance
    }

    pub fn contains(&self, station_id: StationId) -> bool {
        self.up_station_id == station_id || self.down_station_id == station_id
    }

    // Only the chain rewires sections, and only after it has checked the split is valid.
    pub(crate) fn rewire_up(&mut self, up_station_id: StationId, distance: u64) {
        self.up_station_id = up_station_id;
        self.distance = distance;
    }

    pub(crate) fn rewire_down(&mut self, down_station_id: StationId, distance: u64) {
        self.down_station_id = down_station_id;
        self.distance = distance;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_rejects_zero_distance() {
        let result = Section::new(SectionId(1), StationId(1), StationId(2), 0);
        assert!(matches!(
            result,
            Err(SectionChainError::InvalidSection { .. })
        ));
    }

    #[test]
    fn test_section_rejects_distance_beyond_toml_range() {
        let result = Section::new(SectionId(1), StationId(1), StationId(2), MAX_DISTANCE + 1);
        assert!(matches!(
            result,
            Err(SectionChainError::InvalidSection { .. })
        ));
        assert!(Section::new(SectionId(1), StationId(1), StationId(2), MAX_DISTANCE).is_ok());
    }

    #[test]
    fn test_section_rejects_loop() {
        let result = Section::new(SectionId(1), StationId(7), StationId(7), 5);
        assert!(matches!(
            result,
            Err(SectionChainError::InvalidSection { .. })
        ));
    }

    #[test]
    fn test_section_contains_both_endpoints() {
        let section = Section::new(SectionId(1), StationId(1), StationId(2), 10).unwrap();
        assert!(section.contains(StationId(1)));
        assert!(section.contains(StationId(2)));
        assert!(!section.contains(StationId(3)));
    }

    #[test]
    fn test_id_serializes_transparently() {
        let json = serde_json::to_string(&StationId(42)).unwrap();
        assert_eq!(json, "42");
    }
}
