use crate::domain::model::{LineId, Section, SectionId, StationId};
use crate::domain::sections::{SectionChain, SectionChainError};

/// A subway line. It owns its sections by value; the ordered station view and
/// total distance are derived from the chain on every read.
#[derive(Debug, Clone)]
pub struct Line {
    id: LineId,
    name: String,
    color: String,
    sections: SectionChain,
}

impl Line {
    pub fn new(
        id: LineId,
        name: impl Into<String>,
        color: impl Into<String>,
        initial: Section,
    ) -> Self {
        Self::from_chain(id, name, color, SectionChain::new(initial))
    }

    pub fn from_chain(
        id: LineId,
        name: impl Into<String>,
        color: impl Into<String>,
        sections: SectionChain,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            color: color.into(),
            sections,
        }
    }

    pub fn id(&self) -> LineId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn sections(&self) -> &SectionChain {
        &self.sections
    }

    pub fn update(&mut self, name: impl Into<String>, color: impl Into<String>) {
        self.name = name.into();
        self.color = color.into();
    }

    pub fn add_section(
        &mut self,
        id: SectionId,
        up_station_id: StationId,
        down_station_id: StationId,
        distance: u64,
    ) -> Result<(), SectionChainError> {
        self.sections.add(id, up_station_id, down_station_id, distance)
    }

    pub fn remove_section(&mut self, station_id: StationId) -> Result<Section, SectionChainError> {
        self.sections.remove(station_id)
    }

    pub fn contains(&self, station_id: StationId) -> bool {
        self.sections.contains(station_id)
    }

    pub fn ordered_station_ids(&self) -> Vec<StationId> {
        self.sections.ordered_station_ids()
    }

    pub fn total_distance(&self) -> u64 {
        self.sections.total_distance()
    }

    /// The section that now joins `up` to `down`, if any.
    pub fn find_section(
        &self,
        up_station_id: StationId,
        down_station_id: StationId,
    ) -> Option<&Section> {
        self.sections.sections().find(|section| {
            section.up_station_id() == up_station_id
                && section.down_station_id() == down_station_id
        })
    }
}
