use crate::domain::model::{Section, SectionId, StationId, MAX_DISTANCE};
use std::collections::HashMap;
use thiserror::Error;

/// Typed rejections raised by [`SectionChain`].
///
/// These are deterministic outcomes of the arguments; none of them is retryable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SectionChainError {
    #[error("Stations {up} and {down} are both already on the line")]
    DuplicateSection { up: StationId, down: StationId },

    #[error("Neither station {up} nor station {down} is on the line")]
    DisconnectedSection { up: StationId, down: StationId },

    #[error(
        "Distance {requested} cannot split section {section} whose distance is {existing}"
    )]
    InvalidDistance {
        section: SectionId,
        existing: u64,
        requested: u64,
    },

    #[error("A line must keep at least one section")]
    MinimumSection,

    #[error("Station {station} is not the down terminus (currently {terminus})")]
    NotTerminus {
        station: StationId,
        terminus: StationId,
    },

    #[error("Invalid section: {reason}")]
    InvalidSection { reason: String },

    #[error("Sections do not form a single path: {reason}")]
    BrokenChain { reason: String },
}

/// The sections of one line, kept as a single simple directed path.
///
/// Sections are indexed by their up station, with a reverse index from down
/// station to up station, so terminus lookup and membership are constant time
/// and the ordered view is a single walk from the up terminus.
///
/// Every mutating operation validates completely before it touches the maps:
/// a rejected call leaves the chain exactly as it was.
#[derive(Debug, Clone)]
pub struct SectionChain {
    by_up: HashMap<StationId, Section>,
    up_of: HashMap<StationId, StationId>,
    up_terminus: StationId,
    down_terminus: StationId,
}

impl SectionChain {
    pub fn new(initial: Section) -> Self {
        let up = initial.up_station_id();
        let down = initial.down_station_id();

        let mut chain = Self {
            by_up: HashMap::new(),
            up_of: HashMap::new(),
            up_terminus: up,
            down_terminus: down,
        };
        chain.link(initial);
        chain
    }

    /// Rebuild a chain from sections in arbitrary order, e.g. as loaded from storage.
    pub fn from_sections(sections: Vec<Section>) -> Result<Self, SectionChainError> {
        if sections.is_empty() {
            return Err(broken("a line needs at least one section"));
        }

        let mut by_up = HashMap::with_capacity(sections.len());
        let mut up_of = HashMap::with_capacity(sections.len());

        for section in sections {
            let up = section.up_station_id();
            let down = section.down_station_id();

            if up_of.insert(down, up).is_some() {
                return Err(broken(format!(
                    "station {} has more than one incoming section",
                    down
                )));
            }
            if by_up.insert(up, section).is_some() {
                return Err(broken(format!(
                    "station {} has more than one outgoing section",
                    up
                )));
            }
        }

        let mut starts: Vec<StationId> = by_up
            .keys()
            .filter(|station| !up_of.contains_key(*station))
            .copied()
            .collect();
        starts.sort();

        let up_terminus = match starts.as_slice() {
            [only] => *only,
            [] => return Err(broken("sections form a cycle")),
            many => {
                return Err(broken(format!(
                    "{} stations have no incoming section",
                    many.len()
                )))
            }
        };

        // With in/out degree at most one and a single start, the walk cannot loop;
        // anything it does not reach sits on a detached cycle.
        let mut current = up_terminus;
        let mut walked = 0;
        while let Some(section) = by_up.get(&current) {
            walked += 1;
            current = section.down_station_id();
        }

        if walked != by_up.len() {
            return Err(broken(format!(
                "only {} of {} sections are reachable from station {}",
                walked,
                by_up.len(),
                up_terminus
            )));
        }

        let total = by_up
            .values()
            .try_fold(0u64, |total, section| total.checked_add(section.distance()));
        if !matches!(total, Some(total) if total <= MAX_DISTANCE) {
            return Err(broken(format!("total distance exceeds {}", MAX_DISTANCE)));
        }

        Ok(Self {
            by_up,
            up_of,
            up_terminus,
            down_terminus: current,
        })
    }

    /// Attach a new section to the chain.
    ///
    /// Exactly one of the two stations must already be on the line. Terminal
    /// stations extend the line; an interior station splits the existing section
    /// on that side, which must be strictly longer than `distance`.
    pub fn add(
        &mut self,
        id: SectionId,
        up_station_id: StationId,
        down_station_id: StationId,
        distance: u64,
    ) -> Result<(), SectionChainError> {
        let has_up = self.contains(up_station_id);
        let has_down = self.contains(down_station_id);
        if has_up && has_down {
            return Err(SectionChainError::DuplicateSection {
                up: up_station_id,
                down: down_station_id,
            });
        }
        if !has_up && !has_down {
            return Err(SectionChainError::DisconnectedSection {
                up: up_station_id,
                down: down_station_id,
            });
        }

        // Membership first: a self-loop onto the line is a duplicate, not a bad shape.
        let section = Section::new(id, up_station_id, down_station_id, distance)?;

        if up_station_id == self.down_terminus {
            self.ensure_extendable(distance)?;
            self.link(section);
            self.down_terminus = down_station_id;
            Ok(())
        } else if down_station_id == self.up_terminus {
            self.ensure_extendable(distance)?;
            self.link(section);
            self.up_terminus = up_station_id;
            Ok(())
        } else if has_up {
            self.split_after(section)
        } else {
            self.split_before(section)
        }
    }

    /// Remove the down terminus, returning the section that led to it.
    pub fn remove(&mut self, station_id: StationId) -> Result<Section, SectionChainError> {
        if self.by_up.len() == 1 {
            return Err(SectionChainError::MinimumSection);
        }
        if station_id != self.down_terminus {
            return Err(SectionChainError::NotTerminus {
                station: station_id,
                terminus: self.down_terminus,
            });
        }

        let up = *self
            .up_of
            .get(&station_id)
            .ok_or_else(|| broken(format!("down terminus {} has no section", station_id)))?;
        let removed = self
            .by_up
            .remove(&up)
            .ok_or_else(|| broken(format!("station {} lost its outgoing section", up)))?;
        self.up_of.remove(&station_id);
        self.down_terminus = up;

        Ok(removed)
    }

    pub fn contains(&self, station_id: StationId) -> bool {
        self.by_up.contains_key(&station_id) || self.up_of.contains_key(&station_id)
    }

    /// Sections in path order, up terminus first.
    pub fn sections(&self) -> impl Iterator<Item = &Section> + '_ {
        let mut next = Some(self.up_terminus);
        std::iter::from_fn(move || {
            let section = self.by_up.get(&next?)?;
            next = Some(section.down_station_id());
            Some(section)
        })
    }

    /// Station ids from up terminus to down terminus, each exactly once.
    pub fn ordered_station_ids(&self) -> Vec<StationId> {
        std::iter::once(self.up_terminus)
            .chain(self.sections().map(Section::down_station_id))
            .collect()
    }

    pub fn total_distance(&self) -> u64 {
        self.by_up.values().map(Section::distance).sum()
    }

    pub fn section_count(&self) -> usize {
        self.by_up.len()
    }

    pub fn up_terminus(&self) -> StationId {
        self.up_terminus
    }

    pub fn down_terminus(&self) -> StationId {
        self.down_terminus
    }

    // Splits keep the total; only extensions can push it past the limit.
    fn ensure_extendable(&self, distance: u64) -> Result<(), SectionChainError> {
        match self.total_distance().checked_add(distance) {
            Some(total) if total <= MAX_DISTANCE => Ok(()),
            _ => Err(SectionChainError::InvalidSection {
                reason: format!(
                    "adding {} to a line of {} would exceed {}",
                    distance,
                    self.total_distance(),
                    MAX_DISTANCE
                ),
            }),
        }
    }

    fn link(&mut self, section: Section) {
        self.up_of
            .insert(section.down_station_id(), section.up_station_id());
        self.by_up.insert(section.up_station_id(), section);
    }

    // A→B exists and A→C arrives: A→C, then C→B keeps the existing id.
    fn split_after(&mut self, section: Section) -> Result<(), SectionChainError> {
        let junction = section.up_station_id();
        let inserted = section.down_station_id();

        let existing = self
            .by_up
            .get(&junction)
            .ok_or_else(|| broken(format!("station {} has no outgoing section", junction)))?;
        let remaining = Self::remaining_distance(existing, section.distance())?;

        if let Some(mut existing) = self.by_up.remove(&junction) {
            existing.rewire_up(inserted, remaining);
            self.link(existing);
        }
        self.link(section);
        Ok(())
    }

    // A→B exists and C→B arrives: A→C keeps the existing id, then C→B.
    fn split_before(&mut self, section: Section) -> Result<(), SectionChainError> {
        let junction = section.down_station_id();
        let inserted = section.up_station_id();

        let existing_up = *self
            .up_of
            .get(&junction)
            .ok_or_else(|| broken(format!("station {} has no incoming section", junction)))?;
        let existing = self
            .by_up
            .get(&existing_up)
            .ok_or_else(|| broken(format!("station {} has no outgoing section", existing_up)))?;
        let remaining = Self::remaining_distance(existing, section.distance())?;

        if let Some(mut existing) = self.by_up.remove(&existing_up) {
            existing.rewire_down(inserted, remaining);
            self.link(existing);
        }
        self.link(section);
        Ok(())
    }

    fn remaining_distance(existing: &Section, requested: u64) -> Result<u64, SectionChainError> {
        if existing.distance() <= requested {
            return Err(SectionChainError::InvalidDistance {
                section: existing.id(),
                existing: existing.distance(),
                requested,
            });
        }
        Ok(existing.distance() - requested)
    }
}

fn broken(reason: impl Into<String>) -> SectionChainError {
    SectionChainError::BrokenChain {
        reason: reason.into(),
    }
}
