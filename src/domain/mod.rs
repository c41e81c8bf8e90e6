// Domain layer: stations, sections, the section chain and lines, plus the repository ports.

pub mod line;
pub mod model;
pub mod ports;
pub mod sections;
