// Domain layer: models, upload limits and ports. No I/O here.

pub mod limits;
pub mod model;
pub mod ports;
