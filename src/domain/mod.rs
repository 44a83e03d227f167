// Domain layer: catalog models and ports. No I/O here.

pub mod model;
pub mod ports;
pub mod resources;
