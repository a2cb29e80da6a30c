// Domain layer: catalog records and the ports (interfaces) the pipeline is built against.

pub mod model;
pub mod ports;
