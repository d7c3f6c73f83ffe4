// Domain layer: core models and ports (interfaces). No AWS or HTTP types beyond url/chrono.

pub mod model;
pub mod ports;
