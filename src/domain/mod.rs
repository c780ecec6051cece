// Domain layer: payload and analysis models plus the ports the core talks through.

pub mod model;
pub mod ports;
