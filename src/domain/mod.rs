// Domain layer: core models and ports (interfaces). No transport or provider code here.

pub mod model;
pub mod ports;
