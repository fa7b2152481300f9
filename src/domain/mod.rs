// Domain layer: models, ports and the pure mapping / naming rules.

pub mod model;
pub mod ports;
pub mod services;
