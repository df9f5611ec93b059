// Domain layer: plain meal data and the ports the widget talks through.

pub mod model;
pub mod ports;
