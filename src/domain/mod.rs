// Domain layer: transaction model and the collaborator ports the gateway calls through.

pub mod model;
pub mod ports;
