// Domain layer: data model and ports. Nothing here touches the filesystem or network.

pub mod model;
pub mod ports;
