// Form entries, evaluated projects, and the storage/config/pipeline ports.

pub mod model;
pub mod ports;
