pub mod frameworks;
pub mod map;
