pub mod interface;
pub mod shadow;
pub mod topology;
