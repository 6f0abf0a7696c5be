pub mod frames;
pub mod histogram;
pub mod image;
pub mod responses;
pub mod stats;
