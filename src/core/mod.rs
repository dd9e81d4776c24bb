pub mod config;
pub mod export;
pub mod generator;
pub mod number;
pub mod pattern;
pub mod prefix;
