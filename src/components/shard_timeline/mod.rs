mod axis;
mod color;
mod component;
mod config;
mod data;
mod scale;
mod state;
mod types;

pub use component::ShardTimeline;
