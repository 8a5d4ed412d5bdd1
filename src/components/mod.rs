pub mod shard_timeline;
