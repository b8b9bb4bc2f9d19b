pub mod accumulation;
pub mod compaction;
