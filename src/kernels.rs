pub mod dispatch;
pub mod entry;
pub mod specializer;
