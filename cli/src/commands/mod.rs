pub mod completion;
pub mod man;
pub mod reindex;
pub mod version;
