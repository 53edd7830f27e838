pub mod draft_store;
pub mod file_draft_store;
pub mod in_memory_draft_store;
