pub mod document_service;
pub mod profile_service;
pub mod storage_service;
pub mod supabase_storage;
