pub mod document_dto;
pub mod profile_dto;
