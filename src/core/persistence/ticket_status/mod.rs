pub mod ticket_status_api_repository_trait;
pub mod ticket_status_entity;
pub mod ticket_status_fs_adapter;
pub mod ticket_status_repository;
