pub mod storage_path;
pub mod ticket_status;
