pub mod helper_service;
pub mod local;
