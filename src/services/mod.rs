pub mod chat_service;
pub mod health_service;
pub mod import_service;
