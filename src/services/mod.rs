pub mod edit_mode;
pub mod kpi_store;
pub mod layout_store;
pub mod notification_store;
pub mod session_store;
