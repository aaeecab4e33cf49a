pub mod export;
pub mod kpi;
pub mod layout;
pub mod notification;
pub mod team;
pub mod user;
pub mod weekly_rate;
pub mod work_session;
