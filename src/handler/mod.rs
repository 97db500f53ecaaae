pub mod admin;
pub mod auth;
pub mod feedback;
pub mod notifications;
pub mod skills;
pub mod users;
pub mod work_requests;
pub mod workers;
