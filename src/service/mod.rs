pub mod account_service;
pub mod error;
pub mod feedback_service;
pub mod notification_service;
pub mod skill_service;
pub mod stats_service;
#[cfg(test)]
pub(crate) mod testing;
pub mod work_request_service;
