pub mod accountdb;
pub mod db;
pub mod feedbackdb;
#[cfg(test)]
pub mod memory;
pub mod notificationdb;
pub mod skilldb;
pub mod workrequestdb;

use accountdb::AccountExt;
use feedbackdb::FeedbackExt;
use notificationdb::NotificationExt;
use skilldb::SkillExt;
use workrequestdb::WorkRequestExt;

/// Everything the services need from persistence. Implemented by `DBClient`
/// in production and by the in-memory store in tests.
pub trait Store:
    AccountExt + SkillExt + WorkRequestExt + NotificationExt + FeedbackExt + Send + Sync + 'static
{
}

impl<T> Store for T where
    T: AccountExt + SkillExt + WorkRequestExt + NotificationExt + FeedbackExt + Send + Sync + 'static
{
}
