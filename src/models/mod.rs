pub mod accountmodel;
pub mod feedbackmodel;
pub mod notificationmodel;
pub mod skillmodel;
pub mod workrequestmodel;
