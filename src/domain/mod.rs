pub mod notify;
pub mod question;
