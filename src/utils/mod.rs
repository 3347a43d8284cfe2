pub mod flash;
pub mod mailer;
pub mod upload;
