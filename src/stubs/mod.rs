pub mod class_state;
pub mod mailer;
pub mod scanner;
