pub mod class_state;
pub mod command;
pub mod git;
pub mod notifier;
pub mod system;
