//! Implementations of the collaborator traits backed by real processes:
//! `git`, coreutils under `sudo`, and the sandbox commands themselves.
pub mod command;
pub mod git;
pub mod system;
