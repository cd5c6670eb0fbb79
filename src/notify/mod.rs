pub mod email;
pub mod failure;
pub mod scan;
