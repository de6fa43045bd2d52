pub mod audit_helpers;
pub mod checksum;
pub mod decrypt;
pub mod encrypt;
pub mod log;
pub mod verify;
