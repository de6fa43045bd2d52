use std::path::PathBuf;

use crate::core::models::key_info::KeyInfo;

/// Result of an operation that may stop at the overwrite prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Completed(T),
    /// The output already existed and the user kept it.
    Declined { output: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptReport {
    pub output: PathBuf,
    pub input_bytes: u64,
    pub output_bytes: u64,
    pub recipient: KeyInfo,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecryptReport {
    pub output: PathBuf,
    pub output_bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeReport {
    pub path: PathBuf,
    pub packets: Vec<String>,
    pub session_key_packets: usize,
}
