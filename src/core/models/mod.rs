pub mod artifact;
pub mod audit_entry;
pub mod cipher_params;
pub mod key_info;
pub mod packet_listing;
pub mod report;
