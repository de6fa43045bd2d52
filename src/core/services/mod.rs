pub mod checksum_service;
pub mod integrity_probe;
pub mod scratch;
pub mod two_layer_cipher;
pub mod wipe;
