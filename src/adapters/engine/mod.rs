pub mod gpg_engine;
pub mod gpg_listing;
