pub mod dedup;
pub mod element_model;
pub mod fingerprint;
pub mod href;
