pub mod carousel;
pub mod deep_scan;
pub mod engine;
pub mod extract;
pub mod regions;
pub mod selectors;
