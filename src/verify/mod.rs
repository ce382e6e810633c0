pub mod classify;
pub mod locator;
