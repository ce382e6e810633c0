pub mod batch;
pub mod concurrent;
pub mod pool;
