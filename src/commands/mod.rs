mod start;

pub use start::start;
