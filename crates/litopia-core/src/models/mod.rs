pub mod book;
pub mod filter;
pub mod library;
pub mod raw;

pub use book::*;
pub use filter::*;
pub use library::*;
pub use raw::*;
