pub mod driver;
pub mod filter;
pub mod report;

pub use driver::*;
pub use filter::*;
pub use report::*;
