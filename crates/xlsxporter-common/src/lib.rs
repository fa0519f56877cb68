pub mod error;
pub mod naming;
pub mod value;

pub use error::*;
pub use naming::*;
pub use value::*;
