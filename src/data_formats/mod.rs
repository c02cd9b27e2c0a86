pub mod request;
mod response;
mod wrapper;

pub use request::*;
pub use response::*;
pub use wrapper::*;
