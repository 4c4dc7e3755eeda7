//! Data models

pub mod dataset;
pub mod rule;
pub mod severity;
pub mod request;
pub mod view;

pub use dataset::*;
pub use rule::*;
pub use severity::*;
pub use request::*;
pub use view::*;
