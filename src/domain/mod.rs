//! Domain types for explain-changes.
//! Annotations, actions, the tool request and the panel message channel.

pub mod annotation;
pub mod error;
pub mod message;
pub mod request;

pub use annotation::*;
pub use error::*;
pub use message::*;
pub use request::*;
