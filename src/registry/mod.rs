//! Instance registry subsystem
//!
//! Instances are created on register, reused when an active id is
//! registered again, and closed exactly once on unregister. New kinds are
//! added by registering an `InstanceFactory`.

mod factory;
mod instance;
mod registry;

pub use factory::{InstanceFactory, MockFactory, MOCK_KIND};
pub use instance::{Instance, Options};
pub use registry::{InstanceRegistry, Registration};
