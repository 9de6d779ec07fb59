//! Tag-name registry for defined component classes.

mod core;

pub use self::core::ElementRegistry;
