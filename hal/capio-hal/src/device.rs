//! Device handle
//!
//! The root every capability attaches to. A device carries nothing beyond
//! its identity; what it can do is decided by which capability traits the
//! backend implements.

/// Logical pin address
pub type Address = u32;

/// Identity of a hardware backend
pub trait Device {
    /// Short, stable identifier for logs and diagnostics
    fn id(&self) -> &'static str;
}

