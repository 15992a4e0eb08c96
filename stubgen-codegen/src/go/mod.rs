//! Go code generation modules.

pub mod interface;
pub mod mock;

pub use interface::InterfaceGenerator;
pub use mock::MockGenerator;
