//! Record models rows are bound into
//!
//! Each model derives its field table with `Shape`. Products and persons use
//! the default naming-convention binding; employees carry a custom rule that
//! redacts sensitive fields for inactive records.

pub mod employee;
pub mod person;
pub mod product;

pub use employee::{Address, Employee};
pub use person::Person;
pub use product::Product;
