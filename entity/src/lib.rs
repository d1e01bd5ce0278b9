//! Record shapes for the company store.

pub mod department;
pub mod employee;

pub use employee::DepartmentRef;
