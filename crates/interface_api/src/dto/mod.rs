//! Request and response bodies

pub mod product;
pub mod quote;
pub mod session;
