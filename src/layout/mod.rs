//! Pagination of parsed documents onto fixed-size pages.

mod paginate;

pub use paginate::{paginate, Paginator};
