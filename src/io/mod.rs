//! Background loading of tree files.

pub mod async_loader;

pub use async_loader::{AsyncLoader, LoadResult};
