//! Common test infrastructure
//!
//! Tests should only import from this module, not from internal submodules.
//!
//! # Example
//!
//! ```no_run
//! mod common;
//! use common::{TestDataset, TestWarehouse};
//!
//! #[tokio::test]
//! async fn test_staging() {
//!     let dataset = TestDataset::create();
//!     let warehouse = TestWarehouse::with_tables().await;
//!     // ...
//! }
//! ```

mod constants;
mod fixtures;

pub use constants::*;
pub use fixtures::{TestDataset, TestWarehouse};
