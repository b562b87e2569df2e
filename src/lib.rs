//! csvstore - a small row-oriented table store backed by plain CSV files
//!
//! Each table is one file `<base>/<table>.csv`: a header row of column
//! names followed by one row per record. All values are text.
//!
//! ```ignore
//! use csvstore::{QueryCondition, Record, TableStore};
//!
//! let store = TableStore::open("./data")?;
//! store.create_table("products", ["id", "name", "price"])?;
//!
//! let mut record = Record::new();
//! record.insert("name".into(), "Laptop".into());
//! record.insert("price".into(), "999.99".into());
//! store.insert("products", &record)?;
//!
//! let expensive = store.query("products", &[QueryCondition::gt("price", "500")])?;
//! ```

pub mod cli;
pub mod executor;
pub mod mutation;
pub mod observability;
pub mod storage;
pub mod store;

pub use executor::{Operator, QueryCondition, QueryResult, SortOrder};
pub use storage::{Record, StoreError, StoreErrorCode, StoreResult};
pub use store::{StoreConfig, TableStore};
