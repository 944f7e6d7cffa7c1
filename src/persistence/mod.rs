pub mod error;
pub mod files;
pub mod pointer;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use files::{
    db_file, ensure_dir, get_data_dir, init_local_data_dir, log_file, pointer_file,
};
pub use pointer::RunningTaskPointer;
pub use store::TaskStore;
