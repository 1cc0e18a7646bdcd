pub mod error;
pub mod json_file;
pub mod todos;

pub use error::StoreError;
pub use json_file::JsonFile;
pub use todos::TodoRepo;
