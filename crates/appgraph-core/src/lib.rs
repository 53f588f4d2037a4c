pub mod config_manager;
pub mod error;
pub mod resource;
pub mod resource_id;

pub use config_manager::*;
pub use error::*;
pub use resource::*;
pub use resource_id::*;
