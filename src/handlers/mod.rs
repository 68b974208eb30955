pub mod create;
pub mod get;
pub mod health;
pub mod remove;
pub mod update;

pub use create::create_handler;
pub use get::get_handler;
pub use health::health_handler;
pub use remove::remove_handler;
pub use update::update_handler;
