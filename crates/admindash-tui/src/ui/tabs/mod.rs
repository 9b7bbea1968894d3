pub mod dashboard;
pub mod settings;
pub mod users;
