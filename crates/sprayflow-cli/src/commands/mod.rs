pub mod catalog;
pub mod session;
pub mod settings;
