pub mod assist;
pub mod chat;
pub mod health;
pub mod reset;
