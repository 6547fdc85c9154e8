pub mod health;
pub mod security;
pub mod teams;
