pub mod clock;
pub mod config;
pub mod mail;
pub mod persistence;
pub mod security;
