pub mod config;
pub mod dtos;
pub mod handlers;
pub mod lifecycle;
pub mod models;
pub mod services;
pub mod startup;
