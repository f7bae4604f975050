pub mod config;
pub mod errors;
pub mod icons;
pub mod manifest;
pub mod models;
pub mod web;
