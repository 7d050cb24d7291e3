pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod links;
pub mod middleware;
pub mod migrations;
pub mod models;
pub mod pagination;
pub mod routes;
pub mod store;
