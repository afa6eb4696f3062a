//! HTTP API with an echo endpoint and a compact number formatting endpoint.

pub mod cli;
pub mod error;
pub mod handler;
pub mod openapi;
pub mod server;
pub mod tools;
pub mod types;

pub mod metadata {
    include!(concat!(env!("OUT_DIR"), "/pkg_info.rs"));
}
