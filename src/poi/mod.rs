// src/poi/mod.rs

// Proof of Invention API: upload client and response projection
pub mod client;
pub mod mapper;
pub mod models;

pub use client::PoiClient;
pub use mapper::map_response;
