//! Integration test common infrastructure.
//!
//! Provides utilities for spawning test servers and driving them with
//! line-oriented test clients.

pub mod client;
pub mod server;

#[allow(unused_imports)]
pub use client::TestClient;
#[allow(unused_imports)]
pub use server::TestServer;
