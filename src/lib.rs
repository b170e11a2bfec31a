// State-change event model and canonical JSON encoding
pub mod event;

// Entity include/exclude filtering
pub mod filter;

// Topic route table
pub mod routes;

// Kafka producer integration
pub mod kafka;

// Bridge manager and lifecycle
pub mod bridge;

// Hub event bus
pub mod hub;

// Configuration
pub mod config;
