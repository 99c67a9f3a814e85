//! Synthetic record generator for clickhouse-streamer.
//!
//! This crate produces the rows that the streamer writes into the analytics
//! tables: live-looking `events` and `orders` for the continuous stream, plus
//! `users`, `products` and back-dated history for the one-shot seed.
//!
//! # Architecture
//!
//! ```text
//!   population sizes, max id, now
//!                │
//!                ▼
//!      ┌───────────────────┐        ┌────────────────┐
//!      │  StreamGenerator  │        │ SeedGenerator  │
//!      │                   │        │                │
//!      │  - rng (StdRng)   │        │ - rng (StdRng) │
//!      │  - session ctr    │        │                │
//!      └─────────┬─────────┘        └───────┬────────┘
//!                │                          │
//!                ▼                          ▼
//!         Vec<Event>, Vec<Order>     Vec<User>, Vec<Product>, ...
//! ```
//!
//! Generation never touches the store. Callers pass in the current maximum
//! identifier and population sizes, so ids stay ahead of what the store holds
//! and foreign keys point at rows that exist.
//!
//! # Example
//!
//! ```rust
//! use chrono::Utc;
//! use stream_generator::{EventType, StreamGenerator};
//!
//! let mut generator = StreamGenerator::new(Some(42));
//! let events = generator.events(100, 10_000, 10, Utc::now());
//!
//! assert_eq!(events.len(), 10);
//! assert!(events.iter().all(|e| e.event_id > 100));
//! for event in &events {
//!     if event.event_type == EventType::Purchase {
//!         assert!(event.revenue > 0.0);
//!     }
//! }
//! ```

pub mod generator;
pub mod generators;
pub mod records;
pub mod seed;

// Re-exports for convenience
pub use generator::{EventProfile, OrderProfile, StreamGenerator, SESSION_COUNTER_START};
pub use records::{Event, EventType, Order, OrderStatus, PaymentMethod, Product, User};
pub use seed::SeedGenerator;
