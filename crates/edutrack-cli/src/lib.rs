//! # EduTrack CLI
//!
//! Database seeding utilities for EduTrack development and load testing.
//!
//! ```ignore
//! use edutrack_cli::seeder::{seed_all, SeedConfig};
//!
//! let config = SeedConfig::new(10); // 10 colleges with defaults
//! seed_all(&pool, config).await?;
//! ```

pub mod seeder;
