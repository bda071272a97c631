//! Integration tests for the campaign analysis engine
//!
//! Tests are organized by topic:
//! - `fixtures` - Seeded synthetic campaigns shared by the other modules
//! - `properties` - Cross-module guarantees (degenerate inputs, slicing, idempotence)
//! - `report` - The combined `analyze` entry point
