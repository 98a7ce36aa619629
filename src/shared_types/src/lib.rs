//! Generated TypeScript types for the relay board shell; see `build.rs`.
