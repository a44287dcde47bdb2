//! Medias persistence layer
//!
//! Repository traits and their Postgres implementations. Migrations live in the workspace
//! `migrations/` directory and are applied by the API at startup.

pub mod db;

pub use db::{
    CreateOutcome, MediaRepository, PgMediaRepository, PgTagRepository, TagRepository,
};
