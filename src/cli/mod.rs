//! CLI module for the workforce authentication service
//!
//! Subcommands:
//! - `serve`: run the HTTP API
//! - `hash-password`: print an Argon2 hash for seeding a user by hand

pub mod hash_password;
pub mod serve;

use clap::{Parser, Subcommand};

/// Workforce authentication service - email/password login and token verification
#[derive(Parser)]
#[command(name = "workforce-auth")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API server
    Serve,

    /// Hash a plaintext password with Argon2id
    HashPassword(hash_password::HashPasswordArgs),
}
