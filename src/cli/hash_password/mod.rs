//! Hash-password command - prints an Argon2id PHC string

use clap::Args;

use crate::domain::user::validate_password;
use crate::infrastructure::user::{Argon2Hasher, PasswordHasher};

#[derive(Args, Debug)]
pub struct HashPasswordArgs {
    /// Plaintext password to hash
    pub password: String,
}

/// Hash the password and print it to stdout
pub fn run(args: HashPasswordArgs) -> anyhow::Result<()> {
    println!("{}", hash(&args.password)?);
    Ok(())
}

fn hash(password: &str) -> anyhow::Result<String> {
    validate_password(password)?;

    Ok(Argon2Hasher::new().hash(password)?)
}
