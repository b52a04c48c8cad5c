use anyhow::{bail, Context, Result};
use colored::*;
use rpassword::read_password; // hidden password entry for CLI
use rusqlite::{params, Connection, OptionalExtension};
use std::io::{self, Write};
use tracing::{debug, info};
use zeroize::Zeroize; // plaintext is wiped from memory after hashing

use crate::db::Outcome;

/*------------------------ Hashing ---------------------*/

// bcrypt work factor; the owning application verifies logins with bcrypt.
pub const HASH_COST: u32 = bcrypt::DEFAULT_COST;

// Hash a plaintext password with a fresh random salt.
// Returns a `$2b$` string suitable for the users.password column.
pub fn hash_password(password: &str) -> Result<String> {
    bcrypt::hash(password, HASH_COST).context("Failed to hash password")
}

// Verify a password against a stored bcrypt hash
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool> {
    bcrypt::verify(password, stored_hash).context("Invalid password hash format")
}

// Reject an empty password, wiping the buffer on the way out.
pub fn require_non_empty(password: String) -> Result<String> {
    if password.is_empty() {
        let mut p = password;
        p.zeroize();
        bail!("Password cannot be empty.");
    }
    Ok(password)
}

/*------------------------ Password prompt ---------------------*/

// Read a new password from the terminal without echo, asking twice.
pub fn prompt_new_password() -> Result<String> {
    print!("New password: ");
    io::stdout()
        .flush()
        .context("Failed to flush stdout while asking for password")?;
    let password = read_password().context("Failed to read password input")?;

    print!("Confirm password: ");
    io::stdout()
        .flush()
        .context("Failed to flush stdout while asking for confirmation")?;
    let mut confirm = read_password().context("Failed to read confirmation input")?;

    let matches = confirm == password;
    confirm.zeroize();
    if !matches {
        let mut p = password;
        p.zeroize();
        bail!("Passwords do not match.");
    }
    require_non_empty(password)
}

// Read an existing password from the terminal without echo.
pub fn prompt_password() -> Result<String> {
    print!("Password: ");
    io::stdout()
        .flush()
        .context("Failed to flush stdout while asking for password")?;
    read_password().context("Failed to read password input")
}

/*------------------------ Reset ---------------------*/

// Replace the stored hash for the user with this email.
// Nothing is committed unless a row matched.
pub fn reset_password(conn: &mut Connection, email: &str, password: &str) -> Result<Outcome> {
    if password.is_empty() {
        bail!("Password cannot be empty.");
    }
    let hashed = hash_password(password)?;

    println!("Resetting password for {email}...");
    let tx = conn.transaction().context("Failed to start transaction")?;
    let affected = tx
        .execute(
            "UPDATE users SET password = ?1 WHERE email = ?2",
            params![hashed, email],
        )
        .context("Failed to update password")?;
    debug!(email, affected, "password update executed");

    if affected > 0 {
        tx.commit().context("Failed to commit password update")?;
        info!(email, "password reset");
        println!("{}", "Password updated successfully.".green());
        Ok(Outcome::Done)
    } else {
        // dropping the transaction rolls it back
        println!("{}", "User not found.".yellow());
        Ok(Outcome::NotFound)
    }
}

// Check a plaintext password against the stored hash for this email.
pub fn check_password(conn: &Connection, email: &str, password: &str) -> Result<Outcome> {
    let stored: Option<Option<String>> = conn
        .query_row(
            "SELECT password FROM users WHERE email = ?1",
            params![email],
            |r| r.get(0),
        )
        .optional()
        .context("Failed to query stored password")?;

    match stored {
        None => {
            println!("{}", format!("User with email {email} not found.").yellow());
            Ok(Outcome::NotFound)
        }
        Some(None) => bail!("User {email} has no password set."),
        Some(Some(hash)) => {
            if verify_password(password, &hash)? {
                println!("{}", format!("Password for {email} verified.").green());
                Ok(Outcome::Done)
            } else {
                bail!("Password does not match the stored hash for {email}.")
            }
        }
    }
}
