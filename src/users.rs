use anyhow::{Context, Result};
use colored::*;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::info;

use crate::db::Outcome;

pub const DEFAULT_ROLE: &str = "admin";
pub const DEFAULT_PLAN: &str = "pro";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: i64,
    pub username: Option<String>,
    pub role: Option<String>,
    pub plan: Option<String>,
}

// Look up a user by email.
pub fn find_user(conn: &Connection, email: &str) -> Result<Option<UserRecord>> {
    conn.query_row(
        "SELECT id, username, role, plan FROM users WHERE email = ?1",
        params![email],
        |r| {
            Ok(UserRecord {
                id: r.get(0)?,
                username: r.get(1)?,
                role: r.get(2)?,
                plan: r.get(3)?,
            })
        },
    )
    .optional()
    .context("Failed to query user by email")
}

// "admin" -> "Admin", for report lines.
pub fn title_case(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn show(v: &Option<String>) -> &str {
    v.as_deref().unwrap_or("None")
}

/// Set role and plan for an existing user. Running it again leaves the same state.
pub fn promote_user(conn: &mut Connection, email: &str, role: &str, plan: &str) -> Result<Outcome> {
    let tx = conn.transaction().context("Failed to start transaction")?;

    let Some(user) = find_user(&tx, email)? else {
        println!("{}", format!("User with email {email} not found.").yellow());
        println!("Please ask the user to sign up first.");
        return Ok(Outcome::NotFound);
    };

    println!(
        "User found: ID={}, Username={}, Role={}, Plan={}",
        user.id,
        show(&user.username),
        show(&user.role),
        show(&user.plan)
    );

    tx.execute(
        "UPDATE users SET role = ?1, plan = ?2 WHERE email = ?3",
        params![role, plan, email],
    )
    .context("Failed to update user role and plan")?;
    tx.commit().context("Failed to commit user update")?;

    info!(email, role, plan, previous_role = ?user.role, "user promoted");
    println!(
        "{}",
        format!(
            "Successfully updated user {email} to {} role and {} plan.",
            title_case(role),
            title_case(plan)
        )
        .green()
    );
    Ok(Outcome::Done)
}
