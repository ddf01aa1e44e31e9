//! User account storage: XP, coin and hint balances, daily streaks.

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, Result, params};

use crate::config;
use crate::domain::UserAccount;

pub fn create_user(conn: &Connection, username: &str) -> Result<i64> {
    conn.execute(
        "INSERT INTO users (username, xp, coins, streak, hints_count, last_active)
         VALUES (?1, 0, ?2, 0, ?3, '')",
        params![username, config::STARTING_COINS, config::STARTING_HINTS],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_account(conn: &Connection, user_id: i64) -> Result<Option<UserAccount>> {
    conn.query_row(
        "SELECT id, username, xp, coins, streak, hints_count, last_active
         FROM users WHERE id = ?1",
        params![user_id],
        row_to_account,
    )
    .optional()
}

pub fn get_account_by_username(conn: &Connection, username: &str) -> Result<Option<UserAccount>> {
    conn.query_row(
        "SELECT id, username, xp, coins, streak, hints_count, last_active
         FROM users WHERE username = ?1",
        params![username],
        row_to_account,
    )
    .optional()
}

pub fn add_xp(conn: &Connection, user_id: i64, amount: i64) -> Result<()> {
    conn.execute(
        "UPDATE users SET xp = xp + ?2 WHERE id = ?1",
        params![user_id, amount],
    )?;
    Ok(())
}

/// Spend one hint if the balance allows it. The guard lives in the WHERE
/// clause so the check and the decrement are a single statement.
pub fn try_spend_hint(conn: &Connection, user_id: i64) -> Result<bool> {
    let updated = conn.execute(
        "UPDATE users SET hints_count = hints_count - 1
         WHERE id = ?1 AND hints_count > 0",
        params![user_id],
    )?;
    Ok(updated > 0)
}

/// Refund a hint (e.g. when the spend succeeded but the hint could not
/// be applied).
pub fn refund_hint(conn: &Connection, user_id: i64) -> Result<()> {
    conn.execute(
        "UPDATE users SET hints_count = hints_count + 1 WHERE id = ?1",
        params![user_id],
    )?;
    Ok(())
}

/// Bump the streak at most once per calendar day. Returns whether the
/// streak was incremented.
pub fn update_streak(conn: &Connection, user_id: i64, today: &str) -> Result<bool> {
    let updated = conn.execute(
        "UPDATE users SET streak = streak + 1, last_active = ?2
         WHERE id = ?1 AND last_active != ?2",
        params![user_id, today],
    )?;
    Ok(updated > 0)
}

/// Today's date in the format stored in `last_active`
pub fn today_string() -> String {
    Utc::now().format("%Y-%m-%d").to_string()
}

pub fn get_leaderboard(conn: &Connection, limit: i64) -> Result<Vec<UserAccount>> {
    let mut stmt = conn.prepare(
        "SELECT id, username, xp, coins, streak, hints_count, last_active
         FROM users ORDER BY xp DESC, id ASC LIMIT ?1",
    )?;
    let accounts = stmt
        .query_map(params![limit], row_to_account)?
        .collect::<Result<Vec<_>>>()?;
    Ok(accounts)
}

fn row_to_account(row: &rusqlite::Row) -> Result<UserAccount> {
    Ok(UserAccount {
        id: row.get(0)?,
        username: row.get(1)?,
        xp: row.get(2)?,
        coins: row.get(3)?,
        streak: row.get(4)?,
        hints_count: row.get(5)?,
        last_active: row.get(6)?,
    })
}
