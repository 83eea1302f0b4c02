use chrono::{NaiveDate, NaiveDateTime, Utc};
use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::models::{Booking, BookingRequest, BookingStatus, User};

const TIMESTAMP_FMT: &str = "%Y-%m-%d %H:%M:%S";
const DATE_FMT: &str = "%Y-%m-%d";

// ── Users ──

pub struct StoredCredentials {
    pub user: User,
    pub password_salt: String,
    pub password_hash: String,
}

pub fn insert_user(
    conn: &Connection,
    user: &User,
    password_salt: &str,
    password_hash: &str,
) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO users (id, name, email, phone, password_salt, password_hash)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            user.id,
            user.name,
            user.email,
            user.phone,
            password_salt,
            password_hash,
        ],
    )?;
    Ok(())
}

pub fn email_exists(conn: &Connection, email: &str) -> anyhow::Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM users WHERE email = ?1",
        params![email],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

pub fn get_credentials_by_email(
    conn: &Connection,
    email: &str,
) -> anyhow::Result<Option<StoredCredentials>> {
    let result = conn.query_row(
        "SELECT id, name, email, phone, password_salt, password_hash
         FROM users WHERE email = ?1",
        params![email],
        |row| {
            Ok(StoredCredentials {
                user: User {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    email: row.get(2)?,
                    phone: row.get(3)?,
                },
                password_salt: row.get(4)?,
                password_hash: row.get(5)?,
            })
        },
    );

    match result {
        Ok(creds) => Ok(Some(creds)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn get_user_by_id(conn: &Connection, id: &str) -> anyhow::Result<Option<User>> {
    let result = conn.query_row(
        "SELECT id, name, email, phone FROM users WHERE id = ?1",
        params![id],
        |row| {
            Ok(User {
                id: row.get(0)?,
                name: row.get(1)?,
                email: row.get(2)?,
                phone: row.get(3)?,
            })
        },
    );

    match result {
        Ok(user) => Ok(Some(user)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

// ── Sessions ──

pub fn insert_session(
    conn: &Connection,
    token: &str,
    user_id: &str,
    expires_at: &NaiveDateTime,
) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO sessions (token, user_id, expires_at) VALUES (?1, ?2, ?3)",
        params![token, user_id, expires_at.format(TIMESTAMP_FMT).to_string()],
    )?;
    Ok(())
}

/// Resolves a session token to its user; expired sessions resolve to None.
pub fn get_session_user(conn: &Connection, token: &str) -> anyhow::Result<Option<User>> {
    let now = Utc::now().naive_utc().format(TIMESTAMP_FMT).to_string();
    let result = conn.query_row(
        "SELECT u.id, u.name, u.email, u.phone
         FROM sessions s JOIN users u ON u.id = s.user_id
         WHERE s.token = ?1 AND s.expires_at > ?2",
        params![token, now],
        |row| {
            Ok(User {
                id: row.get(0)?,
                name: row.get(1)?,
                email: row.get(2)?,
                phone: row.get(3)?,
            })
        },
    );

    match result {
        Ok(user) => Ok(Some(user)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn delete_session(conn: &Connection, token: &str) -> anyhow::Result<bool> {
    let count = conn.execute("DELETE FROM sessions WHERE token = ?1", params![token])?;
    Ok(count > 0)
}

pub fn delete_expired_sessions(conn: &Connection) -> anyhow::Result<usize> {
    let now = Utc::now().naive_utc().format(TIMESTAMP_FMT).to_string();
    let count = conn.execute(
        "DELETE FROM sessions WHERE expires_at <= ?1",
        params![now],
    )?;
    Ok(count)
}

// ── Bookings ──

/// Inserts one record for `user_id`, assigning id, pending status and store
/// timestamps. Returns the stored record so the caller can reference the id.
pub fn create_booking(
    conn: &Connection,
    user_id: &str,
    request: &BookingRequest,
) -> anyhow::Result<Booking> {
    let now = Utc::now().naive_utc();
    let booking = Booking {
        id: Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        farmer_name: request.farmer_name.clone(),
        phone: request.phone.clone(),
        address: request.address.clone(),
        city: request.city.clone(),
        state: request.state.clone(),
        pincode: request.pincode.clone(),
        area_size: request.area_size,
        crop_type: request.crop_type.clone(),
        preferred_date: request.preferred_date,
        preferred_time: request.preferred_time.clone(),
        special_instructions: request.special_instructions.clone(),
        status: BookingStatus::Pending.as_str().to_string(),
        created_at: now,
        updated_at: now,
    };

    conn.execute(
        "INSERT INTO bookings (id, user_id, farmer_name, phone, address, city, state, pincode,
                               area_size, crop_type, preferred_date, preferred_time,
                               special_instructions, status, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
        params![
            booking.id,
            booking.user_id,
            booking.farmer_name,
            booking.phone,
            booking.address,
            booking.city,
            booking.state,
            booking.pincode,
            booking.area_size,
            booking.crop_type,
            booking.preferred_date.format(DATE_FMT).to_string(),
            booking.preferred_time,
            booking.special_instructions,
            booking.status,
            booking.created_at.format(TIMESTAMP_FMT).to_string(),
            booking.updated_at.format(TIMESTAMP_FMT).to_string(),
        ],
    )?;

    Ok(booking)
}

const BOOKING_COLUMNS: &str = "id, user_id, farmer_name, phone, address, city, state, pincode, \
     area_size, crop_type, preferred_date, preferred_time, special_instructions, status, \
     created_at, updated_at";

/// All records owned by `user_id`, most recent first. Second-granularity
/// timestamps tie often enough that insertion order breaks ties.
pub fn list_bookings_for_user(conn: &Connection, user_id: &str) -> anyhow::Result<Vec<Booking>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {BOOKING_COLUMNS} FROM bookings WHERE user_id = ?1
         ORDER BY created_at DESC, rowid DESC"
    ))?;

    let rows = stmt.query_map(params![user_id], |row| Ok(parse_booking_row(row)))?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row??);
    }
    Ok(bookings)
}

pub fn get_booking_for_user(
    conn: &Connection,
    id: &str,
    user_id: &str,
) -> anyhow::Result<Option<Booking>> {
    let result = conn.query_row(
        &format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = ?1 AND user_id = ?2"),
        params![id, user_id],
        |row| Ok(parse_booking_row(row)),
    );

    match result {
        Ok(booking) => Ok(Some(booking?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn list_all_bookings(
    conn: &Connection,
    status_filter: Option<&str>,
    limit: i64,
) -> anyhow::Result<Vec<Booking>> {
    let (sql, params_vec): (String, Vec<Box<dyn rusqlite::types::ToSql>>) = match status_filter {
        Some(status) => (
            format!(
                "SELECT {BOOKING_COLUMNS} FROM bookings WHERE status = ?1
                 ORDER BY created_at DESC, rowid DESC LIMIT ?2"
            ),
            vec![
                Box::new(status.to_string()) as Box<dyn rusqlite::types::ToSql>,
                Box::new(limit),
            ],
        ),
        None => (
            format!(
                "SELECT {BOOKING_COLUMNS} FROM bookings
                 ORDER BY created_at DESC, rowid DESC LIMIT ?1"
            ),
            vec![Box::new(limit) as Box<dyn rusqlite::types::ToSql>],
        ),
    };

    let mut stmt = conn.prepare(&sql)?;
    let params_refs: Vec<&dyn rusqlite::types::ToSql> =
        params_vec.iter().map(|p| p.as_ref()).collect();
    let rows = stmt.query_map(params_refs.as_slice(), |row| Ok(parse_booking_row(row)))?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row??);
    }
    Ok(bookings)
}

pub fn update_booking_status(
    conn: &Connection,
    id: &str,
    status: &BookingStatus,
) -> anyhow::Result<bool> {
    let now = Utc::now().naive_utc().format(TIMESTAMP_FMT).to_string();
    let count = conn.execute(
        "UPDATE bookings SET status = ?1, updated_at = ?2 WHERE id = ?3",
        params![status.as_str(), now, id],
    )?;
    Ok(count > 0)
}

fn parse_booking_row(row: &rusqlite::Row) -> anyhow::Result<Booking> {
    let id: String = row.get(0)?;
    let user_id: String = row.get(1)?;
    let farmer_name: String = row.get(2)?;
    let phone: String = row.get(3)?;
    let address: String = row.get(4)?;
    let city: String = row.get(5)?;
    let state: String = row.get(6)?;
    let pincode: String = row.get(7)?;
    let area_size: f64 = row.get(8)?;
    let crop_type: String = row.get(9)?;
    let preferred_date_str: String = row.get(10)?;
    let preferred_time: String = row.get(11)?;
    let special_instructions: Option<String> = row.get(12)?;
    let status: String = row.get(13)?;
    let created_at_str: String = row.get(14)?;
    let updated_at_str: String = row.get(15)?;

    let preferred_date = NaiveDate::parse_from_str(&preferred_date_str, DATE_FMT)
        .unwrap_or_else(|_| Utc::now().date_naive());
    let created_at = NaiveDateTime::parse_from_str(&created_at_str, TIMESTAMP_FMT)
        .unwrap_or_else(|_| Utc::now().naive_utc());
    let updated_at = NaiveDateTime::parse_from_str(&updated_at_str, TIMESTAMP_FMT)
        .unwrap_or_else(|_| Utc::now().naive_utc());

    Ok(Booking {
        id,
        user_id,
        farmer_name,
        phone,
        address,
        city,
        state,
        pincode,
        area_size,
        crop_type,
        preferred_date,
        preferred_time,
        special_instructions,
        status,
        created_at,
        updated_at,
    })
}
