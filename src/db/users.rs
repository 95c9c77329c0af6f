use super::db::Db;
use crate::libs::reference::{Role, User};
use anyhow::Result;
use rusqlite::{params, Connection, Row};
use std::path::Path;

const INSERT_USER: &str = "INSERT INTO users (id, name, email, role, avatar) VALUES (?1, ?2, ?3, ?4, ?5)";
const SELECT_USERS: &str = "SELECT id, name, email, role, avatar FROM users ORDER BY name";
const SELECT_USER: &str = "SELECT id, name, email, role, avatar FROM users WHERE id = ?1";
const DELETE_USER: &str = "DELETE FROM users WHERE id = ?1";

pub struct Users {
    pub conn: Connection,
}

fn user_from_row(row: &Row) -> rusqlite::Result<User> {
    let role: String = row.get(3)?;
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        role: role.parse().unwrap_or(Role::Analyst),
        avatar: row.get(4)?,
    })
}

impl Users {
    pub fn new() -> Result<Users> {
        Ok(Users { conn: Db::new()?.conn })
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Users> {
        Ok(Users { conn: Db::open(path)?.conn })
    }

    /// Fails when the email is already registered.
    pub fn insert(&self, user: &User) -> Result<()> {
        self.conn.execute(
            INSERT_USER,
            params![user.id, user.name, user.email, user.role.as_str(), user.avatar],
        )?;
        Ok(())
    }

    pub fn fetch(&self) -> Result<Vec<User>> {
        let mut stmt = self.conn.prepare(SELECT_USERS)?;
        let users = stmt.query_map([], user_from_row)?.collect::<Result<Vec<_>, _>>()?;
        Ok(users)
    }

    pub fn get(&self, id: &str) -> Result<Option<User>> {
        let mut stmt = self.conn.prepare(SELECT_USER)?;
        let mut rows = stmt.query_map(params![id], user_from_row)?;
        Ok(rows.next().transpose()?)
    }

    pub fn delete(&self, id: &str) -> Result<usize> {
        Ok(self.conn.execute(DELETE_USER, params![id])?)
    }
}
