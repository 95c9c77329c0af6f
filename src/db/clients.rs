use super::db::Db;
use crate::libs::reference::Client;
use anyhow::Result;
use rusqlite::{params, Connection};
use std::path::Path;

const INSERT_CLIENT: &str = "INSERT INTO clients (id, name) VALUES (?1, ?2)";
const SELECT_CLIENTS: &str = "SELECT id, name FROM clients ORDER BY name";
const SELECT_CLIENT: &str = "SELECT id, name FROM clients WHERE id = ?1";
const DELETE_CLIENT: &str = "DELETE FROM clients WHERE id = ?1";

pub struct Clients {
    pub conn: Connection,
}

impl Clients {
    pub fn new() -> Result<Clients> {
        Ok(Clients { conn: Db::new()?.conn })
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Clients> {
        Ok(Clients { conn: Db::open(path)?.conn })
    }

    pub fn insert(&self, client: &Client) -> Result<()> {
        self.conn.execute(INSERT_CLIENT, params![client.id, client.name])?;
        Ok(())
    }

    pub fn fetch(&self) -> Result<Vec<Client>> {
        let mut stmt = self.conn.prepare(SELECT_CLIENTS)?;
        let clients = stmt
            .query_map([], |row| Ok(Client { id: row.get(0)?, name: row.get(1)? }))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(clients)
    }

    pub fn get(&self, id: &str) -> Result<Option<Client>> {
        let mut stmt = self.conn.prepare(SELECT_CLIENT)?;
        let mut rows = stmt.query_map(params![id], |row| Ok(Client { id: row.get(0)?, name: row.get(1)? }))?;
        Ok(rows.next().transpose()?)
    }

    /// Returns the number of rows removed (0 or 1).
    pub fn delete(&self, id: &str) -> Result<usize> {
        Ok(self.conn.execute(DELETE_CLIENT, params![id])?)
    }
}
