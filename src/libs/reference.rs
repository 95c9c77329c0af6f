//! Clients and team members referenced by tasks.
//!
//! Tasks only carry their ids; these records exist for listing and for
//! picking valid ids when creating tasks.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ulid::Ulid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: String,
    pub name: String,
}

impl Client {
    pub fn new(name: &str) -> Self {
        Self {
            id: format!("c{}", Ulid::new()),
            name: name.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Manager,
    DataScientist,
    DataEngineer,
    #[default]
    Analyst,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Manager => "manager",
            Role::DataScientist => "datascientist",
            Role::DataEngineer => "dataengineer",
            Role::Analyst => "analyst",
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace([' ', '-', '_'], "").as_str() {
            "manager" => Ok(Role::Manager),
            "datascientist" => Ok(Role::DataScientist),
            "dataengineer" => Ok(Role::DataEngineer),
            "analyst" => Ok(Role::Analyst),
            _ => Err(s.to_string()),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
    /// Initials shown on task cards.
    #[serde(default)]
    pub avatar: String,
}

impl User {
    pub fn new(name: &str, email: &str, role: Role) -> Self {
        let name = name.trim().to_string();
        Self {
            id: format!("u{}", Ulid::new()),
            avatar: initials(&name),
            name,
            email: email.trim().to_lowercase(),
            role,
        }
    }
}

/// Up to two uppercase initials: "Ana Maria Lopez" -> "AM".
pub fn initials(name: &str) -> String {
    name.split_whitespace().filter_map(|word| word.chars().next()).flat_map(char::to_uppercase).take(2).collect()
}
