//! Record store
//!
//! `RecordStore` is the read seam the analytics consume. `JsonFileStore`
//! keeps every user's challenge cycle in a single JSON file:
//!
//! ```json
//! { "users": [ { "username": "...", "cycle_start": "2024-03-01",
//!                "current_day": 5, "goals": [...], "records": [...] } ] }
//! ```
//!
//! Every read parses the file once, so a `snapshot` is consistent even if a
//! writer replaces the file concurrently. Writes go to a temp file in the
//! same directory which is then renamed over the original.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::models::{parse_date, GoalDefinition, GoalId, History, PunchRecord};

/// Read access to a user's goals and punch records
pub trait RecordStore {
    /// Punch records as stored (unvalidated, any order)
    fn get_records(&self, user: &str) -> Result<Vec<PunchRecord>>;

    fn get_goals(&self, user: &str) -> Result<Vec<GoalDefinition>>;

    /// Validated goals and records from a single read
    fn snapshot(&self, user: &str) -> Result<History> {
        let goals = self.get_goals(user)?;
        let records = self.get_records(user)?;
        History::new(goals, &records)
    }
}

/// One user's active challenge cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub username: String,
    pub cycle_start: NaiveDate,
    /// 1-based day of the cycle reached by the latest punch-in
    pub current_day: u32,
    pub goals: Vec<GoalDefinition>,
    #[serde(default)]
    pub records: Vec<PunchRecord>,
}

impl UserProfile {
    /// 1-based cycle day for a date (0 for dates before the cycle started)
    pub fn day_of_cycle(&self, date: NaiveDate) -> u32 {
        let elapsed = (date - self.cycle_start).num_days();
        if elapsed < 0 {
            0
        } else {
            elapsed as u32 + 1
        }
    }

    pub fn history(&self) -> Result<History> {
        History::new(self.goals.clone(), &self.records)
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    #[serde(default)]
    users: Vec<UserProfile>,
}

impl StoreFile {
    fn user(&self, username: &str) -> Result<&UserProfile> {
        self.users
            .iter()
            .find(|u| u.username == username)
            .ok_or_else(|| Error::NotFound(format!("User '{}'", username)))
    }

    fn user_mut(&mut self, username: &str) -> Result<&mut UserProfile> {
        self.users
            .iter_mut()
            .find(|u| u.username == username)
            .ok_or_else(|| Error::NotFound(format!("User '{}'", username)))
    }
}

/// Record store backed by one JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Usernames in file order
    pub fn users(&self) -> Result<Vec<String>> {
        Ok(self.load()?.users.into_iter().map(|u| u.username).collect())
    }

    pub fn profile(&self, user: &str) -> Result<UserProfile> {
        self.load()?.user(user).cloned()
    }

    /// Start (or restart) a challenge cycle
    ///
    /// Goals get ids 1..=n in label order and all existing records for the
    /// user are dropped. Creates the user if needed.
    pub fn start_cycle(
        &self,
        user: &str,
        labels: &[String],
        start: NaiveDate,
    ) -> Result<UserProfile> {
        if user.trim().is_empty() {
            return Err(Error::Validation("Username must not be empty".into()));
        }
        if labels.is_empty() {
            return Err(Error::Validation("A cycle needs at least one goal".into()));
        }

        let goals = labels
            .iter()
            .enumerate()
            .map(|(idx, label)| {
                let label = label.trim();
                if label.is_empty() {
                    Err(Error::Validation(format!("Goal {} has an empty label", idx + 1)))
                } else {
                    Ok(GoalDefinition::new(idx as GoalId + 1, label))
                }
            })
            .collect::<Result<Vec<_>>>()?;

        let profile = UserProfile {
            username: user.to_string(),
            cycle_start: start,
            current_day: 1,
            goals,
            records: Vec::new(),
        };

        let mut file = self.load()?;
        match file.users.iter_mut().find(|u| u.username == user) {
            Some(existing) => *existing = profile.clone(),
            None => file.users.push(profile.clone()),
        }
        self.save(&file)?;

        info!(
            user = %user,
            goals = profile.goals.len(),
            start = %start,
            "Started challenge cycle"
        );
        Ok(profile)
    }

    /// Append a record, or replace the one already stored for its date
    ///
    /// The whole history is revalidated before anything is written, so a
    /// bad date or an unknown goal id leaves the file untouched.
    pub fn upsert_record(&self, user: &str, record: PunchRecord) -> Result<UserProfile> {
        let date = parse_date(&record.date)?;

        let mut file = self.load()?;
        let profile = file.user_mut(user)?;
        if date < profile.cycle_start {
            return Err(Error::Validation(format!(
                "{} is before the cycle start {}",
                date, profile.cycle_start
            )));
        }

        let record = PunchRecord::new(date.to_string(), record.completion);
        let replaced = match profile
            .records
            .iter_mut()
            .find(|r| parse_date(&r.date).ok() == Some(date))
        {
            Some(existing) => {
                *existing = record;
                true
            }
            None => {
                profile.records.push(record);
                false
            }
        };
        profile.history()?;

        profile.current_day = profile.current_day.max(profile.day_of_cycle(date));
        let updated = profile.clone();
        self.save(&file)?;

        debug!(user = %user, date = %date, replaced, "Stored punch record");
        Ok(updated)
    }

    fn load(&self) -> Result<StoreFile> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "Store file missing, starting empty");
            return Ok(StoreFile::default());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(StoreFile::default());
        }
        serde_json::from_str(&content).map_err(|e| {
            Error::InvalidData(format!(
                "Store file {} is not valid: {}",
                self.path.display(),
                e
            ))
        })
    }

    fn save(&self, file: &StoreFile) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let mut tmp = NamedTempFile::new_in(&dir)?;
        serde_json::to_writer_pretty(&mut tmp, file)?;
        tmp.write_all(b"\n")?;
        tmp.flush()?;
        tmp.persist(&self.path).map_err(|e| Error::Io(e.error))?;
        Ok(())
    }
}

impl RecordStore for JsonFileStore {
    fn get_records(&self, user: &str) -> Result<Vec<PunchRecord>> {
        Ok(self.load()?.user(user)?.records.clone())
    }

    fn get_goals(&self, user: &str) -> Result<Vec<GoalDefinition>> {
        Ok(self.load()?.user(user)?.goals.clone())
    }

    fn snapshot(&self, user: &str) -> Result<History> {
        self.load()?.user(user)?.history()
    }
}
