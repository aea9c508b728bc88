use clock_code::OffsetCode;
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum RegistryError {
    #[error("location not found: {0}")]
    UnknownLocation(String),

    #[error("duplicated location key: {0}")]
    DuplicatedLocation(String),

    #[error("invalid offset for {key}. {source}")]
    InvalidOffset {
        key: String,
        source: clock_code::Error,
    },
}

pub type Result<T> = std::result::Result<T, RegistryError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Timezone {
    pub abbreviation: String,
    pub name: String,
    pub locations: Vec<String>,
    pub offset: OffsetCode,
}

impl Timezone {
    pub fn new(abbreviation: &str, name: &str, locations: &[&str], offset: OffsetCode) -> Self {
        Self {
            abbreviation: abbreviation.to_string(),
            name: name.to_string(),
            locations: locations.iter().map(|l| l.to_string()).collect(),
            offset,
        }
    }
}

// (key, abbreviation, name, locations, offset code)
const COMMON_TIMEZONES: [(&str, &str, &str, &[&str], i32); 5] = [
    (
        "west-coast",
        "PDT",
        "Pacific Daylight Time",
        &["North America"],
        -700,
    ),
    (
        "east-coast",
        "EST",
        "Eastern Standard Time",
        &["North America", "Caribbean", "Central America"],
        -500,
    ),
    ("aib", "IST", "Irish Standard Time", &["Europe"], 100),
    ("uk", "BST", "British Summer Time", &["Europe"], 100),
    (
        "home",
        "CEST",
        "Central European Summer Time",
        &["Europe", "Antarctica"],
        200,
    ),
];

/// Location key to [`Timezone`]. Built once and only read afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Registry {
    timezones: BTreeMap<String, Timezone>,
}

impl Registry {
    pub fn new<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, Timezone)>,
    {
        let mut timezones = BTreeMap::<String, Timezone>::new();
        for (key, timezone) in entries.into_iter() {
            if timezones.contains_key(&key) {
                return Err(RegistryError::DuplicatedLocation(key));
            }
            timezones.insert(key, timezone);
        }
        Ok(Self { timezones })
    }

    /// The five locations the service ships with.
    pub fn common() -> Result<Self> {
        let entries = COMMON_TIMEZONES
            .iter()
            .map(|(key, abbreviation, name, locations, offset)| {
                let offset =
                    OffsetCode::new(*offset).map_err(|source| RegistryError::InvalidOffset {
                        key: key.to_string(),
                        source,
                    })?;
                Ok((
                    key.to_string(),
                    Timezone::new(abbreviation, name, locations, offset),
                ))
            })
            .collect::<Result<Vec<(String, Timezone)>>>()?;

        Self::new(entries)
    }

    pub fn lookup(&self, key: &str) -> Result<&Timezone> {
        self.timezones
            .get(key)
            .ok_or_else(|| RegistryError::UnknownLocation(key.to_string()))
    }

    pub fn list_all(&self) -> &BTreeMap<String, Timezone> {
        &self.timezones
    }

    pub fn len(&self) -> usize {
        self.timezones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timezones.is_empty()
    }
}
