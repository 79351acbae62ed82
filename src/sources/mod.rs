//! Source adapters.
//!
//! Each adapter turns typed parameters into one [`FetchDescriptor`] and the
//! matching raw response into one typed record. Adapters are pure and keep no
//! state between calls; the fusion layer composes them.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::data_fetcher::{FetchDescriptor, RawResponse};
use crate::error::AppError;

/// Implements [`Stat`] for records with `id` and `name` string fields.
macro_rules! impl_stat {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::sources::Stat for $ty {
                fn id(&self) -> &str {
                    &self.id
                }

                fn name(&self) -> &str {
                    &self.name
                }
            }
        )+
    };
}

pub mod codes;
pub mod fbref;
pub mod fotmob;
pub mod html;
pub mod official;
pub mod season;
pub mod transfermarkt;

pub use codes::Position;
pub use season::Season;

/// The external origins of football data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Fotmob,
    Fbref,
    Official,
    Transfermarkt,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Source::Fotmob => "FotMob",
            Source::Fbref => "FBref",
            Source::Official => "Official",
            Source::Transfermarkt => "Transfermarkt",
        };
        f.write_str(name)
    }
}

/// Minimal identity every source record exposes.
pub trait Stat {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
}

/// Uniform contract between the core and a per-source extractor.
pub trait SourceAdapter {
    type Output;

    fn source(&self) -> Source;

    fn descriptor(&self) -> FetchDescriptor;

    /// Parses one raw response. Errors here signal upstream format drift.
    fn parse(&self, raw: &RawResponse) -> Result<Self::Output, AppError>;
}

/// Identity of a record on a path-addressed site (FBref, Transfermarkt),
/// enough to request its page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathRef {
    pub id: String,
    pub path_name: Option<String>,
}

impl PathRef {
    pub fn new(id: impl Into<String>, path_name: Option<String>) -> Self {
        PathRef {
            id: id.into(),
            path_name,
        }
    }
}

/// Goals of one side of a fixture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideScore {
    pub id: String,
    pub name: String,
    pub score: Option<u32>,
}

/// Joins a base URL and a path without doubling slashes.
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
