//! Static lookup tables shared by the source adapters.
//!
//! Sources describe positions and nationalities in their own vocabulary; the
//! adapters normalize both to the codes below so the matcher compares like
//! with like.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Broad playing position, the common denominator of every source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Position {
    Goalkeeper,
    Defender,
    Midfielder,
    Forward,
}

impl Position {
    /// Two-letter code as used on FBref
    pub fn code(&self) -> &'static str {
        match self {
            Position::Goalkeeper => "GK",
            Position::Defender => "DF",
            Position::Midfielder => "MF",
            Position::Forward => "FW",
        }
    }

    /// Normalizes a source-specific position label.
    ///
    /// FBref lists hybrid roles as `FW,MF`; the first one wins.
    pub fn from_label(label: &str) -> Option<Position> {
        let first = label.split([',', '/']).next()?.trim();
        let position = match first.to_ascii_lowercase().as_str() {
            "gk" | "g" | "keeper" | "goalkeeper" | "keepers" => Position::Goalkeeper,
            "df" | "d" | "defender" | "defenders" | "defence" | "centre-back" | "center-back"
            | "left-back" | "right-back" | "sweeper" | "cb" | "lb" | "rb" | "lwb" | "rwb" => {
                Position::Defender
            }
            "mf" | "m" | "midfielder" | "midfielders" | "midfield" | "defensive midfield"
            | "central midfield" | "attacking midfield" | "left midfield" | "right midfield"
            | "dm" | "cm" | "am" | "lm" | "rm" => Position::Midfielder,
            "fw" | "f" | "forward" | "forwards" | "attacker" | "attackers" | "attack"
            | "striker" | "centre-forward" | "center-forward" | "second striker"
            | "left winger" | "right winger" | "st" | "cf" | "lw" | "rw" => Position::Forward,
            _ => return None,
        };
        Some(position)
    }

    /// FotMob encodes usual playing positions as 0 (keeper) to 3 (attacker)
    pub fn from_fotmob_id(id: i64) -> Option<Position> {
        match id {
            0 => Some(Position::Goalkeeper),
            1 => Some(Position::Defender),
            2 => Some(Position::Midfielder),
            3 => Some(Position::Forward),
            _ => None,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Country name to three-letter code, in the code system FotMob and FBref share.
/// The home nations of the UK keep their own football codes.
const COUNTRIES: &[(&str, &str)] = &[
    ("Albania", "ALB"),
    ("Algeria", "ALG"),
    ("Argentina", "ARG"),
    ("Australia", "AUS"),
    ("Austria", "AUT"),
    ("Belgium", "BEL"),
    ("Bosnia-Herzegovina", "BIH"),
    ("Brazil", "BRA"),
    ("Burkina Faso", "BFA"),
    ("Cameroon", "CMR"),
    ("Canada", "CAN"),
    ("Chile", "CHI"),
    ("Colombia", "COL"),
    ("Cote d'Ivoire", "CIV"),
    ("Côte d'Ivoire", "CIV"),
    ("Croatia", "CRO"),
    ("Czech Republic", "CZE"),
    ("Denmark", "DEN"),
    ("DR Congo", "COD"),
    ("Ecuador", "ECU"),
    ("Egypt", "EGY"),
    ("England", "ENG"),
    ("Finland", "FIN"),
    ("France", "FRA"),
    ("Gabon", "GAB"),
    ("Georgia", "GEO"),
    ("Germany", "GER"),
    ("Ghana", "GHA"),
    ("Greece", "GRE"),
    ("Guinea", "GUI"),
    ("Hungary", "HUN"),
    ("Iceland", "ISL"),
    ("Ireland", "IRL"),
    ("Israel", "ISR"),
    ("Italy", "ITA"),
    ("Jamaica", "JAM"),
    ("Japan", "JPN"),
    ("Korea, South", "KOR"),
    ("Mali", "MLI"),
    ("Mexico", "MEX"),
    ("Morocco", "MAR"),
    ("Netherlands", "NED"),
    ("New Zealand", "NZL"),
    ("Nigeria", "NGA"),
    ("Northern Ireland", "NIR"),
    ("Norway", "NOR"),
    ("Paraguay", "PAR"),
    ("Peru", "PER"),
    ("Poland", "POL"),
    ("Portugal", "POR"),
    ("Romania", "ROU"),
    ("Scotland", "SCO"),
    ("Senegal", "SEN"),
    ("Serbia", "SRB"),
    ("Slovakia", "SVK"),
    ("Slovenia", "SVN"),
    ("South Korea", "KOR"),
    ("Spain", "ESP"),
    ("Sweden", "SWE"),
    ("Switzerland", "SUI"),
    ("Tunisia", "TUN"),
    ("Türkiye", "TUR"),
    ("Turkey", "TUR"),
    ("Ukraine", "UKR"),
    ("United States", "USA"),
    ("Uruguay", "URU"),
    ("Venezuela", "VEN"),
    ("Wales", "WAL"),
];

/// Looks up the three-letter code of a country name (case-insensitive).
pub fn country_code(name: &str) -> Option<&'static str> {
    let name = name.trim();
    COUNTRIES
        .iter()
        .find(|(country, _)| country.eq_ignore_ascii_case(name))
        .map(|(_, code)| *code)
}

/// Extracts the code from an FBref nationality cell such as `es ESP`.
pub fn fbref_nation_code(cell: &str) -> Option<String> {
    cell.split_whitespace()
        .last()
        .filter(|code| code.len() == 3 && code.chars().all(|c| c.is_ascii_uppercase()))
        .map(str::to_string)
}
