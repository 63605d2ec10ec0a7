//! Query option enums shared by both trade directions.

use std::str::FromStr;

/// Monthly value fields broken down by conveyance: air, vessel, and
/// containerized. Always requested; dropped during aggregation when the
/// caller excludes transport detail.
pub(crate) const TRANSPORT_FIELDS: [&str; 3] = ["AIR_VAL_MO", "VES_VAL_MO", "CNT_VAL_MO"];

/// Trade flow direction. Selects the upstream endpoint and the
/// direction-specific commodity and value fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Exports,
    Imports,
}

impl Direction {
    pub(crate) fn path(&self) -> &'static str {
        match self {
            Direction::Exports => "/data/timeseries/intltrade/exports/hs",
            Direction::Imports => "/data/timeseries/intltrade/imports/hs",
        }
    }

    /// Field carrying the HS2 commodity code in this direction.
    pub(crate) fn commodity_field(&self) -> &'static str {
        match self {
            Direction::Exports => "E_COMMODITY",
            Direction::Imports => "I_COMMODITY",
        }
    }

    /// Field carrying the primary monthly trade value in this direction.
    pub(crate) fn value_field(&self) -> &'static str {
        match self {
            Direction::Exports => "ALL_VAL_MO",
            Direction::Imports => "GEN_VAL_MO",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Direction::Exports => "exports",
                Direction::Imports => "imports",
            }
        )
    }
}

impl FromStr for Direction {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "exports" => Ok(Direction::Exports),
            "imports" => Ok(Direction::Imports),
            _ => Err(()),
        }
    }
}

/// Temporal granularity of the returned rows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Period {
    /// One row per month, as reported by the API. This is the default.
    #[default]
    Month,
    /// Monthly rows are summed into one row per year.
    Year,
}

impl FromStr for Period {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "month" => Ok(Period::Month),
            "year" => Ok(Period::Year),
            _ => Err(()),
        }
    }
}

/// Commodity enrichment level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Granularity {
    /// Enrich each HS2 code with its name. This is the default.
    #[default]
    Hs2,
    /// Group HS2 codes into their broader sections.
    Hs2Section,
}

impl FromStr for Granularity {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hs2" => Ok(Granularity::Hs2),
            "hs2_section" => Ok(Granularity::Hs2Section),
            _ => Err(()),
        }
    }
}

/// Whether transport-mode value columns are kept in the result.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Transport {
    /// Keep air/vessel/container values as separate columns. This is the
    /// default.
    #[default]
    Included,
    /// Drop the transport columns, leaving only the primary value.
    Excluded,
}

impl FromStr for Transport {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            // "all" is the legacy spelling of "yes".
            "yes" | "all" => Ok(Transport::Included),
            "no" => Ok(Transport::Excluded),
            _ => Err(()),
        }
    }
}
