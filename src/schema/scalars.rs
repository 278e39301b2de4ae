//! Top-level scalar columns of a player row

/// Where a scalar column takes its value from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarSource {
    /// Date of the polling run
    RunDate,
    /// The player identifier the record was requested with
    Uid,
    /// A top-level field of the player record
    Field(&'static str),
}

/// Storage affinity of a column in relational sinks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Affinity {
    Text,
    Numeric,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScalarColumn {
    pub name: &'static str,
    pub source: ScalarSource,
    pub affinity: Affinity,
}

impl ScalarColumn {
    pub const fn field(name: &'static str, json_field: &'static str) -> Self {
        Self {
            name,
            source: ScalarSource::Field(json_field),
            affinity: Affinity::Numeric,
        }
    }

    pub const fn text(self) -> Self {
        Self {
            affinity: Affinity::Text,
            ..self
        }
    }

    pub const fn run_date(name: &'static str) -> Self {
        Self {
            name,
            source: ScalarSource::RunDate,
            affinity: Affinity::Text,
        }
    }

    pub const fn uid(name: &'static str) -> Self {
        Self {
            name,
            source: ScalarSource::Uid,
            affinity: Affinity::Text,
        }
    }
}

pub const DATE_COLUMN: &str = "Date";
pub const UID_COLUMN: &str = "UserID";

pub static SCALAR_COLUMNS: &[ScalarColumn] = &[
    ScalarColumn::run_date(DATE_COLUMN),
    ScalarColumn::field("Squad", "squad").text(),
    ScalarColumn::field("Name", "nick").text(),
    ScalarColumn::uid(UID_COLUMN),
    ScalarColumn::field("Level", "level"),
    ScalarColumn::field("XP", "xp"),
    ScalarColumn::field("JoinTime", "joinTime"),
    ScalarColumn::field("PingTime", "ping_time"),
    ScalarColumn::field("Banned", "banned"),
    ScalarColumn::field("Coins", "coins"),
    ScalarColumn::field("KillsELO", "killsELO"),
    ScalarColumn::field("GamesELO", "gamesELO"),
    ScalarColumn::field("Number_of_Jumps", "number_of_jumps"),
    ScalarColumn::field("Zombie_Deaths", "zombie_deaths"),
    ScalarColumn::field("Zombie_Kills", "zombie_kills"),
    ScalarColumn::field("Zombie_Wins", "zombie_wins"),
    ScalarColumn::field("Time", "time"),
    ScalarColumn::field("Time_Alive_Count", "time_alive_count"),
    ScalarColumn::field("Time_Alive_Longest", "time_alive_longest"),
    ScalarColumn::field("Time_Alive", "time_alive"),
    ScalarColumn::field("Zombie_Time_Alive_Count", "zombie_time_alive_count"),
    ScalarColumn::field("Zombie_Time_Alive", "zombie_time_alive"),
    ScalarColumn::field("Scuds_Launched", "scuds_launched"),
];

/// Affinity of a column by name. Only scalar columns can be text.
pub fn column_affinity(name: &str) -> Affinity {
    SCALAR_COLUMNS
        .iter()
        .find(|c| c.name == name)
        .map(|c| c.affinity)
        .unwrap_or(Affinity::Numeric)
}
