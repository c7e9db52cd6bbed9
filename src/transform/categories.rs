//! Stat categories and the entity kinds they are reported for

/// One stat category as it appears under an entity's `stats` object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    /// Key in the API document (e.g. "gca")
    pub key: &'static str,
    /// Section label written into player rows (e.g. "goal_creation")
    pub section: &'static str,
    /// Output table / CSV base name for team stats
    pub table: &'static str,
}

impl Category {
    const fn new(key: &'static str, section: &'static str, table: &'static str) -> Self {
        Self {
            key,
            section,
            table,
        }
    }
}

pub const GENERAL: Category = Category::new("stats", "general", "general_stats");
pub const KEEPERS: Category = Category::new("keepers", "keepers", "keeper_stats");
pub const KEEPERS_ADVANCED: Category =
    Category::new("keepersadv", "keepers_advanced", "keeper_stats_advanced");
pub const SHOOTING: Category = Category::new("shooting", "shooting", "shooting_stats");
pub const PASSING: Category = Category::new("passing", "passing", "passing_stats");
pub const PASSING_TYPES: Category =
    Category::new("passing_types", "passing_types", "passing_types_stats");
pub const GOAL_CREATION: Category = Category::new("gca", "goal_creation", "goal_creation_stats");
pub const DEFENSE: Category = Category::new("defense", "defense", "defense_stats");
pub const POSSESSION: Category = Category::new("possession", "possession", "possession_stats");
pub const PLAYING_TIME: Category =
    Category::new("playingtime", "playing_time", "playing_time_stats");
pub const MISC: Category = Category::new("misc", "miscellaneous", "miscellaneous_stats");

pub const TEAM_CATEGORIES: &[Category] = &[
    GENERAL,
    KEEPERS,
    KEEPERS_ADVANCED,
    SHOOTING,
    PASSING,
    PASSING_TYPES,
    GOAL_CREATION,
    DEFENSE,
    POSSESSION,
    PLAYING_TIME,
    MISC,
];

pub const PLAYER_CATEGORIES: &[Category] = &[
    GENERAL,
    SHOOTING,
    PASSING,
    PASSING_TYPES,
    GOAL_CREATION,
    DEFENSE,
    POSSESSION,
    PLAYING_TIME,
    MISC,
];

/// Prefix distinguishing player tables from team tables of the same category
pub const PLAYER_TABLE_PREFIX: &str = "player_";

/// Whether a stats table describes teams or players
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Team,
    Player,
}

impl EntityKind {
    pub fn categories(self) -> &'static [Category] {
        match self {
            EntityKind::Team => TEAM_CATEGORIES,
            EntityKind::Player => PLAYER_CATEGORIES,
        }
    }

    pub fn table_name(self, category: &Category) -> String {
        match self {
            EntityKind::Team => category.table.to_string(),
            EntityKind::Player => format!("{}{}", PLAYER_TABLE_PREFIX, category.table),
        }
    }

    /// Identity fields appended to every flattened row, in output order
    pub fn identity_fields(self) -> &'static [&'static str] {
        match self {
            EntityKind::Team => &["team_id", "team_name"],
            EntityKind::Player => &[
                "player_id",
                "player_name",
                "team_name",
                "player_country_code",
                "player_age",
                "section",
            ],
        }
    }

    /// Key columns of the fact table, in DDL order
    pub fn key_columns(self) -> &'static [&'static str] {
        match self {
            EntityKind::Team => &["team_id", "league_id", "season_id"],
            EntityKind::Player => &["player_id", "league_id", "season_id", "team_id"],
        }
    }

    /// CSV fields that never become stat columns
    pub fn is_reserved_field(self, field: &str) -> bool {
        self.identity_fields().contains(&field) || self.key_columns().contains(&field)
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Team => write!(f, "team"),
            EntityKind::Player => write!(f, "player"),
        }
    }
}
