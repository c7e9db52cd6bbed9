//! Reference (dimension) tables: fixed columns, independent of the data

use super::types::*;

pub fn leagues() -> TableSchema {
    TableSchema::new("leagues")
        .column(Column::required("league_id", ColumnType::Text))
        .column(Column::required("league_name", ColumnType::Text))
        .column(Column::required("country", ColumnType::Text))
        .primary_key(&["league_id"])
}

pub fn seasons() -> TableSchema {
    TableSchema::new("seasons")
        .column(Column::required("season_id", ColumnType::Text))
        .column(Column::new("start_year", ColumnType::Integer))
        .column(Column::new("end_year", ColumnType::Integer))
        .primary_key(&["season_id"])
}

pub fn teams() -> TableSchema {
    TableSchema::new("teams")
        .column(Column::required("team_id", ColumnType::Text))
        .column(Column::required("team_name", ColumnType::Text))
        .column(Column::required("league_id", ColumnType::Text))
        .column(Column::required("season_id", ColumnType::Text))
        .primary_key(&["team_id", "league_id", "season_id"])
        .foreign_key(ForeignKey::same_columns(&["league_id"], "leagues"))
        .foreign_key(ForeignKey::same_columns(&["season_id"], "seasons"))
}

pub fn players() -> TableSchema {
    TableSchema::new("players")
        .column(Column::required("player_id", ColumnType::Text))
        .column(Column::required("player_name", ColumnType::Text))
        .column(Column::required("team_id", ColumnType::Text))
        .column(Column::required("league_id", ColumnType::Text))
        .column(Column::required("season_id", ColumnType::Text))
        .column(Column::new("player_country_code", ColumnType::Text))
        .column(Column::new("player_age", ColumnType::Integer))
        .primary_key(&["player_id", "league_id", "season_id"])
        .foreign_key(ForeignKey::same_columns(
            &["team_id", "league_id", "season_id"],
            "teams",
        ))
}

/// All reference tables, parents before children
pub fn reference_tables() -> Vec<TableSchema> {
    vec![leagues(), seasons(), teams(), players()]
}
