use rusqlite::Row;

/// Maps a row selected by column name into a model.
pub trait FromSqliteRow: Sized {
    fn from_row(row: &Row) -> rusqlite::Result<Self>;
}
