use duckdb::Connection;

struct Migration {
    version: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "0001_core_tables",
        sql: r#"
CREATE SEQUENCE IF NOT EXISTS stocks_id_seq;

CREATE TABLE IF NOT EXISTS stocks (
    id INTEGER PRIMARY KEY DEFAULT nextval('stocks_id_seq'),
    ticker TEXT NOT NULL UNIQUE,
    company_name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS stock_data (
    stock_id INTEGER NOT NULL,
    date DATE NOT NULL,
    open DOUBLE NOT NULL,
    high DOUBLE NOT NULL,
    low DOUBLE NOT NULL,
    close DOUBLE NOT NULL,
    volume BIGINT NOT NULL,
    PRIMARY KEY (stock_id, date)
);
"#,
    },
    Migration {
        version: "0002_indexes",
        sql: r#"
CREATE INDEX IF NOT EXISTS idx_stock_data_date ON stock_data(date);
"#,
    },
];

pub fn apply_migrations(connection: &Connection) -> Result<(), duckdb::Error> {
    connection.execute_batch(
        r#"
CREATE TABLE IF NOT EXISTS schema_migrations (
    version TEXT PRIMARY KEY,
    applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
);
"#,
    )?;

    for migration in MIGRATIONS {
        let query = format!(
            "SELECT COUNT(*) FROM schema_migrations WHERE version = '{}'",
            escape_sql_string(migration.version)
        );
        let applied_count: i64 = connection.query_row(query.as_str(), [], |row| row.get(0))?;

        if applied_count == 0 {
            connection.execute_batch(migration.sql)?;
            let insert = format!(
                "INSERT INTO schema_migrations (version) VALUES ('{}')",
                escape_sql_string(migration.version)
            );
            connection.execute_batch(insert.as_str())?;
        }
    }

    Ok(())
}

fn escape_sql_string(value: &str) -> String {
    value.replace('\'', "''")
}
