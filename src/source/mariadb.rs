//! MariaDB / MySQL status source.
//!
//! Reads global status counters and the process list over one reusable
//! connection. Any failure drops the connection; the next fetch reconnects.
//! One fetch stops issuing queries once its time budget is spent, so a slow
//! server costs at most about twice the configured timeout per cycle.

use std::io;
use std::time::{Duration, Instant};

use mysql::prelude::Queryable;
use mysql::{Conn, OptsBuilder, Row};
use tracing::debug;

use super::StatsSource;
use crate::data::{
    ProcessRow, ServerStatus, UserConnections, MAX_ACTIVE_PROCESSES, MAX_USER_CONNECTIONS,
};
use crate::error::SourceError;

/// Connection parameters for the stats source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    /// Bound applied to connect, read and write separately.
    pub timeout: Duration,
}

/// Stats source backed by a live server connection.
pub struct MySqlStatsSource {
    settings: ConnectionSettings,
    description: String,
    conn: Option<Conn>,
}

impl std::fmt::Debug for MySqlStatsSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MySqlStatsSource")
            .field("description", &self.description)
            .field("connected", &self.conn.is_some())
            .finish()
    }
}

impl MySqlStatsSource {
    pub fn new(settings: ConnectionSettings) -> Self {
        let description = format!(
            "mysql://{}@{}:{}/{}",
            settings.user, settings.host, settings.port, settings.database
        );
        Self {
            settings,
            description,
            conn: None,
        }
    }

    /// Whether a connection is currently held open.
    pub fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    fn ensure_connected(&mut self) -> Result<&mut Conn, SourceError> {
        if self.conn.is_none() {
            let s = &self.settings;
            let opts = OptsBuilder::new()
                .ip_or_hostname(Some(s.host.as_str()))
                .tcp_port(s.port)
                .user(Some(s.user.as_str()))
                .pass(Some(s.password.as_str()))
                .db_name(Some(s.database.as_str()))
                .tcp_connect_timeout(Some(s.timeout))
                .read_timeout(Some(s.timeout))
                .write_timeout(Some(s.timeout));

            let conn = Conn::new(opts).map_err(|e| connect_error(e, s.timeout))?;
            debug!(source = %self.description, "connected");
            self.conn = Some(conn);
        }

        self.conn
            .as_mut()
            .ok_or_else(|| SourceError::Connection("connection not established".to_string()))
    }
}

impl StatsSource for MySqlStatsSource {
    fn fetch(&mut self) -> Result<ServerStatus, SourceError> {
        let budget = Budget::new(self.settings.timeout);
        let conn = self.ensure_connected()?;
        match read_status(conn, &budget) {
            Ok(status) => Ok(status),
            Err(e) => {
                // The session may be half-read; start clean next time.
                self.conn = None;
                Err(e)
            }
        }
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// Wall-clock allowance for one fetch, checked before each query.
#[derive(Debug, Clone, Copy)]
struct Budget {
    started: Instant,
    limit: Duration,
}

impl Budget {
    fn new(limit: Duration) -> Self {
        Self {
            started: Instant::now(),
            limit,
        }
    }

    fn check(&self) -> Result<Duration, SourceError> {
        if self.started.elapsed() >= self.limit {
            return Err(SourceError::Timeout(self.limit));
        }
        Ok(self.limit)
    }
}

fn read_status(conn: &mut Conn, budget: &Budget) -> Result<ServerStatus, SourceError> {
    let max_connections = read_counter(
        conn,
        "SHOW GLOBAL VARIABLES LIKE 'max_connections'",
        "max_connections",
        budget.check()?,
    )?;
    let current_connections = read_status_counter(conn, "Threads_connected", budget.check()?)?;
    let threads_running = read_status_counter(conn, "Threads_running", budget.check()?)?;
    let max_used_connections =
        read_status_counter(conn, "Max_used_connections", budget.check()?)?;
    let aborted_connects = read_status_counter(conn, "Aborted_connects", budget.check()?)?;

    let active_processes = query_rows(conn, &active_processes_query(), budget.check()?)?
        .into_iter()
        .map(process_row)
        .collect::<Result<Vec<_>, _>>()?;

    let user_connections = query_rows(conn, &user_connections_query(), budget.check()?)?
        .into_iter()
        .map(user_row)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ServerStatus {
        max_connections,
        current_connections,
        threads_running,
        max_used_connections,
        aborted_connects,
        active_processes,
        user_connections,
    })
}

fn active_processes_query() -> String {
    format!(
        "SELECT User, Host, db, Command, Time, State \
         FROM INFORMATION_SCHEMA.PROCESSLIST \
         WHERE Command != 'Sleep' \
         ORDER BY Time DESC \
         LIMIT {}",
        MAX_ACTIVE_PROCESSES
    )
}

fn user_connections_query() -> String {
    format!(
        "SELECT User, COUNT(*) AS count \
         FROM INFORMATION_SCHEMA.PROCESSLIST \
         GROUP BY User \
         ORDER BY count DESC \
         LIMIT {}",
        MAX_USER_CONNECTIONS
    )
}

fn read_status_counter(conn: &mut Conn, name: &str, timeout: Duration) -> Result<u64, SourceError> {
    let query = format!("SHOW GLOBAL STATUS LIKE '{}'", name);
    read_counter(conn, &query, name, timeout)
}

/// Read the `Value` column of a two-column `SHOW ... LIKE` result.
fn read_counter(
    conn: &mut Conn,
    query: &str,
    name: &str,
    timeout: Duration,
) -> Result<u64, SourceError> {
    let row: Option<Row> = conn.query_first(query).map_err(|e| query_error(e, timeout))?;
    let row = row.ok_or_else(|| SourceError::NoRows(name.to_string()))?;
    let (_, value): (String, String) =
        mysql::from_row_opt(row).map_err(|e| SourceError::parse(name, e.to_string()))?;
    parse_counter(name, &value)
}

fn query_rows(conn: &mut Conn, query: &str, timeout: Duration) -> Result<Vec<Row>, SourceError> {
    conn.query(query).map_err(|e| query_error(e, timeout))
}

fn process_row(row: Row) -> Result<ProcessRow, SourceError> {
    type Columns = (
        Option<String>,
        Option<String>,
        Option<String>,
        Option<String>,
        Option<i64>,
        Option<String>,
    );
    let (user, host, database, command, time, state): Columns =
        mysql::from_row_opt(row).map_err(|e| SourceError::parse("PROCESSLIST", e.to_string()))?;

    Ok(ProcessRow {
        user,
        host,
        database,
        command,
        elapsed_seconds: time.unwrap_or(0).max(0) as u64,
        state,
    })
}

fn user_row(row: Row) -> Result<UserConnections, SourceError> {
    let (user, count): (Option<String>, i64) =
        mysql::from_row_opt(row).map_err(|e| SourceError::parse("PROCESSLIST", e.to_string()))?;
    Ok(UserConnections {
        user,
        count: count.max(0) as u64,
    })
}

/// Parse a status counter value.
pub(crate) fn parse_counter(name: &str, value: &str) -> Result<u64, SourceError> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|_| SourceError::parse(name, value))
}

fn is_timeout(e: &mysql::Error) -> bool {
    matches!(
        e,
        mysql::Error::IoError(err) if matches!(err.kind(), io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock)
    )
}

fn connect_error(e: mysql::Error, timeout: Duration) -> SourceError {
    if is_timeout(&e) {
        SourceError::Timeout(timeout)
    } else {
        SourceError::Connection(e.to_string())
    }
}

fn query_error(e: mysql::Error, timeout: Duration) -> SourceError {
    if is_timeout(&e) {
        SourceError::Timeout(timeout)
    } else {
        SourceError::Query(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(port: u16) -> ConnectionSettings {
        ConnectionSettings {
            host: "127.0.0.1".to_string(),
            port,
            user: "monitor".to_string(),
            password: "secret".to_string(),
            database: "reporting".to_string(),
            timeout: Duration::from_millis(500),
        }
    }

    #[test]
    fn test_description_omits_password() {
        let source = MySqlStatsSource::new(settings(3306));
        assert_eq!(source.description(), "mysql://monitor@127.0.0.1:3306/reporting");
        assert!(!format!("{:?}", source).contains("secret"));
        assert!(!source.is_connected());
    }

    #[test]
    fn test_parse_counter() {
        assert_eq!(parse_counter("Threads_connected", "17"), Ok(17));
        assert_eq!(parse_counter("Threads_connected", " 4\n"), Ok(4));
        assert_eq!(
            parse_counter("Threads_connected", "ON").unwrap_err().kind(),
            "parse"
        );
        assert!(parse_counter("Aborted_connects", "-1").is_err());
    }

    #[test]
    fn test_queries_respect_row_caps() {
        assert!(active_processes_query().ends_with("LIMIT 8"));
        assert!(active_processes_query().contains("Command != 'Sleep'"));
        assert!(user_connections_query().ends_with("LIMIT 5"));
    }

    #[test]
    fn test_timeout_errors_are_classified() {
        let timeout = Duration::from_secs(2);
        let err = mysql::Error::IoError(io::Error::new(io::ErrorKind::TimedOut, "slow"));
        assert_eq!(connect_error(err, timeout), SourceError::Timeout(timeout));

        let err = mysql::Error::IoError(io::Error::new(io::ErrorKind::ConnectionRefused, "no"));
        assert_eq!(connect_error(err, timeout).kind(), "connection");

        let err = mysql::Error::IoError(io::Error::new(io::ErrorKind::BrokenPipe, "gone"));
        assert_eq!(query_error(err, timeout).kind(), "query");
    }

    #[test]
    fn test_spent_budget_stops_queries() {
        let budget = Budget::new(Duration::ZERO);
        assert_eq!(budget.check(), Err(SourceError::Timeout(Duration::ZERO)));

        let budget = Budget::new(Duration::from_secs(60));
        assert_eq!(budget.check(), Ok(Duration::from_secs(60)));
    }

    #[test]
    fn test_unreachable_server_is_an_error() {
        // Nothing listens on port 1; the fetch must fail without a connection.
        let mut source = MySqlStatsSource::new(settings(1));
        let err = source.fetch().unwrap_err();
        assert!(matches!(err.kind(), "connection" | "timeout"), "{:?}", err);
        assert!(!source.is_connected());
    }
}
