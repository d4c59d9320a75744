//! Example wiring a logger tree from properties
//!
//! This example shows how to:
//! 1. Surface the crate's own diagnostics through a `tracing` subscriber
//! 2. Load a property source (inline JSON here, a file in a real host)
//! 3. Apply it in the hierarchical dialect and inspect the report
//! 4. Log through named loggers and shut the sinks down
//!
//! Run with `RUST_LOG=arbor_log=debug` to watch the wiring steps.

use arbor_log::prelude::*;
use arbor_log::{DIAGNOSTIC_TARGET, Dialect};
use tracing_subscriber::EnvFilter;

const CONFIG: &str = r#"{
    "arbor.rootLogger": "INFO, console",
    "arbor.logger.app.db": "DEBUG, audit",
    "arbor.logger.app.http": "WARN",
    "arbor.logger.app.cache": "TRACE, missing",

    "arbor.appender.console": "ConsoleSink",
    "arbor.appender.console.formatter": "PatternFormatter",
    "arbor.appender.console.formatter.pattern": "%d{ABSOLUTE} %-5P %c - %m %T",

    "arbor.appender.audit": "FileSink",
    "arbor.appender.audit.file": "target/arbor-example/audit.log",
    "arbor.appender.audit.append": "false",
    "arbor.appender.audit.formatter": "SimpleFormatter"
}"#;

#[derive(Debug, thiserror::Error)]
#[error("query timed out")]
struct QueryTimeout(#[source] std::io::Error);

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("{DIAGNOSTIC_TARGET}=warn"))),
        )
        .with_target(true)
        .init();

    let repository = Repository::builder().client_id("example").build();
    let properties: Properties = serde_json::from_str(CONFIG)?;
    let report = repository.configure(&properties);

    assert_eq!(report.dialect(), Dialect::Hierarchical);
    println!("configured with {} problem(s):", report.errors().len());
    for problem in report.errors() {
        println!("  - {problem}");
    }

    let http = repository.get_logger("app.http.server");
    let db = repository.get_logger("app.db.pool");

    info!(http, "not shown: app.http is at WARN");
    warn!(http, "slow request: {} ms", 1_250);

    // app.db has its own file sink; it does not inherit the root console
    debug!(db, "checked out connection {}", 7);
    let timeout = QueryTimeout(std::io::Error::other("socket read"));
    error!(db, err = &timeout, "dropping connection {}", 7);

    let root = repository.root_logger();
    info!(root, "effective level of app.db.pool: {}", db.effective_level());

    repository.shutdown()?;
    Ok(())
}
