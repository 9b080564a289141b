//! Seeds an in-memory bank store and prints the three report blocks.
//!
//! Any failure propagates out of `main` and ends the process with a
//! non-zero exit code.

use banco_core::db::open_url;
use banco_core::{
    banking_schema, init_logging_from, seed_sample_data, AppConfig, ReportService,
    SqliteAccountRepository, SqliteCustomerRepository,
};
use log::info;
use std::error::Error;
use std::io;

fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::default();
    if let Err(err) = init_logging_from(&config) {
        eprintln!("warning: file logging disabled: {err}");
    }

    let schema = banking_schema()?;
    let mut conn = open_url(&config.database_url, &schema)?;
    seed_sample_data(&mut conn)?;

    let report = ReportService::new(
        SqliteCustomerRepository::new(&conn),
        SqliteAccountRepository::new(&conn),
    )
    .run()?;
    report.write_to(&mut io::stdout().lock())?;

    info!("event=app_finish module=cli status=ok lines={}", report.lines().len());
    Ok(())
}
