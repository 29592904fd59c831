//! Background jobs.
//!
//! - `ingestion_job` - pulls recent daily quotes for every tracked symbol and
//!   upserts them into `financial_data`, once or on a cron schedule.

pub mod ingestion_job;
