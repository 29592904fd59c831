pub mod aggregation;
pub mod financial_data_service;
pub mod ingestion_service;
pub mod query_validation;
