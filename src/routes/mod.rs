pub(crate) mod financial_data;
pub(crate) mod health;
pub(crate) mod openapi;
