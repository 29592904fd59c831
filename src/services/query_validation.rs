use chrono::{Duration, NaiveDate};

use crate::errors::ValidationErrors;
use crate::models::{
    parse_iso_date, FinancialDataQuery, RawFinancialDataQuery, RawStatisticsQuery,
    StatisticsQuery, Symbol,
};

pub const DEFAULT_LIMIT: i64 = 5;
pub const DEFAULT_PAGE: i64 = 1;

/// Statistics may only look this many days back from today.
pub const STATISTICS_LOOKBACK_DAYS: i64 = 14;

/// Check the record lookup parameters against `today`.
///
/// Each field reports at most one message (the first rule it breaks), but
/// every field is checked, so all problems come back together.
pub fn validate_financial_data_query(
    raw: &RawFinancialDataQuery,
    today: NaiveDate,
) -> Result<FinancialDataQuery, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let symbol = present(&raw.symbol).and_then(|s| parse_symbol(s, &mut errors));
    let (start_date, end_date) = check_date_range(
        DateField::optional("start_date", &raw.start_date),
        DateField::optional("end_date", &raw.end_date),
        today,
        None,
        &mut errors,
    );
    let limit = parse_at_least_one("limit", &raw.limit, DEFAULT_LIMIT, &mut errors);
    let page = parse_at_least_one("page", &raw.page, DEFAULT_PAGE, &mut errors);

    if !errors.is_empty() {
        return Err(errors);
    }
    Ok(FinancialDataQuery {
        symbol,
        start_date,
        end_date,
        limit,
        page,
    })
}

/// Check the statistics parameters against `today`. All three are required
/// and both dates must fall within the lookback window.
pub fn validate_statistics_query(
    raw: &RawStatisticsQuery,
    today: NaiveDate,
) -> Result<StatisticsQuery, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let symbol = match present(&raw.symbol) {
        Some(s) => parse_symbol(s, &mut errors),
        None => {
            errors.push("symbol is required");
            None
        }
    };
    let earliest = today - Duration::days(STATISTICS_LOOKBACK_DAYS);
    let (start_date, end_date) = check_date_range(
        DateField::required("start_date", &raw.start_date),
        DateField::required("end_date", &raw.end_date),
        today,
        Some(earliest),
        &mut errors,
    );

    match (symbol, start_date, end_date) {
        (Some(symbol), Some(start_date), Some(end_date)) if errors.is_empty() => {
            Ok(StatisticsQuery {
                symbol,
                start_date,
                end_date,
            })
        }
        _ => Err(errors),
    }
}

struct DateField<'a> {
    name: &'static str,
    raw: Option<&'a str>,
    required: bool,
}

impl<'a> DateField<'a> {
    fn optional(name: &'static str, raw: &'a Option<String>) -> Self {
        Self { name, raw: present(raw), required: false }
    }

    fn required(name: &'static str, raw: &'a Option<String>) -> Self {
        Self { name, raw: present(raw), required: true }
    }

    fn parse(&self, errors: &mut ValidationErrors) -> Option<NaiveDate> {
        match self.raw {
            None => {
                if self.required {
                    errors.push(format!("{} is required", self.name));
                }
                None
            }
            Some(raw) => match parse_iso_date(raw) {
                Some(date) => Some(date),
                None => {
                    errors.push(format!(
                        "{} must be a valid date in YYYY-MM-DD format, got {:?}",
                        self.name, raw
                    ));
                    None
                }
            },
        }
    }
}

/// Parse both bounds, then apply the ordering, "not after today" and optional
/// lookback rules. A bound that breaks a rule is dropped from the result.
fn check_date_range(
    start: DateField<'_>,
    end: DateField<'_>,
    today: NaiveDate,
    earliest: Option<NaiveDate>,
    errors: &mut ValidationErrors,
) -> (Option<NaiveDate>, Option<NaiveDate>) {
    let start_date = start.parse(errors);
    let end_date = end.parse(errors);

    let end_violation = end_date.and_then(|date| bound_violation(end.name, date, today, earliest));
    // Only an end date that passed its own checks is compared against.
    let valid_end = end_date.filter(|_| end_violation.is_none());
    let start_violation = start_date.and_then(|date| {
        if valid_end.is_some_and(|end| date > end) {
            Some(format!("{} must be before {}", start.name, end.name))
        } else {
            bound_violation(start.name, date, today, earliest)
        }
    });

    (
        keep_unless_violated(start_date, start_violation, errors),
        keep_unless_violated(end_date, end_violation, errors),
    )
}

fn keep_unless_violated(
    date: Option<NaiveDate>,
    violation: Option<String>,
    errors: &mut ValidationErrors,
) -> Option<NaiveDate> {
    match violation {
        Some(message) => {
            errors.push(message);
            None
        }
        None => date,
    }
}

fn bound_violation(
    name: &str,
    date: NaiveDate,
    today: NaiveDate,
    earliest: Option<NaiveDate>,
) -> Option<String> {
    if date > today {
        return Some(format!("{} cannot be later than today", name));
    }
    match earliest {
        Some(earliest) if date < earliest => Some(format!(
            "{} should be greater than or equal to {}",
            name,
            earliest.format("%Y-%m-%d")
        )),
        _ => None,
    }
}

fn parse_symbol(raw: &str, errors: &mut ValidationErrors) -> Option<Symbol> {
    match raw.parse::<Symbol>() {
        Ok(symbol) => Some(symbol),
        Err(e) => {
            errors.push(e.to_string());
            None
        }
    }
}

fn parse_at_least_one(
    name: &str,
    raw: &Option<String>,
    default: i64,
    errors: &mut ValidationErrors,
) -> i64 {
    let Some(raw) = present(raw) else {
        return default;
    };
    match raw.parse::<i64>() {
        Ok(value) if value >= 1 => value,
        Ok(_) => {
            errors.push(format!("{} must be greater than or equal to 1", name));
            default
        }
        Err(_) => {
            errors.push(format!("{} must be an integer", name));
            default
        }
    }
}

// Empty query values (`?symbol=`) count as absent.
fn present(raw: &Option<String>) -> Option<&str> {
    raw.as_deref().map(str::trim).filter(|s| !s.is_empty())
}
