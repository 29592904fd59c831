use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::error;

use crate::models::{PageRequest, PriceRecord, RecordFilter};

fn push_filter(query: &mut QueryBuilder<'_, Postgres>, filter: &RecordFilter) {
    query.push(" WHERE TRUE");
    if let Some(symbol) = filter.symbol {
        query.push(" AND symbol = ").push_bind(symbol.as_str());
    }
    if let Some(start_date) = filter.start_date {
        query.push(" AND date >= ").push_bind(start_date);
    }
    if let Some(end_date) = filter.end_date {
        query.push(" AND date <= ").push_bind(end_date);
    }
}

/// Count every row matching `filter`, then fetch the requested page of them
/// (or all of them when `page` is `None`).
///
/// Rows are ordered by date, then symbol, ascending. Both statements run on
/// one pooled connection that is returned to the pool when this call ends.
pub async fn find(
    pool: &PgPool,
    filter: &RecordFilter,
    page: Option<PageRequest>,
) -> Result<(i64, Vec<PriceRecord>), sqlx::Error> {
    let mut conn = pool.acquire().await?;

    let mut count_query = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM financial_data");
    push_filter(&mut count_query, filter);
    let total: i64 = count_query
        .build_query_scalar()
        .fetch_one(&mut *conn)
        .await?;

    let mut select = QueryBuilder::<Postgres>::new(
        "SELECT symbol, date, open_price, close_price, volume FROM financial_data",
    );
    push_filter(&mut select, filter);
    select.push(" ORDER BY date ASC, symbol ASC");
    if let Some(page) = page {
        select
            .push(" LIMIT ")
            .push_bind(page.limit)
            .push(" OFFSET ")
            .push_bind(page.offset());
    }

    let records = select
        .build_query_as::<PriceRecord>()
        .fetch_all(&mut *conn)
        .await?;

    Ok((total, records))
}

/// Insert or overwrite each record keyed by (symbol, date) in one transaction.
///
/// Any failed statement drops the transaction, which rolls back every row of
/// the batch.
pub async fn upsert_records(pool: &PgPool, records: &[PriceRecord]) -> Result<u64, sqlx::Error> {
    let mut tx = pool.begin().await.map_err(|e| {
        error!("Failed to begin upsert transaction: {}", e);
        e
    })?;

    let mut affected = 0;
    for record in records {
        let result = sqlx::query(
            r#"
            INSERT INTO financial_data (symbol, date, open_price, close_price, volume)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (symbol, date)
            DO UPDATE SET open_price = EXCLUDED.open_price,
                          close_price = EXCLUDED.close_price,
                          volume = EXCLUDED.volume
            "#,
        )
        .bind(&record.symbol)
        .bind(record.date)
        .bind(&record.open_price)
        .bind(&record.close_price)
        .bind(record.volume)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            error!(
                "Failed to upsert {} {} (open: {}, close: {}, volume: {}): {}",
                record.symbol, record.date, record.open_price, record.close_price, record.volume, e
            );
            e
        })?;
        affected += result.rows_affected();
    }

    tx.commit().await.map_err(|e| {
        error!("Failed to commit upsert of {} records: {}", records.len(), e);
        e
    })?;
    Ok(affected)
}

pub async fn ping(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
