use crate::{AppState, error::AppError};
use analytics::RankedSymbol;
use axum::{
    Json,
    extract::{Path, State},
};
use chrono::NaiveDate;
use core_types::Statistics;
use std::sync::Arc;

/// Rejects symbols outside the configured universe before they reach the engine.
fn validate_symbol(state: &AppState, symbol: &str) -> Result<(), AppError> {
    if state.config.symbols.contains(symbol) {
        Ok(())
    } else {
        Err(AppError::InvalidSymbol(symbol.to_string()))
    }
}

/// Parses an ISO `YYYY-MM-DD` path segment.
fn parse_day(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::BadRequest(format!("Invalid date '{}', expected YYYY-MM-DD", raw)))
}

/// # GET /currency/symbols
pub async fn get_symbols(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    Json(state.config.symbols.as_slice().to_vec())
}

/// # GET /currency/:symbol/statistics
/// Minimum, maximum, oldest and newest price observation of one symbol.
pub async fn get_statistics(
    Path(symbol): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Statistics>, AppError> {
    validate_symbol(&state, &symbol)?;
    let statistics = state.engine.statistics(&symbol).await?;
    Ok(Json(statistics))
}

/// # GET /currency/:symbol/statistics/:date
/// The same statistics restricted to one UTC day.
pub async fn get_statistics_for_day(
    Path((symbol, date)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Statistics>, AppError> {
    validate_symbol(&state, &symbol)?;
    let day = parse_day(&date)?;
    let statistics = state.engine.statistics_for_day(&symbol, day).await?;
    Ok(Json(statistics))
}

/// # GET /currency/sorted-by-normalized-range
/// Symbols sorted descending by normalized range.
pub async fn get_sorted_by_normalized_range(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<String>>, AppError> {
    let symbols = state.engine.rank_symbols_by_normalized_range().await?;
    Ok(Json(symbols))
}

/// # GET /currency/normalized-ranges
/// The ranking together with each symbol's normalized range.
pub async fn get_normalized_ranges(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<RankedSymbol>>, AppError> {
    let ranked = state.engine.ranked_normalized_ranges().await?;
    Ok(Json(ranked))
}

/// # GET /currency/highest-normalized-range/:date
/// The symbol with the highest normalized range on the given day, 404 if none.
pub async fn get_highest_normalized_range(
    Path(date): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<String>, AppError> {
    let day = parse_day(&date)?;
    state
        .engine
        .top_symbol_for_day(day)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("No currency with a normalized range found for {}", day)))
}
