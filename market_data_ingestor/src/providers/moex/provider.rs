use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::{
    models::bar::Bar,
    providers::{
        BarProvider, ProviderError, UnexpectedResponseSnafu,
        moex::response::{
            HISTORY_COLUMNS, HistoryResponse, SecurityResponse, far_future, history_rows,
            last_trade_date,
        },
    },
    requests::HttpFetcher,
};

pub const DEFAULT_BASE_URL: &str = "https://iss.moex.com";

pub struct MoexProvider {
    fetcher: HttpFetcher,
    base_url: String,
}

impl MoexProvider {
    /// `base_url` without trailing slash, e.g. [`DEFAULT_BASE_URL`].
    pub fn new(fetcher: HttpFetcher, base_url: impl Into<String>) -> Self {
        Self {
            fetcher,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn history_url(&self, date: NaiveDate, symbol: &str) -> String {
        format!(
            "{}/iss/history/engines/futures/markets/forts/securities.json?date={}&assetcode={}",
            self.base_url,
            date.format("%Y-%m-%d"),
            symbol
        )
    }

    fn security_url(&self, sec_id: &str) -> String {
        format!("{}/iss/securities/{}.json", self.base_url, sec_id)
    }

    async fn contract_last_trade_date(&self, sec_id: &str) -> NaiveDate {
        let url = self.security_url(sec_id);
        match self.fetcher.get_json::<SecurityResponse>(&url).await {
            Some(SecurityResponse {
                description: Some(table),
            }) => last_trade_date(&table),
            _ => far_future(),
        }
    }
}

#[async_trait]
impl BarProvider for MoexProvider {
    async fn fetch_daily_bar(
        &self,
        date: NaiveDate,
        symbol: &str,
    ) -> Result<Option<Bar>, ProviderError> {
        let url = self.history_url(date, symbol);
        info!(%date, %url, "requesting futures history");

        let Some(resp) = self.fetcher.get_json::<HistoryResponse>(&url).await else {
            warn!(%date, "no data (history unreachable)");
            return Ok(None);
        };
        let Some(table) = resp.history.filter(|t| !t.data.is_empty()) else {
            warn!(%date, "no data");
            return Ok(None);
        };
        if let Err(message) = table.has_columns(&HISTORY_COLUMNS) {
            return UnexpectedResponseSnafu { url, message }.fail();
        }

        let rows = history_rows(&table);
        if rows.is_empty() {
            warn!(%date, "history has no complete OHLC rows");
            return Ok(None);
        }

        let mut candidates = Vec::with_capacity(rows.len());
        for row in rows {
            let lst = self.contract_last_trade_date(&row.sec_id).await;
            debug!(sec_id = %row.sec_id, last_trade = %lst, "contract resolved");
            candidates.push(row.into_bar(lst));
        }

        Ok(select_front_contract(candidates, date))
    }
}

/// Pick the nearest-expiring contract still trading after `trade_date`.
///
/// Returns `None` when no contract qualifies or when more than one contract
/// shares the nearest expiry.
pub fn select_front_contract(candidates: Vec<Bar>, trade_date: NaiveDate) -> Option<Bar> {
    let live: Vec<Bar> = candidates
        .into_iter()
        .filter(|b| b.last_trade_date > trade_date)
        .collect();
    let nearest = live.iter().map(|b| b.last_trade_date).min()?;
    let mut front: Vec<Bar> = live
        .into_iter()
        .filter(|b| b.last_trade_date == nearest)
        .collect();
    if front.len() == 1 {
        front.pop()
    } else {
        warn!(%trade_date, contracts = front.len(), "ambiguous front contract, skipping");
        None
    }
}
