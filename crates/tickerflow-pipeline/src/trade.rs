//! Order dispatch from latest signals.

use rust_decimal::Decimal;
use tickerflow_core::error::PipelineError;
use tickerflow_core::traits::Broker;
use tickerflow_core::types::{OrderRequest, Reversion, Side, SignalRow, Trend};
use tickerflow_store::Store;
use tracing::{info, warn};
use uuid::Uuid;

use crate::report::RunReport;
use crate::retry::{with_retry, RetryPolicy};

/// Map one signal row to an order side.
///
/// The buy rule wins when both rules match: a row that is both an
/// uptrend and a reversion sell buys.
pub fn resolve_side(row: &SignalRow) -> Option<Side> {
    if row.signal == Some(Reversion::Buy) || row.trend == Some(Trend::Uptrend) {
        Some(Side::Buy)
    } else if row.signal == Some(Reversion::Sell) || row.trend == Some(Trend::Downtrend) {
        Some(Side::Sell)
    } else {
        None
    }
}

/// An order the dispatcher intends to place, with the signal close that
/// triggered it.
#[derive(Debug, Clone)]
pub struct PlannedOrder {
    pub request: OrderRequest,
    pub price: f64,
}

/// Resolve each ticker's latest signal row into a market order.
pub fn plan_orders(signals: &[SignalRow], quantity: Decimal) -> Vec<PlannedOrder> {
    signals
        .iter()
        .filter_map(|row| {
            let side = resolve_side(row)?;
            Some(PlannedOrder {
                request: OrderRequest::market(row.ticker.as_str(), side, quantity),
                price: row.close,
            })
        })
        .collect()
}

/// Submits market orders for each ticker's latest signal and records
/// the accepted ones.
///
/// Symbols fail independently: a rejection is logged and the run moves
/// on. The order record is appended only after the brokerage accepts.
pub struct TradeJob<'a> {
    store: &'a Store,
    broker: &'a dyn Broker,
    quantity: Decimal,
    retry: RetryPolicy,
}

impl<'a> TradeJob<'a> {
    pub fn new(store: &'a Store, broker: &'a dyn Broker, quantity: u32) -> Self {
        Self {
            store,
            broker,
            quantity: Decimal::from(quantity),
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub async fn run(&self) -> Result<RunReport, PipelineError> {
        let mut report = RunReport::new("trade");

        match self.broker.is_market_open().await {
            Ok(true) => {}
            Ok(false) => warn!(
                broker = self.broker.name(),
                "Market closed; orders will queue"
            ),
            Err(e) => warn!(error = %e, "Market clock unavailable"),
        }

        let signals = self.store.latest_signals().await?;
        let planned = plan_orders(&signals, self.quantity);
        report.skipped = (signals.len() - planned.len()) as u32;
        info!(
            broker = self.broker.name(),
            signals = signals.len(),
            orders = planned.len(),
            "Dispatching orders"
        );

        for order in planned {
            let symbol = order.request.symbol.clone();
            let side = order.request.side;

            // One id for every attempt at this order. The brokerage
            // deduplicates on it, so a retried submission cannot fill twice.
            let request = order
                .request
                .with_client_id(Uuid::new_v4().to_string());
            let submit = with_retry(&self.retry, || self.broker.submit_order(request.clone()));
            let ack = match submit.await {
                Ok(ack) => ack,
                Err(e) => {
                    warn!(%symbol, error = %e, "Order not accepted");
                    report.fail(&symbol, e.to_string());
                    continue;
                }
            };

            match self.store.append_order(&ack.symbol, side, order.price).await {
                Ok(record) => {
                    info!(
                        %symbol,
                        %side,
                        price = order.price,
                        placed_at = %record.placed_at,
                        "Order placed"
                    );
                    report.succeeded += 1;
                    report.rows_written += 1;
                }
                Err(e) => {
                    warn!(%symbol, error = %e, "Order accepted but not recorded");
                    report.fail(&symbol, format!("accepted but not recorded: {}", e));
                }
            }
        }

        report.complete();
        info!(
            placed = report.succeeded,
            rejected = report.failures.len(),
            "Trade run finished"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use tickerflow_broker::SimBroker;

    fn row(ticker: &str, trend: Option<Trend>, signal: Option<Reversion>) -> SignalRow {
        SignalRow {
            timestamp: Utc::now(),
            ticker: ticker.to_string(),
            close: 100.0,
            trend,
            signal,
        }
    }

    #[test]
    fn test_resolve_side_trend_rules() {
        assert_eq!(
            resolve_side(&row("A", Some(Trend::Uptrend), None)),
            Some(Side::Buy)
        );
        assert_eq!(
            resolve_side(&row("A", Some(Trend::Downtrend), None)),
            Some(Side::Sell)
        );
        assert_eq!(resolve_side(&row("A", Some(Trend::Neutral), None)), None);
    }

    #[test]
    fn test_resolve_side_reversion_rules() {
        assert_eq!(
            resolve_side(&row("A", None, Some(Reversion::Buy))),
            Some(Side::Buy)
        );
        assert_eq!(
            resolve_side(&row("A", None, Some(Reversion::Sell))),
            Some(Side::Sell)
        );
        assert_eq!(resolve_side(&row("A", None, Some(Reversion::Neutral))), None);
    }

    #[test]
    fn test_resolve_side_buy_rule_wins() {
        // Reversion buy against a downtrend
        assert_eq!(
            resolve_side(&row("A", Some(Trend::Downtrend), Some(Reversion::Buy))),
            Some(Side::Buy)
        );
        // Uptrend against a reversion sell
        assert_eq!(
            resolve_side(&row("A", Some(Trend::Uptrend), Some(Reversion::Sell))),
            Some(Side::Buy)
        );
    }

    #[test]
    fn test_resolve_side_empty_row() {
        assert_eq!(resolve_side(&row("A", None, None)), None);
    }

    #[test]
    fn test_plan_orders_skips_unresolved() {
        let signals = vec![
            row("AAPL", Some(Trend::Uptrend), None),
            row("MSFT", Some(Trend::Neutral), Some(Reversion::Neutral)),
            row("TSLA", None, Some(Reversion::Sell)),
        ];

        let planned = plan_orders(&signals, dec!(2));
        assert_eq!(planned.len(), 2);
        assert_eq!(planned[0].request.symbol, "AAPL");
        assert_eq!(planned[0].request.side, Side::Buy);
        assert_eq!(planned[0].request.quantity, dec!(2));
        assert_eq!(planned[1].request.symbol, "TSLA");
        assert_eq!(planned[1].request.side, Side::Sell);
        assert!((planned[1].price - 100.0).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_rejection_does_not_stop_later_orders() {
        let broker = SimBroker::new().with_rejection("MSFT");
        let signals = vec![
            row("AAPL", Some(Trend::Uptrend), None),
            row("MSFT", Some(Trend::Uptrend), None),
            row("TSLA", Some(Trend::Downtrend), None),
        ];

        let mut accepted = 0;
        let mut rejected = 0;
        for order in plan_orders(&signals, dec!(1)) {
            match broker.submit_order(order.request).await {
                Ok(_) => accepted += 1,
                Err(e) => {
                    assert!(matches!(
                        e,
                        tickerflow_core::error::BrokerError::OrderRejected(_)
                    ));
                    rejected += 1;
                }
            }
        }

        assert_eq!(accepted, 2);
        assert_eq!(rejected, 1);
        let submitted = broker.submissions();
        assert_eq!(submitted.len(), 2);
        assert_eq!(submitted[0].symbol, "AAPL");
        assert_eq!(submitted[1].symbol, "TSLA");
    }
}
