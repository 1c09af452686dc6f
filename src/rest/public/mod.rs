//! Public REST API endpoints (no authentication required).

mod types;

pub use types::*;

use crate::Result;
use crate::rest::CoinbaseRestClient;
use crate::rest::endpoints::public;
use crate::rest::request::{Args, to_args};

impl CoinbaseRestClient {
    /// Get the server time.
    ///
    /// API key requests are signed with this clock, not the local one.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use coinbase_api_client::rest::CoinbaseRestClient;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = CoinbaseRestClient::new();
    ///     let time = client.get_server_time().await?;
    ///     println!("Server time: {} ({})", time.epoch, time.iso);
    ///     Ok(())
    /// }
    /// ```
    pub async fn get_server_time(&self) -> Result<ServerTime> {
        self.call(&public::TIME, None).await
    }

    /// List the currencies supported by Coinbase.
    pub async fn get_currencies(&self) -> Result<Vec<Currency>> {
        self.call(&public::CURRENCIES, None).await
    }

    /// Get exchange rates for a base currency.
    pub async fn get_exchange_rates(
        &self,
        request: Option<&ExchangeRatesRequest>,
    ) -> Result<ExchangeRates> {
        let args = request.map(to_args).transpose()?;
        self.call(&public::EXCHANGE_RATES, args).await
    }

    /// Get the total price to buy one unit of a currency pair.
    ///
    /// # Arguments
    ///
    /// * `currency_pair` - Pair such as `"BTC-USD"`.
    pub async fn get_buy_price(&self, currency_pair: &str) -> Result<Price> {
        self.call(&public::BUY_PRICE, Some(pair_args(currency_pair)))
            .await
    }

    /// Get the total price to sell one unit of a currency pair.
    pub async fn get_sell_price(&self, currency_pair: &str) -> Result<Price> {
        self.call(&public::SELL_PRICE, Some(pair_args(currency_pair)))
            .await
    }

    /// Get the current spot price of a currency pair.
    pub async fn get_spot_price(&self, currency_pair: &str) -> Result<Price> {
        self.call(&public::SPOT_PRICE, Some(pair_args(currency_pair)))
            .await
    }

    /// Get the spot price of a currency pair, optionally at a historic date.
    pub async fn get_spot_price_with(
        &self,
        currency_pair: &str,
        request: &SpotPriceRequest,
    ) -> Result<Price> {
        let mut args = pair_args(currency_pair);
        args.extend(to_args(request)?);
        self.call(&public::SPOT_PRICE, Some(args)).await
    }
}

fn pair_args(currency_pair: &str) -> Args {
    let mut args = Args::new();
    args.insert("currency_pair".into(), currency_pair.into());
    args
}
