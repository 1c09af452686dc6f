//! Private REST API endpoints (authentication required).
//!
//! These endpoints require an [`AuthConfig`](crate::auth::AuthConfig) to be
//! configured on the client. List endpoints return a [`PaginatedResult`].

mod types;

pub use types::*;

use serde_json::Value;

use crate::Result;
use crate::rest::CoinbaseRestClient;
use crate::rest::endpoints::private;
use crate::rest::pagination::PaginatedResult;
use crate::rest::request::{Args, to_args};
use crate::types::ListParams;

impl CoinbaseRestClient {
    /// Get the authenticated user.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use coinbase_api_client::auth::AuthConfig;
    /// use coinbase_api_client::rest::CoinbaseRestClient;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = CoinbaseRestClient::builder()
    ///         .auth(AuthConfig::from_env()?)
    ///         .build();
    ///
    ///     let user = client.get_current_user().await?;
    ///     println!("{}", user.id);
    ///     Ok(())
    /// }
    /// ```
    pub async fn get_current_user(&self) -> Result<User> {
        self.call(&private::CURRENT_USER, None).await
    }

    /// Update the authenticated user.
    pub async fn update_current_user(
        &self,
        request: &UpdateUserRequest,
    ) -> Result<User> {
        self.call(&private::UPDATE_CURRENT_USER, Some(to_args(request)?))
            .await
    }

    // Accounts

    /// List accounts.
    pub async fn list_accounts(
        &self,
        params: Option<&ListParams>,
    ) -> Result<PaginatedResult<Account>> {
        let args = params.map(to_args).transpose()?;
        self.call_list(&private::ACCOUNTS, args).await
    }

    /// Get one account.
    pub async fn get_account(&self, account_id: &str) -> Result<Account> {
        self.call(&private::ACCOUNT, Some(account_args(account_id)))
            .await
    }

    /// Update an account.
    pub async fn update_account(
        &self,
        account_id: &str,
        request: &UpdateAccountRequest,
    ) -> Result<Account> {
        let args = with_account(account_id, to_args(request)?);
        self.call(&private::UPDATE_ACCOUNT, Some(args)).await
    }

    /// Delete an account.
    ///
    /// The API answers `204 No Content`, so nothing is returned.
    pub async fn delete_account(&self, account_id: &str) -> Result<()> {
        let _: Value = self
            .call(&private::DELETE_ACCOUNT, Some(account_args(account_id)))
            .await?;
        Ok(())
    }

    // Addresses

    /// List receive addresses of an account.
    pub async fn list_addresses(
        &self,
        account_id: &str,
        params: Option<&ListParams>,
    ) -> Result<PaginatedResult<Address>> {
        self.call_list(&private::ADDRESSES, Some(list_args(account_id, params)?))
            .await
    }

    /// Create a receive address for an account.
    pub async fn create_address(
        &self,
        account_id: &str,
        request: &CreateAddressRequest,
    ) -> Result<Address> {
        let args = with_account(account_id, to_args(request)?);
        self.call(&private::CREATE_ADDRESS, Some(args)).await
    }

    // Transactions

    /// List transactions of an account.
    pub async fn list_transactions(
        &self,
        account_id: &str,
        params: Option<&ListParams>,
    ) -> Result<PaginatedResult<Transaction>> {
        self.call_list(&private::TRANSACTIONS, Some(list_args(account_id, params)?))
            .await
    }

    /// Get one transaction.
    pub async fn get_transaction(
        &self,
        account_id: &str,
        transaction_id: &str,
    ) -> Result<Transaction> {
        let mut args = account_args(account_id);
        args.insert("transaction_id".into(), transaction_id.into());
        self.call(&private::TRANSACTION, Some(args)).await
    }

    /// Send money from an account.
    pub async fn send_money(
        &self,
        account_id: &str,
        request: &SendMoneyRequest,
    ) -> Result<Transaction> {
        let args = with_account(account_id, to_args(request)?);
        self.call(&private::CREATE_TRANSACTION, Some(args)).await
    }

    // Trades and transfers

    /// List buys of an account.
    pub async fn list_buys(
        &self,
        account_id: &str,
        params: Option<&ListParams>,
    ) -> Result<PaginatedResult<Trade>> {
        self.call_list(&private::BUYS, Some(list_args(account_id, params)?))
            .await
    }

    /// List sells of an account.
    pub async fn list_sells(
        &self,
        account_id: &str,
        params: Option<&ListParams>,
    ) -> Result<PaginatedResult<Trade>> {
        self.call_list(&private::SELLS, Some(list_args(account_id, params)?))
            .await
    }

    /// List deposits of an account.
    pub async fn list_deposits(
        &self,
        account_id: &str,
        params: Option<&ListParams>,
    ) -> Result<PaginatedResult<Transfer>> {
        self.call_list(&private::DEPOSITS, Some(list_args(account_id, params)?))
            .await
    }

    /// List withdrawals of an account.
    pub async fn list_withdrawals(
        &self,
        account_id: &str,
        params: Option<&ListParams>,
    ) -> Result<PaginatedResult<Transfer>> {
        self.call_list(&private::WITHDRAWALS, Some(list_args(account_id, params)?))
            .await
    }

    /// List payment methods.
    pub async fn list_payment_methods(
        &self,
        params: Option<&ListParams>,
    ) -> Result<PaginatedResult<PaymentMethod>> {
        let args = params.map(to_args).transpose()?;
        self.call_list(&private::PAYMENT_METHODS, args).await
    }
}

fn account_args(account_id: &str) -> Args {
    let mut args = Args::new();
    args.insert("account_id".into(), account_id.into());
    args
}

fn with_account(account_id: &str, rest: Args) -> Args {
    let mut args = account_args(account_id);
    args.extend(rest);
    args
}

fn list_args(account_id: &str, params: Option<&ListParams>) -> Result<Args> {
    let rest = params.map(to_args).transpose()?.unwrap_or_default();
    Ok(with_account(account_id, rest))
}
