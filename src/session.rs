//! Account session: a one-shot startup fetch that gates wallet operations.
//!
//! The session lists accounts once, picks the BTC, ETH and LTC wallets, and
//! only then permits address and withdrawal creation. Calls made earlier are
//! rejected with [`CoinbaseError::NotReady`]; they are never queued.
//!
//! Wallet balances are a snapshot from that single fetch and are not
//! refreshed afterwards.
//!
//! ```text
//! Uninitialized --initialize()--> Loading --all wallets found--> Ready
//!                                    \
//!                                     `--call failed / wallet missing--> Failed
//! ```

use std::sync::{Arc, OnceLock};

use rust_decimal::Decimal;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::error::CoinbaseError;
use crate::rest::data::ExchangeRates;
use crate::rest::wallet::{Account, Address, CreateAddressRequest, SendMoneyRequest, Transaction};
use crate::rest::{CoinbaseApi, CoinbaseRestClient};
use crate::types::SupportedCurrency;

/// Lifecycle state of an [`AccountSession`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Constructed, account fetch not started.
    Uninitialized,
    /// Account fetch in flight.
    Loading,
    /// All required wallets are loaded.
    Ready,
    /// The fetch failed or a wallet was missing. Terminal.
    Failed(String),
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionState::Uninitialized => write!(f, "uninitialized"),
            SessionState::Loading => write!(f, "loading"),
            SessionState::Ready => write!(f, "ready"),
            SessionState::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

/// The wallet for each supported currency.
#[derive(Debug, Clone)]
pub struct Wallets {
    /// Bitcoin wallet.
    pub btc: Account,
    /// Ethereum wallet.
    pub eth: Account,
    /// Litecoin wallet.
    pub ltc: Account,
}

impl Wallets {
    /// Get the wallet for a currency.
    pub fn get(&self, currency: SupportedCurrency) -> &Account {
        match currency {
            SupportedCurrency::Btc => &self.btc,
            SupportedCurrency::Eth => &self.eth,
            SupportedCurrency::Ltc => &self.ltc,
        }
    }

    /// Pick the first account for each supported currency.
    ///
    /// Returns the missing currencies on failure.
    fn select(accounts: Vec<Account>) -> Result<Self, Vec<SupportedCurrency>> {
        let mut btc = None;
        let mut eth = None;
        let mut ltc = None;

        for account in accounts {
            let slot = match account.currency.parse::<SupportedCurrency>() {
                Ok(SupportedCurrency::Btc) => &mut btc,
                Ok(SupportedCurrency::Eth) => &mut eth,
                Ok(SupportedCurrency::Ltc) => &mut ltc,
                Err(_) => continue,
            };
            if slot.is_none() {
                *slot = Some(account);
            }
        }

        match (btc, eth, ltc) {
            (Some(btc), Some(eth), Some(ltc)) => Ok(Self { btc, eth, ltc }),
            (btc, eth, ltc) => {
                let mut missing = Vec::new();
                if btc.is_none() {
                    missing.push(SupportedCurrency::Btc);
                }
                if eth.is_none() {
                    missing.push(SupportedCurrency::Eth);
                }
                if ltc.is_none() {
                    missing.push(SupportedCurrency::Ltc);
                }
                Err(missing)
            }
        }
    }
}

/// Gates wallet operations behind a single startup account fetch.
///
/// # Example
///
/// ```rust,no_run
/// use coinbase_api_client::rest::CoinbaseRestClient;
/// use coinbase_api_client::session::AccountSession;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = CoinbaseRestClient::new("key", "secret")?;
///     let session = AccountSession::new(client);
///     session.initialize().await?;
///
///     let address = session.create_address("BTC", Some("invoice 42")).await?;
///     println!("pay to {}", address.address);
///     Ok(())
/// }
/// ```
pub struct AccountSession<C = CoinbaseRestClient> {
    api: C,
    state: watch::Sender<SessionState>,
    // Written once, before `Ready` is published.
    wallets: OnceLock<Wallets>,
}

impl<C: CoinbaseApi> AccountSession<C> {
    /// Create an uninitialized session.
    pub fn new(api: C) -> Self {
        let (state, _) = watch::channel(SessionState::Uninitialized);
        Self {
            api,
            state,
            wallets: OnceLock::new(),
        }
    }

    /// Create a session and start loading accounts in the background.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(api: C) -> Arc<Self>
    where
        C: 'static,
    {
        let session = Arc::new(Self::new(api));
        let background = Arc::clone(&session);
        tokio::spawn(async move {
            if let Err(e) = background.initialize().await {
                warn!(error = %e, "account session failed to initialize");
            }
        });
        session
    }

    /// The underlying API client.
    pub fn api(&self) -> &C {
        &self.api
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Whether wallet operations are permitted.
    pub fn is_ready(&self) -> bool {
        *self.state.borrow() == SessionState::Ready
    }

    /// Wait until the session is `Ready` or `Failed`.
    ///
    /// Never resolves for a session nobody initializes.
    pub async fn wait_until_settled(&self) -> SessionState {
        let mut rx = self.state.subscribe();
        match rx
            .wait_for(|s| matches!(s, SessionState::Ready | SessionState::Failed(_)))
            .await
        {
            Ok(state) => (*state).clone(),
            // The sender lives in `self`, so the channel cannot close here.
            Err(_) => self.state(),
        }
    }

    /// Fetch accounts and select the required wallets.
    ///
    /// Runs at most once. The session ends in `Ready` on success or `Failed`
    /// otherwise; a failed session is never retried.
    pub async fn initialize(&self) -> Result<(), CoinbaseError> {
        let mut claimed = false;
        self.state.send_if_modified(|state| {
            if *state == SessionState::Uninitialized {
                *state = SessionState::Loading;
                claimed = true;
            }
            claimed
        });
        if !claimed {
            return Err(CoinbaseError::AlreadyInitialized(self.state()));
        }

        info!("loading accounts");
        let accounts = match self.api.list_accounts().await {
            Ok(accounts) => accounts,
            Err(e) => {
                self.fail(format!("account listing failed: {e}"));
                return Err(e);
            }
        };

        let count = accounts.len();
        match Wallets::select(accounts) {
            Ok(wallets) => {
                let _ = self.wallets.set(wallets);
                self.state.send_replace(SessionState::Ready);
                info!(accounts = count, "account session ready");
                Ok(())
            }
            Err(missing) => {
                let codes: Vec<&str> = missing.iter().map(|c| c.code()).collect();
                let reason = format!("no wallet for {}", codes.join(", "));
                self.fail(reason.clone());
                Err(CoinbaseError::SessionFailed(reason))
            }
        }
    }

    fn fail(&self, reason: String) {
        warn!(reason = %reason, "account session failed");
        self.state.send_replace(SessionState::Failed(reason));
    }

    /// All wallets. Requires `Ready`.
    pub fn wallets(&self) -> Result<&Wallets, CoinbaseError> {
        let state = self.state();
        if state != SessionState::Ready {
            return Err(CoinbaseError::NotReady(state));
        }
        self.wallets
            .get()
            .ok_or(CoinbaseError::NotReady(SessionState::Loading))
    }

    /// The wallet for one currency. Requires `Ready`.
    pub fn wallet(&self, currency: SupportedCurrency) -> Result<&Account, CoinbaseError> {
        Ok(self.wallets()?.get(currency))
    }

    /// Create a receive address on the wallet for `currency`.
    pub async fn create_address(
        &self,
        currency: &str,
        name: Option<&str>,
    ) -> Result<Address, CoinbaseError> {
        let currency: SupportedCurrency = currency.parse()?;
        let wallet = self.wallet(currency)?;

        let mut request = CreateAddressRequest::new();
        if let Some(name) = name {
            request = request.name(name);
        }
        self.api.create_address(&wallet.id, &request).await
    }

    /// Send `amount` of `currency` from its wallet to `to`.
    ///
    /// The currency, destination and amount are checked before the
    /// readiness gate and before any network call.
    pub async fn create_withdrawal(
        &self,
        currency: &str,
        to: &str,
        amount: Decimal,
        description: Option<&str>,
    ) -> Result<Transaction, CoinbaseError> {
        let currency: SupportedCurrency = currency.parse()?;
        if to.trim().is_empty() {
            return Err(CoinbaseError::Validation(
                "destination address is required".to_string(),
            ));
        }
        if amount <= Decimal::ZERO {
            return Err(CoinbaseError::Validation(format!(
                "amount must be positive, got {amount}"
            )));
        }

        let wallet = self.wallet(currency)?;

        let mut request = SendMoneyRequest::new(to.trim(), amount, currency.code());
        if let Some(description) = description {
            request = request.description(description);
        }
        self.api.send_money(&wallet.id, &request).await
    }

    /// Units of `to` per one `from`. Not gated on readiness.
    pub async fn exchange_rate(&self, from: &str, to: &str) -> Result<f64, CoinbaseError> {
        if from.trim().is_empty() || to.trim().is_empty() {
            return Err(CoinbaseError::Validation(
                "both currencies are required".to_string(),
            ));
        }
        let rates: ExchangeRates = self.api.get_exchange_rates(from.trim()).await?;
        rates.rate_f64(to.trim())
    }
}

impl<C> std::fmt::Debug for AccountSession<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountSession")
            .field("state", &*self.state.borrow())
            .finish()
    }
}
