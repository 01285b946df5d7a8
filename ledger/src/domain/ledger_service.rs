//! Ledger domain service.
//!
//! Implements the driving ports on top of a [`LedgerDocumentStore`]. Every
//! operation reads the whole document, validates, mutates it in memory, and
//! writes the whole document back.
//!
//! There is no locking and no version check between the read and the write.
//! Two callers mutating concurrently can both read the same balance and both
//! succeed; the second write silently replaces the first. The store protocol
//! offers no conditional update, so this race is accepted for single-operator
//! use.

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use rust_decimal::Decimal;
use serde_json::Map;
use tracing::{debug, info, warn};

use crate::domain::ports::{LedgerCommand, LedgerDocumentStore, LedgerQuery};
use crate::domain::{
    ClockRandomIdGenerator, EntityId, IdGenerator, LedgerDocument, LedgerError, Player,
    STARTING_BALANCE, Transaction, TransactionKind,
};

/// How mutating operations treat a failed document read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MutationReadPolicy {
    /// Abort the operation and return the store error.
    #[default]
    Strict,
    /// Continue from the empty document, as [`LedgerQuery::get_data`] does.
    ///
    /// A transient read failure followed by a successful write replaces the
    /// remote record with a document holding only this operation's changes.
    BestEffort,
}

/// Error returned when parsing an unknown [`MutationReadPolicy`] name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown mutation read policy '{0}', expected 'strict' or 'best-effort'")]
pub struct UnknownReadPolicy(String);

impl FromStr for MutationReadPolicy {
    type Err = UnknownReadPolicy;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "best-effort" | "best_effort" => Ok(Self::BestEffort),
            _ => Err(UnknownReadPolicy(value.to_owned())),
        }
    }
}

/// Ledger service implementing [`LedgerQuery`] and [`LedgerCommand`].
#[derive(Clone)]
pub struct LedgerService<S> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    read_policy: MutationReadPolicy,
}

impl<S> LedgerService<S> {
    /// Create a service over `store`, generating identifiers from `clock`.
    pub fn new(store: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        let ids = Arc::new(ClockRandomIdGenerator::new(Arc::clone(&clock)));
        Self {
            store,
            clock,
            ids,
            read_policy: MutationReadPolicy::default(),
        }
    }

    /// Replace the identifier generator.
    #[must_use]
    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    /// Choose how mutating operations treat a failed read.
    #[must_use]
    pub fn with_read_policy(mut self, read_policy: MutationReadPolicy) -> Self {
        self.read_policy = read_policy;
        self
    }

    /// Produce a fresh identifier.
    pub fn generate_id(&self) -> EntityId {
        self.ids.generate()
    }

    fn record(&self, player_id: EntityId, kind: TransactionKind, amount: Decimal) -> Transaction {
        Transaction {
            id: self.generate_id(),
            player_id,
            kind,
            amount,
            timestamp: self.clock.utc().into(),
            extra: Map::new(),
        }
    }

    fn ensure_non_negative(amount: Decimal) -> Result<(), LedgerError> {
        if amount < Decimal::ZERO {
            return Err(LedgerError::InvalidAmount { amount });
        }
        Ok(())
    }
}

impl<S> LedgerService<S>
where
    S: LedgerDocumentStore,
{
    /// Read the document, falling back to the empty document on any failure.
    pub async fn fetch_document(&self) -> LedgerDocument {
        match self.store.fetch_document().await {
            Ok(document) => {
                debug!(
                    players = document.players.len(),
                    transactions = document.transactions.len(),
                    "ledger document loaded"
                );
                document
            }
            Err(error) => {
                warn!(%error, "ledger document unavailable, using empty document");
                LedgerDocument::default()
            }
        }
    }

    /// Read the document, propagating store failures.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Store`] when the store cannot be read.
    pub async fn load_document(&self) -> Result<LedgerDocument, LedgerError> {
        Ok(self.store.fetch_document().await?)
    }

    /// Overwrite the stored document.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Store`] when the write is not confirmed.
    pub async fn persist_document(&self, document: &LedgerDocument) -> Result<(), LedgerError> {
        self.store.persist_document(document).await.map_err(|error| {
            warn!(%error, "ledger document write failed");
            LedgerError::from(error)
        })
    }

    async fn document_for_mutation(&self) -> Result<LedgerDocument, LedgerError> {
        match self.read_policy {
            MutationReadPolicy::Strict => self.load_document().await,
            MutationReadPolicy::BestEffort => Ok(self.fetch_document().await),
        }
    }

    async fn move_money(
        &self,
        player_id: &EntityId,
        amount: Decimal,
        kind: TransactionKind,
    ) -> Result<Player, LedgerError> {
        Self::ensure_non_negative(amount)?;
        let mut document = self.document_for_mutation().await?;

        let player =
            document
                .find_player_mut(player_id)
                .ok_or_else(|| LedgerError::PlayerNotFound {
                    player_id: player_id.clone(),
                })?;
        let balance = player.balance;
        let next = if kind == TransactionKind::Withdraw {
            if balance < amount {
                return Err(LedgerError::InsufficientBalance {
                    player_id: player_id.clone(),
                    balance,
                    requested: amount,
                });
            }
            balance.checked_sub(amount)
        } else {
            balance.checked_add(amount)
        };
        player.balance = next.ok_or_else(|| LedgerError::AmountOverflow {
            player_id: player_id.clone(),
            balance,
            amount,
        })?;
        let updated = player.clone();

        document.append(self.record(player_id.clone(), kind, amount));
        self.persist_document(&document).await?;

        info!(
            player_id = %updated.id,
            %kind,
            %amount,
            balance = %updated.balance,
            "balance updated"
        );
        Ok(updated)
    }
}

#[async_trait]
impl<S> LedgerQuery for LedgerService<S>
where
    S: LedgerDocumentStore,
{
    async fn get_data(&self) -> LedgerDocument {
        self.fetch_document().await
    }
}

#[async_trait]
impl<S> LedgerCommand for LedgerService<S>
where
    S: LedgerDocumentStore,
{
    async fn register_player(&self, name: &str) -> Result<Player, LedgerError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LedgerError::InvalidName);
        }
        let mut document = self.document_for_mutation().await?;

        if document.find_player_by_name(name).is_some() {
            return Err(LedgerError::DuplicateName {
                name: name.to_owned(),
            });
        }

        let player = Player::register(self.generate_id(), name, self.clock.utc());
        document.players.push(player.clone());
        document.append(self.record(
            player.id.clone(),
            TransactionKind::Register,
            STARTING_BALANCE,
        ));
        self.persist_document(&document).await?;

        info!(player_id = %player.id, name = %player.name, "player registered");
        Ok(player)
    }

    async fn withdraw_money(
        &self,
        player_id: &EntityId,
        amount: Decimal,
    ) -> Result<Player, LedgerError> {
        self.move_money(player_id, amount, TransactionKind::Withdraw)
            .await
    }

    async fn deposit_money(
        &self,
        player_id: &EntityId,
        amount: Decimal,
    ) -> Result<Player, LedgerError> {
        self.move_money(player_id, amount, TransactionKind::Deposit)
            .await
    }
}

#[cfg(test)]
#[path = "ledger_service_tests.rs"]
mod tests;
