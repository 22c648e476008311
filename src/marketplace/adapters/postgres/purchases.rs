//! `PostgreSQL` repository implementation for purchases.

use super::{models::PurchaseRow, schema::purchases};
use crate::agent::domain::AgentId;
use crate::marketplace::{
    domain::{
        LicenseType, PersistedPurchaseData, Purchase, PurchaseId, PurchaseStatus, TxHash,
    },
    ports::{PurchaseRepository, PurchaseRepositoryError, PurchaseRepositoryResult},
};
use crate::persistence::{
    PgPool, column_to_counter, counter_to_column, run_blocking, unique_violation,
};
use crate::skill::domain::SkillId;
use async_trait::async_trait;
use diesel::prelude::*;

/// `PostgreSQL`-backed purchase repository.
#[derive(Debug, Clone)]
pub struct PostgresPurchaseRepository {
    pool: PgPool,
}

impl PostgresPurchaseRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run<F, T>(&self, f: F) -> PurchaseRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> PurchaseRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        run_blocking(&self.pool, PurchaseRepositoryError::from_boxed, f).await
    }
}

#[async_trait]
impl PurchaseRepository for PostgresPurchaseRepository {
    async fn create(&self, purchase: &Purchase) -> PurchaseRepositoryResult<()> {
        let purchase_id = purchase.id();
        let tx_hash = purchase.tx_hash().clone();
        let buyer_id = purchase.buyer_id();
        let skill_id = purchase.skill_id();
        let row = to_row(purchase)?;
        self.run(move |connection| {
            diesel::insert_into(purchases::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match unique_violation(&err) {
                    Some("idx_purchases_tx_hash") => {
                        PurchaseRepositoryError::DuplicateTxHash(tx_hash.clone())
                    }
                    Some("idx_purchases_active_buyer_skill") => {
                        PurchaseRepositoryError::ActivePurchaseExists { buyer_id, skill_id }
                    }
                    Some(_) => PurchaseRepositoryError::DuplicatePurchase(purchase_id),
                    None => PurchaseRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, purchase: &Purchase) -> PurchaseRepositoryResult<()> {
        let purchase_id = purchase.id();
        let status = purchase.status().as_str();
        let usage = counter_to_column(purchase.current_usage());
        let updated_at = purchase.updated_at();
        self.run(move |connection| {
            let updated_count =
                diesel::update(purchases::table.filter(purchases::id.eq(purchase_id.into_inner())))
                    .set((
                        purchases::status.eq(status),
                        purchases::current_usage.eq(usage),
                        purchases::updated_at.eq(updated_at),
                    ))
                    .execute(connection)
                    .map_err(PurchaseRepositoryError::persistence)?;
            if updated_count == 0 {
                return Err(PurchaseRepositoryError::NotFound(purchase_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_active(
        &self,
        buyer_id: AgentId,
        skill_id: SkillId,
    ) -> PurchaseRepositoryResult<Option<Purchase>> {
        self.run(move |connection| {
            let row = purchases::table
                .filter(purchases::buyer_id.eq(buyer_id.into_inner()))
                .filter(purchases::skill_id.eq(skill_id.into_inner()))
                .filter(purchases::status.eq(PurchaseStatus::Active.as_str()))
                .select(PurchaseRow::as_select())
                .first::<PurchaseRow>(connection)
                .optional()
                .map_err(PurchaseRepositoryError::persistence)?;
            row.map(row_to_purchase).transpose()
        })
        .await
    }

    async fn find_by_tx_hash(
        &self,
        tx_hash: &TxHash,
    ) -> PurchaseRepositoryResult<Option<Purchase>> {
        let hash = tx_hash.as_str().to_owned();
        self.run(move |connection| {
            let row = purchases::table
                .filter(purchases::tx_hash.eq(hash))
                .select(PurchaseRow::as_select())
                .first::<PurchaseRow>(connection)
                .optional()
                .map_err(PurchaseRepositoryError::persistence)?;
            row.map(row_to_purchase).transpose()
        })
        .await
    }

    async fn list_by_buyer(&self, buyer_id: AgentId) -> PurchaseRepositoryResult<Vec<Purchase>> {
        self.run(move |connection| {
            let rows = purchases::table
                .filter(purchases::buyer_id.eq(buyer_id.into_inner()))
                .order(purchases::created_at.desc())
                .select(PurchaseRow::as_select())
                .load::<PurchaseRow>(connection)
                .map_err(PurchaseRepositoryError::persistence)?;
            rows.into_iter().map(row_to_purchase).collect()
        })
        .await
    }
}

fn to_row(purchase: &Purchase) -> PurchaseRepositoryResult<PurchaseRow> {
    Ok(PurchaseRow {
        id: purchase.id().into_inner(),
        buyer_id: purchase.buyer_id().into_inner(),
        skill_id: purchase.skill_id().into_inner(),
        license_type: purchase.license_type().as_str().to_owned(),
        amount_cents: i64::try_from(purchase.amount_cents())
            .map_err(PurchaseRepositoryError::persistence)?,
        currency: purchase.currency().to_owned(),
        tx_hash: purchase.tx_hash().as_str().to_owned(),
        status: purchase.status().as_str().to_owned(),
        expires_at: purchase.expires_at(),
        usage_limit: purchase.usage_limit().map(counter_to_column),
        current_usage: counter_to_column(purchase.current_usage()),
        created_at: purchase.created_at(),
        updated_at: purchase.updated_at(),
    })
}

fn row_to_purchase(row: PurchaseRow) -> PurchaseRepositoryResult<Purchase> {
    let PurchaseRow {
        id,
        buyer_id,
        skill_id,
        license_type,
        amount_cents,
        currency,
        tx_hash,
        status,
        expires_at,
        usage_limit,
        current_usage,
        created_at,
        updated_at,
    } = row;

    Ok(Purchase::from_persisted(PersistedPurchaseData {
        id: PurchaseId::from_uuid(id),
        buyer_id: AgentId::from_uuid(buyer_id),
        skill_id: SkillId::from_uuid(skill_id),
        license_type: LicenseType::try_from(license_type.as_str())
            .map_err(PurchaseRepositoryError::invalid_persisted_data)?,
        amount_cents: u64::try_from(amount_cents)
            .map_err(PurchaseRepositoryError::invalid_persisted_data)?,
        currency,
        tx_hash: TxHash::new(&tx_hash).map_err(PurchaseRepositoryError::invalid_persisted_data)?,
        status: PurchaseStatus::try_from(status.as_str())
            .map_err(PurchaseRepositoryError::invalid_persisted_data)?,
        expires_at,
        usage_limit: usage_limit.map(column_to_counter),
        current_usage: column_to_counter(current_usage),
        created_at,
        updated_at,
    }))
}
