use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    DbErr, EntityTrait, IsolationLevel, QueryFilter, QueryOrder, QuerySelect, RuntimeErr,
    TransactionTrait, sea_query::OnConflict,
};

use photofind_gate_schema::access_codes;

use crate::domain::repository::{CodeStore, CodeTxn, TxnFuture};
use crate::domain::types::AccessCode;
use crate::error::GateError;

/// PostgreSQL-backed store. Transactions run at SERIALIZABLE isolation, so a
/// lost read-modify-write race surfaces as a serialization failure, which is
/// reported as [`GateError::Conflict`].
#[derive(Clone)]
pub struct DbCodeStore {
    pub db: DatabaseConnection,
}

pub struct DbCodeTxn {
    txn: DatabaseTransaction,
}

/// SQLSTATE `40001` (serialization_failure) and `40P01` (deadlock_detected)
/// both mean "run the transaction again".
fn is_retryable_db_err(err: &DbErr) -> bool {
    let runtime = match err {
        DbErr::Conn(e) | DbErr::Exec(e) | DbErr::Query(e) => e,
        _ => return false,
    };
    let RuntimeErr::SqlxError(sqlx_err) = runtime else {
        return false;
    };
    sqlx_err
        .as_database_error()
        .and_then(|db_err| db_err.code())
        .is_some_and(|code| code == "40001" || code == "40P01")
}

fn store_err(err: DbErr, what: &'static str) -> GateError {
    if is_retryable_db_err(&err) {
        return GateError::Conflict;
    }
    GateError::Store(anyhow::Error::new(err).context(what))
}

async fn find_code<C: ConnectionTrait>(
    conn: &C,
    id: &str,
) -> Result<Option<AccessCode>, GateError> {
    let model = access_codes::Entity::find_by_id(id.to_owned())
        .one(conn)
        .await
        .map_err(|e| store_err(e, "find access code"))?;
    Ok(model.map(code_from_model))
}

async fn upsert_code<C: ConnectionTrait>(conn: &C, code: &AccessCode) -> Result<(), GateError> {
    let model = access_codes::ActiveModel {
        id: Set(code.id.clone()),
        created_at: Set(code.created_at),
        created_by_email: Set(code.created_by_email.clone()),
        created_by_admin: Set(code.created_by_admin),
        used: Set(code.used),
    };
    access_codes::Entity::insert(model)
        .on_conflict(
            OnConflict::column(access_codes::Column::Id)
                .update_columns([
                    access_codes::Column::CreatedAt,
                    access_codes::Column::CreatedByEmail,
                    access_codes::Column::CreatedByAdmin,
                    access_codes::Column::Used,
                ])
                .to_owned(),
        )
        .exec(conn)
        .await
        .map_err(|e| store_err(e, "upsert access code"))?;
    Ok(())
}

async fn delete_code<C: ConnectionTrait>(conn: &C, id: &str) -> Result<(), GateError> {
    access_codes::Entity::delete_by_id(id.to_owned())
        .exec(conn)
        .await
        .map_err(|e| store_err(e, "delete access code"))?;
    Ok(())
}

fn code_from_model(model: access_codes::Model) -> AccessCode {
    AccessCode {
        id: model.id,
        created_at: model.created_at,
        created_by_email: model.created_by_email,
        created_by_admin: model.created_by_admin,
        used: model.used,
    }
}

impl CodeTxn for DbCodeTxn {
    async fn get(&mut self, id: &str) -> Result<Option<AccessCode>, GateError> {
        find_code(&self.txn, id).await
    }

    async fn put(&mut self, code: &AccessCode) -> Result<(), GateError> {
        upsert_code(&self.txn, code).await
    }

    async fn delete(&mut self, id: &str) -> Result<(), GateError> {
        delete_code(&self.txn, id).await
    }
}

impl CodeStore for DbCodeStore {
    type Txn = DbCodeTxn;

    async fn get(&self, id: &str) -> Result<Option<AccessCode>, GateError> {
        find_code(&self.db, id).await
    }

    async fn put(&self, code: &AccessCode) -> Result<(), GateError> {
        upsert_code(&self.db, code).await
    }

    async fn delete(&self, id: &str) -> Result<(), GateError> {
        delete_code(&self.db, id).await
    }

    async fn transact<T, F>(&self, f: F) -> Result<T, GateError>
    where
        T: Send,
        F: for<'c> FnOnce(&'c mut Self::Txn) -> TxnFuture<'c, T> + Send,
    {
        let txn = self
            .db
            .begin_with_config(Some(IsolationLevel::Serializable), None)
            .await
            .map_err(|e| store_err(e, "begin transaction"))?;
        let mut handle = DbCodeTxn { txn };

        match f(&mut handle).await {
            Ok(value) => {
                handle
                    .txn
                    .commit()
                    .await
                    .map_err(|e| store_err(e, "commit transaction"))?;
                Ok(value)
            }
            Err(err) => {
                if let Err(e) = handle.txn.rollback().await {
                    tracing::warn!(error = %e, "rollback failed");
                }
                Err(err)
            }
        }
    }

    async fn stale_unused(&self, cutoff: DateTime<Utc>) -> Result<Vec<String>, GateError> {
        let ids = access_codes::Entity::find()
            .select_only()
            .column(access_codes::Column::Id)
            .filter(access_codes::Column::Used.eq(false))
            .filter(access_codes::Column::CreatedAt.lt(cutoff))
            .order_by_asc(access_codes::Column::CreatedAt)
            .into_tuple::<String>()
            .all(&self.db)
            .await
            .context("list stale access codes")?;
        Ok(ids)
    }

    async fn ping(&self) -> Result<(), GateError> {
        self.db.ping().await.context("ping database")?;
        Ok(())
    }
}
