use chrono::Utc;
use sea_orm::{ActiveValue, IntoActiveModel, TransactionTrait, prelude::*};

use crate::{EngineError, Expense, ExpenseDraft, ExpenseFields, ResultEngine, expenses};

use super::super::Engine;
use super::with_tx;

fn not_found() -> EngineError {
    EngineError::KeyNotFound("Expense".to_string())
}

impl Engine {
    /// Validates `draft` and inserts a new expense.
    pub async fn create_expense(&self, draft: ExpenseDraft) -> ResultEngine<Expense> {
        let fields = ExpenseFields::parse(draft)?;
        fields.check_store_constraints()?;

        let now = Utc::now();
        let model = expenses::ActiveModel {
            id: ActiveValue::NotSet,
            amount_minor: ActiveValue::Set(fields.amount.cents()),
            description: ActiveValue::Set(fields.description),
            category: ActiveValue::Set(fields.category),
            date: ActiveValue::Set(fields.date),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
        }
        .insert(&self.database)
        .await?;

        tracing::info!(id = model.id, "expense created");
        Ok(Expense::from(model))
    }

    /// Replaces every editable field of an existing expense.
    ///
    /// The draft is validated before the lookup, so an invalid body is
    /// reported even when `id` does not exist.
    pub async fn update_expense(&self, id: i32, draft: ExpenseDraft) -> ResultEngine<Expense> {
        let fields = ExpenseFields::parse(draft)?;
        fields.check_store_constraints()?;

        with_tx!(self, |db_tx| {
            let existing = expenses::Entity::find_by_id(id)
                .one(&db_tx)
                .await?
                .ok_or_else(not_found)?;

            let mut active = existing.into_active_model();
            active.amount_minor = ActiveValue::Set(fields.amount.cents());
            active.description = ActiveValue::Set(fields.description);
            active.category = ActiveValue::Set(fields.category);
            active.date = ActiveValue::Set(fields.date);
            active.updated_at = ActiveValue::Set(Utc::now());
            let model = active.update(&db_tx).await?;

            tracing::info!(id, "expense updated");
            Ok::<_, EngineError>(Expense::from(model))
        })
    }

    /// Removes an expense and returns its id.
    pub async fn delete_expense(&self, id: i32) -> ResultEngine<i32> {
        with_tx!(self, |db_tx| {
            let existing = expenses::Entity::find_by_id(id)
                .one(&db_tx)
                .await?
                .ok_or_else(not_found)?;
            expenses::Entity::delete_by_id(existing.id)
                .exec(&db_tx)
                .await?;

            tracing::info!(id, "expense deleted");
            Ok::<_, EngineError>(existing.id)
        })
    }
}
