use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use sea_orm::{DatabaseConnection, DatabaseTransaction, DbErr, TransactionTrait};

use crate::db::repositories::{
    BloodPressureMeasurementRepository, FoodItemRepository, MealFoodItemRepository,
    MealRepository, PersonRepository, PlannedMealRepository, WeightMeasurementRepository,
};

/// Hands each job execution its own isolated data access scope.
#[derive(Clone)]
pub struct ExecutionContextFactory {
    db: DatabaseConnection,
    active: Arc<AtomicUsize>,
}

impl ExecutionContextFactory {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            active: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Open a new scope backed by a fresh database transaction.
    pub async fn create_scope(&self) -> Result<ExecutionContext, DbErr> {
        let txn = self.db.begin().await?;
        self.active.fetch_add(1, Ordering::SeqCst);

        Ok(ExecutionContext {
            txn,
            _guard: ScopeGuard {
                active: Arc::clone(&self.active),
            },
        })
    }

    /// Number of scopes created by this factory that have not been released.
    pub fn active_scopes(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }
}

struct ScopeGuard {
    active: Arc<AtomicUsize>,
}

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Repositories for a single job execution, sharing one transaction.
///
/// Dropping the context without committing rolls the transaction back.
pub struct ExecutionContext {
    txn: DatabaseTransaction,
    _guard: ScopeGuard,
}

impl ExecutionContext {
    pub fn people(&self) -> PersonRepository<'_, DatabaseTransaction> {
        PersonRepository::new(&self.txn)
    }

    pub fn weight_measurements(&self) -> WeightMeasurementRepository<'_, DatabaseTransaction> {
        WeightMeasurementRepository::new(&self.txn)
    }

    pub fn blood_pressure_measurements(
        &self,
    ) -> BloodPressureMeasurementRepository<'_, DatabaseTransaction> {
        BloodPressureMeasurementRepository::new(&self.txn)
    }

    pub fn food_items(&self) -> FoodItemRepository<'_, DatabaseTransaction> {
        FoodItemRepository::new(&self.txn)
    }

    pub fn meals(&self) -> MealRepository<'_, DatabaseTransaction> {
        MealRepository::new(&self.txn)
    }

    pub fn meal_food_items(&self) -> MealFoodItemRepository<'_, DatabaseTransaction> {
        MealFoodItemRepository::new(&self.txn)
    }

    pub fn planned_meals(&self) -> PlannedMealRepository<'_, DatabaseTransaction> {
        PlannedMealRepository::new(&self.txn)
    }

    pub async fn commit(self) -> Result<(), DbErr> {
        self.txn.commit().await
    }

    pub async fn rollback(self) -> Result<(), DbErr> {
        self.txn.rollback().await
    }
}
