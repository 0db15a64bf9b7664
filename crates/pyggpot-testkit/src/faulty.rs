//! Fault-injecting ledger store
//!
//! Wraps a working store and fails exactly the operations a test asks for.
//! Counters are per transaction: `fail_update_at(2)` fails the second update
//! of every transaction opened through the wrapper.

use pyggpot_core::{
    LedgerRow, LedgerStore, LedgerTransaction, NewLedgerRow, PotId, RowId, StoreError,
};

#[derive(Debug, Clone, Copy, Default)]
struct FaultPlan {
    begin: bool,
    read: bool,
    insert_at: Option<usize>,
    update_at: Option<usize>,
    delete_at: Option<usize>,
    commit: bool,
}

/// Store wrapper that injects [`StoreError`]s.
#[derive(Debug, Clone)]
pub struct FaultyLedgerHandler<S> {
    inner: S,
    plan: FaultPlan,
}

impl<S> FaultyLedgerHandler<S> {
    /// Wrap `inner` with no faults armed.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            plan: FaultPlan::default(),
        }
    }

    /// Fail every `begin`.
    pub fn fail_begin(mut self) -> Self {
        self.plan.begin = true;
        self
    }

    /// Fail every `fetch_rows`.
    pub fn fail_read(mut self) -> Self {
        self.plan.read = true;
        self
    }

    /// Fail the `n`-th insert (1-based) of each transaction.
    pub fn fail_insert_at(mut self, n: usize) -> Self {
        self.plan.insert_at = Some(n);
        self
    }

    /// Fail the `n`-th update (1-based) of each transaction.
    pub fn fail_update_at(mut self, n: usize) -> Self {
        self.plan.update_at = Some(n);
        self
    }

    /// Fail the `n`-th delete (1-based) of each transaction.
    pub fn fail_delete_at(mut self, n: usize) -> Self {
        self.plan.delete_at = Some(n);
        self
    }

    /// Fail every commit; the inner transaction is rolled back.
    pub fn fail_commit(mut self) -> Self {
        self.plan.commit = true;
        self
    }

    /// The wrapped store.
    pub fn inner(&self) -> &S {
        &self.inner
    }
}

/// Transaction opened through a [`FaultyLedgerHandler`].
pub struct FaultyTransaction<'a, S: LedgerStore + 'a> {
    inner: S::Transaction<'a>,
    plan: FaultPlan,
    inserts: usize,
    updates: usize,
    deletes: usize,
}

impl<S: LedgerStore> LedgerStore for FaultyLedgerHandler<S> {
    type Transaction<'a> = FaultyTransaction<'a, S> where Self: 'a;

    fn begin(&self) -> Result<Self::Transaction<'_>, StoreError> {
        if self.plan.begin {
            return Err(StoreError::BeginFailed("injected begin failure".into()));
        }
        Ok(FaultyTransaction {
            inner: self.inner.begin()?,
            plan: self.plan,
            inserts: 0,
            updates: 0,
            deletes: 0,
        })
    }
}

fn trips(counter: &mut usize, armed: Option<usize>) -> bool {
    *counter += 1;
    armed == Some(*counter)
}

impl<'a, S: LedgerStore + 'a> LedgerTransaction for FaultyTransaction<'a, S> {
    fn fetch_rows(&mut self, pot: PotId) -> Result<Vec<LedgerRow>, StoreError> {
        if self.plan.read {
            return Err(StoreError::ReadFailed("injected read failure".into()));
        }
        self.inner.fetch_rows(pot)
    }

    fn insert_row(&mut self, row: NewLedgerRow) -> Result<LedgerRow, StoreError> {
        if trips(&mut self.inserts, self.plan.insert_at) {
            return Err(StoreError::WriteFailed(format!(
                "injected failure on insert #{}",
                self.inserts
            )));
        }
        self.inner.insert_row(row)
    }

    fn update_row(&mut self, row: &LedgerRow) -> Result<(), StoreError> {
        if trips(&mut self.updates, self.plan.update_at) {
            return Err(StoreError::WriteFailed(format!(
                "injected failure on update #{}",
                self.updates
            )));
        }
        self.inner.update_row(row)
    }

    fn delete_row(&mut self, id: RowId) -> Result<(), StoreError> {
        if trips(&mut self.deletes, self.plan.delete_at) {
            return Err(StoreError::WriteFailed(format!(
                "injected failure on delete #{}",
                self.deletes
            )));
        }
        self.inner.delete_row(id)
    }

    fn commit(self) -> Result<(), StoreError> {
        if self.plan.commit {
            self.inner.rollback();
            return Err(StoreError::CommitFailed("injected commit failure".into()));
        }
        self.inner.commit()
    }
}
