use crate::error::RecordStoreError;
use crate::sqlite::connection::Database;

impl Database {
    /// Begin a transaction. Exclusive locking is used because the host does
    /// not coordinate concurrent writers, so there is nothing to contend
    /// with and nothing to deadlock against.
    pub(crate) fn begin_transaction(&mut self) -> Result<(), RecordStoreError> {
        if self.in_transaction {
            return Err(RecordStoreError::TxState(
                "transaction already in progress",
            ));
        }
        self.execute_update("begin exclusive transaction", &[])?;
        self.in_transaction = true;
        Ok(())
    }

    pub(crate) fn commit(&mut self) -> Result<(), RecordStoreError> {
        if !self.in_transaction {
            return Err(RecordStoreError::TxState("transaction not active"));
        }
        self.execute_update("commit transaction", &[])?;
        self.in_transaction = false;
        Ok(())
    }

    /// Roll back the open transaction.
    ///
    /// Rollback is abnormal here - it means either an engine bug or a user
    /// issue (e.g. no free disk space) that the framework may be unable to
    /// recover from safely, so it is logged prominently. On some errors
    /// (IO, memory) SQLite rolls the transaction back on its own; a second
    /// rollback then fails, and surfacing that failure would hide the
    /// original cause, so it is logged and swallowed.
    pub(crate) fn rollback(&mut self) {
        self.log.error(
            "record-store sqlite transaction is being rolled back! This is BAD - investigate \
             whether it is an engine bug or a user issue (e.g. no empty disk space)",
        );
        if let Err(error) = self.execute_update("rollback transaction", &[]) {
            self.log.error(&format!(
                "Error while attempting to roll back transaction, probably harmless: {error}"
            ));
        }
        self.in_transaction = false;
    }

    /// Run `work` inside one exclusive transaction, rolling back on any
    /// failure.
    ///
    /// Cache deltas associated with `work` must be applied by the caller
    /// only after this returns `Ok`.
    pub(crate) fn with_exclusive_tx<T>(
        &mut self,
        work: impl FnOnce(&mut Self) -> Result<T, RecordStoreError>,
    ) -> Result<T, RecordStoreError> {
        self.begin_transaction()?;
        match work(self) {
            Ok(value) => {
                if let Err(error) = self.commit() {
                    self.rollback();
                    return Err(error);
                }
                Ok(value)
            }
            Err(error) => {
                self.rollback();
                Err(error)
            }
        }
    }
}
