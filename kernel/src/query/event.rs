use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{Event, EventId};
use crate::KernelError;

#[async_trait::async_trait]
pub trait EventQuery: 'static + Sync + Send {
    type Transaction: Transaction;

    /// Every event, soonest first.
    async fn find_all(
        &self,
        con: &mut Self::Transaction,
    ) -> error_stack::Result<Vec<Event>, KernelError>;

    async fn find_by_id(
        &self,
        con: &mut Self::Transaction,
        id: &EventId,
    ) -> error_stack::Result<Option<Event>, KernelError>;

    /// Same as [`EventQuery::find_by_id`] but the row stays locked against
    /// other writers until `con` commits or rolls back.
    async fn find_by_id_for_update(
        &self,
        con: &mut Self::Transaction,
        id: &EventId,
    ) -> error_stack::Result<Option<Event>, KernelError>;
}

pub trait DependOnEventQuery: 'static + Sync + Send + DependOnDatabaseConnection {
    type EventQuery: EventQuery<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn event_query(&self) -> &Self::EventQuery;
}
