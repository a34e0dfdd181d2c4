use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{Event, EventId};
use crate::KernelError;

#[async_trait::async_trait]
pub trait EventModifier: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn create(
        &self,
        con: &mut Self::Transaction,
        event: &Event,
    ) -> error_stack::Result<(), KernelError>;
    async fn update(
        &self,
        con: &mut Self::Transaction,
        event: &Event,
    ) -> error_stack::Result<(), KernelError>;
    async fn delete(
        &self,
        con: &mut Self::Transaction,
        event_id: &EventId,
    ) -> error_stack::Result<(), KernelError>;
}

pub trait DependOnEventModifier: 'static + Sync + Send + DependOnDatabaseConnection {
    type EventModifier: EventModifier<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn event_modifier(&self) -> &Self::EventModifier;
}
