use error_stack::Report;
use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::query::{BookingQuery, DependOnBookingQuery, DependOnEventQuery, EventQuery};
use kernel::interface::update::{DependOnEventModifier, EventModifier};
use kernel::prelude::entity::{
    AvailableSeats, Event, EventDescription, EventId, EventStartsAt, EventTitle, EventVenue,
    TicketPrice, TotalSeats,
};
use kernel::KernelError;
use uuid::Uuid;

use crate::transfer::{CreateEventDto, DeleteEventDto, EventDto, GetEventDto, UpdateEventDto};

fn event_not_found(id: &Uuid) -> Report<KernelError> {
    Report::new(KernelError::NotFound).attach_printable(format!("Event {id} not found"))
}

fn validate(title: &str, total_seats: i32, price: i64) -> error_stack::Result<(), KernelError> {
    if title.trim().is_empty() {
        return Err(Report::new(KernelError::InvalidInput).attach_printable("Title is empty"));
    }
    if total_seats <= 0 {
        return Err(Report::new(KernelError::InvalidInput)
            .attach_printable(format!("Total seats must be positive, got {total_seats}")));
    }
    if price < 0 {
        return Err(Report::new(KernelError::InvalidInput)
            .attach_printable(format!("Price must not be negative, got {price}")));
    }
    Ok(())
}

#[async_trait::async_trait]
pub trait GetEventService: 'static + Sync + Send + DependOnEventQuery {
    async fn get_event(&self, dto: GetEventDto) -> error_stack::Result<EventDto, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let event = self
            .event_query()
            .find_by_id(&mut connection, &EventId::new(dto.id))
            .await?
            .ok_or_else(|| event_not_found(&dto.id))?;

        Ok(EventDto::from(event))
    }

    async fn get_all_events(&self) -> error_stack::Result<Vec<EventDto>, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let events = self.event_query().find_all(&mut connection).await?;

        Ok(events.into_iter().map(EventDto::from).collect())
    }
}

impl<T> GetEventService for T where T: DependOnEventQuery {}

#[async_trait::async_trait]
pub trait CreateEventService: 'static + Sync + Send + DependOnEventModifier {
    async fn create_event(&self, dto: CreateEventDto) -> error_stack::Result<EventDto, KernelError> {
        dto.actor.ensure_admin()?;
        validate(&dto.title, dto.total_seats, dto.price)?;
        let mut connection = self.database_connection().transact().await?;

        let total_seats = TotalSeats::new(dto.total_seats);
        let event = Event::new(
            EventId::new(Uuid::new_v4()),
            EventTitle::new(dto.title),
            EventDescription::new(dto.description),
            EventStartsAt::new(dto.starts_at),
            EventVenue::new(dto.venue),
            total_seats,
            AvailableSeats::from(total_seats),
            TicketPrice::new(dto.price),
        );
        self.event_modifier()
            .create(&mut connection, &event)
            .await?;

        connection.commit().await?;

        tracing::info!(event_id = %event.id().as_ref(), "Event created");
        Ok(EventDto::from(event))
    }
}

impl<T> CreateEventService for T where T: DependOnEventModifier {}

#[async_trait::async_trait]
pub trait UpdateEventService:
    'static + Sync + Send + DependOnEventQuery + DependOnEventModifier
{
    async fn update_event(&self, dto: UpdateEventDto) -> error_stack::Result<EventDto, KernelError> {
        dto.actor.ensure_admin()?;
        let mut connection = self.database_connection().transact().await?;

        let event = self
            .event_query()
            .find_by_id_for_update(&mut connection, &EventId::new(dto.id))
            .await?
            .ok_or_else(|| event_not_found(&dto.id))?;

        let event = match dto.total_seats {
            Some(total_seats) => event.resize(TotalSeats::new(total_seats))?,
            None => event,
        };
        let mut event = event;
        event.substitute(|event| {
            if let Some(title) = dto.title {
                *event.title = EventTitle::new(title);
            }
            if let Some(description) = dto.description {
                *event.description = EventDescription::new(description);
            }
            if let Some(starts_at) = dto.starts_at {
                *event.starts_at = EventStartsAt::new(starts_at);
            }
            if let Some(venue) = dto.venue {
                *event.venue = EventVenue::new(venue);
            }
            if let Some(price) = dto.price {
                *event.price = TicketPrice::new(price);
            }
        });
        validate(
            event.title().as_ref(),
            *event.total_seats().as_ref(),
            *event.price().as_ref(),
        )?;

        self.event_modifier()
            .update(&mut connection, &event)
            .await?;

        connection.commit().await?;

        tracing::info!(event_id = %dto.id, "Event updated");
        Ok(EventDto::from(event))
    }
}

impl<T> UpdateEventService for T where T: DependOnEventQuery + DependOnEventModifier {}

#[async_trait::async_trait]
pub trait DeleteEventService:
    'static + Sync + Send + DependOnEventQuery + DependOnEventModifier + DependOnBookingQuery
{
    async fn delete_event(&self, dto: DeleteEventDto) -> error_stack::Result<(), KernelError> {
        dto.actor.ensure_admin()?;
        let mut connection = self.database_connection().transact().await?;

        let event_id = EventId::new(dto.id);
        self.event_query()
            .find_by_id_for_update(&mut connection, &event_id)
            .await?
            .ok_or_else(|| event_not_found(&dto.id))?;

        let bookings = self
            .booking_query()
            .count_by_event_id(&mut connection, &event_id)
            .await?;
        if bookings > 0 {
            return Err(Report::new(KernelError::InvalidInput).attach_printable(format!(
                "Event {} still has {bookings} bookings",
                dto.id
            )));
        }

        self.event_modifier()
            .delete(&mut connection, &event_id)
            .await?;

        connection.commit().await?;

        tracing::info!(event_id = %dto.id, "Event deleted");
        Ok(())
    }
}

impl<T> DeleteEventService for T where
    T: DependOnEventQuery + DependOnEventModifier + DependOnBookingQuery
{
}

#[cfg(test)]
mod test {
    use kernel::prelude::entity::UserRole;
    use kernel::KernelError;
    use time::macros::datetime;
    use uuid::Uuid;

    use crate::memory::TestModule;
    use crate::service::{
        CreateBookingService, CreateEventService, DeleteEventService, GetEventService,
        UpdateEventService,
    };
    use crate::transfer::{
        ActorDto, CreateBookingDto, CreateEventDto, DeleteEventDto, GetEventDto, UpdateEventDto,
    };

    fn new_event(actor: &ActorDto, title: &str, total_seats: i32, price: i64) -> CreateEventDto {
        CreateEventDto {
            actor: actor.clone(),
            title: title.to_string(),
            description: "Open air".to_string(),
            starts_at: datetime!(2030-07-01 18:00 UTC),
            venue: "Arena".to_string(),
            total_seats,
            price,
        }
    }

    fn resize(actor: &ActorDto, id: Uuid, total_seats: i32) -> UpdateEventDto {
        UpdateEventDto {
            actor: actor.clone(),
            id,
            title: None,
            description: None,
            starts_at: None,
            venue: None,
            total_seats: Some(total_seats),
            price: None,
        }
    }

    #[tokio::test]
    async fn created_event_starts_with_full_capacity() {
        let module = TestModule::new();
        let admin = module.seed_user(UserRole::Admin).await;

        let created = module
            .create_event(new_event(&admin, "Live Concert", 100, 1500))
            .await
            .unwrap();
        assert_eq!(created.available_seats, 100);

        let fetched = module
            .get_event(GetEventDto { id: created.id })
            .await
            .unwrap();
        assert_eq!(fetched, created);
        assert_eq!(module.get_all_events().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn event_writes_need_admin() {
        let module = TestModule::new();
        let user = module.seed_user(UserRole::User).await;

        let report = module
            .create_event(new_event(&user, "Live Concert", 100, 1500))
            .await
            .unwrap_err();
        assert_eq!(report.current_context(), &KernelError::Forbidden);
        assert!(module.get_all_events().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn invalid_events_are_rejected() {
        let module = TestModule::new();
        let admin = module.seed_user(UserRole::Admin).await;

        for dto in [
            new_event(&admin, "  ", 10, 100),
            new_event(&admin, "Live Concert", 0, 100),
            new_event(&admin, "Live Concert", 10, -1),
        ] {
            let report = module.create_event(dto).await.unwrap_err();
            assert_eq!(report.current_context(), &KernelError::InvalidInput);
        }
    }

    #[tokio::test]
    async fn missing_event_is_not_found() {
        let module = TestModule::new();
        let report = module
            .get_event(GetEventDto { id: Uuid::new_v4() })
            .await
            .unwrap_err();
        assert_eq!(report.current_context(), &KernelError::NotFound);
    }

    #[tokio::test]
    async fn resize_shifts_available_seats() {
        let module = TestModule::new();
        let admin = module.seed_user(UserRole::Admin).await;
        let user = module.seed_user(UserRole::User).await;
        let event_id = module.seed_event(10, 100).await;
        module
            .create_booking(CreateBookingDto {
                actor: user,
                event_id,
                seat_count: 4,
            })
            .await
            .unwrap();

        let grown = module.update_event(resize(&admin, event_id, 15)).await.unwrap();
        assert_eq!(grown.total_seats, 15);
        assert_eq!(grown.available_seats, 11);

        let report = module
            .update_event(resize(&admin, event_id, 3))
            .await
            .unwrap_err();
        assert_eq!(report.current_context(), &KernelError::InvalidInput);
        assert_eq!(module.available_seats(event_id).await, 11);
    }

    #[tokio::test]
    async fn event_with_bookings_cannot_be_deleted() {
        let module = TestModule::new();
        let admin = module.seed_user(UserRole::Admin).await;
        let user = module.seed_user(UserRole::User).await;
        let booked = module.seed_event(10, 100).await;
        let empty = module.seed_event(10, 100).await;
        module
            .create_booking(CreateBookingDto {
                actor: user,
                event_id: booked,
                seat_count: 1,
            })
            .await
            .unwrap();

        let report = module
            .delete_event(DeleteEventDto {
                actor: admin.clone(),
                id: booked,
            })
            .await
            .unwrap_err();
        assert_eq!(report.current_context(), &KernelError::InvalidInput);

        module
            .delete_event(DeleteEventDto {
                actor: admin.clone(),
                id: empty,
            })
            .await
            .unwrap();
        let report = module
            .delete_event(DeleteEventDto {
                actor: admin,
                id: empty,
            })
            .await
            .unwrap_err();
        assert_eq!(report.current_context(), &KernelError::NotFound);
    }
}
