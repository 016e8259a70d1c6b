//! Flat-file JSON store.
//!
//! Every operation reads the whole document, optionally mutates it and writes it
//! back. A single mutex serializes access within the process; nothing protects the
//! file from other processes.

use anyhow::Context;
use chrono::{Duration, Utc};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

use crate::models::*;

pub struct JsonStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All services in file order.
    pub async fn services(&self) -> anyhow::Result<Vec<Service>> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.services)
    }

    pub async fn service(&self, id: i64) -> anyhow::Result<Option<Service>> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.services.into_iter().find(|s| s.id == id))
    }

    /// Append a pending booking. The id is one past the current maximum.
    pub async fn create_booking(&self, new: NewBooking) -> anyhow::Result<Booking> {
        let _guard = self.lock.lock().await;
        let mut data = self.load().await?;

        let id = data.bookings.iter().map(|b| b.id).max().unwrap_or(0) + 1;
        let booking = Booking {
            id,
            user_id: new.user_id,
            service_id: new.service.id,
            service_name: new.service.name,
            price: new.service.price,
            start: new.start,
            end: new.start + Duration::minutes(i64::from(new.service.duration)),
            status: BookingStatus::Pending,
            order_id: id,
            created_at: Utc::now(),
        };

        data.bookings.push(booking.clone());
        self.save(&data).await?;
        tracing::info!(
            booking_id = booking.id,
            user_id = booking.user_id,
            "Booking created for {}",
            booking.start
        );
        Ok(booking)
    }

    /// Bookings of a user that are not canceled, earliest first.
    pub async fn active_bookings(&self, user_id: i64) -> anyhow::Result<Vec<Booking>> {
        let _guard = self.lock.lock().await;
        let mut bookings: Vec<Booking> = self
            .load()
            .await?
            .bookings
            .into_iter()
            .filter(|b| b.user_id == user_id && b.status != BookingStatus::Canceled)
            .collect();
        bookings.sort_by_key(|b| b.start);
        Ok(bookings)
    }

    /// Flip a user's booking to canceled. Canceling twice is a no-op.
    pub async fn cancel_booking(
        &self,
        user_id: i64,
        booking_id: i64,
    ) -> anyhow::Result<CancelOutcome> {
        let _guard = self.lock.lock().await;
        let mut data = self.load().await?;

        let Some(booking) = data
            .bookings
            .iter_mut()
            .find(|b| b.id == booking_id && b.user_id == user_id)
        else {
            return Ok(CancelOutcome::NotFound);
        };

        if booking.status == BookingStatus::Canceled {
            return Ok(CancelOutcome::AlreadyCanceled(booking.clone()));
        }

        booking.status = BookingStatus::Canceled;
        let canceled = booking.clone();
        self.save(&data).await?;
        tracing::info!(booking_id, user_id, "Booking canceled");
        Ok(CancelOutcome::Canceled(canceled))
    }

    async fn load(&self) -> anyhow::Result<DataFile> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => serde_json::from_str(&raw)
                .with_context(|| format!("malformed data file {}", self.path.display())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(DataFile::default()),
            Err(e) => {
                Err(e).with_context(|| format!("failed to read {}", self.path.display()))
            }
        }
    }

    async fn save(&self, data: &DataFile) -> anyhow::Result<()> {
        let raw = serde_json::to_string_pretty(data)?;
        tokio::fs::write(&self.path, raw)
            .await
            .with_context(|| format!("failed to write {}", self.path.display()))
    }
}
