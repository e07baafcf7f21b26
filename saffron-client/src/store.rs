//! Local booking store
//!
//! An in-process CRUD surface standing in for a backend, used by the
//! booking creation flows. The array is persisted to a JSON snapshot
//! file on every mutation and an observer list is notified synchronously
//! after each one.
//!
//! An explicit instance: callers pass the store by reference; there is
//! no ambient global. Not transactional: concurrent mutators in the same
//! process race with last-write-wins on the snapshot, which is
//! acceptable only because this is a single-user demo store, not a
//! system of record.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::{ClientError, ClientResult};
use shared::models::{Booking, BookingUpdate};

/// Observer callback, invoked with the full collection after a mutation
pub type BookingObserver = Box<dyn Fn(&[Booking]) + Send>;

/// Observer registration handle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObserverId(u64);

struct StoreInner {
    bookings: Vec<Booking>,
    observers: Vec<(ObserverId, BookingObserver)>,
    next_observer_id: u64,
}

/// Local persisted booking store
pub struct BookingStore {
    path: PathBuf,
    inner: Mutex<StoreInner>,
}

impl BookingStore {
    /// Open the store backed by the given snapshot path.
    ///
    /// A missing file starts an empty store; an unreadable/corrupt
    /// snapshot is logged and treated as empty (demo-store semantics).
    pub fn open(path: impl AsRef<Path>) -> ClientResult<Self> {
        let path = path.as_ref().to_path_buf();
        let bookings = match std::fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "Corrupt booking snapshot, starting empty");
                Vec::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(ClientError::Storage(e)),
        };

        Ok(Self {
            path,
            inner: Mutex::new(StoreInner {
                bookings,
                observers: Vec::new(),
                next_observer_id: 1,
            }),
        })
    }

    /// Current collection snapshot
    pub fn get_bookings(&self) -> Vec<Booking> {
        self.lock().bookings.clone()
    }

    /// Look up a booking by id
    pub fn get_booking(&self, id: &str) -> Option<Booking> {
        self.lock().bookings.iter().find(|b| b.id == id).cloned()
    }

    /// Append a booking. Returns false if the id is already taken.
    pub fn add_booking(&self, booking: Booking) -> bool {
        let mut inner = self.lock();
        if inner.bookings.iter().any(|b| b.id == booking.id) {
            tracing::warn!(id = %booking.id, "Duplicate booking id rejected");
            return false;
        }
        inner.bookings.push(booking);
        self.commit(&mut inner);
        true
    }

    /// Merge a patch into the booking with the given id.
    /// Returns false (store unchanged) when the id is absent.
    pub fn update_booking(&self, id: &str, patch: BookingUpdate) -> bool {
        let mut inner = self.lock();
        let Some(booking) = inner.bookings.iter_mut().find(|b| b.id == id) else {
            return false;
        };
        apply_patch(booking, patch);
        self.commit(&mut inner);
        true
    }

    /// Remove the booking with the given id.
    /// Returns false (store unchanged) when the id is absent.
    pub fn delete_booking(&self, id: &str) -> bool {
        let mut inner = self.lock();
        let before = inner.bookings.len();
        inner.bookings.retain(|b| b.id != id);
        if inner.bookings.len() == before {
            return false;
        }
        self.commit(&mut inner);
        true
    }

    /// Register an observer; it is invoked synchronously after every
    /// successful mutation with the full collection.
    pub fn subscribe(&self, observer: BookingObserver) -> ObserverId {
        let mut inner = self.lock();
        let id = ObserverId(inner.next_observer_id);
        inner.next_observer_id += 1;
        inner.observers.push((id, observer));
        id
    }

    /// Remove an observer; unknown ids return false
    pub fn unsubscribe(&self, id: ObserverId) -> bool {
        let mut inner = self.lock();
        let before = inner.observers.len();
        inner.observers.retain(|(oid, _)| *oid != id);
        inner.observers.len() != before
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, StoreInner> {
        // Observer callbacks run outside any panic path; a poisoned
        // lock still holds consistent data
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Persist the snapshot and notify observers (in that order).
    /// Persist failures are logged; the in-memory mutation stands.
    fn commit(&self, inner: &mut StoreInner) {
        match serde_json::to_string_pretty(&inner.bookings) {
            Ok(serialized) => {
                if let Err(e) = std::fs::write(&self.path, serialized) {
                    tracing::error!(path = %self.path.display(), error = %e, "Failed to persist booking snapshot");
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize booking snapshot");
            }
        }
        for (_, observer) in &inner.observers {
            observer(&inner.bookings);
        }
    }
}

fn apply_patch(booking: &mut Booking, patch: BookingUpdate) {
    if let Some(guest_name) = patch.guest_name {
        booking.guest_name = guest_name;
    }
    if let Some(guest_type) = patch.guest_type {
        booking.guest_type = Some(guest_type);
    }
    if let Some(session_id) = patch.session_id {
        booking.session_id = session_id;
    }
    if let Some(session_name) = patch.session_name {
        booking.session_name = session_name;
    }
    if let Some(booking_date) = patch.booking_date {
        booking.booking_date = booking_date;
    }
    if let Some(status) = patch.status {
        booking.status = status;
    }
    if let Some(payment_status) = patch.payment_status {
        booking.payment_status = payment_status;
    }
    if let Some(veg_count) = patch.veg_count {
        booking.veg_count = veg_count;
    }
    if let Some(non_veg_count) = patch.non_veg_count {
        booking.non_veg_count = non_veg_count;
    }
    if let Some(total_amount) = patch.total_amount {
        booking.total_amount = total_amount;
    }
    if let Some(reminder_sent) = patch.reminder_sent {
        booking.reminder_sent = reminder_sent;
    }
    if let Some(reminder_count) = patch.reminder_count {
        booking.reminder_count = reminder_count;
    }
    if let Some(phone) = patch.phone {
        booking.phone = Some(phone);
    }
    if let Some(email) = patch.email {
        booking.email = Some(email);
    }
}
