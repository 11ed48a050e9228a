//! The central event registry.
//!
//! [`EventRegistry`] stores canonical events by id, users by id, and the
//! registration edges between them. Each edge is kept twice: in the
//! registry's per-event participant list, and in the student's own
//! `registered_event_ids`. Both copies change together.
//!
//! Registration is a two-state toggle per (user, event) pair:
//!
//! ```text
//!   Absent ──register──► Registered ──cancel──► Absent ──register──► ...
//! ```
//!
//! Every mutating operation comes in two flavours: `try_*` returns a
//! [`RegistryResult`] naming the reason for a refusal, the plain form
//! collapses it to a boolean.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use campuscal_core::{
    CanonicalEvent, SortByDate, SortByTitle, SortKey, SortStrategy, User, UserProfile,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{RegistryError, RegistryResult};

/// System-wide counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemStats {
    pub total_events: usize,
    pub total_users: usize,
    pub total_students: usize,
    pub total_organizers: usize,
}

/// Store of events, users and registrations.
#[derive(Debug)]
pub struct EventRegistry {
    /// Events keyed by id.
    events: HashMap<String, Arc<CanonicalEvent>>,
    /// Users keyed by id.
    users: HashMap<String, User>,
    /// Participant user ids per event id, in registration order.
    registrations: HashMap<String, Vec<String>>,
    /// Ordering applied by [`all_events`](Self::all_events).
    sort_strategy: Box<dyn SortStrategy>,
}

impl Default for EventRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EventRegistry {
    /// Creates an empty registry that lists events newest first.
    pub fn new() -> Self {
        Self {
            events: HashMap::new(),
            users: HashMap::new(),
            registrations: HashMap::new(),
            sort_strategy: Box::new(SortByDate),
        }
    }

    /// Builder method to pick the listing order by name.
    pub fn with_sort_key(mut self, key: SortKey) -> Self {
        self.sort_strategy = key.strategy();
        self
    }

    // -----------------------------------------------------------------------
    // Events
    // -----------------------------------------------------------------------

    /// Stores an event, replacing any event with the same id.
    ///
    /// Registrations already recorded under that id are kept.
    pub fn try_add_event(&mut self, event: impl Into<Arc<CanonicalEvent>>) -> RegistryResult<()> {
        let event = event.into();
        if event.id().trim().is_empty() {
            return Err(RegistryError::MissingEventId);
        }

        let id = event.id().to_string();
        self.registrations.entry(id.clone()).or_default();
        let replaced = self.events.insert(id.clone(), event).is_some();

        if replaced {
            debug!(event_id = %id, "Replaced event");
        } else {
            debug!(event_id = %id, "Added event");
        }
        Ok(())
    }

    pub fn add_event(&mut self, event: impl Into<Arc<CanonicalEvent>>) -> bool {
        self.try_add_event(event).is_ok()
    }

    /// Stores an event on behalf of an organizer and records it as theirs.
    pub fn try_add_event_for_organizer(
        &mut self,
        organizer_id: &str,
        event: impl Into<Arc<CanonicalEvent>>,
    ) -> RegistryResult<()> {
        let event = event.into();
        let user = self
            .users
            .get(organizer_id)
            .ok_or_else(|| RegistryError::unknown_user(organizer_id))?;
        if !user.is_organizer() {
            return Err(RegistryError::not_an_organizer(organizer_id));
        }

        let event_id = event.id().to_string();
        self.try_add_event(event)?;

        if let Some(organizer) = self.users.get_mut(organizer_id).and_then(User::as_organizer_mut) {
            if !organizer.created(&event_id) {
                organizer.record_created_event(&event_id);
            }
        }
        info!(organizer_id = %organizer_id, event_id = %event_id, "Organizer created event");
        Ok(())
    }

    pub fn add_event_for_organizer(
        &mut self,
        organizer_id: &str,
        event: impl Into<Arc<CanonicalEvent>>,
    ) -> bool {
        self.try_add_event_for_organizer(organizer_id, event).is_ok()
    }

    /// Deletes an event and its participant list.
    ///
    /// The id is also dropped from every student's registrations and every
    /// organizer's created list, so no user keeps a dangling reference.
    pub fn try_remove_event(&mut self, event_id: &str) -> RegistryResult<Arc<CanonicalEvent>> {
        let event = self
            .events
            .remove(event_id)
            .ok_or_else(|| RegistryError::unknown_event(event_id))?;
        let participants = self.registrations.remove(event_id).unwrap_or_default();

        for user in self.users.values_mut() {
            match &mut user.profile {
                UserProfile::Student(student) => {
                    student.cancel_event_registration(event_id);
                }
                UserProfile::Organizer(organizer) => {
                    organizer.forget_created_event(event_id);
                }
            }
        }

        info!(
            event_id = %event_id,
            participants = participants.len(),
            "Removed event"
        );
        Ok(event)
    }

    pub fn remove_event(&mut self, event_id: &str) -> bool {
        self.try_remove_event(event_id).is_ok()
    }

    pub fn event(&self, event_id: &str) -> Option<Arc<CanonicalEvent>> {
        self.events.get(event_id).cloned()
    }

    pub fn contains_event(&self, event_id: &str) -> bool {
        self.events.contains_key(event_id)
    }

    /// Number of stored events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    // -----------------------------------------------------------------------
    // Listing
    // -----------------------------------------------------------------------

    /// All events, in the order of the active sort strategy.
    pub fn all_events(&self) -> Vec<Arc<CanonicalEvent>> {
        self.sort_strategy.sort(self.snapshot())
    }

    /// All events by date, newest first, regardless of the active strategy.
    pub fn events_sorted_by_date(&self) -> Vec<Arc<CanonicalEvent>> {
        SortByDate.sort(self.snapshot())
    }

    /// All events by title, descending, regardless of the active strategy.
    pub fn events_sorted_by_title(&self) -> Vec<Arc<CanonicalEvent>> {
        SortByTitle.sort(self.snapshot())
    }

    /// Replaces the active sort strategy.
    pub fn set_sort_strategy(&mut self, strategy: Box<dyn SortStrategy>) {
        debug!(strategy = strategy.name(), "Changed sort strategy");
        self.sort_strategy = strategy;
    }

    pub fn set_sort_key(&mut self, key: SortKey) {
        self.set_sort_strategy(key.strategy());
    }

    /// Name of the active sort strategy.
    pub fn sort_strategy_name(&self) -> &'static str {
        self.sort_strategy.name()
    }

    fn snapshot(&self) -> Vec<Arc<CanonicalEvent>> {
        self.events.values().cloned().collect()
    }

    // -----------------------------------------------------------------------
    // Users
    // -----------------------------------------------------------------------

    /// Stores a user, replacing any user with the same id.
    ///
    /// A student's registered ids are rebuilt from the registry's edges. A
    /// replacement organizer keeps the created events of the one it replaces.
    pub fn try_register_user(&mut self, mut user: User) -> RegistryResult<()> {
        if user.id.trim().is_empty() {
            return Err(RegistryError::MissingUserId);
        }

        let previous = self.users.remove(&user.id);
        self.mirror_registrations(&mut user, previous.as_ref());
        self.carry_created_events(&mut user, previous.as_ref());

        debug!(
            user_id = %user.id,
            student = user.is_student(),
            replaced = previous.is_some(),
            "Registered user"
        );
        self.users.insert(user.id.clone(), user);
        Ok(())
    }

    pub fn register_user(&mut self, user: User) -> bool {
        self.try_register_user(user).is_ok()
    }

    /// Makes a student's registered ids match the edges held for it.
    ///
    /// Known ids keep their previous order; any remaining edges follow,
    /// ordered by event id.
    fn mirror_registrations(&self, user: &mut User, previous: Option<&User>) {
        let user_id = user.id.clone();
        let Some(student) = user.as_student_mut() else {
            return;
        };

        let mut edges: Vec<&str> = self
            .registrations
            .iter()
            .filter(|(_, participants)| participants.iter().any(|id| *id == user_id))
            .map(|(event_id, _)| event_id.as_str())
            .collect();
        edges.sort_unstable();

        let ordered: Vec<String> = previous
            .and_then(User::as_student)
            .map(|s| s.registered_event_ids())
            .unwrap_or_default()
            .iter()
            .chain(student.registered_event_ids())
            .map(String::as_str)
            .chain(edges.iter().copied())
            .filter(|id| edges.contains(id))
            .map(str::to_string)
            .collect();

        for stale in student.registered_event_ids().to_vec() {
            student.cancel_event_registration(&stale);
        }
        for event_id in &ordered {
            student.register_for_event(event_id);
        }
    }

    fn carry_created_events(&self, user: &mut User, previous: Option<&User>) {
        let Some(organizer) = user.as_organizer_mut() else {
            return;
        };
        let created = previous
            .and_then(User::as_organizer)
            .map(|o| o.created_event_ids())
            .unwrap_or_default();
        for event_id in created.iter().filter(|id| self.events.contains_key(id.as_str())) {
            if !organizer.created(event_id) {
                organizer.record_created_event(event_id);
            }
        }
    }

    pub fn user(&self, user_id: &str) -> Option<&User> {
        self.users.get(user_id)
    }

    /// All users, ordered by id.
    pub fn all_users(&self) -> Vec<&User> {
        let mut users: Vec<&User> = self.users.values().collect();
        users.sort_by(|a, b| a.id.cmp(&b.id));
        users
    }

    /// Events a student is registered for, in registration order.
    ///
    /// Ids that no longer resolve are skipped. Organizers and unknown users
    /// have no registrations.
    pub fn user_events(&self, user_id: &str) -> Vec<Arc<CanonicalEvent>> {
        self.users
            .get(user_id)
            .and_then(User::as_student)
            .map(|student| {
                student
                    .registered_event_ids()
                    .iter()
                    .filter_map(|id| self.event(id))
                    .collect()
            })
            .unwrap_or_default()
    }

    // -----------------------------------------------------------------------
    // Registrations
    // -----------------------------------------------------------------------

    /// Registers a user for an event.
    pub fn try_register_user_for_event(
        &mut self,
        user_id: &str,
        event_id: &str,
    ) -> RegistryResult<()> {
        self.ensure_known(user_id, event_id)?;

        let participants = self.registrations.entry(event_id.to_string()).or_default();
        if participants.iter().any(|id| id == user_id) {
            debug!(user_id = %user_id, event_id = %event_id, "Already registered");
            return Err(RegistryError::already_registered(user_id, event_id));
        }
        participants.push(user_id.to_string());

        if let Some(student) = self.users.get_mut(user_id).and_then(User::as_student_mut) {
            student.register_for_event(event_id);
        }

        info!(user_id = %user_id, event_id = %event_id, "User registered for event");
        Ok(())
    }

    pub fn register_user_for_event(&mut self, user_id: &str, event_id: &str) -> bool {
        self.try_register_user_for_event(user_id, event_id).is_ok()
    }

    /// Cancels a user's registration for an event.
    pub fn try_cancel_user_registration(
        &mut self,
        user_id: &str,
        event_id: &str,
    ) -> RegistryResult<()> {
        self.ensure_known(user_id, event_id)?;

        let participants = self
            .registrations
            .get_mut(event_id)
            .ok_or_else(|| RegistryError::not_registered(user_id, event_id))?;
        let position = participants
            .iter()
            .position(|id| id == user_id)
            .ok_or_else(|| RegistryError::not_registered(user_id, event_id))?;
        participants.remove(position);

        if let Some(student) = self.users.get_mut(user_id).and_then(User::as_student_mut) {
            student.cancel_event_registration(event_id);
        }

        info!(user_id = %user_id, event_id = %event_id, "Registration cancelled");
        Ok(())
    }

    pub fn cancel_user_registration(&mut self, user_id: &str, event_id: &str) -> bool {
        self.try_cancel_user_registration(user_id, event_id).is_ok()
    }

    /// Users registered for an event, in registration order.
    ///
    /// An unknown event has no participants.
    pub fn event_participants(&self, event_id: &str) -> Vec<&User> {
        self.registrations
            .get(event_id)
            .map(|ids| ids.iter().filter_map(|id| self.users.get(id)).collect())
            .unwrap_or_default()
    }

    pub fn is_registered(&self, user_id: &str, event_id: &str) -> bool {
        self.registrations
            .get(event_id)
            .is_some_and(|ids| ids.iter().any(|id| id == user_id))
    }

    fn ensure_known(&self, user_id: &str, event_id: &str) -> RegistryResult<()> {
        if !self.users.contains_key(user_id) {
            debug!(user_id = %user_id, "Rejected: unknown user");
            return Err(RegistryError::unknown_user(user_id));
        }
        if !self.events.contains_key(event_id) {
            debug!(event_id = %event_id, "Rejected: unknown event");
            return Err(RegistryError::unknown_event(event_id));
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Statistics
    // -----------------------------------------------------------------------

    pub fn stats(&self) -> SystemStats {
        let total_students = self.users.values().filter(|u| u.is_student()).count();
        SystemStats {
            total_events: self.events.len(),
            total_users: self.users.len(),
            total_students,
            total_organizers: self.users.len() - total_students,
        }
    }
}

/// A registry shared between threads.
pub type SharedRegistry = Arc<RwLock<EventRegistry>>;

/// Wraps a registry for sharing.
pub fn new_shared_registry(registry: EventRegistry) -> SharedRegistry {
    Arc::new(RwLock::new(registry))
}

/// Locks a shared registry for reading.
///
/// A writer that panicked cannot leave an edge half-applied, so a poisoned
/// lock is recovered rather than propagated.
pub fn read_registry(shared: &SharedRegistry) -> RwLockReadGuard<'_, EventRegistry> {
    shared.read().unwrap_or_else(PoisonError::into_inner)
}

/// Locks a shared registry for writing. See [`read_registry`].
pub fn write_registry(shared: &SharedRegistry) -> RwLockWriteGuard<'_, EventRegistry> {
    shared.write().unwrap_or_else(PoisonError::into_inner)
}
