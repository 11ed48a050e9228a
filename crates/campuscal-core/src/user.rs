//! User identities.
//!
//! A [`User`] carries the shared identity fields and a [`UserProfile`] with
//! the variant-specific data. Students mirror their registrations in
//! [`Student::registered_event_ids`]; organizers track the events they created.

use serde::{Deserialize, Serialize};

/// A registered user of the campus event system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub profile: UserProfile,
}

/// Variant-specific user data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UserProfile {
    Student(Student),
    Organizer(Organizer),
}

impl User {
    /// Creates a student user.
    pub fn student(
        id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        student: Student,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            profile: UserProfile::Student(student),
        }
    }

    /// Creates an organizer user.
    pub fn organizer(
        id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        organizer: Organizer,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            profile: UserProfile::Organizer(organizer),
        }
    }

    pub fn as_student(&self) -> Option<&Student> {
        match &self.profile {
            UserProfile::Student(student) => Some(student),
            UserProfile::Organizer(_) => None,
        }
    }

    pub fn as_student_mut(&mut self) -> Option<&mut Student> {
        match &mut self.profile {
            UserProfile::Student(student) => Some(student),
            UserProfile::Organizer(_) => None,
        }
    }

    pub fn as_organizer(&self) -> Option<&Organizer> {
        match &self.profile {
            UserProfile::Organizer(organizer) => Some(organizer),
            UserProfile::Student(_) => None,
        }
    }

    pub fn as_organizer_mut(&mut self) -> Option<&mut Organizer> {
        match &mut self.profile {
            UserProfile::Organizer(organizer) => Some(organizer),
            UserProfile::Student(_) => None,
        }
    }

    pub fn is_student(&self) -> bool {
        matches!(self.profile, UserProfile::Student(_))
    }

    pub fn is_organizer(&self) -> bool {
        matches!(self.profile, UserProfile::Organizer(_))
    }
}

/// Student-specific data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub student_id: String,
    pub major: String,
    pub year: u32,
    registered_event_ids: Vec<String>,
}

impl Student {
    pub fn new(student_id: impl Into<String>, major: impl Into<String>, year: u32) -> Self {
        Self {
            student_id: student_id.into(),
            major: major.into(),
            year,
            registered_event_ids: Vec::new(),
        }
    }

    /// Records a registration. Returns false if the event is already listed.
    pub fn register_for_event(&mut self, event_id: &str) -> bool {
        if self.is_registered_for(event_id) {
            return false;
        }
        self.registered_event_ids.push(event_id.to_string());
        true
    }

    /// Drops a registration. Returns false if the event was not listed.
    pub fn cancel_event_registration(&mut self, event_id: &str) -> bool {
        let before = self.registered_event_ids.len();
        self.registered_event_ids.retain(|id| id != event_id);
        self.registered_event_ids.len() != before
    }

    pub fn is_registered_for(&self, event_id: &str) -> bool {
        self.registered_event_ids.iter().any(|id| id == event_id)
    }

    /// Registered event ids in registration order.
    pub fn registered_event_ids(&self) -> &[String] {
        &self.registered_event_ids
    }
}

/// Organizer-specific data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organizer {
    pub department: String,
    pub role: String,
    created_event_ids: Vec<String>,
}

impl Organizer {
    pub fn new(department: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            department: department.into(),
            role: role.into(),
            created_event_ids: Vec::new(),
        }
    }

    /// Appends an event id to the list of events this organizer created.
    pub fn record_created_event(&mut self, event_id: &str) {
        self.created_event_ids.push(event_id.to_string());
    }

    /// Removes an event id from the created list. Returns false if absent.
    pub fn forget_created_event(&mut self, event_id: &str) -> bool {
        let before = self.created_event_ids.len();
        self.created_event_ids.retain(|id| id != event_id);
        self.created_event_ids.len() != before
    }

    pub fn created(&self, event_id: &str) -> bool {
        self.created_event_ids.iter().any(|id| id == event_id)
    }

    /// Created event ids in creation order.
    pub fn created_event_ids(&self) -> &[String] {
        &self.created_event_ids
    }
}
