//! Shared fakes for unit and handler tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::domain::users::{
  DisplayName, Email, Locality, NewProfile, PhoneNumber, SubjectId, User, UserError,
  UserRepository, UserRole,
};

/// `UserRepository` backed by a map keyed on subject id
#[derive(Default)]
pub struct InMemoryUserRepository {
  users: Mutex<HashMap<String, User>>,
  updates: AtomicUsize,
}

impl InMemoryUserRepository {
  pub fn get(&self, subject_id: &str) -> Option<User> {
    self.users.lock().unwrap().get(subject_id).cloned()
  }

  pub fn find(&self, predicate: impl Fn(&User) -> bool) -> Option<User> {
    self
      .users
      .lock()
      .unwrap()
      .values()
      .find(|user| predicate(user))
      .cloned()
  }

  pub fn insert(&self, user: User) {
    self
      .users
      .lock()
      .unwrap()
      .insert(user.subject_id.clone(), user);
  }

  pub fn update_count(&self) -> usize {
    self.updates.load(Ordering::SeqCst)
  }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
  async fn create(&self, user: User) -> Result<User, UserError> {
    let mut users = self.users.lock().unwrap();
    if users.contains_key(&user.subject_id) {
      return Err(UserError::SubjectAlreadyExists);
    }
    users.insert(user.subject_id.clone(), user.clone());
    Ok(user)
  }

  async fn find_by_subject_id(&self, subject_id: &SubjectId) -> Result<Option<User>, UserError> {
    Ok(self.get(subject_id.as_str()))
  }

  async fn update(&self, mut user: User) -> Result<User, UserError> {
    let mut users = self.users.lock().unwrap();
    match users.get_mut(&user.subject_id) {
      Some(existing) => {
        // Same semantics as the Postgres UPDATE: stored flags are sticky
        user.phone_verified |= existing.phone_verified;
        user.email_verified |= existing.email_verified;
        *existing = user.clone();
        self.updates.fetch_add(1, Ordering::SeqCst);
        Ok(user)
      }
      None => Err(UserError::NotFound),
    }
  }
}

pub fn sample_profile(subject_id: &str) -> NewProfile {
  NewProfile {
    subject_id: SubjectId::new(subject_id).unwrap(),
    email: Email::new("asha@example.com").unwrap(),
    name: DisplayName::new("Asha Rao").unwrap(),
    phone_number: PhoneNumber::parse("9876543210", "+91").unwrap(),
    state: Locality::state("Kerala").unwrap(),
    city: Locality::city("Kochi").unwrap(),
    role: UserRole::Lawyer,
  }
}
