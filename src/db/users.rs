//! User operations.
//!
//! Creation is guarded twice before any write: the actor's role must be
//! allowed to create the target rank, and the email must be unique across
//! both stores. Credentials never pass through here — the server is the
//! only place passwords exist, and with no server reachable creation
//! simply fails rather than degrading to a local write.

use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::{Notification, NotificationCategory, NotificationKind, Role, User};
use crate::notify::{templates, Channel};
use crate::store::keys;

use super::Database;

impl Database {
    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.fetch_or_local("/users", keys::USERS).await
    }

    pub async fn get_user(&self, id: Uuid) -> Result<User> {
        self.list_users()
            .await?
            .into_iter()
            .find(|u| u.id == id)
            .ok_or(Error::NotFound { kind: "user", id })
    }

    /// Creates a user on behalf of `actor`.
    ///
    /// Order matters: authorization first, then validation, then the
    /// duplicate check — all before any store is touched, so a failure
    /// leaves no partial write anywhere.
    pub async fn add_user(&self, actor: Role, user: User) -> Result<()> {
        if !actor.can_create(user.role) {
            return Err(Error::Authorization {
                actor,
                target: user.role,
            });
        }

        if user.name.trim().is_empty() {
            return Err(Error::Validation("user name is required".into()));
        }
        if !user.email.contains('@') {
            return Err(Error::Validation(format!(
                "invalid email address: {}",
                user.email
            )));
        }

        let known = self.list_users().await?;
        let locals: Vec<User> = self.local.get(keys::USERS);
        if known
            .iter()
            .chain(locals.iter())
            .any(|u| u.email.eq_ignore_ascii_case(&user.email))
        {
            return Err(Error::Duplicate {
                field: "email",
                value: user.email,
            });
        }

        if let Some(api) = self.api() {
            // Fail closed: no local fallback for account creation.
            api.post("/users", &user).await?;
        }

        let new_student = (user.role == Role::Student)
            .then(|| (user.name.clone(), user.email.clone()));

        self.local.update(keys::USERS, |users: &mut Vec<User>| {
            users.push(user);
        })?;

        self.changed();

        if let Some((name, email)) = new_student {
            self.announce_signup(&known, &name, &email).await;
        }
        Ok(())
    }

    /// Tells every admin about a freshly registered student, in-app and
    /// over email. Best-effort: the account already exists, so failures
    /// here are logged and swallowed.
    async fn announce_signup(&self, known: &[User], name: &str, email: &str) {
        for admin in known
            .iter()
            .filter(|u| matches!(u.role, Role::Admin | Role::Superadmin))
        {
            let result = self
                .create_notification(Notification::new(
                    admin.id,
                    "New Student Registration",
                    format!("{} ({}) has registered.", name, email),
                    NotificationKind::Info,
                    NotificationCategory::Enrollment,
                ))
                .await;
            if let Err(e) = result {
                tracing::warn!("signup notification for {} failed: {}", admin.email, e);
            }

            let rendered = templates::new_student_signup(&admin.name, name, email);
            if !self
                .notifier()
                .send(Channel::Email, &admin.email, &rendered)
                .await
            {
                tracing::warn!("signup email to {} failed", admin.email);
            }
        }
    }

    /// Replaces a user record by id.
    pub async fn update_user(&self, user: &User) -> Result<()> {
        let known = self.list_users().await?;
        if !known.iter().any(|u| u.id == user.id) {
            return Err(Error::NotFound {
                kind: "user",
                id: user.id,
            });
        }

        if let Some(api) = self.api() {
            api.put(&format!("/users/{}", user.id), user).await?;
        }

        self.local.update(keys::USERS, |users: &mut Vec<User>| {
            if let Some(existing) = users.iter_mut().find(|u| u.id == user.id) {
                *existing = user.clone();
            }
        })?;

        self.changed();
        Ok(())
    }

    pub async fn delete_user(&self, id: Uuid) -> Result<()> {
        if let Some(api) = self.api() {
            api.delete(&format!("/users/{}", id)).await?;
        }

        self.local.update(keys::USERS, |users: &mut Vec<User>| {
            users.retain(|u| u.id != id);
        })?;

        self.changed();
        Ok(())
    }
}
