//! Course operations. Remote-first with the usual local mirror.

use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::Course;
use crate::store::keys;

use super::Database;

impl Database {
    pub async fn list_courses(&self) -> Result<Vec<Course>> {
        self.fetch_or_local("/courses", keys::COURSES).await
    }

    pub async fn get_course(&self, id: Uuid) -> Result<Course> {
        self.list_courses()
            .await?
            .into_iter()
            .find(|c| c.id == id)
            .ok_or(Error::NotFound { kind: "course", id })
    }

    pub async fn add_course(&self, course: Course) -> Result<()> {
        if course.title.trim().is_empty() {
            return Err(Error::Validation("course title is required".into()));
        }

        if let Some(api) = self.api() {
            api.post("/courses", &course).await?;
        }

        self.local.append(keys::COURSES, course)?;
        self.changed();
        Ok(())
    }

    pub async fn update_course(&self, course: &Course) -> Result<()> {
        let known = self.list_courses().await?;
        if !known.iter().any(|c| c.id == course.id) {
            return Err(Error::NotFound {
                kind: "course",
                id: course.id,
            });
        }

        if let Some(api) = self.api() {
            api.put(&format!("/courses/{}", course.id), course).await?;
        }

        self.local.update(keys::COURSES, |courses: &mut Vec<Course>| {
            if let Some(existing) = courses.iter_mut().find(|c| c.id == course.id) {
                *existing = course.clone();
            }
        })?;

        self.changed();
        Ok(())
    }

    pub async fn delete_course(&self, id: Uuid) -> Result<()> {
        if let Some(api) = self.api() {
            api.delete(&format!("/courses/{}", id)).await?;
        }

        self.local.update(keys::COURSES, |courses: &mut Vec<Course>| {
            courses.retain(|c| c.id != id);
        })?;

        self.changed();
        Ok(())
    }
}
