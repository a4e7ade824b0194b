use chrono::NaiveDate;
use uuid::Uuid;

use crate::db::{DB, DBError, save_db};
use crate::models::activity::{Activity, ParsedActivity, get_db_location};

pub struct ActivityService;

impl ActivityService {
    /// Assigns an id, stores the activity, and saves the database.
    pub fn create(db: &mut DB<Activity>, parsed: ParsedActivity) -> Result<Activity, DBError> {
        let id = Uuid::new_v4().to_string();
        let activity = Activity {
            id: id.clone(),
            name: parsed.name,
            start_time: parsed.start_time,
            end_time: parsed.end_time,
            description: parsed.description,
            kind: parsed.kind,
            date: parsed.date,
        };
        db.insert(id, activity.clone());
        save_db(&get_db_location(), db)?;
        Ok(activity)
    }

    pub fn list_all(db: &DB<Activity>) -> Vec<Activity> {
        let mut activities: Vec<Activity> = db.values().cloned().collect();
        activities.sort_by(|a, b| (a.date, &a.start_time).cmp(&(b.date, &b.start_time)));
        activities
    }

    pub fn list_by_date(db: &DB<Activity>, date: NaiveDate) -> Vec<Activity> {
        let mut activities: Vec<Activity> = db
            .values()
            .filter(|activity| activity.date == date)
            .cloned()
            .collect();
        activities.sort_by(|a, b| a.start_time.cmp(&b.start_time));
        activities
    }

    /// Removes the activity with the given id. Returns whether anything
    /// was deleted; the database is only rewritten when it was.
    pub fn delete(db: &mut DB<Activity>, id: &str) -> Result<bool, DBError> {
        if db.remove(id).is_none() {
            return Ok(false);
        }
        save_db(&get_db_location(), db)?;
        Ok(true)
    }
}
