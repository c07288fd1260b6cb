use time::{macros::format_description, Date, Duration, OffsetDateTime, PrimitiveDateTime};
use time::format_description::{well_known::Rfc3339, FormatItem};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    meals::{
        dto::{DateInput, MealMetrics, MealRequest},
        repo::MealRepo,
        repo_types::{Meal, MealFields},
    },
};

const LOCAL_DATE_TIME_FORMATS: &[&[FormatItem<'static>]] = &[
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]"),
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
    format_description!("[year]-[month]-[day]T[hour]:[minute]"),
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
];

const DATE_FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Coerces a client date into a UTC timestamp with millisecond precision.
///
/// Text without an offset is read as UTC. Years outside `0..=9999` are rejected.
pub fn parse_meal_date(input: &DateInput) -> AppResult<OffsetDateTime> {
    let invalid = || AppError::Validation("date must be a valid date".into());

    let parsed = match input {
        DateInput::EpochMillis(ms) => {
            if !ms.is_finite() {
                return Err(invalid());
            }
            // Fractional milliseconds are dropped.
            let nanos = (ms.trunc() as i128)
                .checked_mul(1_000_000)
                .ok_or_else(invalid)?;
            OffsetDateTime::from_unix_timestamp_nanos(nanos).map_err(|_| invalid())?
        }
        DateInput::Text(raw) => {
            let raw = raw.trim();
            if let Ok(dt) = OffsetDateTime::parse(raw, &Rfc3339) {
                dt
            } else if let Some(dt) = LOCAL_DATE_TIME_FORMATS
                .iter()
                .find_map(|fmt| PrimitiveDateTime::parse(raw, *fmt).ok())
            {
                dt.assume_utc()
            } else {
                Date::parse(raw, DATE_FORMAT)
                    .map_err(|_| invalid())?
                    .midnight()
                    .assume_utc()
            }
        }
    };

    let utc = parsed.to_offset(time::UtcOffset::UTC);
    // RFC 3339 output only covers four-digit years.
    if !(0..=9999).contains(&utc.year()) {
        return Err(invalid());
    }
    Ok(utc - Duration::nanoseconds(i64::from(utc.nanosecond() % 1_000_000)))
}

/// Checks a meal body and produces the fields to persist.
pub fn validate_meal(req: MealRequest) -> AppResult<MealFields> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("name is required".into()));
    }
    let description = req.description.trim();
    if description.is_empty() {
        return Err(AppError::Validation("description is required".into()));
    }
    let date = parse_meal_date(&req.date)?;

    Ok(MealFields {
        name: name.to_string(),
        description: description.to_string(),
        is_on_diet: req.is_on_diet,
        date,
    })
}

pub fn parse_meal_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::Validation("id must be a valid UUID".into()))
}

/// Longest run of consecutive on-diet flags.
pub fn best_on_diet_sequence(flags: impl IntoIterator<Item = bool>) -> u64 {
    let mut current = 0;
    let mut best = 0;
    for on_diet in flags {
        if on_diet {
            current += 1;
            if current > best {
                best = current;
            }
        } else {
            current = 0;
        }
    }
    best
}

/// Aggregates meals that are already ordered newest first.
pub fn summarize(meals: &[Meal]) -> MealMetrics {
    let total_meals = meals.len() as u64;
    let total_meals_on_diet = meals.iter().filter(|m| m.is_on_diet).count() as u64;
    MealMetrics {
        total_meals,
        total_meals_on_diet,
        total_meals_off_diet: total_meals - total_meals_on_diet,
        best_on_diet_sequence: best_on_diet_sequence(meals.iter().map(|m| m.is_on_diet)),
    }
}

pub async fn create_meal(meals: &dyn MealRepo, user_id: Uuid, fields: MealFields) -> AppResult<Meal> {
    let meal = Meal {
        id: Uuid::new_v4(),
        name: fields.name,
        description: fields.description,
        is_on_diet: fields.is_on_diet,
        date: fields.date,
        user_id,
    };
    meals.insert(&meal).await?;
    info!(%user_id, meal_id = %meal.id, "meal created");
    Ok(meal)
}

pub async fn list_meals(meals: &dyn MealRepo, user_id: Uuid) -> AppResult<Vec<Meal>> {
    Ok(meals.list_by_user(user_id).await?)
}

pub async fn get_meal(meals: &dyn MealRepo, user_id: Uuid, meal_id: Uuid) -> AppResult<Meal> {
    meals.find(user_id, meal_id).await?.ok_or_else(|| {
        debug!(%user_id, %meal_id, "meal not found");
        AppError::NotFound
    })
}

pub async fn update_meal(
    meals: &dyn MealRepo,
    user_id: Uuid,
    meal_id: Uuid,
    fields: MealFields,
) -> AppResult<()> {
    get_meal(meals, user_id, meal_id).await?;

    if !meals.update(user_id, meal_id, &fields).await? {
        warn!(%user_id, %meal_id, "meal vanished before update");
        return Err(AppError::NotFound);
    }
    info!(%user_id, %meal_id, "meal updated");
    Ok(())
}

pub async fn delete_meal(meals: &dyn MealRepo, user_id: Uuid, meal_id: Uuid) -> AppResult<()> {
    get_meal(meals, user_id, meal_id).await?;

    if !meals.delete(user_id, meal_id).await? {
        warn!(%user_id, %meal_id, "meal vanished before delete");
        return Err(AppError::NotFound);
    }
    info!(%user_id, %meal_id, "meal deleted");
    Ok(())
}

pub async fn meal_metrics(meals: &dyn MealRepo, user_id: Uuid) -> AppResult<MealMetrics> {
    let ordered = meals.list_by_user_newest_first(user_id).await?;
    Ok(summarize(&ordered))
}
