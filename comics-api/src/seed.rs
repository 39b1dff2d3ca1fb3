//! Collection reset with generated comics
//!
//! `POST /comics/seed` deletes every comic and inserts freshly generated ones.
//! Inserts are awaited one at a time. The reset is not atomic: a concurrent
//! reader may see an empty or partially refilled collection.

use axum::{body::Bytes, extract::State, http::HeaderMap};
use chrono::{Days, NaiveDate, Utc};
use rand::Rng;
use serde_json::Value;

use crate::handlers::{ApiError, ApiOperation, ComicResource, ItemResponse};
use crate::links::LinkBuilder;
use crate::models::NewComic;
use crate::repository::ComicRepository;
use crate::state::AppState;

/// Upper bound on comics generated by one request
pub const MAX_SEED_AMOUNT: u32 = 1000;

/// Oldest generated publication date, in days before today
const MAX_AGE_DAYS: u64 = 3650;

const WORDS: &[&str] = &[
    "amet", "aurora", "caelum", "civitas", "curia", "dolor", "ferrum", "fulmen", "ignis",
    "ipsum", "lorem", "lumen", "magna", "nebula", "nox", "orbis", "sidus", "silva", "tempus",
    "umbra", "ventus", "vigil", "vox", "vulpes",
];

const FIRST_NAMES: &[&str] = &[
    "Ada", "Bruno", "Chiara", "Dmitri", "Elif", "Farah", "Goran", "Hana", "Ines", "Jonas",
    "Keiko", "Luca", "Mara", "Niels", "Olga", "Pablo",
];

const LAST_NAMES: &[&str] = &[
    "Abara", "Bergstrom", "Castillo", "Dubois", "Eriksen", "Fontaine", "Gallo", "Horvath",
    "Ivanova", "Jansen", "Kowalski", "Lindqvist", "Moreau", "Novak", "Okafor", "Petrov",
];

/// `POST /comics/seed` with an optional `{"amount": n}` body
pub async fn seed_comics<R: ComicRepository>(
    State(state): State<AppState<R>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<ItemResponse<Vec<ComicResource>>, ApiError> {
    let config = &state.config().comics;
    let amount = requested_amount(&body).unwrap_or(config.seed_amount);

    // Generated up front so the thread-local RNG never lives across an await
    let batch = {
        let mut rng = rand::rng();
        generate_comics(amount, Utc::now().date_naive(), &mut rng)
    };

    let removed = state
        .comics()
        .delete_all()
        .await
        .map_err(|e| ApiError::from(e).with_operation(ApiOperation::Seed))?;

    let mut created = Vec::with_capacity(batch.len());
    for data in batch {
        let comic = state
            .comics()
            .create(data)
            .await
            .map_err(|e| ApiError::from(e).with_operation(ApiOperation::Seed))?;
        created.push(comic);
    }

    tracing::info!(removed, created = created.len(), "Comic collection reseeded");

    let links = LinkBuilder::for_request(config, &headers);
    Ok(ItemResponse::created(
        created
            .into_iter()
            .map(|comic| ComicResource::full(comic, &links))
            .collect(),
    ))
}

/// `amount` from a JSON object body, clamped to [`MAX_SEED_AMOUNT`]
///
/// `None` when the body is empty, not an object, or has no numeric `amount`.
pub fn requested_amount(body: &[u8]) -> Option<u32> {
    let value: Value = serde_json::from_slice(body).ok()?;
    let amount = value.get("amount")?.as_u64()?;
    Some(u32::try_from(amount.min(u64::from(MAX_SEED_AMOUNT))).unwrap_or(MAX_SEED_AMOUNT))
}

pub fn generate_comics<G: Rng + ?Sized>(amount: u32, today: NaiveDate, rng: &mut G) -> Vec<NewComic> {
    (0..amount.min(MAX_SEED_AMOUNT))
        .map(|_| generate_comic(today, rng))
        .collect()
}

fn generate_comic<G: Rng + ?Sized>(today: NaiveDate, rng: &mut G) -> NewComic {
    let title = (0..3).map(|_| pick(WORDS, rng)).collect::<Vec<_>>().join("-");

    let sentences = rng.random_range(2..=4);
    let description = (0..sentences)
        .map(|_| sentence(rng))
        .collect::<Vec<_>>()
        .join(" ");

    let author = format!("{} {}", pick(FIRST_NAMES, rng), pick(LAST_NAMES, rng));

    let age = rng.random_range(1..=MAX_AGE_DAYS);
    let date = today.checked_sub_days(Days::new(age)).unwrap_or(today);

    NewComic {
        title,
        description,
        author,
        date,
        image: None,
    }
}

fn sentence<G: Rng + ?Sized>(rng: &mut G) -> String {
    let length = rng.random_range(5..=10);
    let words: Vec<&str> = (0..length).map(|_| pick(WORDS, rng)).collect();
    let mut sentence = words.join(" ");
    if let Some(first) = sentence.get_mut(0..1) {
        first.make_ascii_uppercase();
    }
    sentence.push('.');
    sentence
}

fn pick<G: Rng + ?Sized>(choices: &[&'static str], rng: &mut G) -> &'static str {
    choices[rng.random_range(0..choices.len())]
}
