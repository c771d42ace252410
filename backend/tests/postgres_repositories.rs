//! Diesel repositories against a real PostgreSQL database.
//!
//! Set `FILMKRITIKEN_TEST_DATABASE_URL` to a disposable database to run these
//! tests. They truncate the `reviews` table. Without the variable they report
//! a skip on stderr and pass.
#![expect(
    clippy::expect_used,
    reason = "test code uses expect for clear failure messages"
)]
#![expect(clippy::print_stderr, reason = "skipped tests say so on stderr")]

use std::sync::OnceLock;

use chrono::{DateTime, TimeZone, Utc};
use diesel_async::RunQueryDsl;
use filmkritiken::domain::ports::{ImageRepository, ReviewRepository};
use filmkritiken::domain::{
    Film, ImageId, Rating, RatingScore, Review, ReviewDetails, ReviewFilter, ReviewId,
};
use filmkritiken::outbound::persistence::{
    DbPool, DieselImageRepository, DieselReviewRepository, PoolConfig, run_migrations,
};
use rstest::rstest;

const DATABASE_URL_VAR: &str = "FILMKRITIKEN_TEST_DATABASE_URL";

fn database_url() -> Option<String> {
    std::env::var(DATABASE_URL_VAR)
        .ok()
        .filter(|url| !url.trim().is_empty())
}

fn report_skip(test: &str) {
    eprintln!("SKIP-TEST-CLUSTER: {DATABASE_URL_VAR} unset; {test} skipped");
}

/// Migrate once per test binary; concurrent harness runs would race.
fn migrate(url: &str) {
    static MIGRATED: OnceLock<Result<(), String>> = OnceLock::new();
    MIGRATED
        .get_or_init(|| {
            run_migrations(url)
                .map(|_| ())
                .map_err(|err| err.to_string())
        })
        .clone()
        .expect("migrations apply");
}

async fn pool(url: &str) -> DbPool {
    migrate(url);
    DbPool::new(PoolConfig::new(url).with_max_size(2).with_min_idle(None))
        .await
        .expect("pool builds")
}

fn at(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 4, day, 20, 0, 0)
        .single()
        .expect("valid timestamp")
}

fn review(title: &str, discussed_at: Option<DateTime<Utc>>) -> Review {
    Review::new(
        Film::titled(title),
        ReviewDetails {
            contributed_by: "alice".to_owned(),
            discussed_at,
            rating_open: true,
        },
    )
}

fn titles(reviews: &[Review]) -> Vec<&str> {
    reviews.iter().map(|r| r.film.title.as_str()).collect()
}

#[rstest]
#[tokio::test]
async fn reviews_survive_a_new_pool_and_update_in_place() {
    let Some(url) = database_url() else {
        report_skip("reviews_survive_a_new_pool_and_update_in_place");
        return;
    };
    let first_pool = pool(&url).await;
    {
        let mut conn = first_pool.get().await.expect("connection");
        diesel::sql_query("TRUNCATE reviews")
            .execute(&mut conn)
            .await
            .expect("truncate");
    }
    let repo = DieselReviewRepository::new(first_pool);

    let mut saved = repo
        .save(review("Heat", Some(at(5))))
        .await
        .expect("insert");
    let id = saved.id.clone().expect("id assigned");
    saved.ratings.push(Rating::new(
        "bob",
        RatingScore::try_from(7_i64).expect("valid score"),
    ));
    saved.details.rating_open = false;
    repo.save(saved.clone()).await.expect("upsert");
    repo.save(review("Ran", None)).await.expect("insert");
    repo.save(review("Mirror", Some(at(9)))).await.expect("insert");

    let reopened = DieselReviewRepository::new(pool(&url).await);
    let found = reopened
        .find_by_id(&id)
        .await
        .expect("lookup")
        .expect("present");
    assert_eq!(found, saved);

    let all = reopened
        .list(&ReviewFilter::new(10, 0))
        .await
        .expect("list");
    assert_eq!(titles(&all), ["Mirror", "Heat", "Ran"]);
    let page = reopened
        .list(&ReviewFilter::new(1, 1))
        .await
        .expect("list");
    assert_eq!(titles(&page), ["Heat"]);

    let undated = all
        .iter()
        .find(|r| r.film.title == "Ran")
        .and_then(|r| r.id.clone())
        .expect("Ran stored");
    let matched = reopened
        .update_discussed_at(&undated, at(12))
        .await
        .expect("update");
    assert_eq!(matched, 1);
    let relisted = reopened
        .list(&ReviewFilter::new(10, 0))
        .await
        .expect("list");
    assert_eq!(titles(&relisted), ["Ran", "Mirror", "Heat"]);

    let unknown = ReviewId::new("no-such-review").expect("valid id");
    let missed = reopened
        .update_discussed_at(&unknown, at(12))
        .await
        .expect("update");
    assert_eq!(missed, 0);
}

#[rstest]
#[tokio::test]
async fn images_store_and_delete_bytes() {
    let Some(url) = database_url() else {
        report_skip("images_store_and_delete_bytes");
        return;
    };
    let repo = DieselImageRepository::new(pool(&url).await);
    let bytes = vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

    let id = repo.save(bytes.clone()).await.expect("insert");
    assert_eq!(repo.find_by_id(&id).await.expect("lookup"), Some(bytes));

    repo.delete(&id).await.expect("delete");
    assert_eq!(repo.find_by_id(&id).await.expect("lookup"), None);
    repo.delete(&id).await.expect("deleting twice is fine");

    let unknown = ImageId::new("no-such-image").expect("valid id");
    assert_eq!(repo.find_by_id(&unknown).await.expect("lookup"), None);
}
