//! Randomized "recent" timestamps for fabricated posts.

use chrono::{DateTime, Duration, Local};
use rand::Rng;

/// A point in time between `days` days before `now` and `now`, at day granularity.
pub fn random_date_within<R: Rng + ?Sized>(
    rng: &mut R,
    now: DateTime<Local>,
    days: u32,
) -> DateTime<Local> {
    let back = rng.gen_range(0..=days);
    now - Duration::days(i64::from(back))
}

/// `YYYY-MM-DD` rendering used by the starter Q&A feed.
pub fn format_day(date: DateTime<Local>) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// RFC 3339 rendering used for `created_at` / `generated_at` fields.
pub fn format_timestamp(date: DateTime<Local>) -> String {
    date.to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn random_date_stays_in_window() {
        let mut rng = StdRng::seed_from_u64(7);
        let now = Local::now();
        for _ in 0..200 {
            let date = random_date_within(&mut rng, now, 90);
            assert!(date <= now);
            assert!(now - date <= Duration::days(90));
        }
    }

    #[test]
    fn zero_window_is_now() {
        let mut rng = StdRng::seed_from_u64(1);
        let now = Local::now();
        assert_eq!(random_date_within(&mut rng, now, 0), now);
    }

    #[test]
    fn format_day_is_iso_date() {
        let mut rng = StdRng::seed_from_u64(3);
        let day = format_day(random_date_within(&mut rng, Local::now(), 5));
        assert_eq!(day.len(), 10);
        assert_eq!(&day[4..5], "-");
    }
}
