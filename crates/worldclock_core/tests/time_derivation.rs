use chrono::{DateTime, TimeZone, Timelike, Utc};
use proptest::prelude::*;
use worldclock_core::time::derive::{
    date_string, day_progress_percent, derive_view, is_night_time, local_hour,
    sun_moon_position_percent, time_string, utc_offset_seconds, zoned, SkyToken,
};
use worldclock_core::time::travel::{parse_date, parse_hh_mm, resolve_local};
use worldclock_core::ZoneId;

const ZONES: [&str; 10] = [
    "UTC",
    "America/New_York",
    "Europe/London",
    "Asia/Tokyo",
    "Pacific/Auckland",
    "Asia/Kathmandu",
    "Asia/Kolkata",
    "Pacific/Chatham",
    "Pacific/Kiritimati",
    "Pacific/Pago_Pago",
];

#[test]
fn tokyo_evening_is_night_with_late_progress() {
    let view = derive_view(at(2024, 6, 15, 12, 0), zone("Asia/Tokyo"), true);

    assert_eq!(view.time_string, "21:00");
    assert_eq!(view.date_string, "Sat, Jun 15");
    assert!(view.is_night);
    assert_eq!(view.sky, SkyToken::Night);
    assert_eq!(view.day_progress_percent, 87.5);
    assert_eq!(view.sun_moon_position_percent, 87.5);
}

#[test]
fn london_follows_summer_time() {
    let london = zone("Europe/London");
    let instant = at(2024, 6, 15, 12, 0);

    assert_eq!(time_string(instant, london, true), "13:00");
    assert_eq!(time_string(instant, london, false), "1:00 PM");
    assert_eq!(utc_offset_seconds(instant, london), 3600);
    assert!(!is_night_time(instant, london));
}

#[test]
fn fractional_offsets_are_exact() {
    let instant = at(2024, 6, 15, 12, 0);

    assert_eq!(time_string(instant, zone("Asia/Kathmandu"), true), "17:45");
    assert_eq!(time_string(instant, zone("Asia/Kolkata"), true), "17:30");

    let chatham = zone("Pacific/Chatham");
    assert_eq!(time_string(instant, chatham, true), "00:45");
    assert_eq!(date_string(instant, chatham), "Sun, Jun 16");
    assert_eq!(utc_offset_seconds(instant, chatham), 12 * 3600 + 45 * 60);
}

#[test]
fn date_line_neighbours_show_different_days() {
    let instant = at(2024, 6, 15, 12, 0);

    assert_eq!(date_string(instant, zone("Pacific/Kiritimati")), "Sun, Jun 16");
    assert_eq!(time_string(instant, zone("Pacific/Kiritimati"), true), "02:00");
    assert_eq!(date_string(instant, zone("Pacific/Pago_Pago")), "Sat, Jun 15");
    assert_eq!(time_string(instant, zone("Pacific/Pago_Pago"), true), "01:00");
}

#[test]
fn spring_forward_skips_an_hour() {
    let new_york = zone("America/New_York");

    assert_eq!(time_string(at(2024, 3, 10, 6, 59), new_york, true), "01:59");
    assert_eq!(time_string(at(2024, 3, 10, 7, 0), new_york, true), "03:00");
}

#[test]
fn fall_back_repeats_an_hour() {
    let london = zone("Europe/London");

    assert_eq!(time_string(at(2024, 10, 27, 0, 59), london, true), "01:59");
    assert_eq!(time_string(at(2024, 10, 27, 1, 0), london, true), "01:00");
}

#[test]
fn local_readings_in_gaps_and_overlaps_resolve() {
    let new_york = zone("America/New_York");

    let gap = resolve_local(
        parse_date("2024-03-10").unwrap(),
        parse_hh_mm("02:30").unwrap(),
        new_york,
    )
    .unwrap();
    assert_eq!(gap, at(2024, 3, 10, 7, 30));

    let overlap = resolve_local(
        parse_date("2024-11-03").unwrap(),
        parse_hh_mm("01:30").unwrap(),
        new_york,
    )
    .unwrap();
    assert_eq!(overlap, at(2024, 11, 3, 5, 30));
}

#[test]
fn night_window_boundaries() {
    let utc = ZoneId::UTC;
    assert!(is_night_time(at(2024, 6, 15, 5, 59), utc));
    assert!(!is_night_time(at(2024, 6, 15, 6, 0), utc));
    assert!(!is_night_time(at(2024, 6, 15, 17, 59), utc));
    assert!(is_night_time(at(2024, 6, 15, 18, 0), utc));
}

#[test]
fn progress_is_zero_at_local_midnight() {
    for name in ZONES {
        let zone = zone(name);
        let local_midnight = resolve_local(
            parse_date("2024-06-15").unwrap(),
            parse_hh_mm("00:00").unwrap(),
            zone,
        )
        .unwrap();
        assert_eq!(day_progress_percent(local_midnight, zone), 0.0, "{name}");
        assert_eq!(sun_moon_position_percent(local_midnight, zone), 10.0, "{name}");
    }
}

proptest! {
    #[test]
    fn derived_values_stay_in_range(seconds in 0_i64..4_102_444_800, index in 0_usize..ZONES.len()) {
        let instant = Utc.timestamp_opt(seconds, 0).unwrap();
        let zone = zone(ZONES[index]);

        let progress = day_progress_percent(instant, zone);
        prop_assert!((0.0..100.0).contains(&progress));

        let position = sun_moon_position_percent(instant, zone);
        prop_assert!((10.0..=90.0).contains(&position));

        let hour = local_hour(instant, zone);
        prop_assert_eq!(is_night_time(instant, zone), hour < 6 || hour >= 18);
        prop_assert_eq!(SkyToken::from_hour(hour) == SkyToken::Night, is_night_time(instant, zone));
    }

    #[test]
    fn progress_tracks_local_minute(seconds in 0_i64..4_102_444_800, index in 0_usize..ZONES.len()) {
        let instant = Utc.timestamp_opt(seconds, 0).unwrap();
        let zone = zone(ZONES[index]);
        let local = zoned(instant, zone);

        let minute = f64::from(local.hour() * 60 + local.minute());
        let expected = minute / 1440.0 * 100.0;
        prop_assert!((day_progress_percent(instant, zone) - expected).abs() < 1e-9);
    }

    #[test]
    fn progress_never_decreases_within_a_local_day(
        seconds in 0_i64..4_102_444_800,
        step_minutes in 1_i64..360,
        index in 0_usize..ZONES.len(),
    ) {
        let zone = zone(ZONES[index]);
        let earlier = Utc.timestamp_opt(seconds, 0).unwrap();
        let later = earlier + chrono::Duration::minutes(step_minutes);

        let same_day = zoned(earlier, zone).date_naive() == zoned(later, zone).date_naive();
        let same_offset = utc_offset_seconds(earlier, zone) == utc_offset_seconds(later, zone);
        prop_assume!(same_day && same_offset);
        prop_assert!(day_progress_percent(later, zone) >= day_progress_percent(earlier, zone));
    }
}

fn zone(name: &str) -> ZoneId {
    ZoneId::parse(name).unwrap()
}

fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
}
