#[cfg(test)]
mod tests {
    use crate::logic::{
        generate_slots, is_requested_slot_free, BookedInterval, SLOT_STEP_MINUTES,
    };
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use proptest::prelude::*;

    fn day_hour(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 9, 14, hour, 0, 0).unwrap()
    }

    // Build booked intervals from (offset, length) minute pairs inside the day
    fn build_booked(
        day_start: DateTime<Utc>,
        raw: &[(i64, i64)],
    ) -> Vec<BookedInterval> {
        raw.iter()
            .map(|(offset_minutes, length_minutes)| {
                let start = day_start + Duration::minutes(*offset_minutes);
                BookedInterval {
                    start,
                    end: start + Duration::minutes((*length_minutes).max(1)),
                }
            })
            .collect()
    }

    proptest! {
        // No generated window ever overlaps a booked interval
        #[test]
        fn windows_never_overlap_bookings(
            work_start_hour in 0u32..12,
            work_end_hour in 13u32..24,
            duration_minutes in 15i64..180,
            raw_booked in prop::collection::vec((0i64..600, 15i64..120), 0..6),
        ) {
            let day_start = day_hour(work_start_hour);
            let day_end = day_hour(work_end_hour);
            let booked = build_booked(day_start, &raw_booked);

            let slots = generate_slots(
                day_start,
                day_end,
                Duration::minutes(duration_minutes),
                &booked,
                None,
            );

            for window in &slots {
                for b in &booked {
                    prop_assert!(
                        window.end <= b.start || window.start >= b.end,
                        "window {:?} overlaps booking {:?}", window, b
                    );
                }
            }
        }

        // Every window has the exact requested width and fits inside the day
        #[test]
        fn windows_have_requested_width_and_fit_the_day(
            work_start_hour in 0u32..12,
            work_end_hour in 13u32..24,
            duration_minutes in 15i64..180,
            raw_booked in prop::collection::vec((0i64..600, 15i64..120), 0..6),
        ) {
            let day_start = day_hour(work_start_hour);
            let day_end = day_hour(work_end_hour);
            let booked = build_booked(day_start, &raw_booked);
            let duration = Duration::minutes(duration_minutes);

            let slots = generate_slots(day_start, day_end, duration, &booked, None);

            for window in &slots {
                prop_assert_eq!(window.start + duration, window.end);
                prop_assert!(window.start >= day_start);
                prop_assert!(window.end <= day_end);
            }
        }

        // Starts sit on the :00/:30 grid anchored at the day start even when
        // the earliest allowed start does not
        #[test]
        fn window_starts_are_grid_aligned(
            work_start_hour in 0u32..12,
            work_end_hour in 13u32..24,
            duration_minutes in 15i64..180,
            earliest_offset_minutes in 0i64..240,
        ) {
            let day_start = day_hour(work_start_hour);
            let day_end = day_hour(work_end_hour);
            let earliest = day_start + Duration::minutes(earliest_offset_minutes);

            let slots = generate_slots(
                day_start,
                day_end,
                Duration::minutes(duration_minutes),
                &[],
                Some(earliest),
            );

            let step_secs = SLOT_STEP_MINUTES * 60;
            for window in &slots {
                let offset = (window.start - day_start).num_seconds();
                prop_assert_eq!(offset % step_secs, 0);
                prop_assert!(window.start >= earliest);
            }
        }

        // The sequence is strictly ascending and identical across calls
        #[test]
        fn sequence_is_ordered_and_deterministic(
            duration_minutes in 15i64..180,
            raw_booked in prop::collection::vec((0i64..600, 15i64..120), 0..6),
        ) {
            let day_start = day_hour(8);
            let day_end = day_hour(20);
            let booked = build_booked(day_start, &raw_booked);
            let duration = Duration::minutes(duration_minutes);

            let first = generate_slots(day_start, day_end, duration, &booked, None);
            let second = generate_slots(day_start, day_end, duration, &booked, None);
            prop_assert_eq!(&first, &second);

            for pair in first.windows(2) {
                prop_assert!(pair[0].start < pair[1].start);
            }
        }

        // The listing pass and the commit-time gate agree: every listed
        // window passes the conflict check against the same snapshot
        #[test]
        fn listed_windows_pass_the_conflict_gate(
            duration_minutes in 15i64..180,
            raw_booked in prop::collection::vec((0i64..600, 15i64..120), 0..6),
        ) {
            let day_start = day_hour(8);
            let day_end = day_hour(20);
            let booked = build_booked(day_start, &raw_booked);
            let duration = Duration::minutes(duration_minutes);

            let slots = generate_slots(day_start, day_end, duration, &booked, None);
            for window in &slots {
                prop_assert!(is_requested_slot_free(window.start, duration, &booked));
            }
        }
    }
}
