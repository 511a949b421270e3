#[cfg(test)]
mod tests {
    use crate::logic::{
        align_to_grid, day_bounds, effective_duration, expand_booked_slots, generate_slots,
        is_requested_slot_free, parse_slot_time, BookedInterval, BookingError, SLOT_STEP_MINUTES,
    };
    use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
    use chrono_tz::Europe::Sofia;
    use trimbook_db::BookedSlot;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 9, 14, hour, minute, 0).unwrap()
    }

    fn booked(start_h: u32, start_m: u32, end_h: u32, end_m: u32) -> BookedInterval {
        BookedInterval {
            start: at(start_h, start_m),
            end: at(end_h, end_m),
        }
    }

    #[test]
    fn full_open_day_yields_seventeen_hour_slots() {
        // Work 9-18, 60-minute service, no bookings: 09:00, 09:30, ..., 17:00
        let slots = generate_slots(at(9, 0), at(18, 0), Duration::minutes(60), &[], None);
        assert_eq!(slots.len(), 17);
        assert_eq!(slots[0].start, at(9, 0));
        assert_eq!(slots.last().unwrap().start, at(17, 0));
        assert_eq!(slots.last().unwrap().end, at(18, 0));

        for pair in slots.windows(2) {
            assert_eq!(
                pair[1].start - pair[0].start,
                Duration::minutes(SLOT_STEP_MINUTES)
            );
        }
    }

    #[test]
    fn windows_have_exact_width_and_stay_inside_the_day() {
        let day_end = at(18, 0);
        let duration = Duration::minutes(45);
        let slots = generate_slots(at(9, 0), day_end, duration, &[], None);
        assert!(!slots.is_empty());
        for window in &slots {
            assert_eq!(window.start + duration, window.end);
            assert!(window.end <= day_end);
        }
    }

    #[test]
    fn booked_hour_blocks_exactly_the_overlapping_candidates() {
        // One booking 10:00-11:00, 30-minute service
        let booked = [booked(10, 0, 11, 0)];
        let slots = generate_slots(at(9, 0), at(18, 0), Duration::minutes(30), &booked, None);
        let starts: Vec<_> = slots.iter().map(|w| w.start).collect();

        // 09:30-10:00 touches only the exclusive boundary: present
        assert!(starts.contains(&at(9, 30)));
        // 10:00 and 10:30 both overlap the booking: absent
        assert!(!starts.contains(&at(10, 0)));
        assert!(!starts.contains(&at(10, 30)));
        // Slots pack tightly again the moment the booking ends
        assert!(starts.contains(&at(11, 0)));
    }

    #[test]
    fn no_window_overlaps_any_booked_interval() {
        let booked = [booked(10, 0, 11, 0), booked(13, 30, 14, 15)];
        let slots = generate_slots(at(9, 0), at(18, 0), Duration::minutes(60), &booked, None);
        for window in &slots {
            for b in &booked {
                assert!(
                    window.end <= b.start || window.start >= b.end,
                    "window {:?} overlaps booking {:?}",
                    window,
                    b
                );
            }
        }
    }

    #[test]
    fn overlapping_booked_intervals_are_tolerated() {
        // Two bookings covering 10:00-11:30 with overlap; candidates are
        // rejected if they hit ANY of them
        let booked = [booked(10, 0, 11, 0), booked(10, 30, 11, 30)];
        let slots = generate_slots(at(9, 0), at(18, 0), Duration::minutes(30), &booked, None);
        let starts: Vec<_> = slots.iter().map(|w| w.start).collect();
        assert!(starts.contains(&at(9, 30)));
        assert!(!starts.contains(&at(10, 0)));
        assert!(!starts.contains(&at(11, 0)));
        assert!(starts.contains(&at(11, 30)));
    }

    #[test]
    fn oversized_duration_yields_empty_sequence() {
        // 9 hours of work, 10-hour service: no partial-width window is emitted
        let slots = generate_slots(at(9, 0), at(18, 0), Duration::minutes(10 * 60), &[], None);
        assert!(slots.is_empty());
    }

    #[test]
    fn inverted_range_yields_empty_sequence() {
        let slots = generate_slots(at(18, 0), at(9, 0), Duration::minutes(30), &[], None);
        assert!(slots.is_empty());
    }

    #[test]
    fn generator_is_a_pure_function_of_its_inputs() {
        let booked = [booked(12, 0, 12, 45)];
        let earliest = Some(at(9, 10));
        let first = generate_slots(at(9, 0), at(18, 0), Duration::minutes(30), &booked, earliest);
        let second = generate_slots(at(9, 0), at(18, 0), Duration::minutes(30), &booked, earliest);
        assert_eq!(first, second);
    }

    #[test]
    fn unaligned_earliest_start_snaps_forward_to_the_grid() {
        // 09:10 advances to 09:30; it never snaps back to 09:00
        let slots = generate_slots(
            at(9, 0),
            at(18, 0),
            Duration::minutes(30),
            &[],
            Some(at(9, 10)),
        );
        assert_eq!(slots[0].start, at(9, 30));

        // 09:40 advances to 10:00
        let slots = generate_slots(
            at(9, 0),
            at(18, 0),
            Duration::minutes(30),
            &[],
            Some(at(9, 40)),
        );
        assert_eq!(slots[0].start, at(10, 0));

        // An already-aligned earliest start is used as-is
        let slots = generate_slots(
            at(9, 0),
            at(18, 0),
            Duration::minutes(30),
            &[],
            Some(at(9, 30)),
        );
        assert_eq!(slots[0].start, at(9, 30));
    }

    #[test]
    fn earliest_start_before_day_start_is_clamped() {
        let slots = generate_slots(
            at(9, 0),
            at(18, 0),
            Duration::minutes(30),
            &[],
            Some(at(7, 0)),
        );
        assert_eq!(slots[0].start, at(9, 0));
    }

    #[test]
    fn align_to_grid_only_moves_forward() {
        let anchor = at(9, 0);
        assert_eq!(align_to_grid(at(9, 0), anchor), at(9, 0));
        assert_eq!(align_to_grid(at(9, 30), anchor), at(9, 30));
        assert_eq!(align_to_grid(at(9, 1), anchor), at(9, 30));
        assert_eq!(align_to_grid(at(9, 31), anchor), at(10, 0));
        // Sub-minute residue also advances
        let just_past = at(9, 30) + Duration::seconds(1);
        assert_eq!(align_to_grid(just_past, anchor), at(10, 0));
    }

    #[test]
    fn grid_follows_the_local_clock_in_odd_offset_zones() {
        use chrono_tz::Asia::Kathmandu;

        // Kathmandu is UTC+5:45, so 09:00 local is 03:15 UTC. Boundaries must
        // still land on local :00/:30, not on the UTC epoch grid.
        let date = NaiveDate::from_ymd_opt(2026, 9, 14).unwrap();
        let (day_start, day_end) = day_bounds(date, 9, 18, Kathmandu).unwrap();
        assert_eq!(day_start, Utc.with_ymd_and_hms(2026, 9, 14, 3, 15, 0).unwrap());

        let slots = generate_slots(day_start, day_end, Duration::minutes(30), &[], None);
        assert_eq!(slots[0].start, day_start);
        for window in &slots {
            let local = window.start.with_timezone(&Kathmandu);
            assert!(
                local.format("%M:%S").to_string() == "00:00"
                    || local.format("%M:%S").to_string() == "30:00",
                "window start {} is off the local grid",
                local
            );
        }

        // An unaligned earliest start snaps to the next local boundary
        let earliest = day_start + Duration::minutes(10);
        let slots = generate_slots(day_start, day_end, Duration::minutes(30), &[], Some(earliest));
        assert_eq!(slots[0].start, day_start + Duration::minutes(30));
    }

    #[test]
    fn requested_slot_inside_a_booking_is_not_free() {
        // 10:15 + 30min against a 10:00-11:00 booking
        let booked = [booked(10, 0, 11, 0)];
        assert!(!is_requested_slot_free(
            at(10, 15),
            Duration::minutes(30),
            &booked
        ));
    }

    #[test]
    fn requested_slot_touching_boundaries_is_free() {
        let booked = [booked(10, 0, 11, 0)];
        // Ends exactly at the booking start
        assert!(is_requested_slot_free(
            at(9, 30),
            Duration::minutes(30),
            &booked
        ));
        // Starts exactly at the booking end
        assert!(is_requested_slot_free(
            at(11, 0),
            Duration::minutes(30),
            &booked
        ));
    }

    #[test]
    fn empty_booked_collection_means_always_free() {
        assert!(is_requested_slot_free(at(10, 15), Duration::minutes(30), &[]));
    }

    #[test]
    fn party_booking_occupies_one_proportionally_longer_block() {
        // 20-minute service for a party of 3: both the generator and the
        // conflict check operate on 60 minutes, not 20
        let duration = effective_duration(20, 3);
        assert_eq!(duration, Duration::minutes(60));

        let booked = [booked(11, 0, 12, 0)];
        // 10:30 + 60min collides with the 11:00 booking
        assert!(!is_requested_slot_free(at(10, 30), duration, &booked));

        let slots = generate_slots(at(9, 0), at(12, 0), duration, &booked, None);
        let starts: Vec<_> = slots.iter().map(|w| w.start).collect();
        assert_eq!(starts, vec![at(9, 0), at(9, 30), at(10, 0)]);
    }

    #[test]
    fn party_size_below_one_is_treated_as_one() {
        assert_eq!(effective_duration(45, 0), Duration::minutes(45));
    }

    #[test]
    fn absurd_party_size_saturates_instead_of_overflowing() {
        // The multiplication must not wrap; out-of-range products pin to the
        // maximum representable duration
        let duration = effective_duration(30, i64::MAX / 2);
        assert_eq!(duration, Duration::MAX);
        assert!(duration > Duration::zero());
    }

    #[test]
    fn out_of_range_stored_duration_is_an_error_not_a_panic() {
        let date = NaiveDate::from_ymd_opt(2026, 9, 14).unwrap();
        let rows = vec![BookedSlot {
            time: "10:00:00".to_string(),
            duration_minutes: i64::MAX / 2,
            number_of_people: 2,
        }];
        assert!(matches!(
            expand_booked_slots(date, &rows, Sofia),
            Err(BookingError::Calculation(_))
        ));
    }

    #[test]
    fn day_bounds_follow_the_named_zone_across_dst() {
        // Sofia is UTC+3 in September (EEST)
        let summer = NaiveDate::from_ymd_opt(2026, 9, 14).unwrap();
        let (start, end) = day_bounds(summer, 9, 18, Sofia).unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2026, 9, 14, 6, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2026, 9, 14, 15, 0, 0).unwrap());

        // And UTC+2 in January (EET); fixed-offset arithmetic would get this wrong
        let winter = NaiveDate::from_ymd_opt(2026, 1, 14).unwrap();
        let (start, end) = day_bounds(winter, 9, 18, Sofia).unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2026, 1, 14, 7, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2026, 1, 14, 16, 0, 0).unwrap());
    }

    #[test]
    fn day_bounds_handle_midnight_work_end() {
        let date = NaiveDate::from_ymd_opt(2026, 9, 14).unwrap();
        let (_, end) = day_bounds(date, 9, 24, Sofia).unwrap();
        assert_eq!(end, Utc.with_ymd_and_hms(2026, 9, 14, 21, 0, 0).unwrap());
    }

    #[test]
    fn expand_booked_slots_multiplies_by_party_size() {
        let date = NaiveDate::from_ymd_opt(2026, 9, 14).unwrap();
        let rows = vec![BookedSlot {
            time: "10:00:00".to_string(),
            duration_minutes: 20,
            number_of_people: 3,
        }];
        let intervals = expand_booked_slots(date, &rows, Sofia).unwrap();
        assert_eq!(intervals.len(), 1);
        // 10:00 Sofia summer time is 07:00 UTC; 20min x 3 people = 1 hour
        assert_eq!(
            intervals[0].start,
            Utc.with_ymd_and_hms(2026, 9, 14, 7, 0, 0).unwrap()
        );
        assert_eq!(intervals[0].end - intervals[0].start, Duration::minutes(60));
    }

    #[test]
    fn malformed_stored_time_is_rejected() {
        let date = NaiveDate::from_ymd_opt(2026, 9, 14).unwrap();
        let rows = vec![BookedSlot {
            time: "25:99".to_string(),
            duration_minutes: 30,
            number_of_people: 1,
        }];
        assert!(expand_booked_slots(date, &rows, Sofia).is_err());
    }

    #[test]
    fn parse_slot_time_accepts_both_stored_formats() {
        assert!(parse_slot_time("10:00:00").is_some());
        assert!(parse_slot_time("10:00").is_some());
        assert!(parse_slot_time("10am").is_none());
    }

    #[test]
    fn resource_schedule_resolves_bounds_and_gates_conflicts() {
        use crate::logic::ResourceSchedule;
        use trimbook_db::BarberAssignment;

        let date = NaiveDate::from_ymd_opt(2026, 9, 14).unwrap();
        let assignment = BarberAssignment {
            salon_id: 1,
            work_start_hour: 9,
            work_end_hour: 18,
        };
        let rows = vec![BookedSlot {
            time: "13:00:00".to_string(),
            duration_minutes: 60,
            number_of_people: 1,
        }];

        let schedule = ResourceSchedule::resolve(date, &assignment, &rows, Sofia).unwrap();
        // Sofia is UTC+3 in September
        assert_eq!(schedule.day_start, at(6, 0));
        assert_eq!(schedule.day_end, at(15, 0));
        assert_eq!(schedule.booked.len(), 1);

        // 13:00 local is 10:00 UTC; the booked hour is gated, its edges are not
        assert!(!schedule.is_free(at(10, 0), Duration::minutes(30)));
        assert!(schedule.is_free(at(9, 30), Duration::minutes(30)));
        assert!(schedule.is_free(at(11, 0), Duration::minutes(30)));

        let windows = schedule.windows(Duration::minutes(30), None);
        assert!(windows.iter().all(|w| w.end <= at(10, 0) || w.start >= at(11, 0)));
    }

    #[test]
    fn booking_errors_map_to_shared_error_statuses() {
        use trimbook_common::{HttpStatusCode, TrimbookError};

        let conflict: TrimbookError = BookingError::Conflict.into();
        assert_eq!(conflict.status_code(), 400);
        assert!(conflict.to_string().contains("Slot already booked"));

        let not_found: TrimbookError =
            BookingError::NotFound("Barber not found".to_string()).into();
        assert_eq!(not_found.status_code(), 404);
    }
}
