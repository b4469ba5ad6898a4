//! Timestamp display policy.
//!
//! Chat bubbles show `Today h:MM AM` for messages on the viewer's current
//! calendar date and `M/D h:MM AM` otherwise. Detail screens use a fixed
//! `YYYY/MM/DD HH:MM` layout. All formatting happens in the viewer's clock,
//! a fixed UTC offset supplied by configuration.

use chrono::{DateTime, FixedOffset, Offset, Utc};

/// Viewer clock used for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayClock {
    offset: FixedOffset,
}

impl DisplayClock {
    /// Build from an offset in minutes east of UTC.
    ///
    /// Returns `None` when the offset is out of range (beyond ±24h).
    pub fn from_offset_minutes(minutes: i32) -> Option<Self> {
        minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .map(|offset| Self { offset })
    }

    /// UTC.
    pub fn utc() -> Self {
        Self { offset: Utc.fix() }
    }

    /// Underlying offset.
    pub fn offset(&self) -> FixedOffset {
        self.offset
    }
}

impl Default for DisplayClock {
    fn default() -> Self {
        Self::utc()
    }
}

/// Format a chat message time relative to `now`.
///
/// # Examples
/// ```
/// use chrono::{TimeZone, Utc};
/// use helpdesk::domain::{format_message_time, DisplayClock};
///
/// let clock = DisplayClock::utc();
/// let now = Utc.with_ymd_and_hms(2024, 5, 1, 18, 0, 0).unwrap();
/// let sent = Utc.with_ymd_and_hms(2024, 5, 1, 9, 5, 0).unwrap();
/// assert_eq!(format_message_time(sent, now, clock), "Today 9:05 AM");
///
/// let earlier = Utc.with_ymd_and_hms(2024, 4, 30, 21, 30, 0).unwrap();
/// assert_eq!(format_message_time(earlier, now, clock), "4/30 9:30 PM");
/// ```
pub fn format_message_time(
    created_at: DateTime<Utc>,
    now: DateTime<Utc>,
    clock: DisplayClock,
) -> String {
    let local = created_at.with_timezone(&clock.offset);
    let today = now.with_timezone(&clock.offset).date_naive();
    let time = local.format("%-I:%M %p");
    if local.date_naive() == today {
        format!("Today {time}")
    } else {
        format!("{} {time}", local.format("%-m/%-d"))
    }
}

/// Format an absolute time for ticket detail and queue screens.
pub fn format_detail_time(at: DateTime<Utc>, clock: DisplayClock) -> String {
    at.with_timezone(&clock.offset)
        .format("%Y/%m/%d %H:%M")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::{fixture, rstest};

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0)
            .single()
            .expect("timestamp")
    }

    #[fixture]
    fn tokyo() -> DisplayClock {
        DisplayClock::from_offset_minutes(540).expect("valid offset")
    }

    #[rstest]
    #[case(utc(2024, 5, 1, 0, 0), "Today 12:00 AM")]
    #[case(utc(2024, 5, 1, 12, 7), "Today 12:07 PM")]
    #[case(utc(2024, 5, 1, 23, 59), "Today 11:59 PM")]
    #[case(utc(2024, 4, 30, 23, 59), "4/30 11:59 PM")]
    #[case(utc(2023, 5, 1, 10, 0), "5/1 10:00 AM")]
    fn formats_in_utc(#[case] sent: DateTime<Utc>, #[case] expected: &str) {
        let now = utc(2024, 5, 1, 23, 59);
        assert_eq!(format_message_time(sent, now, DisplayClock::utc()), expected);
    }

    #[rstest]
    fn uses_the_viewer_calendar_date(tokyo: DisplayClock) {
        // 16:00 UTC on 30 April is 01:00 on 1 May in UTC+9.
        let now = utc(2024, 5, 1, 3, 0);
        let sent = utc(2024, 4, 30, 16, 0);
        assert_eq!(format_message_time(sent, now, tokyo), "Today 1:00 AM");
        assert_eq!(
            format_message_time(sent, now, DisplayClock::utc()),
            "4/30 4:00 PM"
        );
    }

    #[rstest]
    fn detail_time_is_zero_padded(tokyo: DisplayClock) {
        assert_eq!(format_detail_time(utc(2024, 1, 2, 0, 5), tokyo), "2024/01/02 09:05");
    }

    #[rstest]
    #[case(24 * 60)]
    #[case(-(24 * 60))]
    #[case(i32::MAX)]
    fn rejects_out_of_range_offsets(#[case] minutes: i32) {
        assert!(DisplayClock::from_offset_minutes(minutes).is_none());
    }
}
