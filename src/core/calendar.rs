//! Campaign calendar
//!
//! Campaign time is measured in fractional days since the campaign began.
//! The host owns the actual clock; this module only provides the timestamp
//! type and the `Clock` abstraction the simulation reads from.

use serde::{Deserialize, Serialize};

pub const HOURS_PER_DAY: f64 = 24.0;
pub const DAYS_PER_WEEK: f64 = 7.0;

/// A point on the campaign timeline, in days
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct CampaignTime(f64);

impl CampaignTime {
    pub fn from_days(days: f64) -> Self {
        Self(days)
    }

    pub fn from_hours(hours: f64) -> Self {
        Self(hours / HOURS_PER_DAY)
    }

    pub fn as_days(&self) -> f64 {
        self.0
    }

    pub fn as_hours(&self) -> f64 {
        self.0 * HOURS_PER_DAY
    }

    /// Whole calendar day this timestamp falls on
    pub fn day(&self) -> i64 {
        self.0.floor() as i64
    }

    /// Hour of the day (0-23)
    pub fn hour_of_day(&self) -> u32 {
        ((self.0 - self.0.floor()) * HOURS_PER_DAY).floor() as u32
    }

    pub fn plus_days(&self, days: f64) -> Self {
        Self(self.0 + days)
    }

    pub fn minus_days(&self, days: f64) -> Self {
        Self(self.0 - days)
    }

    pub fn plus_hours(&self, hours: f64) -> Self {
        Self(self.0 + hours / HOURS_PER_DAY)
    }

    /// Days elapsed since `earlier` (negative if `earlier` is in the future)
    pub fn days_since(&self, earlier: CampaignTime) -> f64 {
        self.0 - earlier.0
    }

    /// Whole weeks elapsed since `earlier`, floored at zero
    pub fn weeks_since(&self, earlier: CampaignTime) -> u32 {
        (self.days_since(earlier) / DAYS_PER_WEEK).floor().max(0.0) as u32
    }

    /// True once this timestamp is at or past `deadline`
    pub fn has_reached(&self, deadline: CampaignTime) -> bool {
        self.0 >= deadline.0
    }
}

/// Source of the current campaign time
pub trait Clock {
    fn now(&self) -> CampaignTime;

    fn days_from_now(&self, days: f64) -> CampaignTime {
        self.now().plus_days(days)
    }
}

/// Clock advanced explicitly by the host (or by tests)
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ManualClock {
    now: CampaignTime,
}

impl ManualClock {
    pub fn new(start: CampaignTime) -> Self {
        Self { now: start }
    }

    pub fn advance_days(&mut self, days: f64) {
        self.now = self.now.plus_days(days);
    }

    pub fn advance_hours(&mut self, hours: f64) {
        self.now = self.now.plus_hours(hours);
    }

    pub fn set(&mut self, now: CampaignTime) {
        self.now = now;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> CampaignTime {
        self.now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_and_hour() {
        let t = CampaignTime::from_hours(30.0);
        assert_eq!(t.day(), 1);
        assert_eq!(t.hour_of_day(), 6);
    }

    #[test]
    fn test_weeks_since_floors() {
        let start = CampaignTime::from_days(10.0);
        assert_eq!(CampaignTime::from_days(16.9).weeks_since(start), 0);
        assert_eq!(CampaignTime::from_days(17.0).weeks_since(start), 1);
        assert_eq!(CampaignTime::from_days(31.5).weeks_since(start), 3);
        // Never negative
        assert_eq!(CampaignTime::from_days(3.0).weeks_since(start), 0);
    }

    #[test]
    fn test_has_reached_is_inclusive() {
        let due = CampaignTime::from_days(5.0);
        assert!(!CampaignTime::from_days(4.99).has_reached(due));
        assert!(CampaignTime::from_days(5.0).has_reached(due));
    }

    #[test]
    fn test_manual_clock_days_from_now() {
        let mut clock = ManualClock::new(CampaignTime::from_days(2.0));
        clock.advance_days(1.0);
        assert_eq!(clock.now().as_days(), 3.0);
        assert_eq!(clock.days_from_now(4.0).as_days(), 7.0);

        clock.advance_hours(12.0);
        assert_eq!(clock.now().hour_of_day(), 12);
    }
}
