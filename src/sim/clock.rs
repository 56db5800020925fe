use chrono::{NaiveDateTime, TimeDelta};

/// A simulation clock stepping over a fixed, evenly spaced time grid.
///
/// Each tick yields the step index together with the wall-clock timestamp
/// of that step.
///
/// # Examples
///
/// ```
/// use bess_sim::sim::clock::Clock;
/// use chrono::{NaiveDate, TimeDelta};
///
/// let start = NaiveDate::from_ymd_opt(2024, 1, 1)
///     .and_then(|d| d.and_hms_opt(0, 0, 0))
///     .unwrap();
/// let mut clock = Clock::new(start, TimeDelta::hours(1), 3);
/// let mut steps = Vec::new();
///
/// clock.run(|step, _| steps.push(step));
/// assert_eq!(steps, vec![0, 1, 2]);
/// ```
pub struct Clock {
    /// Timestamp of step 0
    start: NaiveDateTime,
    /// Spacing between steps
    step: TimeDelta,
    /// Current step of the simulation
    current: usize,
    /// Total steps to run in the simulation
    total: usize,
}

impl Clock {
    /// Creates a new clock.
    ///
    /// # Arguments
    ///
    /// * `start` - Timestamp of the first step
    /// * `step` - Spacing between consecutive steps
    /// * `total` - The total number of steps the clock will run
    pub fn new(start: NaiveDateTime, step: TimeDelta, total: usize) -> Self {
        Self {
            start,
            step,
            current: 0,
            total,
        }
    }

    /// Timestamp of step `index`, whether or not it has been reached.
    pub fn timestamp(&self, index: usize) -> NaiveDateTime {
        let offset = i32::try_from(index).unwrap_or(i32::MAX);
        self.start + self.step * offset
    }

    /// Advances the clock by one step.
    ///
    /// # Returns
    ///
    /// * `Some((step, timestamp))` - The step before advancing
    /// * `None` - If the clock has reached its total steps
    pub fn tick(&mut self) -> Option<(usize, NaiveDateTime)> {
        if self.current < self.total {
            let step = self.current;
            self.current += 1;
            Some((step, self.timestamp(step)))
        } else {
            None
        }
    }

    /// Runs a function for each remaining step in the clock.
    pub fn run(&mut self, mut f: impl FnMut(usize, NaiveDateTime)) {
        while let Some((step, at)) = self.tick() {
            f(step, at);
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn midnight() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap()
    }

    #[test]
    fn test_tick() {
        let mut clock = Clock::new(midnight(), TimeDelta::minutes(15), 2);
        assert_eq!(clock.tick(), Some((0, midnight())));
        assert_eq!(
            clock.tick(),
            Some((1, midnight() + TimeDelta::minutes(15)))
        );
        assert_eq!(clock.tick(), None);
    }

    #[test]
    fn test_run_crosses_midnight() {
        let mut clock = Clock::new(midnight(), TimeDelta::hours(1), 26);
        let mut last = None;
        clock.run(|_, at| last = Some(at));
        assert_eq!(last, Some(midnight() + TimeDelta::hours(25)));
    }

    #[test]
    fn test_empty_clock() {
        let mut clock = Clock::new(midnight(), TimeDelta::hours(1), 0);
        assert_eq!(clock.tick(), None);

        let mut was_called = false;
        clock.run(|_, _| was_called = true);
        assert!(!was_called);
    }
}
