// Leading + trailing rate limiter for raw pointer moves.
// Within one period only the most recent point survives (last write wins).

use crate::types::{Point, Timestamp};

/// Input throttle keyed on host timestamps instead of real timers.
#[derive(Debug, Clone)]
pub struct InputThrottle {
    period_us: u64,
    last_fired: Option<Timestamp>,
    pending: Option<Point>,
}

impl InputThrottle {
    pub fn new(period_us: u64) -> Self {
        InputThrottle {
            period_us,
            last_fired: None,
            pending: None,
        }
    }

    /// Offer a raw point. Returns it immediately when the throttle is open,
    /// otherwise holds it for the trailing edge.
    pub fn offer(&mut self, point: Point, now: Timestamp) -> Option<Point> {
        let open = match self.last_fired {
            None => true,
            Some(fired) => now.micros_since(fired) >= self.period_us,
        };

        if open && self.pending.is_none() {
            self.last_fired = Some(now);
            Some(point)
        } else {
            self.pending = Some(point);
            None
        }
    }

    /// When the held point is due, if any.
    pub fn trailing_due(&self) -> Option<Timestamp> {
        self.pending?;
        let fired = self.last_fired.unwrap_or_default();
        Some(fired.saturating_add_micros(self.period_us))
    }

    /// Release the held point at `at`, restarting the period from there.
    pub fn fire_trailing(&mut self, at: Timestamp) -> Option<Point> {
        let point = self.pending.take()?;
        self.last_fired = Some(at);
        Some(point)
    }

    pub fn clear(&mut self) {
        self.last_fired = None;
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Timestamp {
        Timestamp::from_micros(v * 1000)
    }

    #[test]
    fn leading_edge_passes() {
        let mut throttle = InputThrottle::new(10_000);
        assert_eq!(
            throttle.offer(Point::new(1.0, 1.0), ms(0)),
            Some(Point::new(1.0, 1.0))
        );
        assert_eq!(throttle.trailing_due(), None);
    }

    #[test]
    fn burst_coalesces_to_latest() {
        let mut throttle = InputThrottle::new(10_000);
        throttle.offer(Point::new(0.0, 0.0), ms(0));
        assert_eq!(throttle.offer(Point::new(1.0, 0.0), ms(2)), None);
        assert_eq!(throttle.offer(Point::new(2.0, 0.0), ms(5)), None);

        assert_eq!(throttle.trailing_due(), Some(ms(10)));
        assert_eq!(throttle.fire_trailing(ms(10)), Some(Point::new(2.0, 0.0)));
        assert_eq!(throttle.trailing_due(), None);
    }

    #[test]
    fn period_restarts_after_trailing_fire() {
        let mut throttle = InputThrottle::new(10_000);
        throttle.offer(Point::new(0.0, 0.0), ms(0));
        throttle.offer(Point::new(1.0, 0.0), ms(4));
        throttle.fire_trailing(ms(10));

        assert_eq!(throttle.offer(Point::new(2.0, 0.0), ms(15)), None);
        assert_eq!(throttle.trailing_due(), Some(ms(20)));
    }

    #[test]
    fn open_after_quiet_period() {
        let mut throttle = InputThrottle::new(10_000);
        throttle.offer(Point::new(0.0, 0.0), ms(0));
        assert!(throttle.offer(Point::new(5.0, 0.0), ms(30)).is_some());
    }

    #[test]
    fn clear_drops_pending() {
        let mut throttle = InputThrottle::new(10_000);
        throttle.offer(Point::new(0.0, 0.0), ms(0));
        throttle.offer(Point::new(1.0, 0.0), ms(1));
        throttle.clear();
        assert_eq!(throttle.trailing_due(), None);
        assert!(throttle.offer(Point::new(2.0, 0.0), ms(2)).is_some());
    }
}
