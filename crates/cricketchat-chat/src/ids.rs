use chrono::Utc;

/// Message ids: creation time in milliseconds, bumped past the previous id
/// when two messages are created within the same millisecond.
#[derive(Debug, Default, Clone)]
pub struct MessageIdGenerator {
    last: i64,
}

impl MessageIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> String {
        self.next_at(Utc::now().timestamp_millis())
    }

    fn next_at(&mut self, now_millis: i64) -> String {
        let id = now_millis.max(self.last + 1);
        self.last = id;
        id.to_string()
    }

    /// Account for an id created elsewhere (e.g. restored from storage) so
    /// later ids never collide with it
    pub fn observe(&mut self, id: &str) {
        if let Ok(value) = id.parse::<i64>() {
            self.last = self.last.max(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_millisecond_ids_are_distinct() {
        let mut ids = MessageIdGenerator::new();
        assert_eq!(ids.next_at(1_000), "1000");
        assert_eq!(ids.next_at(1_000), "1001");
        assert_eq!(ids.next_at(1_000), "1002");
        assert_eq!(ids.next_at(5_000), "5000");
    }

    #[test]
    fn test_clock_going_backwards_keeps_order() {
        let mut ids = MessageIdGenerator::new();
        ids.next_at(2_000);
        assert_eq!(ids.next_at(1_500), "2001");
    }

    #[test]
    fn test_observe_restored_ids() {
        let mut ids = MessageIdGenerator::new();
        ids.observe("9000");
        ids.observe("not-a-number");
        assert_eq!(ids.next_at(8_000), "9001");
    }

    #[test]
    fn test_live_ids_increase() {
        let mut ids = MessageIdGenerator::new();
        let a: i64 = ids.next_id().parse().unwrap();
        let b: i64 = ids.next_id().parse().unwrap();
        assert!(b > a);
    }
}
