//! In-memory message log feeding snapshots.
use std::collections::VecDeque;

/// A log line with its consecutive-repeat count.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Message {
    pub text: String,
    pub count: u32,
}

impl Message {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            count: 1,
        }
    }

    /// Text with the repeat suffix, e.g. `"Ghost attacks Player for 2 hit points. (x3)"`.
    pub fn full_text(&self) -> String {
        if self.count > 1 {
            format!("{} (x{})", self.text, self.count)
        } else {
            self.text.clone()
        }
    }
}

/// Cumulative, bounded log plus the slice produced by the current turn.
///
/// Consecutive duplicates are stacked into one entry with a count instead of
/// being appended again.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MessageLog {
    entries: VecDeque<Message>,
    capacity: usize,
    turn: Vec<Message>,
}

impl MessageLog {
    pub fn new(capacity: usize) -> Self {
        let bounded_capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(bounded_capacity),
            capacity: bounded_capacity,
            turn: Vec::new(),
        }
    }

    /// Starts a new turn; messages pushed afterwards make up its slice.
    pub fn begin_turn(&mut self) {
        self.turn.clear();
    }

    pub fn push_text(&mut self, text: impl Into<String>) {
        let text = text.into();

        match self.turn.last_mut() {
            Some(last) if last.text == text => last.count += 1,
            _ => self.turn.push(Message::new(text.clone())),
        }

        match self.entries.back_mut() {
            Some(last) if last.text == text => last.count += 1,
            _ => {
                if self.entries.len() == self.capacity {
                    self.entries.pop_front();
                }
                self.entries.push_back(Message::new(text));
            }
        }
    }

    /// Messages produced since the last [`Self::begin_turn`].
    pub fn current_turn(&self) -> &[Message] {
        &self.turn
    }

    pub fn turn_texts(&self) -> Vec<String> {
        self.turn.iter().map(Message::full_text).collect()
    }

    pub fn recent(&self, limit: usize) -> impl Iterator<Item = &Message> {
        self.entries.iter().rev().take(limit)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consecutive_duplicates_are_stacked() {
        let mut log = MessageLog::new(8);
        log.push_text("Ghost attacks Player for 2 hit points.");
        log.push_text("Ghost attacks Player for 2 hit points.");
        log.push_text("Ghost is dead!");
        log.push_text("Ghost attacks Player for 2 hit points.");

        let texts: Vec<String> = log.iter().map(Message::full_text).collect();
        assert_eq!(
            texts,
            vec![
                "Ghost attacks Player for 2 hit points. (x2)",
                "Ghost is dead!",
                "Ghost attacks Player for 2 hit points.",
            ]
        );
    }

    #[test]
    fn turn_slice_resets_but_history_keeps_stacking() {
        let mut log = MessageLog::new(8);
        log.push_text("You picked up the Health Potion!");
        log.begin_turn();
        log.push_text("You picked up the Health Potion!");

        assert_eq!(log.turn_texts(), vec!["You picked up the Health Potion!"]);
        assert_eq!(log.len(), 1);
        assert_eq!(log.recent(1).next().map(|m| m.count), Some(2));
    }

    #[test]
    fn capacity_drops_oldest() {
        let mut log = MessageLog::new(2);
        log.push_text("a");
        log.push_text("b");
        log.push_text("c");
        let texts: Vec<&str> = log.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["b", "c"]);
    }
}
