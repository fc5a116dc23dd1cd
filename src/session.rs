use serde::Serialize;

use crate::models::ChatTurn;

/// One prior exchange as the assistant sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemoryPair {
    pub user: String,
    pub assistant: String,
}

/// Append-only history of completed turns for one chat.
#[derive(Debug, Default)]
pub struct ChatSession {
    turns: Vec<ChatTurn>,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, turn: ChatTurn) {
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    /// The last `window` exchanges, oldest first.
    pub fn memory(&self, window: usize) -> Vec<MemoryPair> {
        let start = self.turns.len().saturating_sub(window);
        self.turns[start..]
            .iter()
            .map(|t| MemoryPair {
                user: t.user_text.clone(),
                assistant: t.memory_text.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AssistantReply;

    fn turn(i: usize) -> ChatTurn {
        ChatTurn::new(
            format!("user {i}"),
            AssistantReply::Message(format!("reply {i}")),
            format!("memory {i}"),
        )
    }

    #[test]
    fn test_memory_uses_memory_text() {
        let mut session = ChatSession::new();
        session.push(turn(0));
        let memory = session.memory(5);
        assert_eq!(
            memory,
            vec![MemoryPair {
                user: "user 0".into(),
                assistant: "memory 0".into(),
            }]
        );
    }

    #[test]
    fn test_memory_window_caps_at_five() {
        let mut session = ChatSession::new();
        for i in 0..9 {
            session.push(turn(i));
        }
        let memory = session.memory(5);
        assert_eq!(memory.len(), 5);
        assert_eq!(memory[0].user, "user 4");
        assert_eq!(memory[4].user, "user 8");
    }

    #[test]
    fn test_memory_shorter_than_window() {
        let mut session = ChatSession::new();
        session.push(turn(0));
        session.push(turn(1));
        assert_eq!(session.memory(5).len(), 2);
        assert!(ChatSession::new().memory(5).is_empty());
    }

    #[test]
    fn test_clear_resets_history() {
        let mut session = ChatSession::new();
        for i in 0..3 {
            session.push(turn(i));
        }
        session.clear();
        assert!(session.is_empty());
        assert_eq!(session.len(), 0);
        assert!(session.memory(5).is_empty());
    }
}
