use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

/// Chronological log of one conversation.
///
/// Turns only enter through [`SessionHistory::append`], so the log is always a run of
/// (user, assistant) pairs.
#[derive(Debug, Clone, Default)]
pub struct SessionHistory {
    turns: Vec<Turn>,
}

impl SessionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, user_text: impl Into<String>, assistant_text: impl Into<String>) {
        self.turns.push(Turn {
            role: Role::User,
            text: user_text.into(),
        });
        self.turns.push(Turn {
            role: Role::Assistant,
            text: assistant_text.into(),
        });
    }

    /// Every turn as `role: text`, one per line, then the pending user message.
    pub fn as_context_string(&self, new_message: &str) -> String {
        let mut context = String::new();
        for turn in &self.turns {
            context.push_str(&format!("{}: {}\n", turn.role, turn.text));
        }
        context.push_str(&format!("{}: {}\n", Role::User, new_message));
        context
    }

    pub fn turns(&self) -> impl Iterator<Item = &Turn> + '_ {
        self.turns.iter()
    }

    /// (user, assistant) pairs, oldest first. Reverse it for a newest-first view.
    pub fn exchanges(&self) -> impl DoubleEndedIterator<Item = (&Turn, &Turn)> + '_ {
        self.turns.chunks_exact(2).map(|pair| (&pair[0], &pair[1]))
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

/// One user's conversation. Owned by the caller and lent to the generator per request.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    pub history: SessionHistory,
}

impl Session {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            history: SessionHistory::new(),
        }
    }
}
