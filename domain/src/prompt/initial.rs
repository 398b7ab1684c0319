use crate::session::entities::Message;

/// System and user content produced by a prompt builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitialPrompt {
    pub system: String,
    pub user: String,
}

impl InitialPrompt {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
        }
    }

    /// The seed messages, system first.
    pub fn into_messages(self) -> [Message; 2] {
        [Message::system(self.system), Message::user(self.user)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_messages_orders_system_first() {
        let [system, user] = InitialPrompt::new("rules", "question").into_messages();
        assert_eq!(system, Message::system("rules"));
        assert_eq!(user, Message::user("question"));
    }
}
