//! Error notices raised through the notifier.

#[cfg(test)]
#[path = "notice_test.rs"]
mod notice_test;

/// Maximum notices shown at once; older ones are dropped.
pub const MAX_NOTICES: usize = 5;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub id: u64,
    pub text: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NoticeState {
    pub notices: Vec<Notice>,
    next_id: u64,
}

impl NoticeState {
    /// Append a notice and return its id.
    pub fn push(&mut self, text: &str) -> u64 {
        self.next_id += 1;
        let id = self.next_id;
        self.notices.push(Notice { id, text: text.to_owned() });
        if self.notices.len() > MAX_NOTICES {
            let overflow = self.notices.len() - MAX_NOTICES;
            self.notices.drain(..overflow);
        }
        id
    }

    pub fn dismiss(&mut self, id: u64) {
        self.notices.retain(|n| n.id != id);
    }
}
