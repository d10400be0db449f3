use std::collections::VecDeque;

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub id: u64,
    pub text: String,
    pub expires_at: i64,
    /// Opacity ramp starts this many ms before `expires_at`.
    pub fade_ms: i64,
}

/// Transient on-screen messages with an expiry time.
#[derive(Debug, Default)]
pub struct NoticeFeed {
    items: VecDeque<Notice>,
    next_id: u64,
}

impl Notice {
    pub fn remaining_ms(&self, now: i64) -> i64 {
        (self.expires_at - now).max(0)
    }

    /// 1.0 until the fade window, then linear down to 0.0 at expiry.
    pub fn opacity(&self, now: i64) -> f64 {
        let remaining = self.expires_at - now;
        if remaining <= 0 {
            return 0.0;
        }
        if self.fade_ms == 0 || remaining >= self.fade_ms {
            return 1.0;
        }
        remaining as f64 / self.fade_ms as f64
    }
}

impl NoticeFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(
        &mut self,
        text: impl Into<String>,
        now: i64,
        duration_ms: i64,
        fade_ms: i64,
    ) -> u64 {
        self.next_id += 1;
        let notice = Notice {
            id: self.next_id,
            text: text.into(),
            expires_at: now + duration_ms.max(0) + fade_ms.max(0),
            fade_ms: fade_ms.max(0),
        };
        self.items.push_back(notice);
        self.next_id
    }

    pub fn prune(&mut self, now: i64) {
        self.items.retain(|notice| notice.expires_at > now);
    }

    pub fn active(&self, now: i64) -> impl Iterator<Item = &Notice> {
        self.items.iter().filter(move |notice| notice.expires_at > now)
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}
