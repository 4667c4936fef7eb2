// Status badges

use console_domain::{AuthExpiredStatus, MerchantStatus, ShopStatus, TaskStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Processing,
    Warning,
    Danger,
    Neutral,
}

impl Tone {
    fn marker(&self) -> char {
        match self {
            Tone::Success => '+',
            Tone::Processing => '~',
            Tone::Warning => '!',
            Tone::Danger => 'x',
            Tone::Neutral => '.',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    pub label: String,
    pub tone: Tone,
}

impl Badge {
    fn new(label: &str, tone: Tone) -> Self {
        let label = if label.trim().is_empty() { "unknown" } else { label.trim() };
        Self {
            label: label.to_string(),
            tone,
        }
    }

    pub fn render(&self) -> String {
        format!("{} {}", self.tone.marker(), self.label)
    }
}

pub fn task_status_badge(status: &TaskStatus) -> Badge {
    let tone = match status {
        TaskStatus::Pending => Tone::Warning,
        TaskStatus::Processing => Tone::Processing,
        TaskStatus::Completed => Tone::Success,
        TaskStatus::Failed => Tone::Danger,
        TaskStatus::Unknown(_) => Tone::Neutral,
    };
    Badge::new(status.as_str(), tone)
}

pub fn merchant_status_badge(status: &MerchantStatus) -> Badge {
    let tone = match status {
        MerchantStatus::Active => Tone::Success,
        MerchantStatus::Inactive => Tone::Danger,
        MerchantStatus::Unknown(_) => Tone::Neutral,
    };
    Badge::new(status.as_str(), tone)
}

pub fn shop_status_badge(status: &ShopStatus) -> Badge {
    let tone = match status {
        ShopStatus::Unlock => Tone::Success,
        ShopStatus::Lock => Tone::Danger,
        ShopStatus::Unknown(_) => Tone::Neutral,
    };
    Badge::new(status.as_str(), tone)
}

pub fn auth_status_badge(status: &AuthExpiredStatus) -> Badge {
    let tone = match status {
        AuthExpiredStatus::Normal => Tone::Success,
        AuthExpiredStatus::Expired => Tone::Danger,
        AuthExpiredStatus::NoAuth => Tone::Warning,
        AuthExpiredStatus::Unknown(_) => Tone::Neutral,
    };
    Badge::new(status.as_str(), tone)
}
