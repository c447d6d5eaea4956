/// Ids resolved once at startup and shared read-only by every cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatContext {
    pub team_id: String,
    pub channel_id: String,
    pub bot_user_id: String,
}

/// Alternate posting identity for blame alerts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityOverride {
    pub username: String,
    pub icon_url: String,
}

/// A finished message ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub channel_id: String,
    pub user_id: String,
    pub message: String,
    pub identity: Option<IdentityOverride>,
}
