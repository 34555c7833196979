//! Platform identifiers.
//!
//! Ids are plain `u64` snowflakes wrapped in newtypes so a role can never be
//! passed where a channel is expected. They serialize transparently, which
//! keeps the persisted settings document readable (`"123": {...}`).

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! platform_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
            Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            pub const fn new(id: u64) -> Self {
                Self(id)
            }

            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

platform_id!(
    /// Server (guild) scope under which settings are configured
    GuildId
);
platform_id!(
    /// Text channel
    ChannelId
);
platform_id!(
    /// Server role
    RoleId
);
platform_id!(
    /// User account (including the bot itself)
    UserId
);

impl RoleId {
    /// Role mention token, e.g. `<@&42>`
    pub fn mention(self) -> String {
        format!("<@&{}>", self.0)
    }
}

impl ChannelId {
    /// Channel mention token, e.g. `<#42>`
    pub fn mention(self) -> String {
        format!("<#{}>", self.0)
    }
}

impl UserId {
    /// Both mention forms a client may emit for this user (`<@id>` and the
    /// legacy nickname form `<@!id>`).
    pub fn mention_tokens(self) -> [String; 2] {
        [format!("<@!{}>", self.0), format!("<@{}>", self.0)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mentions() {
        assert_eq!(RoleId(42).mention(), "<@&42>");
        assert_eq!(ChannelId(7).mention(), "<#7>");
        assert_eq!(UserId(9).mention_tokens(), ["<@!9>".to_string(), "<@9>".to_string()]);
    }

    #[test]
    fn test_serializes_as_number() {
        assert_eq!(serde_json::to_string(&RoleId(5)).unwrap(), "5");
        let parsed: ChannelId = serde_json::from_str("123").unwrap();
        assert_eq!(parsed, ChannelId(123));
    }
}
