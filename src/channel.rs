//! Channel kinds and the `type` code that selects between them.

use std::fmt;

use serde::Deserialize;
use serde_repr::{Deserialize_repr, Serialize_repr};

use crate::error::{Error, Result};
use crate::types::{snowflake, Snowflake};

/// Bitrate Discord gives a voice channel when none is set explicitly.
pub const DEFAULT_BITRATE: u32 = 96_000;

// ---------------------------------------------------------------------------
// ChannelType
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize_repr, Serialize_repr)]
#[repr(u8)]
pub enum ChannelType {
    GuildText = 0,
    Dm = 1,
    GuildVoice = 2,
    GroupDm = 3,
    GuildCategory = 4,
    GuildAnnouncement = 5,
    AnnouncementThread = 10,
    PublicThread = 11,
    PrivateThread = 12,
    GuildStageVoice = 13,
    GuildDirectory = 14,
    GuildForum = 15,
    GuildMedia = 16,
}

impl ChannelType {
    pub const ALL: [ChannelType; 13] = [
        ChannelType::GuildText,
        ChannelType::Dm,
        ChannelType::GuildVoice,
        ChannelType::GroupDm,
        ChannelType::GuildCategory,
        ChannelType::GuildAnnouncement,
        ChannelType::AnnouncementThread,
        ChannelType::PublicThread,
        ChannelType::PrivateThread,
        ChannelType::GuildStageVoice,
        ChannelType::GuildDirectory,
        ChannelType::GuildForum,
        ChannelType::GuildMedia,
    ];

    pub fn code(self) -> u8 {
        self as u8
    }
}

impl TryFrom<i64> for ChannelType {
    type Error = Error;

    fn try_from(code: i64) -> Result<Self> {
        Ok(match code {
            0 => ChannelType::GuildText,
            1 => ChannelType::Dm,
            2 => ChannelType::GuildVoice,
            3 => ChannelType::GroupDm,
            4 => ChannelType::GuildCategory,
            5 => ChannelType::GuildAnnouncement,
            10 => ChannelType::AnnouncementThread,
            11 => ChannelType::PublicThread,
            12 => ChannelType::PrivateThread,
            13 => ChannelType::GuildStageVoice,
            14 => ChannelType::GuildDirectory,
            15 => ChannelType::GuildForum,
            16 => ChannelType::GuildMedia,
            other => return Err(Error::UnknownChannelType(other)),
        })
    }
}

// ---------------------------------------------------------------------------
// Channel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChannel {
    pub id: Snowflake,
    pub name: String,
    pub nsfw: bool,
    pub topic: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceChannel {
    pub id: Snowflake,
    pub name: String,
    pub bitrate: u32,
}

/// A channel, one variant per Discord channel type.
///
/// Only text and voice channels carry anything beyond their id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Channel {
    Text(TextChannel),
    Dm { id: Snowflake },
    Voice(VoiceChannel),
    GroupDm { id: Snowflake },
    GuildCategory { id: Snowflake },
    GuildAnnouncement { id: Snowflake },
    AnnouncementThread { id: Snowflake },
    PublicThread { id: Snowflake },
    PrivateThread { id: Snowflake },
    GuildStageVoice { id: Snowflake },
    GuildDirectory { id: Snowflake },
    GuildForum { id: Snowflake },
    GuildMedia { id: Snowflake },
}

/// The subset of a channel object needed to pick and build a variant.
#[derive(Debug, Deserialize)]
pub(crate) struct ChannelPayload {
    #[serde(deserialize_with = "snowflake")]
    id: Snowflake,
    #[serde(rename = "type")]
    kind: i64,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    nsfw: Option<bool>,
    #[serde(default)]
    topic: Option<String>,
    #[serde(default)]
    bitrate: Option<u32>,
}

impl Channel {
    /// Build the variant selected by the payload's `type` code.
    pub(crate) fn from_payload(payload: ChannelPayload) -> Result<Self> {
        let id = payload.id;
        Ok(match ChannelType::try_from(payload.kind)? {
            ChannelType::GuildText => Channel::Text(TextChannel {
                id,
                name: payload.name.unwrap_or_default(),
                nsfw: payload.nsfw.unwrap_or(false),
                topic: payload.topic,
            }),
            ChannelType::Dm => Channel::Dm { id },
            ChannelType::GuildVoice => Channel::Voice(VoiceChannel {
                id,
                name: payload.name.unwrap_or_default(),
                bitrate: payload.bitrate.unwrap_or(DEFAULT_BITRATE),
            }),
            ChannelType::GroupDm => Channel::GroupDm { id },
            ChannelType::GuildCategory => Channel::GuildCategory { id },
            ChannelType::GuildAnnouncement => Channel::GuildAnnouncement { id },
            ChannelType::AnnouncementThread => Channel::AnnouncementThread { id },
            ChannelType::PublicThread => Channel::PublicThread { id },
            ChannelType::PrivateThread => Channel::PrivateThread { id },
            ChannelType::GuildStageVoice => Channel::GuildStageVoice { id },
            ChannelType::GuildDirectory => Channel::GuildDirectory { id },
            ChannelType::GuildForum => Channel::GuildForum { id },
            ChannelType::GuildMedia => Channel::GuildMedia { id },
        })
    }

    pub fn id(&self) -> Snowflake {
        match self {
            Channel::Text(c) => c.id,
            Channel::Voice(c) => c.id,
            Channel::Dm { id }
            | Channel::GroupDm { id }
            | Channel::GuildCategory { id }
            | Channel::GuildAnnouncement { id }
            | Channel::AnnouncementThread { id }
            | Channel::PublicThread { id }
            | Channel::PrivateThread { id }
            | Channel::GuildStageVoice { id }
            | Channel::GuildDirectory { id }
            | Channel::GuildForum { id }
            | Channel::GuildMedia { id } => *id,
        }
    }

    pub fn kind(&self) -> ChannelType {
        match self {
            Channel::Text(_) => ChannelType::GuildText,
            Channel::Dm { .. } => ChannelType::Dm,
            Channel::Voice(_) => ChannelType::GuildVoice,
            Channel::GroupDm { .. } => ChannelType::GroupDm,
            Channel::GuildCategory { .. } => ChannelType::GuildCategory,
            Channel::GuildAnnouncement { .. } => ChannelType::GuildAnnouncement,
            Channel::AnnouncementThread { .. } => ChannelType::AnnouncementThread,
            Channel::PublicThread { .. } => ChannelType::PublicThread,
            Channel::PrivateThread { .. } => ChannelType::PrivateThread,
            Channel::GuildStageVoice { .. } => ChannelType::GuildStageVoice,
            Channel::GuildDirectory { .. } => ChannelType::GuildDirectory,
            Channel::GuildForum { .. } => ChannelType::GuildForum,
            Channel::GuildMedia { .. } => ChannelType::GuildMedia,
        }
    }

    fn variant_name(&self) -> &'static str {
        match self.kind() {
            ChannelType::GuildText => "TextChannel",
            ChannelType::Dm => "DMChannel",
            ChannelType::GuildVoice => "VoiceChannel",
            ChannelType::GroupDm => "GroupDMChannel",
            ChannelType::GuildCategory => "GuildCategoryChannel",
            ChannelType::GuildAnnouncement => "GuildAnnouncementChannel",
            ChannelType::AnnouncementThread => "AnnouncementThreadChannel",
            ChannelType::PublicThread => "PublicThreadChannel",
            ChannelType::PrivateThread => "PrivateThreadChannel",
            ChannelType::GuildStageVoice => "GuildStageVoiceChannel",
            ChannelType::GuildDirectory => "GuildDirectoryChannel",
            ChannelType::GuildForum => "GuildForumChannel",
            ChannelType::GuildMedia => "GuildMediaChannel",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Text(c) => write!(
                f,
                "TextChannel(id={}, name={}, nsfw={}, topic={})",
                c.id,
                c.name,
                c.nsfw,
                c.topic.as_deref().unwrap_or("None")
            ),
            Channel::Voice(c) => write!(
                f,
                "VoiceChannel(id={}, name={}, bitrate={})",
                c.id, c.name, c.bitrate
            ),
            other => write!(f, "{}(id={})", other.variant_name(), other.id()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn build(value: serde_json::Value) -> Result<Channel> {
        Channel::from_payload(serde_json::from_value(value).unwrap())
    }

    #[test]
    fn every_known_code_builds_matching_variant() {
        for kind in ChannelType::ALL {
            let channel = build(json!({ "id": "123", "type": kind.code() })).unwrap();
            assert_eq!(channel.kind(), kind);
            assert_eq!(channel.id(), 123);
        }
    }

    #[test]
    fn unknown_codes_are_rejected() {
        for code in [-1, 6, 7, 8, 9, 17, 255] {
            match build(json!({ "id": "1", "type": code })) {
                Err(Error::UnknownChannelType(c)) => assert_eq!(c, code),
                other => panic!("code {}: expected UnknownChannelType, got {:?}", code, other),
            }
        }
    }

    #[test]
    fn text_channel_reads_name_nsfw_topic() {
        let channel = build(json!({
            "id": "41771983423143937",
            "type": 0,
            "name": "general",
            "nsfw": true,
            "topic": "24/7 chat about how to gank Mike #2"
        }))
        .unwrap();
        assert_eq!(
            channel,
            Channel::Text(TextChannel {
                id: 41771983423143937,
                name: "general".into(),
                nsfw: true,
                topic: Some("24/7 chat about how to gank Mike #2".into()),
            })
        );
    }

    #[test]
    fn voice_channel_defaults_bitrate() {
        let channel = build(json!({ "id": "7", "type": 2, "name": "Lounge" })).unwrap();
        assert_eq!(
            channel,
            Channel::Voice(VoiceChannel {
                id: 7,
                name: "Lounge".into(),
                bitrate: DEFAULT_BITRATE,
            })
        );

        let channel = build(json!({ "id": "7", "type": 2, "name": "Lounge", "bitrate": 64000 })).unwrap();
        assert!(matches!(channel, Channel::Voice(VoiceChannel { bitrate: 64000, .. })));
    }

    #[test]
    fn display_matches_variant() {
        let text = build(json!({ "id": "1", "type": 0, "name": "general" })).unwrap();
        assert_eq!(
            text.to_string(),
            "TextChannel(id=1, name=general, nsfw=false, topic=None)"
        );
        let dm = build(json!({ "id": "2", "type": 1 })).unwrap();
        assert_eq!(dm.to_string(), "DMChannel(id=2)");
    }

    #[test]
    fn channel_type_serializes_as_integer() {
        assert_eq!(serde_json::to_value(ChannelType::GuildForum).unwrap(), json!(15));
        let kind: ChannelType = serde_json::from_value(json!(16)).unwrap();
        assert_eq!(kind, ChannelType::GuildMedia);
    }
}
