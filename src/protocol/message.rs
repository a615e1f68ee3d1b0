//! Control message definitions
//!
//! Represents requests sent to the device.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::{Result, SpkError};

/// Message kinds understood by the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    EqViewInfo,
    SpkListViewInfo,
    PlayInfo,
    FuncViewInfo,
    SettingViewInfo,
    ProductInfo,
    C4aSettingInfo,
    RadioViewInfo,
    ShareApInfo,
    UpdateViewInfo,
    BuildInfoDev,
    OptionInfoDev,
    MacInfoDev,
    MemMonDev,
    TestDev,
    TestToneReq,
    FactorySetReq,
}

impl MessageKind {
    /// Every known kind, in protocol order
    pub const ALL: [MessageKind; 17] = [
        MessageKind::EqViewInfo,
        MessageKind::SpkListViewInfo,
        MessageKind::PlayInfo,
        MessageKind::FuncViewInfo,
        MessageKind::SettingViewInfo,
        MessageKind::ProductInfo,
        MessageKind::C4aSettingInfo,
        MessageKind::RadioViewInfo,
        MessageKind::ShareApInfo,
        MessageKind::UpdateViewInfo,
        MessageKind::BuildInfoDev,
        MessageKind::OptionInfoDev,
        MessageKind::MacInfoDev,
        MessageKind::MemMonDev,
        MessageKind::TestDev,
        MessageKind::TestToneReq,
        MessageKind::FactorySetReq,
    ];

    /// Wire name of the kind
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::EqViewInfo => "EQ_VIEW_INFO",
            MessageKind::SpkListViewInfo => "SPK_LIST_VIEW_INFO",
            MessageKind::PlayInfo => "PLAY_INFO",
            MessageKind::FuncViewInfo => "FUNC_VIEW_INFO",
            MessageKind::SettingViewInfo => "SETTING_VIEW_INFO",
            MessageKind::ProductInfo => "PRODUCT_INFO",
            MessageKind::C4aSettingInfo => "C4A_SETTING_INFO",
            MessageKind::RadioViewInfo => "RADIO_VIEW_INFO",
            MessageKind::ShareApInfo => "SHARE_AP_INFO",
            MessageKind::UpdateViewInfo => "UPDATE_VIEW_INFO",
            MessageKind::BuildInfoDev => "BUILD_INFO_DEV",
            MessageKind::OptionInfoDev => "OPTION_INFO_DEV",
            MessageKind::MacInfoDev => "MAC_INFO_DEV",
            MessageKind::MemMonDev => "MEM_MON_DEV",
            MessageKind::TestDev => "TEST_DEV",
            MessageKind::TestToneReq => "TEST_TONE_REQ",
            MessageKind::FactorySetReq => "FACTORY_SET_REQ",
        }
    }

    /// Read-only status queries (safe to sweep).
    ///
    /// Test, test-tone and factory-reset requests make the device act and
    /// are only sent when asked for by name.
    pub fn is_query(&self) -> bool {
        !matches!(
            self,
            MessageKind::TestDev | MessageKind::TestToneReq | MessageKind::FactorySetReq
        )
    }

    /// All read-only kinds, in protocol order
    pub fn queries() -> impl Iterator<Item = MessageKind> {
        Self::ALL.into_iter().filter(|kind| kind.is_query())
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageKind {
    type Err = SpkError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| SpkError::InvalidArgument(format!("unknown message kind: {}", s)))
    }
}

impl Serialize for MessageKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A request body: `{"cmd":"get","msg":"<KIND>"}`
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ControlMessage {
    cmd: &'static str,
    msg: MessageKind,
}

impl ControlMessage {
    /// Query the current state for `kind`
    pub fn get(kind: MessageKind) -> Self {
        Self { cmd: "get", msg: kind }
    }

    /// The kind this message asks about
    pub fn kind(&self) -> MessageKind {
        self.msg
    }

    /// Serialize to the JSON plaintext sent on the wire
    pub fn to_json(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }
}
