//! Values passed between the engine and the SDK adapters.
//!
//! The engine exchanges dictionaries; here they are `serde_json` objects.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::error::{BridgeError, BridgeResult};

/// Engine-provided ad request dictionary. The ad unit, banner placement and
/// reward verification keys are interpreted here; other keys are carried
/// through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoadAdRequest(Map<String, Value>);

impl LoadAdRequest {
    pub const AD_UNIT_ID: &'static str = "ad_unit_id";
    pub const AD_SIZE: &'static str = "ad_size";
    pub const AD_POSITION: &'static str = "ad_position";
    pub const ADAPTIVE_WIDTH: &'static str = "adaptive_width";
    pub const ADAPTIVE_MAX_HEIGHT: &'static str = "adaptive_max_height";
    pub const ANCHOR_TO_SAFE_AREA: &'static str = "anchor_to_safe_area";
    pub const USER_ID: &'static str = "user_id";
    pub const CUSTOM_DATA: &'static str = "custom_data";

    pub fn new(ad_unit_id: &str) -> Self {
        let mut data = Map::new();
        data.insert(Self::AD_UNIT_ID.into(), Value::String(ad_unit_id.into()));
        Self(data)
    }

    pub fn from_dictionary(value: Value) -> BridgeResult<Self> {
        match value {
            Value::Object(data) => Ok(Self(data)),
            other => Err(BridgeError::InvalidData {
                what: "load ad request",
                reason: format!("expected a dictionary, got {other}"),
            }),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.ad_unit_id().is_some()
    }

    pub fn ad_unit_id(&self) -> Option<&str> {
        self.0.get(Self::AD_UNIT_ID).and_then(Value::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Banner size name, e.g. `"MEDIUM_RECTANGLE"`.
    pub fn ad_size(&self) -> Option<&str> {
        self.0.get(Self::AD_SIZE).and_then(Value::as_str)
    }

    /// Banner position name, e.g. `"BOTTOM_LEFT"`.
    pub fn ad_position(&self) -> Option<&str> {
        self.0.get(Self::AD_POSITION).and_then(Value::as_str)
    }

    /// Adaptive banner width in dp. Absent or `-1` means the screen width.
    pub fn adaptive_width(&self) -> Option<i64> {
        self.positive_int(Self::ADAPTIVE_WIDTH)
    }

    /// Inline adaptive banner height cap in dp. Absent or `-1` means none.
    pub fn adaptive_max_height(&self) -> Option<i64> {
        self.positive_int(Self::ADAPTIVE_MAX_HEIGHT)
    }

    pub fn anchor_to_safe_area(&self) -> bool {
        self.0
            .get(Self::ANCHOR_TO_SAFE_AREA)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Server-side reward verification options, when the request names a
    /// user id or custom data.
    pub fn server_side_verification(&self) -> Option<ServerSideVerification> {
        let text = |key: &str| self.0.get(key).and_then(Value::as_str).map(str::to_string);
        let options = ServerSideVerification {
            user_id: text(Self::USER_ID),
            custom_data: text(Self::CUSTOM_DATA),
        };
        (options.user_id.is_some() || options.custom_data.is_some()).then_some(options)
    }

    fn positive_int(&self, key: &str) -> Option<i64> {
        self.0.get(key).and_then(Value::as_i64).filter(|v| *v > 0)
    }

    pub fn to_dictionary(&self) -> Value {
        Value::Object(self.0.clone())
    }
}

/// Identity and measured size of one ad instance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdInfo {
    pub ad_id: String,
    /// Density-independent pixels; zero until measured.
    pub measured_width: i64,
    pub measured_height: i64,
    pub is_collapsible: bool,
    pub load_ad_request: Option<LoadAdRequest>,
}

impl AdInfo {
    pub fn new(ad_id: impl Into<String>, request: LoadAdRequest) -> Self {
        Self {
            ad_id: ad_id.into(),
            load_ad_request: Some(request),
            ..Self::default()
        }
    }

    pub fn ad_unit_id(&self) -> Option<&str> {
        self.load_ad_request.as_ref().and_then(LoadAdRequest::ad_unit_id)
    }

    pub fn to_dictionary(&self) -> Value {
        json!({
            "ad_id": self.ad_id,
            "measured_width": self.measured_width,
            "measured_height": self.measured_height,
            "is_collapsible": self.is_collapsible,
            "load_ad_request": self
                .load_ad_request
                .as_ref()
                .map_or_else(empty_dictionary, LoadAdRequest::to_dictionary),
        })
    }
}

/// SDK error with an optional underlying cause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdError {
    pub code: i64,
    pub domain: String,
    pub message: String,
    pub cause: Option<Box<AdError>>,
}

impl AdError {
    pub fn new(code: i64, domain: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code,
            domain: domain.into(),
            message: message.into(),
            cause: None,
        }
    }

    pub fn with_cause(mut self, cause: AdError) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    /// A missing cause is an empty dictionary, never null.
    pub fn to_dictionary(&self) -> Value {
        json!({
            "code": self.code,
            "domain": self.domain,
            "message": self.message,
            "cause": self
                .cause
                .as_deref()
                .map_or_else(empty_dictionary, AdError::to_dictionary),
        })
    }
}

/// Which ad network served, or tried to serve, a request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseInfo {
    pub response_id: Option<String>,
    pub adapter_class_name: Option<String>,
}

impl ResponseInfo {
    pub fn to_dictionary(&self) -> Value {
        json!({
            "response_id": self.response_id.as_deref().unwrap_or_default(),
            "adapter_class_name": self.adapter_class_name.as_deref().unwrap_or_default(),
        })
    }
}

/// Load failure: an [`AdError`] plus the response that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadAdError {
    pub error: AdError,
    pub response_info: Option<ResponseInfo>,
}

impl LoadAdError {
    pub fn to_dictionary(&self) -> Value {
        let mut dict = self.error.to_dictionary();
        if let Value::Object(map) = &mut dict {
            map.insert(
                "response_info".into(),
                self.response_info
                    .as_ref()
                    .map_or_else(empty_dictionary, ResponseInfo::to_dictionary),
            );
        }
        dict
    }
}

impl From<AdError> for LoadAdError {
    fn from(error: AdError) -> Self {
        Self {
            error,
            response_info: None,
        }
    }
}

/// Reward granted when a rewarded ad is watched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardItem {
    pub reward_type: String,
    pub amount: i64,
}

impl RewardItem {
    pub fn new(reward_type: impl Into<String>, amount: i64) -> Self {
        Self {
            reward_type: reward_type.into(),
            amount,
        }
    }

    pub fn to_dictionary(&self) -> Value {
        json!({ "type": self.reward_type, "amount": self.amount })
    }
}

/// Identifies the user to the publisher's reward callback server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerSideVerification {
    pub user_id: Option<String>,
    pub custom_data: Option<String>,
}

fn empty_dictionary() -> Value {
    Value::Object(Map::new())
}
