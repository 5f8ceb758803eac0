//! Credential payload decoding.
//!
//! The credential is a three-segment dot-delimited token whose middle
//! segment is base64url JSON. The signature is not verified here: the
//! backend owns that. Anything unexpected yields `None` (fail-closed).

use base64::Engine as _;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use serde::Deserialize;

use crate::common::{Identity, Role};

const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,
    exp: i64,
    #[serde(default)]
    iat: Option<i64>,
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default, rename = "firstName")]
    first_name: Option<String>,
    #[serde(default)]
    given_name: Option<String>,
    #[serde(default, rename = "lastName")]
    last_name: Option<String>,
    #[serde(default)]
    family_name: Option<String>,
}

pub fn decode_identity(token: &str) -> Option<Identity> {
    let mut segments = token.trim().split('.');
    let (Some(header), Some(payload), Some(_signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        log::debug!("credential is not a three-segment token");
        return None;
    };
    if header.is_empty() || payload.is_empty() {
        log::debug!("credential has an empty segment");
        return None;
    }

    let bytes = match PAYLOAD_ENGINE.decode(payload) {
        Ok(bytes) => bytes,
        Err(err) => {
            log::debug!("credential payload is not base64url: {err}");
            return None;
        }
    };
    let claims: Claims = match serde_json::from_slice(&bytes) {
        Ok(claims) => claims,
        Err(err) => {
            log::debug!("credential payload is not valid claims JSON: {err}");
            return None;
        }
    };

    let Some(raw_role) = claims.role.as_deref() else {
        log::debug!("credential has no role claim");
        return None;
    };
    let role = match raw_role.parse::<Role>() {
        Ok(role) => role,
        Err(err) => {
            log::debug!("credential carries {err}");
            return None;
        }
    };

    let display_name = display_name(&claims);
    Some(Identity {
        subject_id: claims.sub,
        role,
        issued_at: claims.iat,
        expires_at: claims.exp,
        display_name,
    })
}

fn display_name(claims: &Claims) -> Option<String> {
    if let Some(name) = claims.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
        return Some(name.to_string());
    }
    let first = claims.first_name.as_deref().or(claims.given_name.as_deref());
    let last = claims.last_name.as_deref().or(claims.family_name.as_deref());
    let joined = [first, last]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    (!joined.is_empty()).then_some(joined)
}
