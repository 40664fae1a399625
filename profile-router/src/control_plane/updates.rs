/********************************************************************************
 * Copyright (c) 2026 Contributors to the Eclipse Foundation
 *
 * See the NOTICE file(s) distributed with this work for additional
 * information regarding copyright ownership.
 *
 * This program and the accompanying materials are made available under the
 * terms of the Apache License Version 2.0 which is available at
 * https://www.apache.org/licenses/LICENSE-2.0
 *
 * SPDX-License-Identifier: Apache-2.0
 ********************************************************************************/

//! Decoding of control-plane payloads into directory updates.

use crate::error::PayloadError;
use crate::profile::Profile;
use serde::de::IgnoredAny;
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(untagged)]
enum ProfileEntry {
    Name(String),
    Record { id: Option<String>, name: String },
}

impl From<ProfileEntry> for Profile {
    fn from(entry: ProfileEntry) -> Self {
        match entry {
            ProfileEntry::Name(name) => Profile::from_name(name),
            ProfileEntry::Record { id: Some(id), name } => Profile::new(id, name),
            ProfileEntry::Record { id: None, name } => Profile::from_name(name),
        }
    }
}

/// A value that ends up as a single topic segment.
fn is_topic_segment(value: &str) -> bool {
    !value.is_empty() && !value.contains(&['/', '+', '#'][..])
}

/// Decodes a profiles update: a JSON array of names or `{ "id", "name" }` records.
pub(crate) fn decode_profiles(payload: &[u8]) -> Result<Vec<Profile>, PayloadError> {
    let entries: Vec<ProfileEntry> = serde_json::from_slice(payload)?;
    entries
        .into_iter()
        .map(Profile::from)
        .map(|profile| {
            if is_topic_segment(&profile.name) && !profile.id.is_empty() {
                Ok(profile)
            } else {
                Err(PayloadError::InvalidProfile(profile.name))
            }
        })
        .collect()
}

/// Decodes a group update: a JSON array of group names.
pub(crate) fn decode_groups(payload: &[u8]) -> Result<Vec<String>, PayloadError> {
    let groups: Vec<String> = serde_json::from_slice(payload)?;
    match groups.iter().find(|group| group.is_empty()) {
        Some(group) => Err(PayloadError::InvalidGroup(group.clone())),
        None => Ok(groups),
    }
}

/// Checks that a topology document is well-formed JSON without keeping the parsed value.
pub(crate) fn validate_json(payload: &[u8]) -> Result<(), PayloadError> {
    serde_json::from_slice::<IgnoredAny>(payload)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{decode_groups, decode_profiles, validate_json};
    use crate::error::PayloadError;
    use crate::Profile;

    #[test]
    fn decode_profiles_accepts_names_and_records() {
        let profiles = decode_profiles(
            br#"["acme_admin", {"id": "p-7", "name": "acme_group_eu"}, {"name": "acme_group_us", "extra": 1}]"#,
        )
        .expect("profiles should decode");

        assert_eq!(
            profiles,
            vec![
                Profile::from_name("acme_admin"),
                Profile::new("p-7", "acme_group_eu"),
                Profile::from_name("acme_group_us"),
            ]
        );
        assert_eq!(profiles[1].name, "acme_group_eu");
    }

    #[test]
    fn decode_profiles_accepts_empty_array() {
        assert!(decode_profiles(b"[]").unwrap().is_empty());
    }

    #[test]
    fn decode_profiles_rejects_non_arrays_and_garbage() {
        assert!(matches!(
            decode_profiles(br#"{"profiles": []}"#),
            Err(PayloadError::Json(_))
        ));
        assert!(matches!(decode_profiles(b"not json"), Err(PayloadError::Json(_))));
        assert!(matches!(decode_profiles(b"[1, 2]"), Err(PayloadError::Json(_))));
    }

    #[test]
    fn decode_profiles_rejects_names_that_break_topics() {
        for bad in [r#"[""]"#, r#"["acme/evil"]"#, r#"["acme_+"]"#, r#"["acme_#"]"#] {
            assert!(
                matches!(
                    decode_profiles(bad.as_bytes()),
                    Err(PayloadError::InvalidProfile(_))
                ),
                "{bad} should be rejected"
            );
        }
        assert!(matches!(
            decode_profiles(br#"[{"id": "", "name": "acme_admin"}]"#),
            Err(PayloadError::InvalidProfile(_))
        ));
    }

    #[test]
    fn decode_groups_reads_string_arrays() {
        assert_eq!(decode_groups(br#"["eu", "us"]"#).unwrap(), ["eu", "us"]);
        assert!(decode_groups(b"[]").unwrap().is_empty());
        assert!(matches!(decode_groups(br#"["eu", 3]"#), Err(PayloadError::Json(_))));
        assert!(matches!(
            decode_groups(br#"["eu", ""]"#),
            Err(PayloadError::InvalidGroup(_))
        ));
    }

    #[test]
    fn validate_json_accepts_any_value() {
        assert!(validate_json(br#"{"automations": [{"id": "a1"}]}"#).is_ok());
        assert!(validate_json(b"42").is_ok());
        assert!(validate_json(b"").is_err());
        assert!(validate_json(b"{not json").is_err());
    }
}
