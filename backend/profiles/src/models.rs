use serde::{Deserialize, Serialize};

use crate::FetchError;

pub const PROFILE_BASE_URL: &str = "https://warpcast.com";

/// Normalized profile handed to clients.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRecord {
    pub fid: u64,
    pub username: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pfp_url: Option<String>,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub follower_count: u64,
    #[serde(default)]
    pub following_count: u64,
}

impl ProfileRecord {
    pub fn profile_url(&self) -> String {
        format!("{PROFILE_BASE_URL}/{}", self.username)
    }
}

#[derive(Deserialize, Debug, Default)]
pub struct BulkResponse {
    #[serde(default)]
    pub users: Option<Vec<User>>,
}

#[derive(Deserialize, Debug, Default)]
pub struct User {
    pub fid: Option<u64>,
    pub username: Option<String>,
    pub display_name: Option<String>,
    pub pfp_url: Option<String>,
    pub profile: Option<Profile>,
    pub follower_count: Option<u64>,
    pub following_count: Option<u64>,
}

#[derive(Deserialize, Debug, Default)]
pub struct Profile {
    pub bio: Option<Bio>,
}

#[derive(Deserialize, Debug, Default)]
pub struct Bio {
    pub text: Option<String>,
}

/// Reshapes the first user of a bulk lookup.
///
/// Identity fields are required, everything else falls back to empty or zero.
pub fn into_record(response: BulkResponse) -> Result<ProfileRecord, FetchError> {
    let user = response
        .users
        .and_then(|users| users.into_iter().next())
        .ok_or(FetchError::NotFound)?;

    let fid = user.fid.filter(|fid| *fid > 0).ok_or(FetchError::Malformed)?;
    let username = user.username.ok_or(FetchError::Malformed)?;
    let display_name = user.display_name.ok_or(FetchError::Malformed)?;

    let bio = user
        .profile
        .and_then(|profile| profile.bio)
        .and_then(|bio| bio.text)
        .unwrap_or_default();

    Ok(ProfileRecord {
        fid,
        username,
        display_name,
        pfp_url: user.pfp_url,
        bio,
        follower_count: user.follower_count.unwrap_or(0),
        following_count: user.following_count.unwrap_or(0),
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn decode(value: serde_json::Value) -> BulkResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_maps_upstream_user() {
        let response = decode(json!({
            "users": [{
                "fid": 123,
                "username": "abc",
                "display_name": "Abc",
                "pfp_url": "u",
                "profile": { "bio": { "text": "hi" } },
                "follower_count": 5,
                "following_count": 2
            }]
        }));

        let record = into_record(response).unwrap();

        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({
                "fid": 123,
                "username": "abc",
                "displayName": "Abc",
                "pfpUrl": "u",
                "bio": "hi",
                "followerCount": 5,
                "followingCount": 2
            })
        );
    }

    #[test]
    fn test_empty_users_is_not_found() {
        assert_eq!(
            into_record(decode(json!({ "users": [] }))),
            Err(FetchError::NotFound)
        );
        assert_eq!(into_record(decode(json!({}))), Err(FetchError::NotFound));
    }

    #[test]
    fn test_optional_fields_default() {
        let response = decode(json!({
            "users": [{ "fid": 7, "username": "seven", "display_name": "Seven" }]
        }));

        let record = into_record(response).unwrap();

        assert_eq!(record.bio, "");
        assert_eq!(record.follower_count, 0);
        assert_eq!(record.following_count, 0);
        assert_eq!(record.pfp_url, None);
        assert!(!serde_json::to_string(&record).unwrap().contains("pfpUrl"));
    }

    #[test]
    fn test_missing_identity_is_malformed() {
        let no_username = decode(json!({ "users": [{ "fid": 1, "display_name": "One" }] }));
        let no_display = decode(json!({ "users": [{ "fid": 1, "username": "one" }] }));
        let zero_fid = decode(json!({
            "users": [{ "fid": 0, "username": "zero", "display_name": "Zero" }]
        }));

        assert_eq!(into_record(no_username), Err(FetchError::Malformed));
        assert_eq!(into_record(no_display), Err(FetchError::Malformed));
        assert_eq!(into_record(zero_fid), Err(FetchError::Malformed));
    }

    #[test]
    fn test_profile_url() {
        let record = ProfileRecord {
            fid: 3,
            username: "dwr".to_string(),
            display_name: "Dan".to_string(),
            pfp_url: None,
            bio: String::new(),
            follower_count: 0,
            following_count: 0,
        };

        assert_eq!(record.profile_url(), "https://warpcast.com/dwr");
    }
}
