//! Request construction for the media API
//!
//! Turns caller-level seeds (a tag, a coordinate pair, a user id) into fully
//! resolved page requests, including the page size hint and credentials.

mod query;

pub use query::add_query;

use crate::config::ApiConfig;
use crate::engine::PageRequest;
use crate::EndpointError;
use std::fmt;
use std::str::FromStr;
use url::Url;

/// One independent lineage's starting point
#[derive(Debug, Clone, PartialEq)]
pub enum Seed {
    /// Recent media carrying a tag (with or without the leading '#')
    Tag(String),

    /// Media taken around a coordinate pair
    Location { lat: f64, lng: f64 },

    /// Recent media posted by a user id
    User(String),
}

impl Seed {
    pub fn tag(tag: impl Into<String>) -> Self {
        Self::Tag(tag.into())
    }

    /// Parses a "LAT,LNG" pair
    pub fn location_from_str(s: &str) -> Result<Self, EndpointError> {
        let malformed = || EndpointError::MalformedLocation(s.to_string());

        let (lat, lng) = s.split_once(',').ok_or_else(malformed)?;
        let lat = f64::from_str(lat.trim()).map_err(|_| malformed())?;
        let lng = f64::from_str(lng.trim()).map_err(|_| malformed())?;
        Ok(Self::Location { lat, lng })
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tag(tag) => write!(f, "tag:{}", tag),
            Self::Location { lat, lng } => write!(f, "location:{},{}", lat, lng),
            Self::User(id) => write!(f, "user:{}", id),
        }
    }
}

/// How requests identify themselves to the API
#[derive(Debug, Clone, PartialEq, Eq)]
enum Credentials {
    ClientId(String),
    AccessToken(String),
}

/// Builds page requests against one API base URL
#[derive(Debug, Clone)]
pub struct Endpoint {
    base: Url,
    credentials: Credentials,
    page_size: u32,
}

impl Endpoint {
    /// Creates an endpoint from API configuration
    ///
    /// A configured access token takes precedence over the client id.
    pub fn from_config(config: &ApiConfig, page_size: u32) -> Result<Self, EndpointError> {
        let base = Url::parse(&config.base_url)?;
        if base.cannot_be_a_base() {
            return Err(EndpointError::UnsupportedBase(config.base_url.clone()));
        }

        let credentials = match config.access_token.as_deref() {
            Some(token) if !token.is_empty() => Credentials::AccessToken(token.to_string()),
            _ => Credentials::ClientId(config.client_id.clone()),
        };

        Ok(Self {
            base,
            credentials,
            page_size,
        })
    }

    /// Resolves one seed into its first page request
    pub fn request_for(&self, seed: &Seed) -> Result<PageRequest, EndpointError> {
        let url = match seed {
            Seed::Tag(tag) => {
                let tag = tag.trim().trim_start_matches('#');
                if tag.is_empty() {
                    return Err(EndpointError::EmptyTag);
                }
                self.path(&["tags", tag, "media", "recent"])?
            }
            Seed::Location { lat, lng } => {
                let valid = lat.is_finite()
                    && lng.is_finite()
                    && (-90.0..=90.0).contains(lat)
                    && (-180.0..=180.0).contains(lng);
                if !valid {
                    return Err(EndpointError::InvalidCoordinates {
                        lat: *lat,
                        lng: *lng,
                    });
                }
                let mut url = self.path(&["media", "search"])?;
                add_query(&mut url, "lat", &lat.to_string());
                add_query(&mut url, "lng", &lng.to_string());
                url
            }
            Seed::User(id) => {
                let id = id.trim();
                if id.is_empty() {
                    return Err(EndpointError::EmptyUser);
                }
                self.path(&["users", id, "media", "recent"])?
            }
        };

        Ok(self.finish(url).into())
    }

    /// Appends path segments to the base, encoding each one
    fn path(&self, segments: &[&str]) -> Result<Url, EndpointError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| EndpointError::UnsupportedBase(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Adds the parameters every request carries
    fn finish(&self, mut url: Url) -> Url {
        add_query(&mut url, "count", &self.page_size.to_string());
        match &self.credentials {
            Credentials::AccessToken(token) => add_query(&mut url, "access_token", token),
            Credentials::ClientId(id) => add_query(&mut url, "client_id", id),
        }
        url
    }
}

/// Resolves every seed, keeping their order
///
/// Fails on the first seed that cannot be turned into a request, so a bad seed
/// is reported before anything is fetched.
pub fn build_seed_requests(
    endpoint: &Endpoint,
    seeds: &[Seed],
) -> Result<Vec<PageRequest>, EndpointError> {
    seeds.iter().map(|seed| endpoint.request_for(seed)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_config() -> ApiConfig {
        ApiConfig {
            base_url: "https://api.instagram.com/v1/".to_string(),
            client_id: "abcdefg".to_string(),
            access_token: None,
            request_timeout_ms: 1000,
        }
    }

    fn endpoint() -> Endpoint {
        Endpoint::from_config(&api_config(), 100).unwrap()
    }

    #[test]
    fn test_tag_request() {
        let request = endpoint().request_for(&Seed::tag("#selfie")).unwrap();
        assert_eq!(
            request.as_str(),
            "https://api.instagram.com/v1/tags/selfie/media/recent?count=100&client_id=abcdefg"
        );
    }

    #[test]
    fn test_tag_is_path_encoded() {
        let request = endpoint().request_for(&Seed::tag("a/b c")).unwrap();
        assert!(request
            .as_str()
            .starts_with("https://api.instagram.com/v1/tags/a%2Fb%20c/media/recent?"));
    }

    #[test]
    fn test_location_request() {
        let seed = Seed::Location {
            lat: 48.858844,
            lng: 2.294351,
        };
        let request = endpoint().request_for(&seed).unwrap();
        assert_eq!(
            request.as_str(),
            "https://api.instagram.com/v1/media/search?lat=48.858844&lng=2.294351&count=100&client_id=abcdefg"
        );
    }

    #[test]
    fn test_user_request_with_access_token() {
        let mut config = api_config();
        config.access_token = Some("tok".to_string());
        let endpoint = Endpoint::from_config(&config, 20).unwrap();

        let request = endpoint.request_for(&Seed::User("42".to_string())).unwrap();
        assert_eq!(
            request.as_str(),
            "https://api.instagram.com/v1/users/42/media/recent?count=20&access_token=tok"
        );
    }

    #[test]
    fn test_invalid_seeds() {
        let endpoint = endpoint();
        assert!(matches!(
            endpoint.request_for(&Seed::tag("#")),
            Err(EndpointError::EmptyTag)
        ));
        assert!(matches!(
            endpoint.request_for(&Seed::User(" ".to_string())),
            Err(EndpointError::EmptyUser)
        ));
        assert!(matches!(
            endpoint.request_for(&Seed::Location { lat: 91.0, lng: 0.0 }),
            Err(EndpointError::InvalidCoordinates { .. })
        ));
        assert!(endpoint
            .request_for(&Seed::Location {
                lat: f64::NAN,
                lng: 0.0
            })
            .is_err());
    }

    #[test]
    fn test_build_seed_requests_keeps_order() {
        let seeds = vec![Seed::tag("cats"), Seed::tag("dogs")];
        let requests = build_seed_requests(&endpoint(), &seeds).unwrap();

        assert_eq!(requests.len(), 2);
        assert!(requests[0].as_str().contains("/tags/cats/"));
        assert!(requests[1].as_str().contains("/tags/dogs/"));
    }

    #[test]
    fn test_location_from_str() {
        assert_eq!(
            Seed::location_from_str("48.85, 2.29").unwrap(),
            Seed::Location {
                lat: 48.85,
                lng: 2.29
            }
        );
        assert!(Seed::location_from_str("48.85").is_err());
        assert!(Seed::location_from_str("north,south").is_err());
    }

    #[test]
    fn test_non_base_url_rejected() {
        let mut config = api_config();
        config.base_url = "mailto:someone@example.com".to_string();
        assert!(matches!(
            Endpoint::from_config(&config, 100),
            Err(EndpointError::UnsupportedBase(_))
        ));
    }
}
