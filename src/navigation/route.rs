use std::collections::HashMap;
use urlencoding::{decode_binary, encode};

use crate::entities::photo::Photo;

/// Values bound from a route by a [`RouteTemplate`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteParams {
    values: HashMap<String, String>,
}

impl RouteParams {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Raw value, or an empty string when missing.
    pub fn string(&self, key: &str) -> String {
        self.get(key).unwrap_or_default().to_string()
    }

    /// Percent-decoded value, or an empty string when missing.
    pub fn decoded(&self, key: &str) -> String {
        self.get(key).map(decode_component).unwrap_or_default()
    }

    /// Integer value, or zero when missing or malformed.
    pub fn int(&self, key: &str) -> u32 {
        self.get(key)
            .and_then(|value| value.parse::<u32>().ok())
            .unwrap_or(0)
    }
}

/// A `/`-separated route pattern where `{name}` segments bind values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteTemplate(&'static str);

impl RouteTemplate {
    pub const fn new(pattern: &'static str) -> Self {
        Self(pattern)
    }

    pub fn pattern(&self) -> &'static str {
        self.0
    }

    /// Binds `route` against the pattern. Literal segments must match;
    /// trailing placeholder segments may be absent and are left unbound.
    pub fn matches(&self, route: &str) -> Option<RouteParams> {
        let mut pattern_segments = self.0.split('/');
        let mut route_segments = route.split('/');
        let mut params = RouteParams::default();

        loop {
            match (pattern_segments.next(), route_segments.next()) {
                (None, None) => return Some(params),
                (None, Some(_)) => return None,
                (Some(pattern), value) => {
                    if let Some(name) = placeholder_name(pattern) {
                        if let Some(value) = value {
                            params.values.insert(name.to_string(), value.to_string());
                        }
                    } else if value != Some(pattern) {
                        return None;
                    }
                }
            }
        }
    }
}

fn placeholder_name(segment: &str) -> Option<&str> {
    segment.strip_prefix('{')?.strip_suffix('}')
}

fn decode_component(value: &str) -> String {
    let spaced = value.replace('+', " ");
    String::from_utf8_lossy(&decode_binary(spaced.as_bytes())).into_owned()
}

#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    Feed,
    Detail(Photo),
}

impl Screen {
    pub const FEED: RouteTemplate = RouteTemplate::new("feed");
    pub const DETAIL: RouteTemplate = RouteTemplate::new(
        "detail/{photoId}/{photoUrl}/{photoWidth}/{photoHeight}/{photoTitle}/{photoAuthor}",
    );

    pub fn route(&self) -> String {
        match self {
            Screen::Feed => Self::FEED.pattern().to_string(),
            Screen::Detail(photo) => Self::create_route(photo),
        }
    }

    /// Detail route for `photo`. Free text and the URL are percent-encoded,
    /// the id and dimensions are written as is.
    pub fn create_route(photo: &Photo) -> String {
        format!(
            "detail/{}/{}/{}/{}/{}/{}",
            photo.id,
            encode(&photo.url),
            photo.width,
            photo.height,
            encode(&photo.title),
            encode(&photo.author),
        )
    }

    /// Resolves a route to its screen. Detail arguments never fail to parse:
    /// missing text becomes empty and missing numbers become zero.
    pub fn parse(route: &str) -> Option<Screen> {
        if Self::FEED.matches(route).is_some() {
            return Some(Screen::Feed);
        }

        let params = Self::DETAIL.matches(route)?;
        Some(Screen::Detail(Photo {
            id: params.string("photoId"),
            url: params.decoded("photoUrl"),
            width: params.int("photoWidth"),
            height: params.int("photoHeight"),
            title: params.decoded("photoTitle"),
            author: params.decoded("photoAuthor"),
        }))
    }
}
