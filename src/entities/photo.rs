use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    pub id: String,
    pub url: String,
    pub width: u32,
    pub height: u32,
    pub title: String,
    #[serde(default = "Photo::default_author")]
    pub author: String,
}

impl Photo {
    pub const UNKNOWN_AUTHOR: &'static str = "Unknown";

    pub fn new(
        id: impl Into<String>,
        url: impl Into<String>,
        width: u32,
        height: u32,
        title: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            width,
            height,
            title: title.into(),
            author: Self::default_author(),
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    /// Width over height. A zero height is not rejected and yields a
    /// non-finite ratio.
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Height this photo takes when scaled to `target_width`, rounded to the
    /// nearest unit.
    pub fn proportional_height(&self, target_width: u32) -> u32 {
        let scaled = target_width as f64 / self.width as f64 * self.height as f64;
        scaled.round() as u32
    }

    fn default_author() -> String {
        Self::UNKNOWN_AUTHOR.to_string()
    }
}
