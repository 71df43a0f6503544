use crate::error::CoreError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    real_name: String,
    image_url: Option<String>,
}

impl Person {
    pub fn new(real_name: impl Into<String>) -> Result<Self, CoreError> {
        let real_name = real_name.into();
        if real_name.trim().is_empty() {
            return Err(CoreError::EmptyRealName);
        }
        Ok(Self {
            real_name,
            image_url: None,
        })
    }

    /// e.g. `file:///var/InternerSpeicher/FRITZ/fonpix/1.jpg`; passed through unchecked.
    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }

    pub fn real_name(&self) -> &str {
        &self.real_name
    }

    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    pub fn set_real_name(&mut self, real_name: impl Into<String>) -> Result<(), CoreError> {
        self.real_name = Self::new(real_name)?.real_name;
        Ok(())
    }

    pub fn set_image_url(&mut self, image_url: Option<String>) {
        self.image_url = image_url;
    }
}
