use derive_new::new;

use super::Renderer;
use crate::design::Design;
use crate::error::Result;

#[derive(Debug, Clone, Copy, Default, new)]
pub struct JsonRenderer {
    pub pretty: bool,
}

impl Renderer for JsonRenderer {
    fn render(&self, design: &Design) -> Result<String> {
        let text = if self.pretty {
            serde_json::to_string_pretty(design)?
        } else {
            serde_json::to_string(design)?
        };
        Ok(text)
    }
}
