//! State of the link popup form.

/// Candidate URL typed into the link popup.
///
/// Confirming hands the URL to the caller and always empties the field,
/// whether or not the caller could use it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkForm {
    url: String,
}

impl LinkForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn set_url(&mut self, url: impl Into<String>) {
        self.url = url.into();
    }

    /// Take the trimmed URL and reset the field.
    pub fn confirm(&mut self) -> String {
        let url = self.url.trim().to_string();
        self.url.clear();
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirm_trims_and_clears() {
        let mut form = LinkForm::new();
        form.set_url("  http://x  ");
        assert_eq!(form.confirm(), "http://x");
        assert_eq!(form.url(), "");
    }

    #[test]
    fn test_confirm_empty_still_clears() {
        let mut form = LinkForm::new();
        form.set_url("   ");
        assert_eq!(form.confirm(), "");
        assert_eq!(form.url(), "");
    }
}
