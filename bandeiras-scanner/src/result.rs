/// A municipality discovered on the index page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MunicipalityLink {
    /// Display name, title-cased from the anchor text
    pub name: String,
    /// Absolute URL of the municipality's detail page
    pub url: String,
}

impl MunicipalityLink {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}
