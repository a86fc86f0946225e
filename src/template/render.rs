//! Placeholder substitution for stored templates

use std::collections::BTreeMap;
use std::sync::Arc;

use super::{TemplateResult, TemplateStore};

/// Substitute `{Token}` placeholders in a template body.
///
/// Every occurrence of each token is replaced; tokens present in the
/// template but absent from the map are left verbatim, so one template can
/// serve contexts that do not fill every placeholder.
pub fn substitute_tokens(template: &str, substitutions: &BTreeMap<String, String>) -> String {
    let mut rendered = template.to_string();

    for (token, value) in substitutions {
        let pattern = format!("{{{}}}", token);
        rendered = rendered.replace(&pattern, value);
    }

    rendered
}

/// Loads a template by key and renders it against a substitution map.
///
/// Stateless between calls; the template text is read fresh per request.
pub struct TemplateRenderer {
    store: Arc<dyn TemplateStore>,
}

impl TemplateRenderer {
    pub fn new(store: Arc<dyn TemplateStore>) -> Self {
        Self { store }
    }

    pub async fn render(
        &self,
        key: &str,
        substitutions: &BTreeMap<String, String>,
    ) -> TemplateResult<String> {
        let template = self.store.get(key).await?;
        Ok(substitute_tokens(&template, substitutions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::{MemoryTemplateStore, TemplateError};

    fn subs(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_substitute_all_tokens() {
        let rendered = substitute_tokens(
            "Hello {FirstName}, code {Code}",
            &subs(&[("FirstName", "Ana"), ("Code", "482913")]),
        );
        assert_eq!(rendered, "Hello Ana, code 482913");
    }

    #[test]
    fn test_substitute_repeated_token() {
        let rendered = substitute_tokens(
            "{Name} and {Name} again",
            &subs(&[("Name", "Widget")]),
        );
        assert_eq!(rendered, "Widget and Widget again");
    }

    #[test]
    fn test_unmatched_token_stays_verbatim() {
        let rendered = substitute_tokens(
            "Hello {FirstName}, code {Code}",
            &subs(&[("FirstName", "Ana")]),
        );
        assert_eq!(rendered, "Hello Ana, code {Code}");
    }

    #[test]
    fn test_empty_substitutions() {
        let rendered = substitute_tokens("Hello {FirstName}", &BTreeMap::new());
        assert_eq!(rendered, "Hello {FirstName}");
    }

    #[tokio::test]
    async fn test_render_loads_from_store() {
        let store = Arc::new(MemoryTemplateStore::new());
        store.insert("welcome", "Hello {FirstName}!");

        let renderer = TemplateRenderer::new(store);
        let body = renderer
            .render("welcome", &subs(&[("FirstName", "Ana")]))
            .await
            .unwrap();
        assert_eq!(body, "Hello Ana!");
    }

    #[tokio::test]
    async fn test_render_missing_template() {
        let renderer = TemplateRenderer::new(Arc::new(MemoryTemplateStore::new()));
        let result = renderer.render("missing", &BTreeMap::new()).await;
        assert!(matches!(result, Err(TemplateError::NotFound(_))));
    }
}
