use crate::error::{Result, ScanError};
use crate::result::MunicipalityLink;
use scraper::{Html, Selector};
use tracing::{debug, warn};

/// Path prefix shared by every municipality detail page.
pub const MUNICIPALITY_PREFIX: &str = "/mbi/biblioteca/simbolopedia/municipio-";

/// Marks the state-level aggregate page, which also matches the municipality prefix.
pub const STATE_AGGREGATE_MARKER: &str = "mato-grosso";

/// Flag thumbnail asset marker.
pub const FLAG_MARKER: &str = "bandeira-mini";

/// Coat-of-arms thumbnail asset marker, used when a municipality has no flag.
pub const COAT_OF_ARMS_MARKER: &str = "brasao-mini";

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| ScanError::ParseError(format!("{}: {:?}", css, e)))
}

/// Extract the municipality links from the index page, in document order.
///
/// Anchors pointing at the state aggregate page are dropped, as are anchors
/// whose href merely contains the municipality prefix instead of starting
/// with it. URLs are formed by appending the href to `base_url` verbatim.
pub fn extract_municipality_links(html: &str, base_url: &str) -> Result<Vec<MunicipalityLink>> {
    let document = Html::parse_document(html);
    let anchor_selector = selector(&format!("a[href*='{}']", MUNICIPALITY_PREFIX))?;

    let mut links = Vec::new();

    for element in document.select(&anchor_selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };

        if href.contains(STATE_AGGREGATE_MARKER) || !href.starts_with(MUNICIPALITY_PREFIX) {
            debug!("Skipping anchor {}", href);
            continue;
        }

        let text: String = element.text().collect();
        let name = title_case(text.trim());
        let url = format!("{}{}", base_url, href);

        debug!("Found municipality {} -> {}", name, url);
        links.push(MunicipalityLink { name, url });
    }

    if links.is_empty() {
        warn!("No municipality links found on index page");
    }

    Ok(links)
}

/// Extract the flag thumbnail URL from a municipality page.
///
/// The first `bandeira-mini` image wins; failing that, the first
/// `brasao-mini` image. Returns `None` when the page carries neither.
pub fn extract_flag_url(html: &str, base_url: &str) -> Result<Option<String>> {
    let document = Html::parse_document(html);

    for marker in [FLAG_MARKER, COAT_OF_ARMS_MARKER] {
        let img_selector = selector(&format!("img[src*='{}']", marker))?;

        if let Some(src) = document
            .select(&img_selector)
            .find_map(|element| element.value().attr("src"))
        {
            debug!("Matched {} image {}", marker, src);
            return Ok(Some(format!("{}{}", base_url, src)));
        }
    }

    Ok(None)
}

/// Title-case a display name.
///
/// A cased letter is uppercased when it follows an uncased character (or
/// starts the string) and lowercased when it follows another cased letter.
/// Apostrophes and hyphens therefore start a new word: `d'oeste` becomes
/// `D'Oeste`.
///
/// Titlecase letters such as `ǅ` are neither upper- nor lowercase and so
/// count as uncased. A word's first letter takes its full uppercase form,
/// not its titlecase form: `ǆemal` becomes `Ǆemal`.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_cased = false;

    for c in s.chars() {
        let cased = c.is_lowercase() || c.is_uppercase();
        if cased && prev_cased {
            out.extend(c.to_lowercase());
        } else if cased {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        prev_cased = cased;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://www.mbi.com.br";

    fn index_page(anchors: &[(&str, &str)]) -> String {
        let mut html = String::from("<html><body><ul>");
        for (href, text) in anchors {
            html.push_str(&format!(r#"<li><a href="{}">{}</a></li>"#, href, text));
        }
        html.push_str("</ul></body></html>");
        html
    }

    #[test]
    fn test_extract_links_in_document_order() {
        let html = index_page(&[
            ("/mbi/biblioteca/simbolopedia/municipio-cuiaba-mt-br/", "CUIABÁ"),
            ("/mbi/biblioteca/simbolopedia/municipio-sinop-mt-br/", "sinop"),
        ]);

        let links = extract_municipality_links(&html, BASE).unwrap();

        assert_eq!(
            links,
            vec![
                MunicipalityLink::new(
                    "Cuiabá",
                    "https://www.mbi.com.br/mbi/biblioteca/simbolopedia/municipio-cuiaba-mt-br/"
                ),
                MunicipalityLink::new(
                    "Sinop",
                    "https://www.mbi.com.br/mbi/biblioteca/simbolopedia/municipio-sinop-mt-br/"
                ),
            ]
        );
    }

    #[test]
    fn test_extract_links_skips_state_aggregate() {
        let html = index_page(&[
            ("/mbi/biblioteca/simbolopedia/municipio-estado-mato-grosso-br/", "Mato Grosso"),
            ("/mbi/biblioteca/simbolopedia/municipio-sorriso-mt-br/", "Sorriso"),
        ]);

        let links = extract_municipality_links(&html, BASE).unwrap();

        assert_eq!(links.len(), 1);
        assert_eq!(links[0].name, "Sorriso");
        assert!(links.iter().all(|l| !l.url.contains("mato-grosso")));
    }

    #[test]
    fn test_extract_links_requires_prefix_at_start() {
        let html = index_page(&[
            (
                "https://elsewhere.example/mbi/biblioteca/simbolopedia/municipio-x-mt-br/",
                "Elsewhere",
            ),
            ("/outro/mbi/biblioteca/simbolopedia/municipio-y-mt-br/", "Nested"),
            ("/mbi/biblioteca/simbolopedia/municipio-juina-mt-br/", "Juína"),
        ]);

        let links = extract_municipality_links(&html, BASE).unwrap();

        assert_eq!(links.len(), 1);
        for link in &links {
            assert!(link
                .url
                .starts_with(&format!("{}{}", BASE, MUNICIPALITY_PREFIX)));
        }
    }

    #[test]
    fn test_extract_links_ignores_unrelated_anchors() {
        let html = index_page(&[
            ("/mbi/biblioteca/simbolopedia/", "Simbolopédia"),
            ("#top", "Topo"),
            ("/mbi/biblioteca/simbolopedia/municipio-barra-do-garcas-mt-br/", "Barra do Garças"),
        ]);

        let links = extract_municipality_links(&html, BASE).unwrap();

        assert_eq!(links.len(), 1);
        assert_eq!(links[0].name, "Barra Do Garças");
    }

    #[test]
    fn test_extract_links_trims_and_joins_nested_text() {
        let html = r#"<html><body>
            <a href="/mbi/biblioteca/simbolopedia/municipio-nova-mutum-mt-br/">
                <span>nova</span> <b>MUTUM</b>
            </a>
        </body></html>"#;

        let links = extract_municipality_links(html, BASE).unwrap();

        assert_eq!(links.len(), 1);
        assert_eq!(links[0].name, "Nova Mutum");
    }

    #[test]
    fn test_extract_links_empty_page() {
        let links = extract_municipality_links("<html><body></body></html>", BASE).unwrap();
        assert!(links.is_empty());
    }

    #[test]
    fn test_extract_flag_prefers_bandeira() {
        let html = r#"<html><body>
            <img src="/img/brasao-mini-cuiaba.png">
            <img src="/img/bandeira-mini-cuiaba.png">
        </body></html>"#;

        let url = extract_flag_url(html, BASE).unwrap();

        assert_eq!(
            url,
            Some("https://www.mbi.com.br/img/bandeira-mini-cuiaba.png".to_string())
        );
    }

    #[test]
    fn test_extract_flag_falls_back_to_brasao() {
        let html = r#"<html><body>
            <img src="/img/logo.png">
            <img src="/img/brasao-mini-araputanga.png">
        </body></html>"#;

        let url = extract_flag_url(html, BASE).unwrap();

        assert_eq!(
            url,
            Some("https://www.mbi.com.br/img/brasao-mini-araputanga.png".to_string())
        );
    }

    #[test]
    fn test_extract_flag_takes_first_match() {
        let html = r#"<html><body>
            <img src="/img/bandeira-mini-first.png">
            <img src="/img/bandeira-mini-second.png">
        </body></html>"#;

        let url = extract_flag_url(html, BASE).unwrap();

        assert_eq!(
            url,
            Some("https://www.mbi.com.br/img/bandeira-mini-first.png".to_string())
        );
    }

    #[test]
    fn test_extract_flag_none_found() {
        let html = r#"<html><body>
            <img src="/img/bandeira-grande.png">
            <img alt="no source">
            <a href="/img/bandeira-mini-link.png">not an image</a>
        </body></html>"#;

        assert_eq!(extract_flag_url(html, BASE).unwrap(), None);
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("cuiabá"), "Cuiabá");
        assert_eq!(title_case("VÁRZEA GRANDE"), "Várzea Grande");
        assert_eq!(title_case("são josé do rio claro"), "São José Do Rio Claro");
        assert_eq!(title_case("nova santa helena"), "Nova Santa Helena");
        assert_eq!(title_case("mirassol d'oeste"), "Mirassol D'Oeste");
        assert_eq!(title_case("vila bela-da santíssima"), "Vila Bela-Da Santíssima");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_title_case_digits_start_new_word() {
        assert_eq!(title_case("1a vila"), "1A Vila");
    }

    #[test]
    fn test_title_case_digraphs_use_full_uppercase() {
        assert_eq!(title_case("ǆemal"), "Ǆemal");
        assert_eq!(title_case("ǅemal"), "ǅEmal");
    }
}
