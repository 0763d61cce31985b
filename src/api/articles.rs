//! Articles feed endpoint: turns web search results into an article
//! list, with a seed list served whenever the search comes back empty
//! or fails.

use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::ApiError;

use super::ApiResponse;

const SEARCH_QUERY: &str = "site:linkedin.com/in/sergiofilipemonteiro/recent-activity/articles/";
const SEARCH_RESULT_LIMIT: usize = 10;
const AUTHOR: &str = "Sérgio Monteiro";
const PROFILE_URL: &str =
    "https://www.linkedin.com/in/sergiofilipemonteiro/recent-activity/articles/";

const TAG_KEYWORDS: &[&str] = &[
    "IA",
    "Inteligência Artificial",
    "Supply Chain",
    "Automação",
    "Tecnologia",
    "Inovação",
    "Liderança",
    "Gestão",
    "Digital",
    "Sustentabilidade",
    "Data Science",
    "Business Intelligence",
];

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: String,
    pub title: String,
    pub excerpt: String,
    pub url: String,
    pub publish_date: String,
    pub author: String,
    pub tags: Vec<String>,
    pub read_time: String,
}

/// One raw hit from the search provider.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct SearchResult {
    pub url: String,
    pub name: Option<String>,
    pub snippet: Option<String>,
    pub date: Option<String>,
}

/// Web search call behind the feed. A trait so handler tests can mock
/// the network.
pub trait ArticleSearch {
    fn search(&self, query: &str, num: usize) -> Result<Vec<SearchResult>, ApiError>;
}

pub struct HttpArticleSearch {
    url: Option<String>,
    agent: ureq::Agent,
}

impl HttpArticleSearch {
    pub fn new(url: Option<String>) -> Self {
        Self {
            url,
            agent: ureq::AgentBuilder::new()
                .timeout(std::time::Duration::from_secs(30))
                .build(),
        }
    }
}

impl ArticleSearch for HttpArticleSearch {
    fn search(&self, query: &str, num: usize) -> Result<Vec<SearchResult>, ApiError> {
        let url = self
            .url
            .as_deref()
            .ok_or_else(|| ApiError::Upstream("no search endpoint configured".to_string()))?;
        let response = self
            .agent
            .post(url)
            .send_json(json!({ "query": query, "num": num }))
            .map_err(|e| ApiError::Upstream(e.to_string()))?;
        response
            .into_json()
            .map_err(|e| ApiError::Upstream(e.to_string()))
    }
}

/// Tags drawn from a fixed keyword list, matched case-insensitively
/// against the title. Untagged titles get a generic pair.
fn extract_tags(title: &str) -> Vec<String> {
    let lower = title.to_lowercase();
    let tags: Vec<String> = TAG_KEYWORDS
        .iter()
        .filter(|keyword| lower.contains(&keyword.to_lowercase()))
        .map(|keyword| keyword.to_string())
        .collect();
    if tags.is_empty() {
        vec!["Tecnologia".to_string(), "Inovação".to_string()]
    } else {
        tags
    }
}

/// Reading time at 200 words per minute, floored at 3 minutes.
fn estimate_read_time(text: &str) -> String {
    if text.is_empty() {
        return "3 min".to_string();
    }
    let words = text.split_whitespace().count();
    let minutes = words.div_ceil(200).max(3);
    format!("{} min", minutes)
}

/// Last path segment of the article URL, or a positional id when the
/// URL has none.
fn article_id(url: &str, index: usize) -> String {
    match url.trim_end_matches('/').rsplit('/').next() {
        Some(segment) if !segment.is_empty() && !segment.contains(':') => segment.to_string(),
        _ => (index + 1).to_string(),
    }
}

/// Today as `YYYY-MM-DD`, computed from the Unix epoch (civil-from-days,
/// Howard Hinnant's algorithm).
fn today() -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0);
    let days = secs.div_euclid(86_400);

    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let y = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = doy - (153 * mp + 2) / 5 + 1;
    let m = if mp < 10 { mp + 3 } else { mp - 9 };
    let y = if m <= 2 { y + 1 } else { y };

    format!("{:04}-{:02}-{:02}", y, m, d)
}

fn article_from_result(result: &SearchResult, index: usize) -> Article {
    let title = result
        .name
        .clone()
        .unwrap_or_else(|| "Artigo sem título".to_string());
    let excerpt = result
        .snippet
        .clone()
        .unwrap_or_else(|| "Sem descrição disponível.".to_string());

    Article {
        id: article_id(&result.url, index),
        tags: extract_tags(&title),
        read_time: estimate_read_time(result.snippet.as_deref().unwrap_or("")),
        publish_date: result.date.clone().unwrap_or_else(today),
        author: AUTHOR.to_string(),
        url: result.url.clone(),
        title,
        excerpt,
    }
}

/// Canned feed served when the search finds nothing or fails.
fn seed_articles() -> Vec<Article> {
    vec![
        Article {
            id: "1".to_string(),
            title: "O Futuro da Inteligência Artificial na Supply Chain".to_string(),
            excerpt: "Explorando como a IA está transformando a gestão de cadeias de suprimentos e criando novas oportunidades para otimização e eficiência.".to_string(),
            url: PROFILE_URL.to_string(),
            publish_date: "2024-01-15".to_string(),
            author: AUTHOR.to_string(),
            tags: vec!["IA".to_string(), "Supply Chain".to_string(), "Inovação".to_string()],
            read_time: "5 min".to_string(),
        },
        Article {
            id: "2".to_string(),
            title: "Automação Industrial: Da Teoria à Prática".to_string(),
            excerpt: "Como implementar soluções de automação em ambientes industriais, lições aprendidas e casos de sucesso em projetos globais.".to_string(),
            url: PROFILE_URL.to_string(),
            publish_date: "2024-01-10".to_string(),
            author: AUTHOR.to_string(),
            tags: vec!["Automação".to_string(), "Indústria 4.0".to_string(), "Tecnologia".to_string()],
            read_time: "7 min".to_string(),
        },
        Article {
            id: "3".to_string(),
            title: "Sustentabilidade e Tecnologia: Um Caminho Necessário".to_string(),
            excerpt: "A intersecção entre sustentabilidade e inovação tecnológica, e como as empresas podem se beneficiar dessa sinergia.".to_string(),
            url: PROFILE_URL.to_string(),
            publish_date: "2024-01-05".to_string(),
            author: AUTHOR.to_string(),
            tags: vec!["Sustentabilidade".to_string(), "Tecnologia".to_string(), "ESG".to_string()],
            read_time: "6 min".to_string(),
        },
    ]
}

/// Handle `GET /api/articles`. Always 200; the seed list covers both an
/// empty search and a failed one.
pub fn handle(search: &dyn ArticleSearch) -> ApiResponse {
    let articles = match search.search(SEARCH_QUERY, SEARCH_RESULT_LIMIT) {
        Ok(results) if !results.is_empty() => results
            .iter()
            .enumerate()
            .map(|(index, result)| article_from_result(result, index))
            .collect(),
        Ok(_) => seed_articles(),
        Err(err) => {
            warn!("Article search failed, serving seed list: {err}");
            seed_articles()
        }
    };

    ApiResponse::ok(json!({ "articles": articles }))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedSearch(Vec<SearchResult>);
    impl ArticleSearch for FixedSearch {
        fn search(&self, _query: &str, _num: usize) -> Result<Vec<SearchResult>, ApiError> {
            Ok(self.0.clone())
        }
    }

    struct FailingSearch;
    impl ArticleSearch for FailingSearch {
        fn search(&self, _query: &str, _num: usize) -> Result<Vec<SearchResult>, ApiError> {
            Err(ApiError::Upstream("timeout".to_string()))
        }
    }

    #[test]
    fn test_empty_search_serves_seed_list() {
        let response = handle(&FixedSearch(vec![]));
        assert_eq!(response.status, 200);
        let articles = response.body["articles"].as_array().unwrap();
        assert_eq!(articles.len(), 3);
        assert_eq!(
            articles[0]["title"],
            "O Futuro da Inteligência Artificial na Supply Chain"
        );
        assert_eq!(articles[2]["tags"][2], "ESG");
    }

    #[test]
    fn test_failed_search_serves_seed_list() {
        let response = handle(&FailingSearch);
        assert_eq!(response.status, 200);
        assert_eq!(response.body["articles"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_results_map_to_articles() {
        let search = FixedSearch(vec![SearchResult {
            url: "https://example.com/posts/ia-na-logistica".to_string(),
            name: Some("IA na logística moderna".to_string()),
            snippet: Some("Um olhar sobre automação.".to_string()),
            date: Some("2024-03-01".to_string()),
        }]);

        let response = handle(&search);
        let articles = response.body["articles"].as_array().unwrap();
        assert_eq!(articles.len(), 1);

        let article = &articles[0];
        assert_eq!(article["id"], "ia-na-logistica");
        assert_eq!(article["title"], "IA na logística moderna");
        assert_eq!(article["author"], AUTHOR);
        assert_eq!(article["publishDate"], "2024-03-01");
        assert_eq!(article["readTime"], "3 min");
    }

    #[test]
    fn test_missing_fields_get_placeholders() {
        let search = FixedSearch(vec![SearchResult {
            url: "https://example.com/x".to_string(),
            ..Default::default()
        }]);

        let response = handle(&search);
        let article = &response.body["articles"][0];
        assert_eq!(article["title"], "Artigo sem título");
        assert_eq!(article["excerpt"], "Sem descrição disponível.");
        assert_eq!(article["readTime"], "3 min");
        // publishDate falls back to today, which is always YYYY-MM-DD.
        let date = article["publishDate"].as_str().unwrap();
        assert_eq!(date.len(), 10);
        assert_eq!(date.as_bytes()[4], b'-');
    }

    #[test]
    fn test_extract_tags_matches_case_insensitively() {
        let tags = extract_tags("O futuro da inteligência artificial e da supply chain");
        assert!(tags.contains(&"Inteligência Artificial".to_string()));
        assert!(tags.contains(&"Supply Chain".to_string()));
    }

    #[test]
    fn test_extract_tags_defaults_when_nothing_matches() {
        let tags = extract_tags("Um título qualquer");
        assert_eq!(tags, vec!["Tecnologia", "Inovação"]);
    }

    #[test]
    fn test_read_time_floors_at_three_minutes() {
        assert_eq!(estimate_read_time(""), "3 min");
        assert_eq!(estimate_read_time("poucas palavras"), "3 min");

        let medium = "palavra ".repeat(600);
        assert_eq!(estimate_read_time(&medium), "3 min");

        let long = "palavra ".repeat(1000);
        assert_eq!(estimate_read_time(&long), "5 min");
    }

    #[test]
    fn test_article_id_falls_back_to_position() {
        assert_eq!(article_id("https://example.com/posts/abc", 0), "abc");
        assert_eq!(article_id("https://example.com/posts/abc/", 0), "abc");
        // Only the scheme survives trimming here, so the position wins.
        assert_eq!(article_id("https://", 4), "5");
    }

    #[test]
    fn test_today_is_plausible() {
        let date = today();
        let year: i32 = date[..4].parse().unwrap();
        assert!(year >= 2024);
        assert_eq!(&date[4..5], "-");
        assert_eq!(&date[7..8], "-");
    }
}
