//! Search query construction

/// Builds the fallback queries for one brand and product type
///
/// Each keyword phrase yields `site:<domain> filetype:pdf <brand> <kw>`.
/// When synonyms are given, a second query per keyword adds an OR'ed clause
/// of the quoted synonyms.
///
/// ```
/// use pcf_harvester::search::build_queries;
///
/// let queries = build_queries("dell.com", "dell", &["EPD".to_string()], &["laptop".to_string()]);
/// assert_eq!(queries, vec![
///     "site:dell.com filetype:pdf dell EPD".to_string(),
///     "site:dell.com filetype:pdf dell (\"laptop\") EPD".to_string(),
/// ]);
/// ```
pub fn build_queries(
    domain: &str,
    brand: &str,
    keywords: &[String],
    synonyms: &[String],
) -> Vec<String> {
    let synonym_clause = synonym_clause(synonyms);
    let mut queries = Vec::with_capacity(keywords.len() * 2);

    for keyword in keywords {
        queries.push(format!("site:{} filetype:pdf {} {}", domain, brand, keyword));
        if let Some(clause) = &synonym_clause {
            queries.push(format!(
                "site:{} filetype:pdf {} {} {}",
                domain, brand, clause, keyword
            ));
        }
    }

    queries
}

fn synonym_clause(synonyms: &[String]) -> Option<String> {
    if synonyms.is_empty() {
        return None;
    }
    let quoted: Vec<String> = synonyms.iter().map(|s| format!("\"{}\"", s)).collect();
    Some(format!("({})", quoted.join(" OR ")))
}

/// Query used to auto-discover a brand's PCF landing page
pub fn landing_query(brand: &str) -> String {
    format!(
        "site:{}.com (\"product carbon footprint\" OR \"Product Environmental Report\" OR sustainability)",
        brand.trim().to_lowercase()
    )
}
